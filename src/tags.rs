//! Word-set tags used for builder dispatch and component lookup.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An ordered, deduplicated set of tag words.
///
/// Tags are parsed from whitespace-separated strings, so a pair tagged
/// `"back right rod"` carries the three words `back`, `right` and `rod`.
/// Builder dispatch asks whether a pair *contains* the builder's tag word;
/// controller lookup asks whether a component *matches* a multi-word query
/// (every query word present). Insertion order is preserved for display.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tags(Vec<String>);

impl Tags {
    /// Creates an empty tag set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a single word, ignoring duplicates.
    pub fn add(&mut self, word: &str) {
        if !word.is_empty() && !self.contains(word) {
            self.0.push(word.to_owned());
        }
    }

    /// Adds every word of another tag set.
    pub fn extend(&mut self, other: &Tags) {
        for word in &other.0 {
            self.add(word);
        }
    }

    /// Returns `true` if `word` is one of the tag words.
    pub fn contains(&self, word: &str) -> bool {
        self.0.iter().any(|w| w == word)
    }

    /// Returns `true` if every word of `query` (whitespace separated) is
    /// present in this set. An empty query matches everything.
    pub fn matches(&self, query: &str) -> bool {
        query.split_whitespace().all(|w| self.contains(w))
    }

    /// Returns `true` if this set contains every word of `other`.
    pub fn is_superset_of(&self, other: &Tags) -> bool {
        other.0.iter().all(|w| self.contains(w))
    }

    /// The tag words in insertion order.
    pub fn words(&self) -> &[String] {
        &self.0
    }

    /// Returns `true` if no words are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Tags {
    fn from(s: &str) -> Self {
        let mut tags = Tags::new();
        for word in s.split_whitespace() {
            tags.add(word);
        }
        tags
    }
}

impl fmt::Display for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_dedupes_words() {
        let tags = Tags::from("back right rod back");
        assert_eq!(tags.words(), &["back", "right", "rod"]);
    }

    #[test]
    fn matches_requires_every_query_word() {
        let tags = Tags::from("top right muscle");
        assert!(tags.matches("top right"));
        assert!(tags.matches("muscle"));
        assert!(!tags.matches("top left"));
    }

    #[test]
    fn superset_after_extend() {
        let pair = Tags::from("top prismatic");
        let mut component = pair.clone();
        component.add("rod1");
        assert!(component.is_superset_of(&pair));
        assert!(!pair.is_superset_of(&component));
    }
}
