//! Error types for structure description, build resolution and stepping.

use thiserror::Error;

/// Errors raised by the creation pipeline and the component object model.
///
/// Build-time errors ([`UnresolvedTag`](CreatorError::UnresolvedTag),
/// [`NodeOutOfRange`](CreatorError::NodeOutOfRange),
/// [`InvalidConfig`](CreatorError::InvalidConfig)) are never caught inside
/// this layer; they propagate to the application harness, which decides
/// whether to abort. Per-step errors are validated before any state mutation.
#[derive(Debug, Error)]
pub enum CreatorError {
    /// A pair referenced a node index the structure does not have.
    #[error("node index {index} out of range for structure with {len} nodes")]
    NodeOutOfRange {
        /// The offending node index.
        index: usize,
        /// Number of nodes in the structure.
        len: usize,
    },

    /// No registered builder matched any of a pair's tags.
    #[error("no builder registered for pair tagged '{tags}'")]
    UnresolvedTag {
        /// The unmatched pair's tags, space separated.
        tags: String,
    },

    /// `step` was called with a non-positive time step.
    #[error("time step must be positive, got {0}")]
    InvalidTimeStep(f32),

    /// A component-map lookup used a key that was never mapped.
    #[error("key '{0}' not found in component map")]
    UnknownKey(String),

    /// A component configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CreatorError>;
