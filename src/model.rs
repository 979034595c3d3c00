//! The assembled model tree: components, typed tag lookup and stepping.

use crate::error::{CreatorError, Result};
use crate::linear_string::LinearString;
use crate::prismatic::Prismatic;
use crate::rod::Rod;
use crate::tags::Tags;
use crate::world::World;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A steppable simulated object, one variant per component kind.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Component {
    Rod(Rod),
    LinearString(LinearString),
    Prismatic(Prismatic),
}

impl Component {
    /// The component's tag set, a superset of its originating pair's tags.
    pub fn tags(&self) -> &Tags {
        match self {
            Self::Rod(c) => c.tags(),
            Self::LinearString(c) => c.tags(),
            Self::Prismatic(c) => c.tags(),
        }
    }

    /// Mass contributed by this component and its children.
    pub fn mass(&self) -> f32 {
        match self {
            Self::Rod(c) => c.mass(),
            // Strings are massless springs.
            Self::LinearString(_) => 0.0,
            Self::Prismatic(c) => c.mass(),
        }
    }

    /// Nested child components, if any.
    pub fn children(&self) -> &[Component] {
        match self {
            Self::Prismatic(c) => c.children(),
            _ => &[],
        }
    }

    /// Attaches the component (and any children) to the world.
    pub fn setup(&mut self, world: &mut dyn World) {
        match self {
            Self::Rod(c) => c.setup(world),
            Self::LinearString(c) => c.setup(world),
            Self::Prismatic(c) => c.setup(world),
        }
    }

    /// Advances the component by `dt` seconds.
    pub fn step(&mut self, dt: f32) -> Result<()> {
        match self {
            Self::Rod(c) => {
                c.step(dt);
                Ok(())
            }
            Self::LinearString(c) => c.step(dt),
            Self::Prismatic(c) => c.step(dt),
        }
    }

    /// Detaches the component from the world. Safe to call more than once.
    pub fn teardown(&mut self, world: &mut dyn World) {
        match self {
            Self::Rod(c) => c.teardown(world),
            Self::LinearString(c) => c.teardown(world),
            Self::Prismatic(c) => c.teardown(world),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Rod(_) => "rod",
            Self::LinearString(_) => "string",
            Self::Prismatic(_) => "prismatic",
        }
    }
}

/// Typed extraction from a [`Component`], used by [`Model::find`].
pub trait FromComponent: Sized {
    fn from_component(component: &Component) -> Option<&Self>;
    fn from_component_mut(component: &mut Component) -> Option<&mut Self>;
}

macro_rules! impl_from_component {
    ($ty:ty, $variant:ident) => {
        impl FromComponent for $ty {
            fn from_component(component: &Component) -> Option<&Self> {
                match component {
                    Component::$variant(c) => Some(c),
                    _ => None,
                }
            }

            fn from_component_mut(component: &mut Component) -> Option<&mut Self> {
                match component {
                    Component::$variant(c) => Some(c),
                    _ => None,
                }
            }
        }
    };
}

impl_from_component!(Rod, Rod);
impl_from_component!(LinearString, LinearString);
impl_from_component!(Prismatic, Prismatic);

/// A controller hook notified at the start of every tick, before any
/// component is stepped. This is where controllers set actuator targets.
pub trait Observer {
    fn on_step(&mut self, model: &mut Model, dt: f32);
}

/// The root of the assembled component tree.
///
/// Owns every component produced by the build, the registered observers and
/// an immutable name → component lookup map built once after assembly.
/// Children are stepped in insertion order, every tick.
#[derive(Default)]
pub struct Model {
    children: Vec<Component>,
    observers: Vec<Box<dyn Observer>>,
    component_map: HashMap<String, Vec<usize>>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a component. Insertion order is the step and lookup order.
    pub fn add_component(&mut self, component: Component) {
        self.children.push(component);
    }

    /// The root-level components, in insertion order.
    pub fn components(&self) -> &[Component] {
        &self.children
    }

    /// Registers a controller notified on every step.
    pub fn add_observer(&mut self, observer: Box<dyn Observer>) {
        self.observers.push(observer);
    }

    /// Attaches every component to the world, in insertion order.
    pub fn setup(&mut self, world: &mut dyn World) {
        for child in &mut self.children {
            child.setup(world);
        }
    }

    /// Advances the whole tree by `dt` seconds.
    ///
    /// Validates `dt > 0` before any mutation, notifies observers, then steps
    /// every child in insertion order. Observer notification precedes
    /// physical stepping so controllers can set targets for the same tick.
    pub fn step(&mut self, dt: f32) -> Result<()> {
        if dt <= 0.0 {
            return Err(CreatorError::InvalidTimeStep(dt));
        }
        // Observers need mutable access to the model, so swap them out for
        // the duration of the notification.
        let mut observers = std::mem::take(&mut self.observers);
        for observer in &mut observers {
            observer.on_step(self, dt);
        }
        self.observers = observers;

        for child in &mut self.children {
            child.step(dt)?;
        }
        Ok(())
    }

    /// Detaches every component from the world. Safe to call more than once.
    pub fn teardown(&mut self, world: &mut dyn World) {
        for child in &mut self.children {
            child.teardown(world);
        }
    }

    /// Finds every component of type `T` whose tags match `query` (all query
    /// words present), in construction order, descending into composites.
    pub fn find<T: FromComponent>(&self, query: &str) -> Vec<&T> {
        let mut out = Vec::new();
        for child in &self.children {
            collect(child, query, &mut out);
        }
        out
    }

    /// Mutable variant of [`find`](Self::find), for controllers that set
    /// actuator targets.
    pub fn find_mut<T: FromComponent>(&mut self, query: &str) -> Vec<&mut T> {
        let mut out = Vec::new();
        for child in &mut self.children {
            collect_mut(child, query, &mut out);
        }
        out
    }

    /// Maps `key` to every root-level component matching `tag`. Intended to
    /// be called once per key during assembly; the map is read-only
    /// afterwards.
    pub fn map_components(&mut self, key: &str, tag: &str) {
        let indices = self
            .children
            .iter()
            .enumerate()
            .filter(|(_, c)| c.tags().matches(tag))
            .map(|(i, _)| i)
            .collect();
        self.component_map.insert(key.to_owned(), indices);
    }

    /// Looks up the components mapped under `key`, in construction order.
    pub fn get_components(&self, key: &str) -> Result<Vec<&Component>> {
        let indices = self
            .component_map
            .get(key)
            .ok_or_else(|| CreatorError::UnknownKey(key.to_owned()))?;
        Ok(indices.iter().map(|&i| &self.children[i]).collect())
    }

    /// The keys of the component map, sorted for determinism.
    pub fn mapped_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.component_map.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

fn collect<'a, T: FromComponent>(component: &'a Component, query: &str, out: &mut Vec<&'a T>) {
    if component.tags().matches(query)
        && let Some(typed) = T::from_component(component)
    {
        out.push(typed);
    }
    for child in component.children() {
        collect(child, query, out);
    }
}

fn collect_mut<'a, T: FromComponent>(
    component: &'a mut Component,
    query: &str,
    out: &mut Vec<&'a mut T>,
) {
    // Probe with a shared borrow first; extracting the mutable reference
    // conditionally would keep `component` borrowed on the miss path.
    if component.tags().matches(query) && T::from_component(component).is_some() {
        if let Some(typed) = T::from_component_mut(component) {
            out.push(typed);
        }
        return;
    }
    if let Component::Prismatic(p) = component {
        for child in p.children_mut() {
            collect_mut(child, query, out);
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "model: {} components", self.children.len())?;
        for child in &self.children {
            fmt_component(f, child, 1)?;
        }
        for key in self.mapped_keys() {
            let count = self.component_map[key].len();
            writeln!(f, "  map '{key}' -> {count} component(s)")?;
        }
        Ok(())
    }
}

fn fmt_component(f: &mut fmt::Formatter<'_>, component: &Component, depth: usize) -> fmt::Result {
    let pad = "  ".repeat(depth);
    writeln!(
        f,
        "{pad}{} [{}] mass {:.4}",
        component.kind(),
        component.tags(),
        component.mass()
    )?;
    for child in component.children() {
        fmt_component(f, child, depth + 1)?;
    }
    Ok(())
}
