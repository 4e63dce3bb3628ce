//! Simulation configurations
//!
//! A [`Configuration`] is one thread of a non-deterministic simulation: a
//! network state plus the stack of open rule invocations. Stacks are values;
//! forking a configuration clones its stack so branches never observe each
//! other.

use std::collections::HashSet;

use super::{RuleId, StateId};

/// An open rule invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Frame {
    /// The rule that was entered
    pub rule: RuleId,
    /// Where the caller continues once `rule` returns
    pub follow: StateId,
}

/// Ordered open rule invocations, innermost last
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CallStack(Vec<Frame>);

impl CallStack {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.0
    }

    /// A copy of this stack with `frame` pushed on top
    pub fn pushed(&self, frame: Frame) -> Self {
        let mut frames = Vec::with_capacity(self.0.len() + 1);
        frames.extend_from_slice(&self.0);
        frames.push(frame);
        Self(frames)
    }

    /// The innermost frame and a copy of the stack without it
    ///
    /// Returns `None` on an empty stack: returning from the outermost rule
    /// is a completion, not an underflow.
    pub fn popped(&self) -> Option<(Frame, Self)> {
        let (top, rest) = self.0.split_last()?;
        Some((*top, Self(rest.to_vec())))
    }
}

/// A network state paired with its call stack
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Configuration {
    pub state: StateId,
    pub stack: CallStack,
}

impl Configuration {
    pub fn new(state: StateId, stack: CallStack) -> Self {
        Self { state, stack }
    }

    /// Configuration at `state` with nothing on the stack
    pub fn initial(state: StateId) -> Self {
        Self::new(state, CallStack::new())
    }

    /// Same stack, different state
    pub fn moved_to(&self, state: StateId) -> Self {
        Self::new(state, self.stack.clone())
    }
}

/// Insertion-ordered set of configurations with exact deduplication
#[derive(Debug, Clone, Default)]
pub struct ConfigurationSet {
    items: Vec<Configuration>,
    seen: HashSet<Configuration>,
}

impl ConfigurationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a configuration; returns `false` if an identical one is present
    pub fn insert(&mut self, config: Configuration) -> bool {
        if self.seen.contains(&config) {
            return false;
        }
        self.seen.insert(config.clone());
        self.items.push(config);
        true
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Configuration> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<Configuration> {
        self.items
    }
}

impl FromIterator<Configuration> for ConfigurationSet {
    fn from_iter<I: IntoIterator<Item = Configuration>>(iter: I) -> Self {
        let mut set = Self::new();
        for config in iter {
            set.insert(config);
        }
        set
    }
}
