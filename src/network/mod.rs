//! Transition networks
//!
//! A network is a directed graph of states grouped into rules. Every rule owns
//! one start state and one stop state; edges are labeled with one of:
//!
//! - `Epsilon` - unlabeled, consumes nothing
//! - `Match` / `MatchSet` - consume one input symbol
//! - `RuleCall` - enter another rule, remembering where to continue
//! - `RuleReturn` - leave the current rule (only on stop states)
//!
//! The same abstraction serves the lexical grammar (symbols are characters)
//! and the syntax grammar (symbols are token kinds); the [`Alphabet`] type
//! parameter picks one. States are addressed by [`StateId`] and never copied.

mod charset;
pub mod closure;
pub mod configuration;

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

pub use charset::CharSet;
pub use closure::{Closure, ExplorationLimits, ExplorationStats, closure, step};
pub use configuration::{CallStack, Configuration, ConfigurationSet, Frame};

use crate::grammar::TokenKind;

/// Index of a state inside its network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(pub u32);

impl StateId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a rule inside its network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(pub u32);

impl RuleId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Input alphabet of a network
pub trait Alphabet: Clone + Debug {
    /// A single input symbol
    type Symbol: Copy + Eq + Hash + Debug;

    /// A set of symbols matched by one transition
    type Set: Clone + Debug;

    /// Check whether `set` contains `symbol`
    fn contains(set: &Self::Set, symbol: Self::Symbol) -> bool;
}

/// Lexical alphabet: characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chars;

impl Alphabet for Chars {
    type Symbol = char;
    type Set = CharSet;

    fn contains(set: &CharSet, symbol: char) -> bool {
        set.contains(symbol)
    }
}

/// Syntax alphabet: token kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tokens;

impl Alphabet for Tokens {
    type Symbol = TokenKind;
    type Set = Vec<TokenKind>;

    fn contains(set: &Vec<TokenKind>, symbol: TokenKind) -> bool {
        set.contains(&symbol)
    }
}

/// Role of a state within its rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateKind {
    Basic,
    RuleStart,
    RuleStop,
    /// Entry of an alternation or optional part
    Decision,
    /// Head of a repetition
    Loop,
}

/// A labeled edge leaving a state
#[derive(Debug, Clone)]
pub enum Transition<A: Alphabet> {
    Epsilon { target: StateId },
    Match { symbol: A::Symbol, target: StateId },
    MatchSet { set: A::Set, target: StateId },
    /// Enter `rule` at its start state; continue at `follow` once it returns
    RuleCall { rule: RuleId, follow: StateId },
    RuleReturn,
}

impl<A: Alphabet> Transition<A> {
    /// Target state if this transition consumes `symbol`
    pub fn accepts(&self, symbol: A::Symbol) -> Option<StateId> {
        match self {
            Transition::Match { symbol: s, target } if *s == symbol => Some(*target),
            Transition::MatchSet { set, target } if A::contains(set, symbol) => Some(*target),
            _ => None,
        }
    }

    /// Whether this transition consumes an input symbol
    pub fn is_match(&self) -> bool {
        matches!(self, Transition::Match { .. } | Transition::MatchSet { .. })
    }
}

/// A node of a transition network
#[derive(Debug, Clone)]
pub struct NetworkState<A: Alphabet> {
    pub id: StateId,
    pub rule: RuleId,
    pub kind: StateKind,
    pub transitions: Vec<Transition<A>>,
}

/// Rule entry points
#[derive(Debug, Clone)]
pub struct RuleInfo {
    pub name: String,
    pub start: StateId,
    pub stop: StateId,
}

/// Compiled transition network
#[derive(Debug, Clone)]
pub struct Network<A: Alphabet> {
    states: Vec<NetworkState<A>>,
    rules: Vec<RuleInfo>,
    rule_index: HashMap<String, RuleId>,
}

impl<A: Alphabet> Network<A> {
    /// Create an empty network
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            rules: Vec::new(),
            rule_index: HashMap::new(),
        }
    }

    /// Declare a rule, creating its start and stop states
    ///
    /// The stop state carries the rule's only `RuleReturn` transition.
    pub fn add_rule(&mut self, name: impl Into<String>) -> RuleId {
        let name = name.into();
        let rule = RuleId(self.rules.len() as u32);
        let start = self.add_state(rule, StateKind::RuleStart);
        let stop = self.add_state(rule, StateKind::RuleStop);
        self.add_transition(stop, Transition::RuleReturn);
        self.rule_index.insert(name.clone(), rule);
        self.rules.push(RuleInfo { name, start, stop });
        rule
    }

    /// Add a state owned by `rule`
    pub fn add_state(&mut self, rule: RuleId, kind: StateKind) -> StateId {
        let id = StateId(self.states.len() as u32);
        self.states.push(NetworkState {
            id,
            rule,
            kind,
            transitions: Vec::new(),
        });
        id
    }

    /// Append an outgoing transition to `from`
    pub fn add_transition(&mut self, from: StateId, transition: Transition<A>) {
        self.states[from.index()].transitions.push(transition);
    }

    pub fn state(&self, id: StateId) -> &NetworkState<A> {
        &self.states[id.index()]
    }

    pub fn rule(&self, id: RuleId) -> &RuleInfo {
        &self.rules[id.index()]
    }

    /// Look up a rule by name
    pub fn rule_by_name(&self, name: &str) -> Option<RuleId> {
        self.rule_index.get(name).copied()
    }

    /// Start state of the named rule
    pub fn start_state(&self, name: &str) -> Option<StateId> {
        self.rule_by_name(name).map(|rule| self.rule(rule).start)
    }

    pub fn rules(&self) -> impl Iterator<Item = (RuleId, &RuleInfo)> {
        self.rules
            .iter()
            .enumerate()
            .map(|(i, info)| (RuleId(i as u32), info))
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

impl<A: Alphabet> Default for Network<A> {
    fn default() -> Self {
        Self::new()
    }
}
