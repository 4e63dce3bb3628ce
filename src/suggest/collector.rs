//! Suggestion collector
//!
//! Explores the syntax network from the simulator's configurations without
//! consuming a token and harvests every token kind that a reachable match
//! transition would accept next.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::error::ExplorationBoundExceeded;
use crate::grammar::{GrammarModel, TokenKind};
use crate::network::{Configuration, ExplorationLimits, ExplorationStats, StateId, Transition, closure};

/// Token kinds that may come next
#[derive(Debug, Clone, Default)]
pub struct Collected {
    /// Candidate kinds with the states whose transitions accept them
    pub candidates: BTreeMap<TokenKind, BTreeSet<StateId>>,
    /// The start rule can be complete here
    pub accepts_end: bool,
    pub stats: ExplorationStats,
    pub bound_exceeded: Option<ExplorationBoundExceeded>,
}

impl Collected {
    pub fn kinds(&self) -> impl Iterator<Item = TokenKind> + '_ {
        self.candidates.keys().copied()
    }
}

pub fn collect(
    grammar: &dyn GrammarModel,
    configurations: Vec<Configuration>,
    limits: &ExplorationLimits,
) -> Collected {
    let syntax = grammar.syntax_network();
    let explored = closure(syntax, configurations, limits);

    let mut candidates: BTreeMap<TokenKind, BTreeSet<StateId>> = BTreeMap::new();
    for config in &explored.frontier {
        for transition in &syntax.state(config.state).transitions {
            match transition {
                Transition::Match { symbol, .. } => {
                    candidates.entry(*symbol).or_default().insert(config.state);
                }
                Transition::MatchSet { set, .. } => {
                    for kind in set {
                        candidates.entry(*kind).or_default().insert(config.state);
                    }
                }
                _ => {}
            }
        }
    }

    debug!(
        candidates = candidates.len(),
        accepts_end = explored.accepts_end(),
        explored = explored.stats.explored,
        "collected candidates"
    );

    Collected {
        candidates,
        accepts_end: explored.accepts_end(),
        stats: explored.stats,
        bound_exceeded: explored.bound_exceeded,
    }
}
