//! Epsilon / rule-call closure
//!
//! Breadth-first exploration of everything reachable from a set of
//! configurations without consuming input. Shared by the tokenizer (lexical
//! network), the parse-state simulator and the suggestion collector (syntax
//! network).
//!
//! Termination is guaranteed by two bounds:
//! - a rule is not entered again once it already has `max_rule_reentry`
//!   frames pushed during this closure (indirect left recursion)
//! - at most `max_configurations` configurations are explored per closure

use std::collections::{HashSet, VecDeque};

use tracing::{trace, warn};

use super::{Alphabet, Configuration, ConfigurationSet, Frame, Network, Transition};
use crate::error::ExplorationBoundExceeded;

/// Bounds applied to every closure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExplorationLimits {
    /// Nested entries into the same rule without consuming a symbol
    pub max_rule_reentry: usize,
    /// Configurations explored per closure
    pub max_configurations: usize,
}

impl Default for ExplorationLimits {
    fn default() -> Self {
        Self {
            max_rule_reentry: 16,
            max_configurations: 100_000,
        }
    }
}

/// Counters describing how much of the network a request explored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExplorationStats {
    /// Configurations popped from work queues
    pub explored: usize,
    /// Rule calls not expanded because of the re-entry bound
    pub pruned_calls: usize,
    /// Closures cut short by the configuration bound
    pub truncated: usize,
}

impl ExplorationStats {
    pub fn absorb(&mut self, other: ExplorationStats) {
        self.explored += other.explored;
        self.pruned_calls += other.pruned_calls;
        self.truncated += other.truncated;
    }
}

/// Result of a closure
#[derive(Debug, Clone, Default)]
pub struct Closure {
    /// Configurations at states with at least one outgoing match transition
    pub frontier: Vec<Configuration>,
    /// Configurations that returned from the outermost rule
    pub completed: Vec<Configuration>,
    pub stats: ExplorationStats,
    /// Set when the configuration bound cut the exploration short
    pub bound_exceeded: Option<ExplorationBoundExceeded>,
}

impl Closure {
    /// Whether the outermost rule can end here
    pub fn accepts_end(&self) -> bool {
        !self.completed.is_empty()
    }
}

/// Explore everything reachable from `seeds` without consuming a symbol
pub fn closure<A: Alphabet>(
    network: &Network<A>,
    seeds: impl IntoIterator<Item = Configuration>,
    limits: &ExplorationLimits,
) -> Closure {
    // Frames above the watermark were pushed by this closure; only those
    // count towards the re-entry bound.
    let mut queue: VecDeque<(Configuration, usize)> = seeds
        .into_iter()
        .map(|config| {
            let watermark = config.stack.depth();
            (config, watermark)
        })
        .collect();
    let mut visited: HashSet<Configuration> = HashSet::new();
    let mut result = Closure::default();

    while let Some((config, watermark)) = queue.pop_front() {
        if visited.contains(&config) {
            continue;
        }
        if result.stats.explored >= limits.max_configurations {
            let exceeded = ExplorationBoundExceeded {
                limit: limits.max_configurations,
                explored: result.stats.explored,
            };
            warn!("{exceeded}");
            result.stats.truncated += 1;
            result.bound_exceeded = Some(exceeded);
            break;
        }
        visited.insert(config.clone());
        result.stats.explored += 1;

        let state = network.state(config.state);
        let mut consumes = false;

        for transition in &state.transitions {
            match transition {
                Transition::Epsilon { target } => {
                    queue.push_back((config.moved_to(*target), watermark));
                }
                Transition::RuleCall { rule, follow } => {
                    let reentries = config.stack.frames()[watermark..]
                        .iter()
                        .filter(|frame| frame.rule == *rule)
                        .count();
                    if reentries >= limits.max_rule_reentry {
                        result.stats.pruned_calls += 1;
                        continue;
                    }
                    let frame = Frame {
                        rule: *rule,
                        follow: *follow,
                    };
                    let start = network.rule(*rule).start;
                    queue.push_back((
                        Configuration::new(start, config.stack.pushed(frame)),
                        watermark,
                    ));
                }
                Transition::RuleReturn => match config.stack.popped() {
                    Some((frame, rest)) => {
                        let watermark = watermark.min(rest.depth());
                        queue.push_back((Configuration::new(frame.follow, rest), watermark));
                    }
                    None => result.completed.push(config.clone()),
                },
                Transition::Match { .. } | Transition::MatchSet { .. } => consumes = true,
            }
        }

        if consumes {
            result.frontier.push(config);
        }
    }

    trace!(
        explored = result.stats.explored,
        frontier = result.frontier.len(),
        completed = result.completed.len(),
        "closure finished"
    );
    result
}

/// Advance every frontier configuration across the transitions accepting `symbol`
pub fn step<A: Alphabet>(
    network: &Network<A>,
    frontier: &[Configuration],
    symbol: A::Symbol,
) -> ConfigurationSet {
    let mut next = ConfigurationSet::new();
    for config in frontier {
        for transition in &network.state(config.state).transitions {
            if let Some(target) = transition.accepts(symbol) {
                next.insert(config.moved_to(target));
            }
        }
    }
    next
}
