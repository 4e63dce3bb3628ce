//! Parse-state simulator
//!
//! Replays the confirmed tokens through the syntax network. The result is
//! every configuration the parser can be in after consuming exactly those
//! tokens.

use tracing::{debug, trace};

use super::tokenizer::Token;
use crate::error::NoViableParse;
use crate::grammar::GrammarModel;
use crate::network::{Configuration, ExplorationLimits, ExplorationStats, closure, step};

/// Configurations reachable after the confirmed tokens
#[derive(Debug, Clone, Default)]
pub struct Simulation {
    pub configurations: Vec<Configuration>,
    pub stats: ExplorationStats,
}

/// Consume `tokens` starting from the grammar's start rule
pub fn simulate(
    grammar: &dyn GrammarModel,
    tokens: &[Token],
    limits: &ExplorationLimits,
) -> Result<Simulation, NoViableParse> {
    let syntax = grammar.syntax_network();
    let start = syntax.rule(grammar.start_rule()).start;

    let mut simulation = Simulation {
        configurations: vec![Configuration::initial(start)],
        stats: ExplorationStats::default(),
    };

    for (index, token) in tokens.iter().enumerate() {
        let explored = closure(syntax, simulation.configurations, limits);
        simulation.stats.absorb(explored.stats);

        let next = step(syntax, &explored.frontier, token.kind);
        if next.is_empty() {
            debug!(index, token = %token.text, "no viable parse");
            return Err(NoViableParse {
                index,
                text: token.text.clone(),
                kind: grammar.display_name(token.kind).to_string(),
            });
        }

        trace!(index, configurations = next.len(), "consumed token");
        simulation.configurations = next.into_vec();
    }

    debug!(
        tokens = tokens.len(),
        configurations = simulation.configurations.len(),
        "simulation finished"
    );
    Ok(simulation)
}
