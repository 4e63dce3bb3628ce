//! Completion engine
//!
//! Each request runs the same pipeline over the full input:
//!
//! 1. [`tokenizer`] splits the input into confirmed tokens and a trailing
//!    partial fragment
//! 2. [`simulator`] replays the confirmed tokens through the syntax network
//! 3. [`collector`] explores from the surviving configurations and gathers
//!    the token kinds that may come next
//! 4. [`resolver`] maps those kinds to literal text, filtered by the fragment
//!
//! Requests are stateless; the grammar is only read.

pub mod collector;
pub mod engine;
pub mod resolver;
pub mod simulator;
pub mod tokenizer;

#[cfg(test)]
mod tests;

use std::collections::BTreeSet;

use tracing::debug;

pub use engine::{CompletionPair, Suggester};
pub use resolver::{CasePreference, Suggestion};
pub use tokenizer::{Partial, Token, Tokenizer};

use crate::error::Result;
use crate::grammar::GrammarModel;
use crate::network::{ExplorationLimits, ExplorationStats};

/// Per-request options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuggestOptions {
    pub case_preference: CasePreference,
    pub limits: ExplorationLimits,
}

impl SuggestOptions {
    pub fn with_case(case_preference: CasePreference) -> Self {
        Self {
            case_preference,
            ..Self::default()
        }
    }
}

/// Everything a request found out about its input
#[derive(Debug, Clone, Default)]
pub struct CompletionReport {
    /// Sorted by text, unique
    pub suggestions: Vec<Suggestion>,
    pub partial: Option<Partial>,
    /// Number of confirmed tokens
    pub confirmed_tokens: usize,
    /// The input is already a complete statement
    pub accepts_end_of_input: bool,
    pub stats: ExplorationStats,
}

impl CompletionReport {
    pub fn texts(&self) -> BTreeSet<String> {
        self.suggestions.iter().map(|s| s.text.clone()).collect()
    }
}

/// Suggestion strings for `input`
///
/// Fails with a lexical error when the confirmed part of the input cannot be
/// tokenized, and with a no-viable-parse error when its tokens are not a
/// valid prefix of the grammar.
///
/// # Examples
///
/// ```no_run
/// use autosuggest::grammar::samples;
/// use autosuggest::suggest::{CasePreference, suggest_completions};
///
/// let grammar = samples::harmony_sql().expect("bundled grammar");
/// let suggestions = suggest_completions(&grammar, "FROM ", CasePreference::AsIs).unwrap();
/// assert!(suggestions.contains("PROFILE_TABLE"));
/// ```
pub fn suggest_completions(
    grammar: &dyn GrammarModel,
    input: &str,
    case_preference: CasePreference,
) -> Result<BTreeSet<String>> {
    let report = suggest_with_options(grammar, input, &SuggestOptions::with_case(case_preference))?;
    Ok(report.texts())
}

/// Run the full pipeline and return the detailed report
pub fn suggest_with_options(
    grammar: &dyn GrammarModel,
    input: &str,
    options: &SuggestOptions,
) -> Result<CompletionReport> {
    let tokenized = Tokenizer::new(grammar, options.limits).tokenize(input)?;
    let simulation = simulator::simulate(grammar, &tokenized.tokens, &options.limits)?;
    let collected = collector::collect(grammar, simulation.configurations, &options.limits);

    let fragment = tokenized.partial.as_ref().map(|p| p.text.as_str());
    let suggestions = resolver::resolve(
        grammar,
        collected.kinds(),
        options.case_preference,
        fragment,
    );

    let mut stats = tokenized.stats;
    stats.absorb(simulation.stats);
    stats.absorb(collected.stats);

    debug!(
        input,
        suggestions = suggestions.len(),
        explored = stats.explored,
        "completion request finished"
    );

    Ok(CompletionReport {
        suggestions,
        partial: tokenized.partial,
        confirmed_tokens: tokenized.tokens.len(),
        accepts_end_of_input: collected.accepts_end,
        stats,
    })
}
