//! Grammar-driven autocomplete
//!
//! Given a grammar (a lexical part and a syntactic part) and a partial input
//! string, this library computes the set of literal tokens that may legally
//! come next. Both parts of the grammar are compiled into transition networks
//! that are simulated directly, so no parser is generated.
//!
//! # Modules
//!
//! - `cli`: Command-line interface and argument parsing
//! - `config`: Configuration management
//! - `error`: Error types and handling
//! - `formatter`: Output formatting and display
//! - `grammar`: Grammar construction, definition files and bundled grammars
//! - `network`: Transition networks and their simulation
//! - `repl`: Interactive completion shell
//! - `suggest`: The completion pipeline
//!
//! # Example
//!
//! ```no_run
//! use autosuggest::grammar::samples;
//! use autosuggest::suggest::{CasePreference, suggest_completions};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let grammar = samples::harmony_sql()?;
//!     let suggestions = suggest_completions(&grammar, "FROM PROFILE_TABLE SE", CasePreference::AsIs)?;
//!     assert!(suggestions.contains("SELECT"));
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod formatter;
pub mod grammar;
pub mod network;
pub mod repl;
pub mod suggest;

// Re-export commonly used types
pub use config::Config;
pub use error::{AutosuggestError, Result};
pub use formatter::Formatter;
pub use grammar::{Grammar, GrammarBuilder, GrammarModel};
pub use repl::ReplEngine;
pub use suggest::{CasePreference, CompletionReport, Suggester, suggest_completions};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
///
/// # Returns
/// * `&str` - Version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
