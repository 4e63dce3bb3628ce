//! Error handling module for autosuggest.
//!
//! This module provides the error taxonomy of the completion engine:
//! - Request errors that abort a single suggestion request
//!   ([`LexicalError`], [`NoViableParse`])
//! - The recoverable [`ExplorationBoundExceeded`] signal
//! - Grammar construction and configuration errors
//!
//! # Example
//!
//! ```rust,no_run
//! use autosuggest::error::{AutosuggestError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(AutosuggestError::Generic("not today".to_string()))
//! }
//! ```

pub mod kinds;

// Re-export commonly used types
pub use kinds::{
    AutosuggestError, ConfigError, ExplorationBoundExceeded, GrammarError, LexicalError,
    NoViableParse, Result,
};
