//! Interactive completion shell
//!
//! This module wires the completion engine into a line editor:
//! - Tab opens a menu of grammar suggestions for the text before the cursor
//! - Tokens are highlighted by the grammar's own tokenizer
//! - Command history, optionally persisted to a file
//! - A prompt naming the grammar's start rule

mod completer;
mod engine;
mod highlighter;
mod prompt;

pub use completer::GrammarCompleter;
pub use engine::ReplEngine;
pub use highlighter::GrammarHighlighter;
pub use prompt::GrammarPrompt;
