//! Completer for reedline - provides grammar-driven suggestions

use reedline::{Completer, Span, Suggestion};

use crate::suggest::Suggester;

/// Grammar completer for reedline
pub struct GrammarCompleter {
    suggester: Suggester,
}

impl GrammarCompleter {
    /// Create a new completer
    ///
    /// # Arguments
    /// * `suggester` - Completion engine bound to the active grammar
    pub fn new(suggester: Suggester) -> Self {
        Self { suggester }
    }
}

impl Completer for GrammarCompleter {
    /// Complete the input at the given cursor position
    ///
    /// # Arguments
    /// * `line` - The input line
    /// * `pos` - Cursor position (byte index)
    ///
    /// # Returns
    /// * `Vec<Suggestion>` - Suggestions replacing the partial fragment
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        let (start, candidates) = self.suggester.complete(line, pos);
        let end = pos.min(line.len()).max(start);

        candidates
            .into_iter()
            .map(|pair| Suggestion {
                value: pair.replacement,
                description: pair.description,
                span: Span::new(start, end),
                append_whitespace: true,
                ..Suggestion::default()
            })
            .collect()
    }
}
