//! Cursor-aware completion front end

use std::sync::Arc;

use tracing::debug;

use super::{SuggestOptions, suggest_with_options};
use crate::grammar::GrammarModel;

/// Completion pair representing a candidate suggestion
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionPair {
    /// Display text for the candidate
    pub display: String,
    /// Replacement text to insert
    pub replacement: String,
    /// Name of the token kind the candidate belongs to
    pub description: Option<String>,
}

/// Completion engine bound to one grammar
///
/// Cheap to clone; the grammar is shared.
#[derive(Clone)]
pub struct Suggester {
    grammar: Arc<dyn GrammarModel>,
    options: SuggestOptions,
}

impl Suggester {
    /// Create a new suggester
    ///
    /// # Arguments
    /// * `grammar` - Shared grammar
    /// * `options` - Case preference and exploration limits
    pub fn new(grammar: Arc<dyn GrammarModel>, options: SuggestOptions) -> Self {
        Self { grammar, options }
    }

    pub fn grammar(&self) -> &dyn GrammarModel {
        self.grammar.as_ref()
    }

    /// Shared handle to the grammar
    pub fn grammar_handle(&self) -> Arc<dyn GrammarModel> {
        Arc::clone(&self.grammar)
    }

    pub fn options(&self) -> &SuggestOptions {
        &self.options
    }

    /// Complete the input at the given cursor position
    ///
    /// Only the text before the cursor is considered. Invalid input yields no
    /// candidates.
    ///
    /// # Arguments
    /// * `line` - The input line
    /// * `pos` - Cursor position (byte index)
    ///
    /// # Returns
    /// * `(usize, Vec<CompletionPair>)` - Start of the text to replace and candidate pairs
    pub fn complete(&self, line: &str, pos: usize) -> (usize, Vec<CompletionPair>) {
        let mut pos = pos.min(line.len());
        while !line.is_char_boundary(pos) {
            pos -= 1;
        }

        let report = match suggest_with_options(self.grammar.as_ref(), &line[..pos], &self.options) {
            Ok(report) => report,
            Err(e) => {
                debug!("No completions for {:?}: {}", &line[..pos], e);
                return (pos, Vec::new());
            }
        };

        let start = report.partial.as_ref().map_or(pos, |partial| partial.start);
        let pairs = report
            .suggestions
            .into_iter()
            .map(|suggestion| CompletionPair {
                display: suggestion.text.clone(),
                replacement: suggestion.text,
                description: Some(self.grammar.display_name(suggestion.kind).to_string()),
            })
            .collect();

        (start, pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::samples;
    use crate::suggest::CasePreference;

    fn create_test_suggester(case: CasePreference) -> Suggester {
        let grammar = Arc::new(samples::harmony_sql().unwrap());
        Suggester::new(grammar, SuggestOptions::with_case(case))
    }

    fn values(pairs: &[CompletionPair]) -> Vec<&str> {
        pairs.iter().map(|p| p.replacement.as_str()).collect()
    }

    #[test]
    fn test_complete_after_space() {
        let suggester = create_test_suggester(CasePreference::AsIs);
        let (start, pairs) = suggester.complete("FROM PROFILE_TABLE ", 19);

        assert_eq!(start, 19);
        assert_eq!(values(&pairs), ["SELECT"]);
        assert_eq!(pairs[0].description.as_deref(), Some("SELECT"));
    }

    #[test]
    fn test_complete_with_prefix() {
        let suggester = create_test_suggester(CasePreference::AsIs);
        let (start, pairs) = suggester.complete("FROM US_", 8);

        assert_eq!(start, 5);
        assert_eq!(
            values(&pairs),
            ["US_DALLAS_CUSTOMERS", "US_FORT_WORTH_CUSTOMERS"]
        );
        assert!(
            pairs
                .iter()
                .all(|p| p.description.as_deref() == Some("TABLE_NAME"))
        );
    }

    #[test]
    fn test_cursor_in_middle_ignores_rest_of_line() {
        let suggester = create_test_suggester(CasePreference::AsIs);
        let line = "FROM PROFILE_TABLE SELECT *";
        let (start, pairs) = suggester.complete(line, 5);

        assert_eq!(start, 5);
        assert_eq!(pairs.len(), 4);
    }

    #[test]
    fn test_cursor_past_end_and_inside_char_is_clamped() {
        let suggester = create_test_suggester(CasePreference::AsIs);
        let (start, pairs) = suggester.complete("FROM ", 100);
        assert_eq!(start, 5);
        assert_eq!(pairs.len(), 4);

        // 'é' is two bytes; position 1 falls inside it
        let (start, pairs) = suggester.complete("é", 1);
        assert_eq!(start, 0);
        assert_eq!(values(&pairs), ["FROM"]);
    }

    #[test]
    fn test_invalid_input_yields_nothing() {
        let suggester = create_test_suggester(CasePreference::AsIs);

        let (_, pairs) = suggester.complete("SELECT FROM ", 12);
        assert!(pairs.is_empty());

        let (_, pairs) = suggester.complete("FROM ### ", 9);
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_lower_case_preference() {
        let suggester = create_test_suggester(CasePreference::Lower);
        let (start, pairs) = suggester.complete("from PROFILE_TABLE Se", 21);

        assert_eq!(start, 19);
        assert_eq!(values(&pairs), ["select"]);
    }
}
