//! Syntax highlighter driven by the grammar's tokenizer
//!
//! Tokens with literal spellings are shown as keywords, patterned tokens
//! (identifiers, numbers, strings) as values. The trailing fragment is left
//! plain and text the tokenizer rejects is shown in red.

use std::sync::Arc;

use nu_ansi_term::{Color, Style};
use reedline::{Highlighter, StyledText};

use crate::grammar::GrammarModel;
use crate::network::ExplorationLimits;
use crate::suggest::Tokenizer;

/// Grammar-aware highlighter
pub struct GrammarHighlighter {
    grammar: Arc<dyn GrammarModel>,
    limits: ExplorationLimits,
    enabled: bool,
}

impl GrammarHighlighter {
    /// Create a new highlighter
    pub fn new(grammar: Arc<dyn GrammarModel>, limits: ExplorationLimits, enabled: bool) -> Self {
        Self {
            grammar,
            limits,
            enabled,
        }
    }

    fn token_style(&self, literal: bool) -> Style {
        if literal {
            Color::Blue.bold()
        } else {
            Color::Yellow.normal()
        }
    }
}

impl Highlighter for GrammarHighlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> StyledText {
        let mut styled = StyledText::new();
        if !self.enabled {
            styled.push((Style::default(), line.to_string()));
            return styled;
        }

        let tokenizer = Tokenizer::new(self.grammar.as_ref(), self.limits);
        let tokenized = match tokenizer.tokenize(line) {
            Ok(tokenized) => tokenized,
            Err(e) => {
                let position = e.position.min(line.len());
                if position > 0 {
                    styled.push((Style::default(), line[..position].to_string()));
                }
                styled.push((Color::Red.normal(), line[position..].to_string()));
                return styled;
            }
        };

        let mut cursor = 0;
        for token in &tokenized.tokens {
            if token.span.start > cursor {
                styled.push((Style::default(), line[cursor..token.span.start].to_string()));
            }
            let literal = self
                .grammar
                .token_def(token.kind)
                .is_some_and(|def| def.is_literal());
            styled.push((self.token_style(literal), token.text.clone()));
            cursor = token.span.end;
        }
        if cursor < line.len() {
            styled.push((Style::default(), line[cursor..].to_string()));
        }

        styled
    }
}
