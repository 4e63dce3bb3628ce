//! Tokenizer
//!
//! Splits the input into confirmed tokens and an optional trailing fragment
//! by simulating the lexical network. At each offset every token rule is
//! started at once; the longest match wins and ties go to the token defined
//! first.

use std::ops::Range;

use tracing::debug;

use crate::error::LexicalError;
use crate::grammar::{GrammarModel, TokenKind};
use crate::network::{Configuration, ExplorationLimits, ExplorationStats, closure, step};

/// Longest snippet quoted in a lexical error
const SNIPPET_CHARS: usize = 20;

/// A confirmed token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// Byte range in the input
    pub span: Range<usize>,
}

/// Incomplete trailing token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partial {
    pub text: String,
    /// Byte offset in the input
    pub start: usize,
}

/// Tokenizer output
#[derive(Debug, Clone, Default)]
pub struct Tokenized {
    pub tokens: Vec<Token>,
    pub partial: Option<Partial>,
    pub stats: ExplorationStats,
}

/// Result of scanning from one offset
struct Scan {
    /// Best token and the byte offset where it ends
    best: Option<(TokenKind, usize)>,
    /// Some token rule was still alive when the input ran out
    live_at_end: bool,
}

pub struct Tokenizer<'g> {
    grammar: &'g dyn GrammarModel,
    limits: ExplorationLimits,
    seeds: Vec<Configuration>,
}

impl<'g> Tokenizer<'g> {
    pub fn new(grammar: &'g dyn GrammarModel, limits: ExplorationLimits) -> Self {
        let lexical = grammar.lexical_network();
        let seeds = grammar
            .token_defs()
            .iter()
            .map(|def| Configuration::initial(lexical.rule(def.rule).start))
            .collect();
        Self {
            grammar,
            limits,
            seeds,
        }
    }

    /// Tokenize `input`
    ///
    /// The last token becomes the partial fragment when it reaches the end of
    /// the input, or when the rest of the input is still a viable prefix of
    /// some token. Trailing skip tokens close the last real token.
    pub fn tokenize(&self, input: &str) -> Result<Tokenized, LexicalError> {
        let mut result = Tokenized::default();
        let mut pos = 0;

        while pos < input.len() {
            let scan = self.scan(input, pos, &mut result.stats);

            match scan.best {
                Some((kind, end)) => {
                    let skip = self
                        .grammar
                        .token_def(kind)
                        .is_some_and(|def| def.skip);

                    if skip && end == input.len() {
                        break;
                    }
                    if end == input.len() || scan.live_at_end {
                        result.partial = Some(Partial {
                            text: input[pos..].to_string(),
                            start: pos,
                        });
                        break;
                    }
                    if !skip {
                        result.tokens.push(Token {
                            kind,
                            text: input[pos..end].to_string(),
                            span: pos..end,
                        });
                    }
                    pos = end;
                }
                None if scan.live_at_end => {
                    result.partial = Some(Partial {
                        text: input[pos..].to_string(),
                        start: pos,
                    });
                    break;
                }
                None => {
                    return Err(LexicalError {
                        position: pos,
                        snippet: input[pos..].chars().take(SNIPPET_CHARS).collect(),
                    });
                }
            }
        }

        debug!(
            tokens = result.tokens.len(),
            partial = result.partial.as_ref().map(|p| p.text.as_str()),
            "tokenized input"
        );
        Ok(result)
    }

    /// Run every token rule from `start` for as long as any is alive
    fn scan(&self, input: &str, start: usize, stats: &mut ExplorationStats) -> Scan {
        let lexical = self.grammar.lexical_network();
        let mut configs = self.seeds.clone();
        let mut offset = start;
        let mut best = None;
        let mut chars = input[start..].chars();

        loop {
            let explored = closure(lexical, configs, &self.limits);
            stats.absorb(explored.stats);

            // Lowest kind wins among tokens ending at the same offset
            let matched = explored
                .completed
                .iter()
                .filter_map(|config| {
                    let rule = lexical.state(config.state).rule;
                    self.grammar.token_for_rule(rule)
                })
                .min();
            if let Some(kind) = matched {
                if offset > start {
                    best = Some((kind, offset));
                }
            }

            if explored.frontier.is_empty() {
                return Scan {
                    best,
                    live_at_end: false,
                };
            }
            let Some(c) = chars.next() else {
                return Scan {
                    best,
                    live_at_end: true,
                };
            };
            configs = step(lexical, &explored.frontier, c).into_vec();
            if configs.is_empty() {
                return Scan {
                    best,
                    live_at_end: false,
                };
            }
            offset += c.len_utf8();
        }
    }
}
