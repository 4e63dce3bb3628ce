//! Grammar model
//!
//! A grammar is two transition networks plus the metadata the completion
//! engine needs to talk about them:
//!
//! - the **lexical network**: one rule per token (and per fragment), over
//!   characters
//! - the **syntax network**: one rule per syntax rule, over token kinds
//! - the token table: display names, skip flags and, for tokens defined as a
//!   closed set of string literals, their literal spellings
//!
//! Grammars are immutable once built and are shared read-only between
//! requests through the [`GrammarModel`] trait.
//!
//! # Examples
//!
//! ```no_run
//! use autosuggest::grammar::{Expr, GrammarBuilder, LexExpr};
//!
//! let grammar = GrammarBuilder::new()
//!     .skip("WS", LexExpr::class("\\s\\t\\r\\n").many1())
//!     .keyword("SELECT", "SELECT")
//!     .literals("COLUMN", ["NAME", "AGE"])
//!     .rule("query", Expr::seq([Expr::token("SELECT"), Expr::token("COLUMN")]))
//!     .start("query")
//!     .build()
//!     .expect("valid grammar");
//! ```

mod builder;
pub mod definition;
pub mod samples;
mod spelling;

use std::collections::HashMap;
use std::fmt;

pub use builder::{Expr, GrammarBuilder, LexAtom, LexExpr, SyntaxExpr};
pub use definition::GrammarDefinition;

use crate::network::{Chars, Network, RuleId, StateId, Tokens};

/// Identifier of a lexical category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenKind(pub u32);

impl TokenKind {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A token of the lexical grammar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenDef {
    pub kind: TokenKind,
    pub name: String,
    /// The token's rule in the lexical network
    pub rule: RuleId,
    /// Consumed by the tokenizer but never handed to the parser
    pub skip: bool,
    /// Closed set of literal spellings; empty for patterned tokens
    pub spellings: Vec<String>,
}

impl TokenDef {
    pub fn is_literal(&self) -> bool {
        !self.spellings.is_empty()
    }
}

/// Read-only view of a compiled grammar used by the completion engine
pub trait GrammarModel: Send + Sync {
    fn lexical_network(&self) -> &Network<Chars>;

    fn syntax_network(&self) -> &Network<Tokens>;

    /// Tokens in definition order, which is also their priority order
    fn token_defs(&self) -> &[TokenDef];

    /// The designated start rule of the syntax network
    fn start_rule(&self) -> RuleId;

    fn token_def(&self, kind: TokenKind) -> Option<&TokenDef> {
        self.token_defs().get(kind.index())
    }

    /// Token owning the given lexical rule, if that rule is a token
    fn token_for_rule(&self, rule: RuleId) -> Option<TokenKind> {
        self.token_defs()
            .iter()
            .find(|def| def.rule == rule)
            .map(|def| def.kind)
    }

    /// Start state of a syntax rule
    fn start_state(&self, rule_name: &str) -> Option<StateId> {
        self.syntax_network().start_state(rule_name)
    }

    /// Literal spellings of a token kind; empty when the token is patterned
    fn literal_spellings(&self, kind: TokenKind) -> &[String] {
        self.token_def(kind)
            .map(|def| def.spellings.as_slice())
            .unwrap_or(&[])
    }

    fn display_name(&self, kind: TokenKind) -> &str {
        self.token_def(kind)
            .map(|def| def.name.as_str())
            .unwrap_or("<unknown>")
    }

    fn rule_name(&self, rule: RuleId) -> &str {
        &self.syntax_network().rule(rule).name
    }
}

/// Compiled grammar
#[derive(Debug, Clone)]
pub struct Grammar {
    lexical: Network<Chars>,
    syntax: Network<Tokens>,
    tokens: Vec<TokenDef>,
    token_by_rule: HashMap<RuleId, TokenKind>,
    start: RuleId,
}

impl Grammar {
    pub(crate) fn new(
        lexical: Network<Chars>,
        syntax: Network<Tokens>,
        tokens: Vec<TokenDef>,
        start: RuleId,
    ) -> Self {
        let token_by_rule = tokens.iter().map(|def| (def.rule, def.kind)).collect();
        Self {
            lexical,
            syntax,
            tokens,
            token_by_rule,
            start,
        }
    }

    /// Look up a token kind by name
    pub fn token_kind(&self, name: &str) -> Option<TokenKind> {
        self.tokens
            .iter()
            .find(|def| def.name == name)
            .map(|def| def.kind)
    }
}

impl GrammarModel for Grammar {
    fn lexical_network(&self) -> &Network<Chars> {
        &self.lexical
    }

    fn syntax_network(&self) -> &Network<Tokens> {
        &self.syntax
    }

    fn token_defs(&self) -> &[TokenDef] {
        &self.tokens
    }

    fn start_rule(&self) -> RuleId {
        self.start
    }

    fn token_for_rule(&self, rule: RuleId) -> Option<TokenKind> {
        self.token_by_rule.get(&rule).copied()
    }
}
