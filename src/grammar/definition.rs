//! Grammar definition files
//!
//! A [`GrammarDefinition`] is the serializable form of a grammar: the same
//! expressions the builder accepts, written as TOML. Patterns are externally
//! tagged tables, so `x+` over a class reads `{ many1 = { class = "0-9" } }`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Expr, Grammar, GrammarBuilder, LexAtom, LexExpr, SyntaxExpr};
use crate::error::{ConfigError, GrammarError, Result};

/// Serializable grammar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrammarDefinition {
    /// Name of the start rule
    pub start: String,

    /// Tokens in priority order
    #[serde(default)]
    pub tokens: Vec<TokenDefinition>,

    #[serde(default)]
    pub fragments: Vec<FragmentDefinition>,

    #[serde(default)]
    pub rules: Vec<RuleDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenDefinition {
    pub name: String,

    #[serde(default)]
    pub skip: bool,

    #[serde(flatten)]
    pub body: TokenBody,
}

/// How a token is spelled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenBody {
    /// Case-insensitive keyword
    Keyword(String),
    /// Closed set of exact spellings
    Literals(Vec<String>),
    Pattern(LexPattern),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FragmentDefinition {
    pub name: String,
    pub pattern: LexPattern,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDefinition {
    pub name: String,
    pub body: RulePattern,
}

/// Lexical pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LexPattern {
    Literal(String),
    Caseless(String),
    /// Class body such as `A-Za-z_`
    Class(String),
    NotClass(String),
    Fragment(String),
    Seq(Vec<LexPattern>),
    Alt(Vec<LexPattern>),
    Optional(Box<LexPattern>),
    Many(Box<LexPattern>),
    Many1(Box<LexPattern>),
}

/// Syntax pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RulePattern {
    Token(String),
    Rule(String),
    Seq(Vec<RulePattern>),
    Alt(Vec<RulePattern>),
    Optional(Box<RulePattern>),
    Many(Box<RulePattern>),
    Many1(Box<RulePattern>),
    Empty,
}

impl From<LexPattern> for LexExpr {
    fn from(pattern: LexPattern) -> Self {
        match pattern {
            LexPattern::Literal(text) => LexExpr::literal(&text),
            LexPattern::Caseless(text) => LexExpr::caseless(&text),
            LexPattern::Class(body) => Expr::Atom(LexAtom::Class(body)),
            LexPattern::NotClass(body) => Expr::Atom(LexAtom::NotClass(body)),
            LexPattern::Fragment(name) => Expr::Ref(name),
            LexPattern::Seq(items) => Expr::seq(items.into_iter().map(Into::into)),
            LexPattern::Alt(items) => Expr::alt(items.into_iter().map(Into::into)),
            LexPattern::Optional(inner) => LexExpr::from(*inner).optional(),
            LexPattern::Many(inner) => LexExpr::from(*inner).many(),
            LexPattern::Many1(inner) => LexExpr::from(*inner).many1(),
        }
    }
}

impl From<RulePattern> for SyntaxExpr {
    fn from(pattern: RulePattern) -> Self {
        match pattern {
            RulePattern::Token(name) => Expr::Atom(name),
            RulePattern::Rule(name) => Expr::Ref(name),
            RulePattern::Seq(items) => Expr::seq(items.into_iter().map(Into::into)),
            RulePattern::Alt(items) => Expr::alt(items.into_iter().map(Into::into)),
            RulePattern::Optional(inner) => SyntaxExpr::from(*inner).optional(),
            RulePattern::Many(inner) => SyntaxExpr::from(*inner).many(),
            RulePattern::Many1(inner) => SyntaxExpr::from(*inner).many1(),
            RulePattern::Empty => Expr::Empty,
        }
    }
}

impl GrammarDefinition {
    /// Parse a definition from TOML text
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, GrammarError> {
        toml::from_str(content).map_err(|e| GrammarError::InvalidDefinition(e.to_string()))
    }

    /// Read a definition file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()).into());
        }
        let content = fs::read_to_string(path)?;
        let definition = Self::from_toml_str(&content)?;
        debug!(
            "Loaded grammar definition from {} ({} tokens, {} rules)",
            path.display(),
            definition.tokens.len(),
            definition.rules.len()
        );
        Ok(definition)
    }

    /// Compile the definition
    pub fn into_grammar(self) -> std::result::Result<Grammar, GrammarError> {
        let mut builder = GrammarBuilder::new();

        for token in self.tokens {
            let expr = match token.body {
                TokenBody::Keyword(spelling) => LexExpr::caseless(&spelling),
                TokenBody::Literals(spellings) => {
                    Expr::alt(spellings.iter().map(|s| LexExpr::literal(s)))
                }
                TokenBody::Pattern(pattern) => pattern.into(),
            };
            builder = if token.skip {
                builder.skip(token.name, expr)
            } else {
                builder.token(token.name, expr)
            };
        }
        for fragment in self.fragments {
            builder = builder.fragment(fragment.name, fragment.pattern.into());
        }
        for rule in self.rules {
            builder = builder.rule(rule.name, rule.body.into());
        }

        builder.start(self.start).build()
    }
}
