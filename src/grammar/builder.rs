//! Grammar construction
//!
//! Rules are written as [`Expr`] trees and compiled into transition networks
//! with a Thompson-style construction: every sub-expression gets an entry and
//! an exit state, glued together with epsilon transitions. References to
//! other rules become `RuleCall` transitions whose follow state is the exit.
//!
//! Direct left recursion in syntax rules (`a: a X | Y`) is rewritten into a
//! loop (`a: Y X*`) before compilation, so the parse of an operator chain
//! never depends on how many calls a closure may stack up front.

use std::collections::HashMap;

use tracing::debug;

use super::spelling::literal_spellings;
use super::{Grammar, TokenDef, TokenKind};
use crate::error::GrammarError;
use crate::network::{
    Alphabet, CharSet, Chars, Configuration, ExplorationLimits, Network, RuleId, StateId,
    StateKind, Tokens, Transition, closure,
};

/// Rule body expression
///
/// `A` is the atom type: [`LexAtom`] for lexical rules, a token name for
/// syntax rules.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr<A> {
    /// Matches the empty string
    Empty,
    Atom(A),
    /// Reference to another rule (a fragment in lexical rules)
    Ref(String),
    Seq(Vec<Expr<A>>),
    Alt(Vec<Expr<A>>),
    Optional(Box<Expr<A>>),
    ZeroOrMore(Box<Expr<A>>),
    OneOrMore(Box<Expr<A>>),
}

/// Lexical atom
#[derive(Debug, Clone, PartialEq)]
pub enum LexAtom {
    Char(char),
    Set(CharSet),
    /// Class body such as `A-Za-z_`, parsed at build time
    Class(String),
    /// Complement of a class body
    NotClass(String),
}

pub type LexExpr = Expr<LexAtom>;

/// Syntax expressions use token names as atoms
pub type SyntaxExpr = Expr<String>;

impl<A> Expr<A> {
    pub fn seq(items: impl IntoIterator<Item = Expr<A>>) -> Self {
        Expr::Seq(items.into_iter().collect())
    }

    pub fn alt(items: impl IntoIterator<Item = Expr<A>>) -> Self {
        Expr::Alt(items.into_iter().collect())
    }

    pub fn rule(name: impl Into<String>) -> Self {
        Expr::Ref(name.into())
    }

    pub fn optional(self) -> Self {
        Expr::Optional(Box::new(self))
    }

    pub fn many(self) -> Self {
        Expr::ZeroOrMore(Box::new(self))
    }

    pub fn many1(self) -> Self {
        Expr::OneOrMore(Box::new(self))
    }
}

impl SyntaxExpr {
    pub fn token(name: impl Into<String>) -> Self {
        Expr::Atom(name.into())
    }
}

impl LexExpr {
    /// Exact string
    pub fn literal(text: &str) -> Self {
        let mut chars: Vec<LexExpr> = text.chars().map(|c| Expr::Atom(LexAtom::Char(c))).collect();
        match chars.len() {
            1 => chars.remove(0),
            _ => Expr::Seq(chars),
        }
    }

    /// String matched in any letter case; `text` is the declared spelling
    pub fn caseless(text: &str) -> Self {
        let chars: Vec<LexExpr> = text
            .chars()
            .map(|c| {
                if c.is_alphabetic() {
                    Expr::Atom(LexAtom::Set(CharSet::Caseless(c)))
                } else {
                    Expr::Atom(LexAtom::Char(c))
                }
            })
            .collect();
        Expr::Seq(chars)
    }

    pub fn class(body: impl Into<String>) -> Self {
        Expr::Atom(LexAtom::Class(body.into()))
    }

    pub fn not_class(body: impl Into<String>) -> Self {
        Expr::Atom(LexAtom::NotClass(body.into()))
    }
}

struct PendingToken {
    name: String,
    expr: LexExpr,
    skip: bool,
}

/// Builder for [`Grammar`]
///
/// Tokens are prioritized in the order they are added: when two tokens match
/// the same longest input, the earlier one wins.
#[derive(Default)]
pub struct GrammarBuilder {
    tokens: Vec<PendingToken>,
    fragments: Vec<(String, LexExpr)>,
    rules: Vec<(String, SyntaxExpr)>,
    start: Option<String>,
}

impl GrammarBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a token
    pub fn token(mut self, name: impl Into<String>, expr: LexExpr) -> Self {
        self.tokens.push(PendingToken {
            name: name.into(),
            expr,
            skip: false,
        });
        self
    }

    /// Add a token that is consumed but never reaches the parser
    pub fn skip(mut self, name: impl Into<String>, expr: LexExpr) -> Self {
        self.tokens.push(PendingToken {
            name: name.into(),
            expr,
            skip: true,
        });
        self
    }

    /// Add a case-insensitive keyword token
    pub fn keyword(self, name: impl Into<String>, spelling: &str) -> Self {
        self.token(name, LexExpr::caseless(spelling))
    }

    /// Add a token that is a closed set of exact spellings
    pub fn literals<I, S>(self, name: impl Into<String>, spellings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let alternatives = spellings
            .into_iter()
            .map(|s| LexExpr::literal(s.as_ref()));
        self.token(name, Expr::alt(alternatives))
    }

    /// Add a lexical fragment, usable from tokens but never a token itself
    pub fn fragment(mut self, name: impl Into<String>, expr: LexExpr) -> Self {
        self.fragments.push((name.into(), expr));
        self
    }

    /// Add a syntax rule
    pub fn rule(mut self, name: impl Into<String>, expr: SyntaxExpr) -> Self {
        self.rules.push((name.into(), expr));
        self
    }

    /// Designate the start rule
    pub fn start(mut self, name: impl Into<String>) -> Self {
        self.start = Some(name.into());
        self
    }

    /// Compile both networks
    pub fn build(self) -> Result<Grammar, GrammarError> {
        let start_name = self.start.clone().ok_or(GrammarError::MissingStartRule)?;

        let (lexical, lexical_rules) = self.build_lexical()?;
        let token_kinds: HashMap<String, TokenKind> = self
            .tokens
            .iter()
            .enumerate()
            .map(|(i, pending)| (pending.name.clone(), TokenKind(i as u32)))
            .collect();
        let syntax = self.build_syntax(&token_kinds)?;

        let start = syntax
            .rule_by_name(&start_name)
            .ok_or_else(|| GrammarError::UnknownStartRule(start_name.clone()))?;

        let limits = ExplorationLimits::default();
        let mut tokens = Vec::with_capacity(self.tokens.len());
        for (i, pending) in self.tokens.iter().enumerate() {
            let rule = lexical_rules[&pending.name];
            let seed = Configuration::initial(lexical.rule(rule).start);
            if closure(&lexical, [seed], &limits).accepts_end() {
                return Err(GrammarError::EmptyToken(pending.name.clone()));
            }
            tokens.push(TokenDef {
                kind: TokenKind(i as u32),
                name: pending.name.clone(),
                rule,
                skip: pending.skip,
                spellings: literal_spellings(&lexical, rule).unwrap_or_default(),
            });
        }

        debug!(
            tokens = tokens.len(),
            lexical_states = lexical.state_count(),
            syntax_rules = syntax.rule_count(),
            syntax_states = syntax.state_count(),
            "grammar built"
        );

        Ok(Grammar::new(lexical, syntax, tokens, start))
    }

    fn build_lexical(&self) -> Result<(Network<Chars>, HashMap<String, RuleId>), GrammarError> {
        let mut network = Network::new();
        let mut rules = HashMap::new();

        for pending in &self.tokens {
            if rules.contains_key(&pending.name) {
                return Err(GrammarError::DuplicateToken(pending.name.clone()));
            }
            rules.insert(pending.name.clone(), network.add_rule(pending.name.clone()));
        }
        for (name, _) in &self.fragments {
            if rules.contains_key(name) {
                return Err(GrammarError::DuplicateFragment(name.clone()));
            }
            rules.insert(name.clone(), network.add_rule(name.clone()));
        }

        let bodies = self
            .tokens
            .iter()
            .map(|pending| (&pending.name, &pending.expr))
            .chain(self.fragments.iter().map(|(name, expr)| (name, expr)));
        for (name, expr) in bodies {
            let lowering = LexicalLowering {
                owner: name,
                rules: &rules,
            };
            compile_rule(&mut network, rules[name], &lowering, expr)?;
        }

        Ok((network, rules))
    }

    fn build_syntax(
        &self,
        tokens: &HashMap<String, TokenKind>,
    ) -> Result<Network<Tokens>, GrammarError> {
        let mut network = Network::new();
        let mut rules = HashMap::new();

        for (name, _) in &self.rules {
            if rules.contains_key(name) {
                return Err(GrammarError::DuplicateRule(name.clone()));
            }
            rules.insert(name.clone(), network.add_rule(name.clone()));
        }

        for (name, expr) in &self.rules {
            let lowering = SyntaxLowering {
                owner: name,
                tokens,
                rules: &rules,
            };
            let body = without_left_recursion(name, expr).unwrap_or_else(|| expr.clone());
            compile_rule(&mut network, rules[name], &lowering, &body)?;
        }

        Ok(network)
    }
}

/// Maps the atoms and references of one rule body onto network labels
trait Lowering<X> {
    type Input: Alphabet;

    fn transition(
        &self,
        atom: &X,
        target: StateId,
    ) -> Result<Transition<Self::Input>, GrammarError>;

    /// A single set label for an alternation of atoms, when the alphabet has one
    fn merge(
        &self,
        atoms: &[&X],
    ) -> Result<Option<<Self::Input as Alphabet>::Set>, GrammarError>;

    fn reference(&self, name: &str) -> Result<RuleId, GrammarError>;
}

struct LexicalLowering<'a> {
    owner: &'a str,
    rules: &'a HashMap<String, RuleId>,
}

impl Lowering<LexAtom> for LexicalLowering<'_> {
    type Input = Chars;

    fn transition(&self, atom: &LexAtom, target: StateId) -> Result<Transition<Chars>, GrammarError> {
        let transition = match atom {
            LexAtom::Char(c) => Transition::Match { symbol: *c, target },
            LexAtom::Set(set) => Transition::MatchSet {
                set: set.clone(),
                target,
            },
            LexAtom::Class(body) => Transition::MatchSet {
                set: CharSet::Ranges(CharSet::parse_ranges(body)?),
                target,
            },
            LexAtom::NotClass(body) => Transition::MatchSet {
                set: CharSet::Not(CharSet::parse_ranges(body)?),
                target,
            },
        };
        Ok(transition)
    }

    fn merge(&self, _atoms: &[&LexAtom]) -> Result<Option<CharSet>, GrammarError> {
        // Alternatives of literal strings must stay separate paths so their
        // spellings can be enumerated.
        Ok(None)
    }

    fn reference(&self, name: &str) -> Result<RuleId, GrammarError> {
        self.rules
            .get(name)
            .copied()
            .ok_or_else(|| GrammarError::UndefinedFragment {
                token: self.owner.to_string(),
                fragment: name.to_string(),
            })
    }
}

struct SyntaxLowering<'a> {
    owner: &'a str,
    tokens: &'a HashMap<String, TokenKind>,
    rules: &'a HashMap<String, RuleId>,
}

impl SyntaxLowering<'_> {
    fn kind(&self, name: &str) -> Result<TokenKind, GrammarError> {
        self.tokens
            .get(name)
            .copied()
            .ok_or_else(|| GrammarError::UndefinedToken {
                rule: self.owner.to_string(),
                token: name.to_string(),
            })
    }
}

impl Lowering<String> for SyntaxLowering<'_> {
    type Input = Tokens;

    fn transition(&self, atom: &String, target: StateId) -> Result<Transition<Tokens>, GrammarError> {
        Ok(Transition::Match {
            symbol: self.kind(atom)?,
            target,
        })
    }

    fn merge(&self, atoms: &[&String]) -> Result<Option<Vec<TokenKind>>, GrammarError> {
        let mut kinds = Vec::with_capacity(atoms.len());
        for atom in atoms {
            let kind = self.kind(atom)?;
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        Ok(Some(kinds))
    }

    fn reference(&self, name: &str) -> Result<RuleId, GrammarError> {
        self.rules
            .get(name)
            .copied()
            .ok_or_else(|| GrammarError::UndefinedRule {
                rule: self.owner.to_string(),
                reference: name.to_string(),
            })
    }
}

/// Rewrite `name: name X1 | name X2 | Y1 | Y2` into `name: (Y1 | Y2) (X1 | X2)*`
///
/// Returns `None` when the body has no direct left recursion, or when every
/// alternative is left-recursive (no base case to start from).
fn without_left_recursion<A: Clone>(name: &str, body: &Expr<A>) -> Option<Expr<A>> {
    let alternatives = match body {
        Expr::Alt(alternatives) => alternatives.as_slice(),
        other => std::slice::from_ref(other),
    };

    let mut bases = Vec::new();
    let mut suffixes = Vec::new();
    let mut recursive = false;
    for alternative in alternatives {
        match left_recursive_suffix(name, alternative) {
            Some(suffix) => {
                recursive = true;
                // `a: a` derives nothing new
                if !matches!(suffix, Expr::Empty) {
                    suffixes.push(suffix);
                }
            }
            None => bases.push(alternative.clone()),
        }
    }
    if !recursive || bases.is_empty() {
        return None;
    }

    let base = one_or_alt(bases);
    if suffixes.is_empty() {
        return Some(base);
    }
    Some(Expr::Seq(vec![base, one_or_alt(suffixes).many()]))
}

/// What follows the leading self-reference of an alternative, if it has one
fn left_recursive_suffix<A: Clone>(name: &str, alternative: &Expr<A>) -> Option<Expr<A>> {
    match alternative {
        Expr::Ref(callee) if callee == name => Some(Expr::Empty),
        Expr::Seq(items) => match items.split_first() {
            Some((Expr::Ref(callee), rest)) if callee == name => Some(match rest {
                [] => Expr::Empty,
                [single] => single.clone(),
                _ => Expr::Seq(rest.to_vec()),
            }),
            _ => None,
        },
        _ => None,
    }
}

fn one_or_alt<A>(mut items: Vec<Expr<A>>) -> Expr<A> {
    if items.len() == 1 {
        items.remove(0)
    } else {
        Expr::Alt(items)
    }
}

fn compile_rule<X, L: Lowering<X>>(
    network: &mut Network<L::Input>,
    rule: RuleId,
    lowering: &L,
    body: &Expr<X>,
) -> Result<(), GrammarError> {
    let info = network.rule(rule).clone();
    let end = compile(network, rule, lowering, body, info.start)?;
    network.add_transition(end, Transition::Epsilon { target: info.stop });
    Ok(())
}

/// Compile `expr` starting at `entry`; returns the exit state
fn compile<X, L: Lowering<X>>(
    network: &mut Network<L::Input>,
    rule: RuleId,
    lowering: &L,
    expr: &Expr<X>,
    entry: StateId,
) -> Result<StateId, GrammarError> {
    match expr {
        Expr::Empty => Ok(entry),
        Expr::Atom(atom) => {
            let target = network.add_state(rule, StateKind::Basic);
            let transition = lowering.transition(atom, target)?;
            network.add_transition(entry, transition);
            Ok(target)
        }
        Expr::Ref(name) => {
            let callee = lowering.reference(name)?;
            let follow = network.add_state(rule, StateKind::Basic);
            network.add_transition(
                entry,
                Transition::RuleCall {
                    rule: callee,
                    follow,
                },
            );
            Ok(follow)
        }
        Expr::Seq(items) => items.iter().try_fold(entry, |state, item| {
            compile(network, rule, lowering, item, state)
        }),
        Expr::Alt(alternatives) => {
            let atoms: Option<Vec<&X>> = alternatives
                .iter()
                .map(|alt| match alt {
                    Expr::Atom(atom) => Some(atom),
                    _ => None,
                })
                .collect();
            if let Some(atoms) = atoms.filter(|atoms| atoms.len() > 1) {
                if let Some(set) = lowering.merge(&atoms)? {
                    let target = network.add_state(rule, StateKind::Basic);
                    network.add_transition(entry, Transition::MatchSet { set, target });
                    return Ok(target);
                }
            }

            let decision = network.add_state(rule, StateKind::Decision);
            network.add_transition(entry, Transition::Epsilon { target: decision });
            let exit = network.add_state(rule, StateKind::Basic);
            for alternative in alternatives {
                let branch = network.add_state(rule, StateKind::Basic);
                network.add_transition(decision, Transition::Epsilon { target: branch });
                let end = compile(network, rule, lowering, alternative, branch)?;
                network.add_transition(end, Transition::Epsilon { target: exit });
            }
            Ok(exit)
        }
        Expr::Optional(inner) => {
            let decision = network.add_state(rule, StateKind::Decision);
            network.add_transition(entry, Transition::Epsilon { target: decision });
            let body = network.add_state(rule, StateKind::Basic);
            let exit = network.add_state(rule, StateKind::Basic);
            network.add_transition(decision, Transition::Epsilon { target: body });
            network.add_transition(decision, Transition::Epsilon { target: exit });
            let end = compile(network, rule, lowering, inner, body)?;
            network.add_transition(end, Transition::Epsilon { target: exit });
            Ok(exit)
        }
        Expr::ZeroOrMore(inner) => {
            let head = network.add_state(rule, StateKind::Loop);
            network.add_transition(entry, Transition::Epsilon { target: head });
            let body = network.add_state(rule, StateKind::Basic);
            let exit = network.add_state(rule, StateKind::Basic);
            network.add_transition(head, Transition::Epsilon { target: body });
            network.add_transition(head, Transition::Epsilon { target: exit });
            let end = compile(network, rule, lowering, inner, body)?;
            network.add_transition(end, Transition::Epsilon { target: head });
            Ok(exit)
        }
        Expr::OneOrMore(inner) => {
            let head = network.add_state(rule, StateKind::Loop);
            network.add_transition(entry, Transition::Epsilon { target: head });
            let exit = network.add_state(rule, StateKind::Basic);
            let end = compile(network, rule, lowering, inner, head)?;
            network.add_transition(end, Transition::Epsilon { target: head });
            network.add_transition(end, Transition::Epsilon { target: exit });
            Ok(exit)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::GrammarModel;

    fn minimal() -> GrammarBuilder {
        GrammarBuilder::new()
            .skip("WS", LexExpr::class("\\s").many1())
            .keyword("SELECT", "select")
            .literals("COLUMN", ["NAME", "AGE"])
            .token("NUMBER", LexExpr::class("0-9").many1())
            .rule(
                "query",
                Expr::seq([
                    Expr::token("SELECT"),
                    Expr::alt([Expr::token("COLUMN"), Expr::token("NUMBER")]),
                ]),
            )
            .start("query")
    }

    #[test]
    fn test_build_assigns_kinds_in_order() {
        let grammar = minimal().build().unwrap();
        let names: Vec<_> = grammar.token_defs().iter().map(|d| d.name.as_str()).collect();

        assert_eq!(names, ["WS", "SELECT", "COLUMN", "NUMBER"]);
        assert!(grammar.token_defs()[0].skip);
        assert_eq!(grammar.token_kind("COLUMN"), Some(TokenKind(2)));
    }

    #[test]
    fn test_spellings_computed_at_build() {
        let grammar = minimal().build().unwrap();

        assert_eq!(grammar.token_defs()[1].spellings, ["select"]);
        assert_eq!(grammar.token_defs()[2].spellings, ["NAME", "AGE"]);
        assert!(!grammar.token_defs()[3].is_literal());
    }

    #[test]
    fn test_alternation_of_tokens_becomes_match_set() {
        let grammar = minimal().build().unwrap();
        let syntax = grammar.syntax_network();
        let column = grammar.token_kind("COLUMN").unwrap();
        let number = grammar.token_kind("NUMBER").unwrap();

        let has_set = (0..syntax.state_count() as u32).any(|i| {
            syntax.state(StateId(i)).transitions.iter().any(|t| {
                matches!(t, Transition::MatchSet { set, .. } if set == &vec![column, number])
            })
        });
        assert!(has_set);
    }

    #[test]
    fn test_missing_start_rule() {
        let result = GrammarBuilder::new()
            .token("A", LexExpr::literal("a"))
            .rule("r", Expr::token("A"))
            .build();
        assert_eq!(result.unwrap_err(), GrammarError::MissingStartRule);
    }

    #[test]
    fn test_unknown_start_rule() {
        let result = minimal().start("nope").build();
        assert_eq!(
            result.unwrap_err(),
            GrammarError::UnknownStartRule("nope".to_string())
        );
    }

    #[test]
    fn test_undefined_references() {
        let result = minimal().rule("broken", Expr::token("MISSING")).build();
        assert_eq!(
            result.unwrap_err(),
            GrammarError::UndefinedToken {
                rule: "broken".to_string(),
                token: "MISSING".to_string()
            }
        );

        let result = minimal().rule("broken", Expr::rule("missing")).build();
        assert!(matches!(
            result.unwrap_err(),
            GrammarError::UndefinedRule { .. }
        ));

        let result = minimal()
            .token("HEX", Expr::seq([LexExpr::literal("0x"), Expr::rule("HEXDIGIT")]))
            .build();
        assert!(matches!(
            result.unwrap_err(),
            GrammarError::UndefinedFragment { .. }
        ));
    }

    #[test]
    fn test_duplicates_rejected() {
        let result = minimal().token("SELECT", LexExpr::literal("x")).build();
        assert_eq!(
            result.unwrap_err(),
            GrammarError::DuplicateToken("SELECT".to_string())
        );

        let result = minimal().fragment("NUMBER", LexExpr::literal("1")).build();
        assert_eq!(
            result.unwrap_err(),
            GrammarError::DuplicateFragment("NUMBER".to_string())
        );

        let result = minimal().rule("query", Expr::Empty).build();
        assert_eq!(
            result.unwrap_err(),
            GrammarError::DuplicateRule("query".to_string())
        );
    }

    #[test]
    fn test_empty_token_rejected() {
        let result = minimal()
            .token("MAYBE", LexExpr::literal("x").optional())
            .build();
        assert_eq!(
            result.unwrap_err(),
            GrammarError::EmptyToken("MAYBE".to_string())
        );
    }

    #[test]
    fn test_bad_class_rejected() {
        let result = minimal().token("BAD", LexExpr::class("z-a")).build();
        assert!(matches!(
            result.unwrap_err(),
            GrammarError::InvalidCharClass { .. }
        ));
    }

    #[test]
    fn test_fragments_are_not_tokens() {
        let grammar = minimal()
            .fragment("DIGIT", LexExpr::class("0-9"))
            .token(
                "HEX",
                Expr::seq([LexExpr::literal("0x"), Expr::rule("DIGIT").many1()]),
            )
            .build()
            .unwrap();

        assert!(grammar.token_kind("DIGIT").is_none());
        assert!(grammar.token_kind("HEX").is_some());
        assert!(grammar.lexical_network().rule_by_name("DIGIT").is_some());
    }

    #[test]
    fn test_direct_left_recursion_becomes_loop() {
        // expr: expr PLUS term | expr MINUS term | term
        let body = Expr::alt([
            Expr::seq([Expr::rule("expr"), Expr::token("PLUS"), Expr::rule("term")]),
            Expr::seq([Expr::rule("expr"), Expr::token("MINUS"), Expr::rule("term")]),
            Expr::rule("term"),
        ]);

        let rewritten = without_left_recursion("expr", &body).unwrap();
        assert_eq!(
            rewritten,
            Expr::seq([
                Expr::rule("term"),
                Expr::alt([
                    Expr::seq([Expr::token("PLUS"), Expr::rule("term")]),
                    Expr::seq([Expr::token("MINUS"), Expr::rule("term")]),
                ])
                .many(),
            ])
        );
    }

    #[test]
    fn test_bare_self_reference_is_dropped() {
        // a: a | A
        let body: SyntaxExpr = Expr::alt([Expr::rule("a"), Expr::token("A")]);
        assert_eq!(without_left_recursion("a", &body), Some(Expr::token("A")));
    }

    #[test]
    fn test_rules_without_base_case_are_left_alone() {
        let no_recursion: SyntaxExpr = Expr::seq([Expr::token("A"), Expr::rule("a")]);
        assert_eq!(without_left_recursion("a", &no_recursion), None);

        let no_base: SyntaxExpr = Expr::seq([Expr::rule("a"), Expr::token("A")]);
        assert_eq!(without_left_recursion("a", &no_base), None);
    }

    #[test]
    fn test_left_recursive_rule_compiles_without_self_call() {
        let grammar = GrammarBuilder::new()
            .token("NUM", LexExpr::class("0-9").many1())
            .token("PLUS", LexExpr::literal("+"))
            .rule(
                "sum",
                Expr::alt([
                    Expr::seq([Expr::rule("sum"), Expr::token("PLUS"), Expr::token("NUM")]),
                    Expr::token("NUM"),
                ]),
            )
            .start("sum")
            .build()
            .unwrap();

        let syntax = grammar.syntax_network();
        let sum = syntax.rule_by_name("sum").unwrap();
        let self_calls = (0..syntax.state_count())
            .flat_map(|i| syntax.state(StateId(i as u32)).transitions.iter())
            .filter(|t| matches!(t, Transition::RuleCall { rule, .. } if *rule == sum))
            .count();
        assert_eq!(self_calls, 0);
    }
}
