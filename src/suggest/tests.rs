use std::collections::BTreeSet;
use std::sync::Arc;
use std::thread;

use super::*;
use crate::error::AutosuggestError;
use crate::grammar::samples::{self, HARMONY_COLUMNS, HARMONY_TABLES};
use crate::grammar::{Expr, Grammar, GrammarBuilder, GrammarDefinition, LexExpr};

fn harmony() -> Grammar {
    samples::harmony_sql().unwrap()
}

fn suggest(grammar: &Grammar, input: &str) -> BTreeSet<String> {
    suggest_completions(grammar, input, CasePreference::AsIs).unwrap()
}

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

const OPERATORS: [&str; 13] = [
    "EQ", "=", "<=", ">=", "LT", "GT", ">", "<", "LTE", "GTE", "NEQ", "!=", "LIKE",
];

/// `expr: expr '+' term | term; term: NUM | '(' expr ')'`
fn arithmetic() -> Grammar {
    GrammarBuilder::new()
        .skip("WS", LexExpr::class("\\s").many1())
        .token("PLUS", LexExpr::literal("+"))
        .token("OPEN", LexExpr::literal("("))
        .token("CLOSE", LexExpr::literal(")"))
        .token("NUM", LexExpr::class("0-9").many1())
        .rule(
            "expr",
            Expr::alt([
                Expr::seq([Expr::rule("expr"), Expr::token("PLUS"), Expr::rule("term")]),
                Expr::rule("term"),
            ]),
        )
        .rule(
            "term",
            Expr::alt([
                Expr::token("NUM"),
                Expr::seq([Expr::token("OPEN"), Expr::rule("expr"), Expr::token("CLOSE")]),
            ]),
        )
        .start("expr")
        .build()
        .unwrap()
}

// HarmonySQL scenarios

#[test]
fn test_empty_input_suggests_from() {
    assert_eq!(suggest(&harmony(), ""), set(&["FROM"]));
}

#[test]
fn test_from_suggests_tables() {
    assert_eq!(suggest(&harmony(), "FROM "), set(&HARMONY_TABLES));
}

#[test]
fn test_table_suggests_select() {
    assert_eq!(suggest(&harmony(), "FROM PROFILE_TABLE "), set(&["SELECT"]));
}

#[test]
fn test_select_suggests_columns_and_star() {
    let mut expected = set(&HARMONY_COLUMNS);
    expected.insert("*".to_string());
    assert_eq!(suggest(&harmony(), "FROM PROFILE_TABLE SELECT "), expected);
}

#[test]
fn test_star_suggests_where() {
    assert_eq!(
        suggest(&harmony(), "FROM PROFILE_TABLE SELECT * "),
        set(&["WHERE"])
    );
}

#[test]
fn test_column_suggests_comma_and_where() {
    assert_eq!(
        suggest(&harmony(), "FROM PROFILE_TABLE SELECT FIRST_NAME "),
        set(&[",", "WHERE"])
    );
    assert_eq!(
        suggest(&harmony(), "FROM PROFILE_TABLE SELECT FIRST_NAME , "),
        set(&HARMONY_COLUMNS)
    );
}

#[test]
fn test_where_suggests_columns() {
    assert_eq!(
        suggest(&harmony(), "FROM PROFILE_TABLE SELECT * WHERE "),
        set(&HARMONY_COLUMNS)
    );
}

#[test]
fn test_condition_column_suggests_operators() {
    assert_eq!(
        suggest(&harmony(), "FROM PROFILE_TABLE SELECT * WHERE LAST_NAME "),
        set(&OPERATORS)
    );
}

#[test]
fn test_patterned_values_are_never_suggested() {
    assert!(
        suggest(&harmony(), "FROM PROFILE_TABLE SELECT * WHERE LAST_NAME = ").is_empty()
    );
}

#[test]
fn test_complete_condition_suggests_connectives() {
    let grammar = harmony();
    let input = "FROM PROFILE_TABLE SELECT * WHERE LAST_NAME = SMITH ";
    assert_eq!(suggest(&grammar, input), set(&["AND", "OR"]));

    let report = suggest_with_options(&grammar, input, &SuggestOptions::default()).unwrap();
    assert!(report.accepts_end_of_input);
    assert_eq!(report.confirmed_tokens, 8);
    assert!(report.partial.is_none());
}

#[test]
fn test_chained_conditions() {
    let input = "FROM US_DALLAS_CUSTOMERS SELECT REGION WHERE STATE = 'TX' AND REGION LIKE 'N%' OR ";
    assert_eq!(suggest(&harmony(), input), set(&HARMONY_COLUMNS));
}

// Partial fragments

#[test]
fn test_fragment_filters_by_prefix() {
    let grammar = harmony();
    assert_eq!(suggest(&grammar, "FROM REF"), set(&["REF_TABLE_1"]));
    assert_eq!(
        suggest(&grammar, "FROM PROFILE_TABLE SELECT * WHERE LAST_NAME L"),
        set(&["LIKE", "LT", "LTE"])
    );
    assert_eq!(
        suggest(&grammar, "FROM PROFILE_TABLE SELECT * WHERE LAST_NAME <"),
        set(&["<", "<="])
    );
    assert_eq!(
        suggest(&grammar, "FROM PROFILE_TABLE SELECT * WHERE LAST_NAME !"),
        set(&["!="])
    );
}

#[test]
fn test_fragment_with_no_match_is_empty() {
    assert!(suggest(&harmony(), "FROM XYZ").is_empty());
}

#[test]
fn test_fragment_reported_with_offset() {
    let report = suggest_with_options(
        &harmony(),
        "FROM PROFILE_TABLE SEL",
        &SuggestOptions::default(),
    )
    .unwrap();

    assert_eq!(
        report.partial,
        Some(Partial {
            text: "SEL".to_string(),
            start: 19
        })
    );
    assert_eq!(report.texts(), set(&["SELECT"]));
    assert_eq!(report.confirmed_tokens, 2);
}

// Case preference

#[test]
fn test_as_is_fragment_is_case_sensitive() {
    let grammar = harmony();
    let input = "FROM PROFILE_TABLE sel";
    assert!(suggest(&grammar, input).is_empty());
    assert_eq!(
        suggest_completions(&grammar, input, CasePreference::Upper).unwrap(),
        set(&["SELECT"])
    );
    assert_eq!(
        suggest_completions(&grammar, input, CasePreference::Lower).unwrap(),
        set(&["select"])
    );
}

#[test]
fn test_lower_preference_transforms_every_literal() {
    let suggestions =
        suggest_completions(&harmony(), "FROM ", CasePreference::Lower).unwrap();
    let expected: BTreeSet<String> = HARMONY_TABLES.iter().map(|t| t.to_lowercase()).collect();
    assert_eq!(suggestions, expected);
}

#[test]
fn test_keywords_accept_any_case_in_confirmed_input() {
    assert_eq!(
        suggest(&harmony(), "from PROFILE_TABLE select * "),
        set(&["WHERE"])
    );
}

// Errors

#[test]
fn test_unparseable_prefix_is_an_error() {
    let err = suggest_completions(&harmony(), "FROM SELECT ", CasePreference::AsIs).unwrap_err();
    match err {
        AutosuggestError::NoViableParse(e) => {
            assert_eq!(e.index, 1);
            assert_eq!(e.kind, "SELECT");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_untokenizable_prefix_is_a_lexical_error() {
    let err = suggest_completions(&harmony(), "FROM ? ", CasePreference::AsIs).unwrap_err();
    match err {
        AutosuggestError::Lexical(e) => assert_eq!(e.position, 5),
        other => panic!("unexpected error: {other}"),
    }
}

// Recursive grammars

#[test]
fn test_left_recursion_terminates() {
    let grammar = arithmetic();

    assert_eq!(suggest(&grammar, ""), set(&["("]));
    assert_eq!(suggest(&grammar, "1 "), set(&["+"]));
    assert_eq!(suggest(&grammar, "1 + "), set(&["("]));
    assert_eq!(suggest(&grammar, "1 + 2 + 3 "), set(&["+"]));

    let report = suggest_with_options(&grammar, "1 + 2 ", &SuggestOptions::default()).unwrap();
    assert!(report.accepts_end_of_input);
    assert_eq!(report.stats.pruned_calls, 0);
}

#[test]
fn test_operator_chain_longer_than_reentry_bound() {
    let grammar = arithmetic();
    let limit = ExplorationLimits::default().max_rule_reentry;

    for operators in [limit - 1, limit, limit + 1, 3 * limit] {
        let mut input = "1 ".to_string();
        for i in 0..operators {
            input.push_str(&format!("+ {i} "));
        }
        assert_eq!(suggest(&grammar, &input), set(&["+"]), "{operators} operators");

        input.push_str("+ ");
        assert_eq!(suggest(&grammar, &input), set(&["("]), "{operators} operators");
    }
}

/// Four precedence levels: `lN: lN OPn lN+1 | lN+1`, `l4: NUM`
fn precedence_levels() -> Grammar {
    let operators = ["a", "b", "c", "d"];
    let mut builder = GrammarBuilder::new()
        .skip("WS", LexExpr::class("\\s").many1())
        .token("NUM", LexExpr::class("0-9").many1());
    for op in operators {
        builder = builder.token(op.to_uppercase(), LexExpr::literal(op));
    }
    for (level, op) in operators.iter().enumerate() {
        let this = format!("l{level}");
        let next = format!("l{}", level + 1);
        builder = builder.rule(
            this.clone(),
            Expr::alt([
                Expr::seq([
                    Expr::rule(this),
                    Expr::token(op.to_uppercase()),
                    Expr::rule(next.clone()),
                ]),
                Expr::rule(next),
            ]),
        );
    }
    builder
        .rule("l4", Expr::token("NUM"))
        .start("l0")
        .build()
        .unwrap()
}

#[test]
fn test_precedence_levels_stay_within_bounds() {
    let grammar = precedence_levels();

    for input in ["", "1 ", "1 a 2 b 3 c 4 d 5 ", "1 d 2 d 3 c 4 b 5 a "] {
        let report = suggest_with_options(&grammar, input, &SuggestOptions::default()).unwrap();
        assert_eq!(report.stats.truncated, 0, "{input:?}");
        assert_eq!(report.stats.pruned_calls, 0, "{input:?}");
        assert!(report.stats.explored < 10_000, "{input:?}");
    }

    assert_eq!(suggest(&grammar, "1 "), set(&["a", "b", "c", "d"]));
    assert_eq!(suggest(&grammar, "1 a 2 b 3 c 4 d 5 "), set(&["a", "b", "c", "d"]));
    assert!(suggest(&grammar, "1 a ").is_empty());
}

#[test]
fn test_nested_parentheses() {
    let grammar = arithmetic();

    assert_eq!(suggest(&grammar, "( ( 1 "), set(&["+", ")"]));
    assert_eq!(suggest(&grammar, "( ( 1 ) "), set(&["+", ")"]));

    let report = suggest_with_options(&grammar, "( ( 1 ) ", &SuggestOptions::default()).unwrap();
    assert!(!report.accepts_end_of_input);

    let report =
        suggest_with_options(&grammar, "( ( 1 ) ) ", &SuggestOptions::default()).unwrap();
    assert!(report.accepts_end_of_input);
}

#[test]
fn test_self_recursive_alternative_terminates() {
    // a: a | A
    let grammar = GrammarBuilder::new()
        .skip("WS", LexExpr::literal(" ").many1())
        .token("A", LexExpr::literal("A"))
        .rule("a", Expr::alt([Expr::rule("a"), Expr::token("A")]))
        .start("a")
        .build()
        .unwrap();

    assert_eq!(suggest(&grammar, ""), set(&["A"]));

    let report = suggest_with_options(&grammar, "A ", &SuggestOptions::default()).unwrap();
    assert!(report.suggestions.is_empty());
    assert!(report.accepts_end_of_input);
}

#[test]
fn test_configuration_bound_truncates_without_failing() {
    let grammar = arithmetic();
    let tokens = Tokenizer::new(&grammar, ExplorationLimits::default())
        .tokenize("1 + ")
        .unwrap()
        .tokens;
    let simulation =
        simulator::simulate(&grammar, &tokens, &ExplorationLimits::default()).unwrap();

    let tight = ExplorationLimits {
        max_rule_reentry: 16,
        max_configurations: 2,
    };
    let collected = collector::collect(&grammar, simulation.configurations, &tight);

    assert!(collected.bound_exceeded.is_some());
    assert_eq!(collected.stats.truncated, 1);
}

// Grammars as data

#[test]
fn test_bundled_definition_gives_same_suggestions() {
    let from_file = GrammarDefinition::from_toml_str(include_str!("../../grammars/harmony_sql.toml"))
        .unwrap()
        .into_grammar()
        .unwrap();
    let sample = harmony();

    for input in [
        "",
        "FROM ",
        "FROM PROFILE_TABLE SELECT ",
        "FROM PROFILE_TABLE SELECT * WHERE LAST_NAME ",
        "FROM PROFILE_TABLE SELECT * WHERE LAST_NAME = 'x' ",
        "FROM US_F",
    ] {
        assert_eq!(suggest(&from_file, input), suggest(&sample, input), "{input:?}");
    }
}

#[test]
fn test_custom_vocabulary() {
    let grammar = samples::harmony_sql_builder(["ORDERS", "ORDER_LINES"], ["TOTAL"])
        .build()
        .unwrap();
    assert_eq!(suggest(&grammar, "FROM ORD"), set(&["ORDERS", "ORDER_LINES"]));
    assert_eq!(suggest(&grammar, "FROM ORDERS SELECT * WHERE "), set(&["TOTAL"]));
}

// Determinism and sharing

#[test]
fn test_repeated_requests_are_identical() {
    let grammar = harmony();
    let input = "FROM PROFILE_TABLE SELECT * WHERE LAST_NAME ";
    let first = suggest_with_options(&grammar, input, &SuggestOptions::default()).unwrap();
    let second = suggest_with_options(&grammar, input, &SuggestOptions::default()).unwrap();

    assert_eq!(first.suggestions, second.suggestions);
    assert_eq!(first.stats, second.stats);
}

#[test]
fn test_shared_grammar_across_threads() {
    let grammar = Arc::new(harmony());
    let inputs = [
        "FROM ",
        "FROM PROFILE_TABLE SELECT FIRST_NAME ",
        "FROM PROFILE_TABLE SELECT * WHERE LAST_NAME ",
        "FROM PROFILE_TABLE SELECT * WHERE LAST_NAME = SMITH ",
    ];
    let expected: Vec<_> = inputs.iter().map(|input| suggest(&grammar, input)).collect();

    thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let grammar = Arc::clone(&grammar);
                scope.spawn(move || {
                    inputs
                        .iter()
                        .map(|input| suggest(&grammar, input))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
