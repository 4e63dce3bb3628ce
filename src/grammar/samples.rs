//! Bundled grammars

use super::{Expr, Grammar, GrammarBuilder, LexExpr};
use crate::error::GrammarError;

/// Tables known to the HarmonySQL sample
pub const HARMONY_TABLES: [&str; 4] = [
    "PROFILE_TABLE",
    "REF_TABLE_1",
    "US_FORT_WORTH_CUSTOMERS",
    "US_DALLAS_CUSTOMERS",
];

/// Columns known to the HarmonySQL sample
pub const HARMONY_COLUMNS: [&str; 4] = ["LAST_NAME", "FIRST_NAME", "REGION", "STATE"];

/// HarmonySQL builder with a custom table and column vocabulary
///
/// ```text
/// statement    : FROM table SELECT columns where_clause? ;
/// columns      : STAR | column (COMMA column)* ;
/// where_clause : WHERE condition ((AND | OR) condition)* ;
/// condition    : column operator value ;
/// operator     : EQ | NEQ | LT | GT | LTE | GTE | LIKE ;
/// value        : ID | NUMBER | STRING ;
/// ```
pub fn harmony_sql_builder<T, C>(tables: T, columns: C) -> GrammarBuilder
where
    T: IntoIterator,
    T::Item: AsRef<str>,
    C: IntoIterator,
    C::Item: AsRef<str>,
{
    GrammarBuilder::new()
        .skip("WS", LexExpr::class("\\s\\t\\r\\n").many1())
        .keyword("FROM", "FROM")
        .keyword("SELECT", "SELECT")
        .keyword("WHERE", "WHERE")
        .keyword("AND", "AND")
        .keyword("OR", "OR")
        .keyword("LIKE", "LIKE")
        .literals("EQ", ["EQ", "="])
        .literals("NEQ", ["NEQ", "!="])
        .literals("LTE", ["LTE", "<="])
        .literals("GTE", ["GTE", ">="])
        .literals("LT", ["LT", "<"])
        .literals("GT", ["GT", ">"])
        .token("COMMA", LexExpr::literal(","))
        .token("STAR", LexExpr::literal("*"))
        .literals("TABLE_NAME", tables)
        .literals("COLUMN_NAME", columns)
        .token("NUMBER", LexExpr::class("0-9").many1())
        .token(
            "STRING",
            Expr::seq([
                LexExpr::literal("'"),
                LexExpr::not_class("'").many(),
                LexExpr::literal("'"),
            ]),
        )
        .token(
            "ID",
            Expr::seq([
                LexExpr::class("A-Za-z_"),
                LexExpr::class("A-Za-z0-9_").many(),
            ]),
        )
        .rule(
            "statement",
            Expr::seq([
                Expr::token("FROM"),
                Expr::rule("table"),
                Expr::token("SELECT"),
                Expr::rule("columns"),
                Expr::rule("where_clause").optional(),
            ]),
        )
        .rule("table", Expr::token("TABLE_NAME"))
        .rule(
            "columns",
            Expr::alt([
                Expr::token("STAR"),
                Expr::seq([
                    Expr::rule("column"),
                    Expr::seq([Expr::token("COMMA"), Expr::rule("column")]).many(),
                ]),
            ]),
        )
        .rule("column", Expr::token("COLUMN_NAME"))
        .rule(
            "where_clause",
            Expr::seq([
                Expr::token("WHERE"),
                Expr::rule("condition"),
                Expr::seq([
                    Expr::alt([Expr::token("AND"), Expr::token("OR")]),
                    Expr::rule("condition"),
                ])
                .many(),
            ]),
        )
        .rule(
            "condition",
            Expr::seq([
                Expr::rule("column"),
                Expr::rule("operator"),
                Expr::rule("value"),
            ]),
        )
        .rule(
            "operator",
            Expr::alt(
                ["EQ", "NEQ", "LT", "GT", "LTE", "GTE", "LIKE"]
                    .into_iter()
                    .map(Expr::token),
            ),
        )
        .rule(
            "value",
            Expr::alt([Expr::token("ID"), Expr::token("NUMBER"), Expr::token("STRING")]),
        )
        .start("statement")
}

/// The HarmonySQL sample grammar with its default vocabulary
pub fn harmony_sql() -> Result<Grammar, GrammarError> {
    harmony_sql_builder(HARMONY_TABLES, HARMONY_COLUMNS).build()
}
