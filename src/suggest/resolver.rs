//! Literal resolver
//!
//! Turns candidate token kinds back into text. Only literal tokens produce
//! suggestions; identifiers, numbers and other patterned tokens cannot be
//! completed from the grammar alone.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::grammar::{GrammarModel, TokenKind};

/// Case transformation applied to suggested literals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CasePreference {
    Upper,
    Lower,
    /// Keep the spelling declared in the grammar
    #[default]
    AsIs,
}

impl CasePreference {
    pub fn apply(self, text: &str) -> String {
        match self {
            CasePreference::Upper => text.to_uppercase(),
            CasePreference::Lower => text.to_lowercase(),
            CasePreference::AsIs => text.to_string(),
        }
    }

    /// Whether `text` is a completion of `fragment` under this preference
    pub fn matches_prefix(self, text: &str, fragment: &str) -> bool {
        match self {
            CasePreference::AsIs => text.starts_with(fragment),
            CasePreference::Upper | CasePreference::Lower => text
                .to_lowercase()
                .starts_with(&fragment.to_lowercase()),
        }
    }
}

impl fmt::Display for CasePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CasePreference::Upper => "upper",
            CasePreference::Lower => "lower",
            CasePreference::AsIs => "as-is",
        };
        f.write_str(name)
    }
}

impl FromStr for CasePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "upper" => Ok(CasePreference::Upper),
            "lower" => Ok(CasePreference::Lower),
            "as-is" | "asis" | "as_is" => Ok(CasePreference::AsIs),
            _ => Err(format!(
                "Invalid case preference '{s}'. Valid options: upper, lower, as-is"
            )),
        }
    }
}

/// A completion candidate
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Suggestion {
    pub text: String,
    /// Token kind the text was resolved from
    pub kind: TokenKind,
}

/// Resolve `kinds` to literal suggestions, sorted and unique by text
pub fn resolve(
    grammar: &dyn GrammarModel,
    kinds: impl IntoIterator<Item = TokenKind>,
    preference: CasePreference,
    fragment: Option<&str>,
) -> Vec<Suggestion> {
    let mut resolved: BTreeMap<String, TokenKind> = BTreeMap::new();

    for kind in kinds {
        if grammar.token_def(kind).is_none_or(|def| def.skip) {
            continue;
        }
        for spelling in grammar.literal_spellings(kind) {
            let text = preference.apply(spelling);
            let keep = fragment.is_none_or(|fragment| preference.matches_prefix(&text, fragment));
            if keep {
                resolved.entry(text).or_insert(kind);
            }
        }
    }

    resolved
        .into_iter()
        .map(|(text, kind)| Suggestion { text, kind })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::samples;

    fn texts(suggestions: &[Suggestion]) -> Vec<&str> {
        suggestions.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn test_case_preference_apply() {
        assert_eq!(CasePreference::Upper.apply("Select"), "SELECT");
        assert_eq!(CasePreference::Lower.apply("Select"), "select");
        assert_eq!(CasePreference::AsIs.apply("Select"), "Select");
        assert_eq!(CasePreference::default(), CasePreference::AsIs);
    }

    #[test]
    fn test_case_preference_parse_and_display() {
        assert_eq!("UPPER".parse::<CasePreference>(), Ok(CasePreference::Upper));
        assert_eq!("as-is".parse::<CasePreference>(), Ok(CasePreference::AsIs));
        assert!("title".parse::<CasePreference>().is_err());
        assert_eq!(CasePreference::AsIs.to_string(), "as-is");
    }

    #[test]
    fn test_prefix_matching_respects_preference() {
        assert!(CasePreference::AsIs.matches_prefix("SELECT", "SEL"));
        assert!(!CasePreference::AsIs.matches_prefix("SELECT", "sel"));
        assert!(CasePreference::Lower.matches_prefix("select", "SEL"));
        assert!(CasePreference::Upper.matches_prefix("SELECT", "sel"));
        assert!(CasePreference::AsIs.matches_prefix("SELECT", ""));
    }

    #[test]
    fn test_patterned_and_skip_kinds_produce_nothing() {
        let grammar = samples::harmony_sql().unwrap();
        let kinds = ["ID", "NUMBER", "STRING", "WS"].map(|n| grammar.token_kind(n).unwrap());

        let resolved = resolve(&grammar, kinds, CasePreference::AsIs, None);
        assert!(resolved.is_empty());
    }

    #[test]
    fn test_resolve_sorted_and_filtered() {
        let grammar = samples::harmony_sql().unwrap();
        let kinds = ["LT", "LTE", "LIKE"].map(|n| grammar.token_kind(n).unwrap());

        let all = resolve(&grammar, kinds, CasePreference::AsIs, None);
        assert_eq!(texts(&all), ["<", "<=", "LIKE", "LT", "LTE"]);

        let filtered = resolve(&grammar, kinds, CasePreference::AsIs, Some("L"));
        assert_eq!(texts(&filtered), ["LIKE", "LT", "LTE"]);

        let lowered = resolve(&grammar, kinds, CasePreference::Lower, Some("Lt"));
        assert_eq!(texts(&lowered), ["lt", "lte"]);
    }

    #[test]
    fn test_duplicate_texts_collapse() {
        let grammar = samples::harmony_sql().unwrap();
        // Repeated kinds resolve once
        let eq = grammar.token_kind("EQ").unwrap();
        let resolved = resolve(&grammar, [eq, eq], CasePreference::Upper, None);
        assert_eq!(texts(&resolved), ["=", "EQ"]);
        assert!(resolved.iter().all(|s| s.kind == eq));
    }
}
