//! Character sets used as lexical transition labels

use std::ops::RangeInclusive;

use crate::error::GrammarError;

/// A set of characters matched by a single lexical transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CharSet {
    /// One character in either case; the declared spelling is kept so literal
    /// tokens such as case-insensitive keywords still have a canonical form
    Caseless(char),
    /// Any character inside one of the ranges
    Ranges(Vec<RangeInclusive<char>>),
    /// Any character outside all of the ranges
    Not(Vec<RangeInclusive<char>>),
}

impl CharSet {
    /// Set holding exactly the given characters
    pub fn of(chars: impl IntoIterator<Item = char>) -> Self {
        CharSet::Ranges(chars.into_iter().map(|c| c..=c).collect())
    }

    pub fn contains(&self, c: char) -> bool {
        match self {
            CharSet::Caseless(declared) => {
                *declared == c
                    || declared.to_lowercase().eq(c.to_lowercase())
                    || declared.to_uppercase().eq(c.to_uppercase())
            }
            CharSet::Ranges(ranges) => ranges.iter().any(|r| r.contains(&c)),
            CharSet::Not(ranges) => !ranges.iter().any(|r| r.contains(&c)),
        }
    }

    /// The single spelling this set stands for, if it has one
    pub fn literal(&self) -> Option<char> {
        match self {
            CharSet::Caseless(c) => Some(*c),
            CharSet::Ranges(ranges) => match ranges.as_slice() {
                [r] if r.start() == r.end() => Some(*r.start()),
                _ => None,
            },
            CharSet::Not(_) => None,
        }
    }

    /// Parse a bracket-less class body such as `A-Za-z_` or `0-9`.
    ///
    /// Supported escapes: `\n`, `\r`, `\t`, `\\`, `\-`, `\]` and `\s` (space).
    pub fn parse_ranges(class: &str) -> Result<Vec<RangeInclusive<char>>, GrammarError> {
        let invalid = |reason: &str| GrammarError::InvalidCharClass {
            class: class.to_string(),
            reason: reason.to_string(),
        };

        let mut chars = Vec::new();
        let mut iter = class.chars();
        while let Some(c) = iter.next() {
            if c == '\\' {
                let escaped = iter.next().ok_or_else(|| invalid("dangling escape"))?;
                chars.push((unescape(escaped), true));
            } else {
                chars.push((c, false));
            }
        }

        if chars.is_empty() {
            return Err(invalid("empty class"));
        }

        let mut ranges = Vec::new();
        let mut i = 0;
        while i < chars.len() {
            let (start, _) = chars[i];
            let is_range = i + 2 < chars.len() && chars[i + 1] == ('-', false);
            if is_range {
                let (end, _) = chars[i + 2];
                if end < start {
                    return Err(invalid("range end precedes start"));
                }
                ranges.push(start..=end);
                i += 3;
            } else {
                ranges.push(start..=start);
                i += 1;
            }
        }

        Ok(ranges)
    }
}

fn unescape(c: char) -> char {
    match c {
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        's' => ' ',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caseless_contains_both_cases() {
        let set = CharSet::Caseless('S');
        assert!(set.contains('S'));
        assert!(set.contains('s'));
        assert!(!set.contains('x'));
        assert_eq!(set.literal(), Some('S'));
    }

    #[test]
    fn test_ranges_and_negation() {
        let digits = CharSet::Ranges(vec!['0'..='9']);
        assert!(digits.contains('5'));
        assert!(!digits.contains('a'));
        assert_eq!(digits.literal(), None);

        let not_quote = CharSet::Not(vec!['\''..='\'']);
        assert!(not_quote.contains('a'));
        assert!(!not_quote.contains('\''));
    }

    #[test]
    fn test_single_char_set_is_literal() {
        assert_eq!(CharSet::of(['*']).literal(), Some('*'));
        assert_eq!(CharSet::of(['<', '>']).literal(), None);
    }

    #[test]
    fn test_parse_ranges() {
        let ranges = CharSet::parse_ranges("A-Za-z_").unwrap();
        assert_eq!(ranges, vec!['A'..='Z', 'a'..='z', '_'..='_']);

        let ranges = CharSet::parse_ranges("\\s\\t\\n-").unwrap();
        assert_eq!(ranges, vec![' '..=' ', '\t'..='\t', '\n'..='\n', '-'..='-']);

        let ranges = CharSet::parse_ranges("a\\-z").unwrap();
        assert_eq!(ranges, vec!['a'..='a', '-'..='-', 'z'..='z']);
    }

    #[test]
    fn test_parse_ranges_errors() {
        assert!(CharSet::parse_ranges("").is_err());
        assert!(CharSet::parse_ranges("z-a").is_err());
        assert!(CharSet::parse_ranges("ab\\").is_err());
    }
}
