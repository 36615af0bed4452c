//! Canonical text form of a filter.
//!
//! `Display` output reparses with [`FilterParser::parse_strict`] to a filter
//! that prints identically: AND and OR are never mixed without parentheses,
//! keys use their short lowercase names, and values are quoted whenever the
//! lexer would otherwise split or reinterpret them.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::ast::{AmountMatch, DateMatch, FieldMatch, Filter};
use super::lexer::is_keyword;
use super::parser::FilterParser;

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::And(left, right) => {
                write_operand(f, left, Position::Left(Join::And))?;
                f.write_str(" AND ")?;
                write_operand(f, right, Position::Right)
            }
            Filter::Or(left, right) => {
                write_operand(f, left, Position::Left(Join::Or))?;
                f.write_str(" OR ")?;
                write_operand(f, right, Position::Right)
            }
            Filter::Not(inner) => {
                f.write_str("NOT ")?;
                write_operand(f, inner, Position::Negated)
            }
            Filter::Field(matcher) => write!(f, "{matcher}"),
            Filter::FreeText(term) => write_free_text(f, term.as_str()),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Join {
    And,
    Or,
}

/// Where an operand sits relative to its parent.
#[derive(Clone, Copy)]
enum Position {
    Left(Join),
    Right,
    Negated,
}

fn write_operand(f: &mut fmt::Formatter<'_>, operand: &Filter, position: Position) -> fmt::Result {
    let join = match operand {
        Filter::And(..) => Some(Join::And),
        Filter::Or(..) => Some(Join::Or),
        _ => None,
    };

    let grouped = match (join, position) {
        (None, _) => false,
        (Some(_), Position::Negated) => true,
        // Mixed operators are always grouped
        (Some(child), Position::Left(parent)) => child != parent,
        // A right operand is grouped even under the same operator so the
        // reparsed tree keeps its shape.
        (Some(_), Position::Right) => true,
    };

    if grouped {
        write!(f, "({operand})")
    } else {
        write!(f, "{operand}")
    }
}

impl fmt::Display for FieldMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.key().as_str())?;
        match self {
            FieldMatch::Description(text)
            | FieldMatch::Category(text)
            | FieldMatch::Account(text)
            | FieldMatch::Note(text)
            | FieldMatch::Tag(text) => write_value(f, text.as_str()),
            FieldMatch::Type(entry_type) => f.write_str(entry_type.as_str()),
            FieldMatch::Amount(amount) => write!(f, "{amount}"),
            FieldMatch::Date(date) => write!(f, "{date}"),
        }
    }
}

impl fmt::Display for AmountMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmountMatch::Exact(value) => write!(f, "{value}"),
            AmountMatch::LessThan(value) => write!(f, "<{value}"),
            AmountMatch::GreaterThan(value) => write!(f, ">{value}"),
            AmountMatch::Between(lo, hi) => write!(f, "{lo}..{hi}"),
        }
    }
}

impl fmt::Display for DateMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end() {
            Some(end) => write!(f, "{}..{}", self.start(), end),
            None => write!(f, "{}", self.start()),
        }
    }
}

/// Writes a free-text term, quoting it unless it lexes back as one plain word.
fn write_free_text(f: &mut fmt::Formatter<'_>, term: &str) -> fmt::Result {
    let bare = !term.is_empty()
        && !term
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '(' | ')' | '"' | ':'))
        && !is_keyword(term);
    if bare {
        f.write_str(term)
    } else {
        write_quoted(f, term)
    }
}

/// Writes the value of a text field. Values may contain colons but not `..`.
fn write_value(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    let bare = !value.is_empty()
        && !value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '(' | ')' | '"'))
        && !value.contains("..");
    if bare {
        f.write_str(value)
    } else {
        write_quoted(f, value)
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in text.chars() {
        if c == '"' || c == '\\' {
            f.write_str("\\")?;
        }
        write!(f, "{c}")?;
    }
    f.write_str("\"")
}

/// Filters serialize as their canonical text.
impl Serialize for Filter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Filters deserialize through the strict parser, so stored text that has
/// become ambiguous is rejected rather than silently reinterpreted.
impl<'de> Deserialize<'de> for Filter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        FilterParser::parse_strict(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::TextMatch;

    fn strict(input: &str) -> Filter {
        FilterParser::parse_strict(input).unwrap()
    }

    #[test]
    fn test_print_keys_lowercase_canonical() {
        assert_eq!(strict("CATEGORY:Food").to_string(), "cat:Food");
        assert_eq!(strict("Description:coffee").to_string(), "desc:coffee");
        assert_eq!(strict("labels:x").to_string(), "tag:x");
        assert_eq!(strict("AMOUNT:5").to_string(), "amt:5");
        assert_eq!(strict("Type:DEBIT").to_string(), "type:debit");
    }

    #[test]
    fn test_print_quotes_values_with_spaces() {
        assert_eq!(
            strict(r#"acc:"ANZ Savings""#).to_string(),
            r#"acc:"ANZ Savings""#
        );
    }

    #[test]
    fn test_print_quotes_keywords_in_free_text() {
        let filter = Filter::free_text("or");
        assert_eq!(filter.to_string(), r#""or""#);
        assert_eq!(strict(&filter.to_string()), filter);
    }

    #[test]
    fn test_print_keyword_value_needs_no_quotes() {
        assert_eq!(strict("desc:AND").to_string(), "desc:AND");
    }

    #[test]
    fn test_print_escapes_quotes_and_backslashes() {
        let filter = Filter::free_text(r#"say "hi" \o/"#);
        assert_eq!(filter.to_string(), r#""say \"hi\" \\o/""#);
        assert_eq!(strict(&filter.to_string()), filter);
    }

    #[test]
    fn test_print_value_with_dots_is_quoted() {
        let filter = strict(r#"desc:"a..b""#);
        assert_eq!(filter.to_string(), r#"desc:"a..b""#);
    }

    #[test]
    fn test_print_value_with_colon_is_bare() {
        assert_eq!(strict("note:ref:1234").to_string(), "note:ref:1234");
    }

    #[test]
    fn test_print_empty_values() {
        assert_eq!(strict("cat:").to_string(), r#""cat:""#);
        assert_eq!(Filter::free_text("").to_string(), r#""""#);
    }

    #[test]
    fn test_print_amounts() {
        assert_eq!(strict("amt:-120.50").to_string(), "amt:-120.5");
        assert_eq!(strict("amt:<-100").to_string(), "amt:<-100");
        assert_eq!(strict("amt:>50").to_string(), "amt:>50");
        assert_eq!(strict("amt:-130..-100").to_string(), "amt:-130..-100");
        assert_eq!(strict("amt:$1,200").to_string(), "amt:1200");
    }

    #[test]
    fn test_print_dates() {
        assert_eq!(strict("date:2025-03-15").to_string(), "date:2025-03-15");
        assert_eq!(strict("date:2025-03").to_string(), "date:2025-03");
        assert_eq!(strict("date:2025").to_string(), "date:2025");
        assert_eq!(
            strict("date:2025-01..2025-03-15").to_string(),
            "date:2025-01..2025-03-15"
        );
    }

    #[test]
    fn test_print_degraded_field_is_quoted_text() {
        let filter = strict("amt:lots");
        assert_eq!(filter, Filter::FreeText(TextMatch::new("amt:lots")));
        assert_eq!(filter.to_string(), r#""amt:lots""#);
        assert_eq!(strict(&filter.to_string()), filter);
    }

    #[test]
    fn test_print_mixed_operators_grouped() {
        let filter = Filter::or(
            Filter::and(Filter::free_text("a"), Filter::free_text("b")),
            Filter::free_text("c"),
        );
        assert_eq!(filter.to_string(), "(a AND b) OR c");

        let filter = Filter::and(
            Filter::free_text("a"),
            Filter::or(Filter::free_text("b"), Filter::free_text("c")),
        );
        assert_eq!(filter.to_string(), "a AND (b OR c)");
    }

    #[test]
    fn test_print_left_chain_flat() {
        assert_eq!(strict("a AND b AND c").to_string(), "a AND b AND c");
        assert_eq!(strict("a OR b OR c").to_string(), "a OR b OR c");
    }

    #[test]
    fn test_print_right_nested_same_operator_grouped() {
        let filter = Filter::and(
            Filter::free_text("a"),
            Filter::and(Filter::free_text("b"), Filter::free_text("c")),
        );
        assert_eq!(filter.to_string(), "a AND (b AND c)");
        assert_eq!(strict(&filter.to_string()), filter);

        let filter = Filter::or(
            Filter::free_text("a"),
            Filter::or(Filter::free_text("b"), Filter::free_text("c")),
        );
        assert_eq!(filter.to_string(), "a OR (b OR c)");
        assert_eq!(strict(&filter.to_string()), filter);
    }

    #[test]
    fn test_print_not_binds_tightly() {
        assert_eq!(strict("NOT tag:ignore").to_string(), "NOT tag:ignore");
        assert_eq!(strict("not not x").to_string(), "NOT NOT x");
        assert_eq!(
            strict("NOT (a OR b)").to_string(),
            "NOT (a OR b)"
        );
        assert_eq!(strict("NOT (a)").to_string(), "NOT a");
    }

    #[test]
    fn test_print_redundant_parentheses_dropped() {
        assert_eq!(strict("((cat:Food))").to_string(), "cat:Food");
        assert_eq!(strict("(a AND b) AND c").to_string(), "a AND b AND c");
    }

    #[test]
    fn test_print_implicit_and_made_explicit() {
        assert_eq!(strict("coffee shop").to_string(), "coffee AND shop");
    }

    #[test]
    fn test_serde_round_trip() {
        let filter = strict("(cat:Food OR NOT tag:ignore) AND amt:>50");
        let json = serde_json::to_string(&filter).unwrap();
        assert_eq!(json, r#""(cat:Food OR NOT tag:ignore) AND amt:>50""#);

        let back: Filter = serde_json::from_str(&json).unwrap();
        assert_eq!(back, filter);
    }

    #[test]
    fn test_deserialize_rejects_ambiguous_text() {
        let result: Result<Filter, _> = serde_json::from_str(r#""a OR b AND c""#);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("add parentheses"), "unexpected error: {err}");
    }
}
