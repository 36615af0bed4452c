//! Helpers for combining filters and recovering from bad input.

use super::ast::Filter;
use super::lexer::{FilterToken, Lexer};

/// Scopes `filter` with an extra condition without touching the original.
///
/// Used for drill-downs: the user's own expression is kept intact and the
/// implicit boundary (a timeframe, a category) is ANDed on the right.
///
/// # Example
///
/// ```
/// use ledger_filter::filter::{and_node, FilterParser};
///
/// let user = FilterParser::parse_strict("cat:Food").unwrap();
/// let scope = FilterParser::parse_strict("date:2025-03").unwrap();
/// assert_eq!(and_node(&user, &scope).to_string(), "cat:Food AND date:2025-03");
/// ```
pub fn and_node(filter: &Filter, scope: &Filter) -> Filter {
    Filter::and(filter.clone(), scope.clone())
}

/// Returns true if any `field:value` predicate appears anywhere in the tree.
///
/// Callers use this to decide whether plain text should be treated as a
/// search across fields rather than as a structured query.
pub fn has_field_predicate(filter: &Filter) -> bool {
    filter.has_field_predicate()
}

/// Wraps arbitrary text as a single free-text filter.
///
/// Surrounding whitespace is trimmed. Text that is exactly one quoted string
/// is unwrapped first, so feeding the printed form of a fallback back in gives
/// the same filter instead of nesting quotes.
///
/// # Example
///
/// ```
/// use ledger_filter::filter::fallback;
///
/// let once = fallback("coffee (shop");
/// let twice = fallback(&once.to_string());
/// assert_eq!(once, twice);
/// ```
pub fn fallback(text: &str) -> Filter {
    let trimmed = text.trim();
    let tokens = Lexer::new(trimmed).tokenize();
    if let [only] = tokens.as_slice() {
        if let FilterToken::Quoted(inner) = &only.token {
            if only.position == 0 && only.end == trimmed.len() {
                return Filter::free_text(inner.clone());
            }
        }
    }
    Filter::free_text(trimmed)
}
