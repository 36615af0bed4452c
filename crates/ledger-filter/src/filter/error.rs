//! Error types for the filter parser.

use thiserror::Error;

/// A specialized Result type for filter parsing operations.
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors that can occur during filter parsing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterError {
    /// The filter expression is empty.
    #[error("filter expression is empty")]
    EmptyExpression,

    /// AND and OR were mixed at one nesting level without parentheses.
    #[error("ambiguous mix of AND and OR, add parentheses: {fragment}")]
    GroupingRequired {
        /// The ungrouped part of the expression.
        fragment: String,
    },

    /// A numeric or date range whose lower bound exceeds its upper bound.
    #[error("malformed range {range}: lower bound is greater than upper bound")]
    MalformedRange {
        /// The range as written.
        range: String,
    },

    /// Parentheses do not balance.
    #[error("unbalanced parenthesis at position {position}")]
    UnterminatedGroup {
        /// Byte offset of the parenthesis without a partner.
        position: usize,
    },

    /// An unexpected token was encountered during parsing.
    #[error("unexpected token: {token}")]
    UnexpectedToken {
        /// The unexpected token that was encountered.
        token: String,
    },

    /// An unexpected end of input was encountered.
    #[error("unexpected end of expression")]
    UnexpectedEndOfInput,

    /// A `key:value` clause used a key that is not a known field.
    ///
    /// Only reported as a lenient-mode diagnostic; the clause itself is
    /// treated as free text.
    #[error("unknown field: {field}{}", suggestion_hint(.suggestion))]
    UnknownField {
        /// The key as written.
        field: String,
        /// The closest known key, if one is near enough.
        suggestion: Option<String>,
    },
}

fn suggestion_hint(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean '{s}'?)"),
        None => String::new(),
    }
}

impl FilterError {
    /// Creates a grouping required error.
    pub fn grouping_required(fragment: impl Into<String>) -> Self {
        FilterError::GroupingRequired {
            fragment: fragment.into(),
        }
    }

    /// Creates a malformed range error.
    pub fn malformed_range(range: impl Into<String>) -> Self {
        FilterError::MalformedRange {
            range: range.into(),
        }
    }

    /// Creates an unexpected token error.
    pub fn unexpected_token(token: impl Into<String>) -> Self {
        FilterError::UnexpectedToken {
            token: token.into(),
        }
    }

    /// Creates an unknown field error.
    pub fn unknown_field(field: impl Into<String>, suggestion: Option<String>) -> Self {
        FilterError::UnknownField {
            field: field.into(),
            suggestion,
        }
    }
}
