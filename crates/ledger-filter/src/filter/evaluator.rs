//! Filter evaluation against ledger records.
//!
//! This module provides the [`FilterEvaluator`] for evaluating parsed filter
//! expressions against anything implementing [`Record`].
//!
//! # Example
//!
//! ```
//! use ledger_filter::filter::{FilterEvaluator, FilterParser};
//! use ledger_filter::Transaction;
//!
//! // Parse a filter
//! let filter = FilterParser::parse_strict("type:debit AND tag:groceries").unwrap();
//!
//! // Create a record to test
//! let txn = Transaction {
//!     description: "Supermarket".to_string(),
//!     category: "Food".to_string(),
//!     account: "Everyday".to_string(),
//!     amount: -54.20,
//!     date: "2025-03-02".to_string(),
//!     notes: String::new(),
//! };
//!
//! // Evaluate the filter
//! let evaluator = FilterEvaluator::new(&filter);
//! assert!(evaluator.matches(&txn, &["Groceries"]));
//! assert!(!evaluator.matches(&txn, &["Fuel"]));
//! ```

use crate::record::{Record, TaggedTransaction};

use super::ast::{AmountMatch, EntryType, FieldMatch, Filter, TextMatch};

/// Two amounts closer than this are considered equal.
pub const AMOUNT_TOLERANCE: f64 = 0.005;

/// Evaluates a parsed filter against records.
///
/// Evaluation is pure: it reads the filter and the record and allocates
/// nothing that outlives the call, so one evaluator can be shared across
/// threads.
#[derive(Debug, Clone, Copy)]
pub struct FilterEvaluator<'a> {
    filter: &'a Filter,
}

impl<'a> FilterEvaluator<'a> {
    /// Creates a new filter evaluator.
    pub fn new(filter: &'a Filter) -> Self {
        Self { filter }
    }

    /// Returns true if the record, with the given tags, matches the filter.
    pub fn matches<R, S>(&self, record: &R, tags: &[S]) -> bool
    where
        R: Record + ?Sized,
        S: AsRef<str>,
    {
        evaluate(self.filter, record, tags)
    }

    /// Filters a slice of tagged transactions, returning only those that match.
    pub fn filter_records<'b>(&self, records: &'b [TaggedTransaction]) -> Vec<&'b TaggedTransaction> {
        records
            .iter()
            .filter(|record| self.matches(&record.transaction, &record.tags))
            .collect()
    }
}

/// Evaluates a filter expression against one record and its tags.
pub fn evaluate<R, S>(filter: &Filter, record: &R, tags: &[S]) -> bool
where
    R: Record + ?Sized,
    S: AsRef<str>,
{
    match filter {
        // Boolean operators
        Filter::And(left, right) => evaluate(left, record, tags) && evaluate(right, record, tags),
        Filter::Or(left, right) => evaluate(left, record, tags) || evaluate(right, record, tags),
        Filter::Not(inner) => !evaluate(inner, record, tags),

        Filter::Field(matcher) => field_matches(matcher, record, tags),

        // Free text only looks at the high-signal fields
        Filter::FreeText(term) => {
            term.is_match(record.description())
                || term.is_match(record.category())
                || term.is_match(record.date())
        }
    }
}

fn field_matches<R, S>(matcher: &FieldMatch, record: &R, tags: &[S]) -> bool
where
    R: Record + ?Sized,
    S: AsRef<str>,
{
    match matcher {
        FieldMatch::Description(text) => text.is_match(record.description()),
        FieldMatch::Category(text) => text.is_match(record.category()),
        FieldMatch::Account(text) => text.is_match(record.account()),
        FieldMatch::Note(text) => text.is_match(record.notes()),
        FieldMatch::Tag(text) => has_tag(text, tags),
        FieldMatch::Type(entry_type) => is_entry_type(*entry_type, record.amount()),
        FieldMatch::Amount(amount) => amount_matches(amount, record.amount()),
        FieldMatch::Date(date) => date.contains(record.date()),
    }
}

/// Checks if any tag contains the needle (case-insensitive).
fn has_tag<S: AsRef<str>>(needle: &TextMatch, tags: &[S]) -> bool {
    tags.iter().any(|tag| needle.is_match(tag.as_ref()))
}

/// Debits are strictly negative; zero counts as a credit.
fn is_entry_type(entry_type: EntryType, amount: f64) -> bool {
    match entry_type {
        EntryType::Debit => amount < 0.0,
        EntryType::Credit => amount >= 0.0,
    }
}

/// Compares the signed amount; no absolute value is taken.
fn amount_matches(matcher: &AmountMatch, amount: f64) -> bool {
    match *matcher {
        AmountMatch::Exact(value) => (amount - value).abs() < AMOUNT_TOLERANCE,
        AmountMatch::LessThan(value) => amount < value,
        AmountMatch::GreaterThan(value) => amount > value,
        AmountMatch::Between(lo, hi) => lo <= amount && amount <= hi,
    }
}

#[cfg(test)]
#[path = "evaluator_tests.rs"]
mod tests;
