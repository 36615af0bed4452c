//! Record shapes consumed by the filter evaluator.

use serde::{Deserialize, Serialize};

/// Read access to the fields a filter can test.
///
/// The evaluator only ever borrows these values; implement this trait for
/// whatever type a caller already stores transactions in.
pub trait Record {
    /// Free-form description, usually the payee line from the bank.
    fn description(&self) -> &str;

    /// Category name.
    fn category(&self) -> &str;

    /// Account name.
    fn account(&self) -> &str;

    /// Signed amount. Debits are negative.
    fn amount(&self) -> f64;

    /// ISO-8601 date (`YYYY-MM-DD`). Anything after the day is ignored.
    fn date(&self) -> &str;

    /// User notes.
    fn notes(&self) -> &str;
}

/// A single ledger transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Payee / description line.
    #[serde(default)]
    pub description: String,

    /// Category name.
    #[serde(default)]
    pub category: String,

    /// Account name.
    #[serde(default)]
    pub account: String,

    /// Signed amount (negative for debits).
    pub amount: f64,

    /// ISO date, `YYYY-MM-DD`.
    pub date: String,

    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
}

impl Record for Transaction {
    fn description(&self) -> &str {
        &self.description
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn account(&self) -> &str {
        &self.account
    }

    fn amount(&self) -> f64 {
        self.amount
    }

    fn date(&self) -> &str {
        &self.date
    }

    fn notes(&self) -> &str {
        &self.notes
    }
}

/// A transaction together with its tag names.
///
/// Tags live outside [`Transaction`] because most stores keep them in a
/// separate table; this type is the flattened form used for JSON files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedTransaction {
    #[serde(flatten)]
    pub transaction: Transaction,

    /// Tag names attached to the transaction.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl TaggedTransaction {
    /// Returns the transaction paired with its tags, ready for evaluation.
    pub fn as_pair(&self) -> (&Transaction, &[String]) {
        (&self.transaction, &self.tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_transaction_from_json() {
        let json = r#"{
            "description": "Coffee Shop",
            "category": "Food",
            "amount": -4.5,
            "date": "2025-03-15",
            "tags": ["Morning"]
        }"#;

        let tagged: TaggedTransaction = serde_json::from_str(json).unwrap();
        assert_eq!(tagged.transaction.description, "Coffee Shop");
        assert_eq!(tagged.transaction.account, "");
        assert_eq!(tagged.transaction.amount, -4.5);
        assert_eq!(tagged.tags, vec!["Morning".to_string()]);
    }

    #[test]
    fn test_tagged_transaction_tags_default_empty() {
        let json = r#"{"amount": 10.0, "date": "2025-01-01"}"#;
        let tagged: TaggedTransaction = serde_json::from_str(json).unwrap();
        assert!(tagged.tags.is_empty());

        let (txn, tags) = tagged.as_pair();
        assert_eq!(txn.amount(), 10.0);
        assert!(tags.is_empty());
    }
}
