//! Filter expressions for ledger transactions.
//!
//! This crate provides a small query language for narrowing a set of
//! transactions: a lexer and parser (lenient for interactive input, strict
//! for anything that gets stored), an evaluator, and a canonical printer whose
//! output reparses to the same expression.
//!
//! The crate performs no I/O. Callers load records however they like and hand
//! them to the evaluator through the [`Record`] trait.
//!
//! # Example
//!
//! ```
//! use ledger_filter::filter::{FilterEvaluator, FilterParser};
//! use ledger_filter::Transaction;
//!
//! let filter = FilterParser::parse_strict("(cat:Food OR tag:groceries) AND amt:<0").unwrap();
//! assert_eq!(filter.to_string(), "(cat:Food OR tag:groceries) AND amt:<0");
//!
//! let txn = Transaction {
//!     description: "Corner store".to_string(),
//!     category: "Food".to_string(),
//!     account: "Everyday".to_string(),
//!     amount: -12.40,
//!     date: "2025-03-15".to_string(),
//!     notes: String::new(),
//! };
//! let tags: [&str; 0] = [];
//! assert!(FilterEvaluator::new(&filter).matches(&txn, &tags));
//! ```

pub mod filter;
mod record;

pub use record::{Record, TaggedTransaction, Transaction};
