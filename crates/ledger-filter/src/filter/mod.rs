//! Filter expression parser and evaluator for ledger transactions.
//!
//! This module provides a parser, evaluator and canonical printer for a small
//! query language over transactions, so that interactive filtering, saved
//! filters and drill-downs all share one definition of what a filter means.
//!
//! # Supported Syntax
//!
//! ## Field Predicates
//! - `desc:coffee` - Description contains "coffee" (case-insensitive)
//! - `cat:Food` - Category contains "Food"
//! - `acc:"ANZ Savings"` - Account contains "ANZ Savings"
//! - `note:refund` - Notes contain "refund"
//! - `tag:groceries` - Any tag contains "groceries"
//! - `type:debit`, `type:credit` - Negative or non-negative amount
//! - `amt:-120.50`, `amt:<0`, `amt:>50`, `amt:10..20` - Signed amount
//! - `date:2025-03-15`, `date:2025-03`, `date:2025`, `date:2025-01..2025-03`
//!
//! Keys are case-insensitive and accept long forms (`description`,
//! `category`, `account`, `notes`, `tags`, `labels`, `amount`).
//!
//! ## Free Text
//! - `coffee` - Description, category or date contains "coffee"
//! - `"coffee shop"` - Quoted text keeps its spaces
//!
//! ## Boolean Operators
//! - `AND` - both sides match (also implied between adjacent terms)
//! - `OR` - either side matches
//! - `NOT` - negation
//! - `()` - Grouping
//!
//! # Example
//!
//! ```
//! use ledger_filter::filter::{Filter, FilterEvaluator, FilterParser};
//! use ledger_filter::Transaction;
//!
//! // Parse a filter expression
//! let filter = FilterParser::parse_strict("desc:coffee AND amt:<0").unwrap();
//! assert!(matches!(filter, Filter::And(_, _)));
//!
//! // Create an evaluator
//! let evaluator = FilterEvaluator::new(&filter);
//!
//! // Filter records (empty example)
//! let records: Vec<ledger_filter::TaggedTransaction> = vec![];
//! let results = evaluator.filter_records(&records);
//! assert!(results.is_empty());
//!
//! // Interactive input never fails to parse
//! let parsed = FilterParser::parse("desc:coffee AND");
//! assert_eq!(parsed.filter.to_string(), "desc:coffee");
//! ```

mod ast;
mod compose;
mod error;
mod evaluator;
mod lexer;
mod parser;
mod printer;

pub use ast::{AmountMatch, DateBound, DateMatch, EntryType, FieldKey, FieldMatch, Filter, TextMatch};
pub use compose::{and_node, fallback, has_field_predicate};
pub use error::{FilterError, FilterResult};
pub use evaluator::{evaluate, FilterEvaluator, AMOUNT_TOLERANCE};
pub use parser::{FilterParser, LenientParse};
