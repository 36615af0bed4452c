//! Output formatting utilities for the lq CLI.
//!
//! This module provides functions for formatting data as tables or JSON.
//! It is organized into submodules by what is being printed:
//!
//! - [`parse`] - Parsed expressions (parse command)
//! - [`records`] - Matching records (filter command)
//! - [`saved`] - Saved filters (saved list, show, add)
//! - [`helpers`] - Common formatting utilities (truncation, amounts)

pub mod helpers;
mod parse;
mod records;
mod saved;

// Parse
pub use parse::{format_parse_json, format_parse_text};

// Records
pub use records::{format_records_json, format_records_table};

// Saved filters
pub use saved::{format_saved_filter, format_saved_json, format_saved_table};
