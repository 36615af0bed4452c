//! Saved filter output formatting.

use ledger_filter::filter::{has_field_predicate, Filter};
use owo_colors::OwoColorize;
use serde::Serialize;

use super::helpers::truncate_str;

/// JSON output structure for the saved list command.
#[derive(Serialize)]
pub struct SavedListOutput<'a> {
    pub saved: Vec<SavedFilterOutput<'a>>,
}

/// JSON output structure for a single saved filter.
#[derive(Serialize)]
pub struct SavedFilterOutput<'a> {
    pub name: &'a str,
    pub query: &'a Filter,
    pub search: bool,
}

impl<'a> SavedFilterOutput<'a> {
    fn new(name: &'a str, query: &'a Filter) -> Self {
        Self {
            name,
            query,
            search: !has_field_predicate(query),
        }
    }
}

/// Formats saved filters as JSON.
pub fn format_saved_json(entries: &[(&str, &Filter)]) -> Result<String, serde_json::Error> {
    let output = SavedListOutput {
        saved: entries
            .iter()
            .map(|(name, query)| SavedFilterOutput::new(name, query))
            .collect(),
    };

    serde_json::to_string_pretty(&output)
}

/// Formats one saved filter as JSON.
pub fn format_saved_filter(name: &str, query: &Filter) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&SavedFilterOutput::new(name, query))
}

/// Formats saved filters as a table.
pub fn format_saved_table(entries: &[(&str, &Filter)], use_colors: bool) -> String {
    if entries.is_empty() {
        return "No saved filters.\n".to_string();
    }

    let mut output = String::new();

    let header = format!("{:<20} {}", "Name", "Query");
    if use_colors {
        output.push_str(&format!("{}\n", header.dimmed()));
    } else {
        output.push_str(&header);
        output.push('\n');
    }

    for (name, query) in entries {
        let line = format!("{:<20} {}", truncate_str(name, 20), query);
        output.push_str(&line);
        output.push('\n');
    }

    output
}
