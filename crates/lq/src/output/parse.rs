//! Parsed expression output formatting.

use ledger_filter::filter::has_field_predicate;
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::commands::parse::ParseResult;

/// JSON output structure for the parse command.
#[derive(Serialize)]
pub struct ParseOutput<'a> {
    pub input: &'a str,
    pub canonical: String,
    pub mode: &'static str,
    /// True when the expression has no field predicate and is a plain search.
    pub search: bool,
    pub diagnostics: Vec<String>,
}

/// Formats a parse result as JSON.
pub fn format_parse_json(result: &ParseResult) -> Result<String, serde_json::Error> {
    let output = ParseOutput {
        input: &result.input,
        canonical: result.filter.to_string(),
        mode: if result.strict { "strict" } else { "lenient" },
        search: !has_field_predicate(&result.filter),
        diagnostics: result.diagnostics.iter().map(ToString::to_string).collect(),
    };

    serde_json::to_string_pretty(&output)
}

/// Formats a parse result as text: the canonical form, plus the parse tree
/// when `verbose` is set.
pub fn format_parse_text(result: &ParseResult, verbose: bool, use_colors: bool) -> String {
    let mut output = format!("{}\n", result.filter);

    if verbose {
        let kind = if has_field_predicate(&result.filter) {
            "structured query"
        } else {
            "free-text search"
        };
        let detail = format!("{kind}\n{:#?}", result.filter);
        if use_colors {
            output.push_str(&format!("{}\n", detail.dimmed()));
        } else {
            output.push_str(&detail);
            output.push('\n');
        }
    }

    output
}
