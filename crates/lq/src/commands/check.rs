//! Check command implementation.
//!
//! Validates an expression with the strict grammar, the same check applied
//! before a filter is saved.

use ledger_filter::filter::{FilterError, FilterParser};

use super::{CommandContext, Result};

/// Executes the check command.
///
/// Prints the canonical form when the expression is valid. When AND and OR
/// are mixed without parentheses, the lenient reading is offered as a
/// grouped alternative before the error is returned.
///
/// # Errors
///
/// Returns a filter error if the expression is rejected.
pub fn execute(ctx: &CommandContext, expr: &str) -> Result<()> {
    match FilterParser::parse_strict(expr) {
        Ok(filter) => {
            if ctx.json_output {
                let output = serde_json::json!({
                    "valid": true,
                    "canonical": filter.to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else if !ctx.quiet {
                println!("{filter}");
            }
            Ok(())
        }
        Err(err) => {
            if let Some(suggestion) = grouping_suggestion(expr, &err) {
                ctx.warn(format_args!("did you mean: {suggestion}"));
            }
            Err(err.into())
        }
    }
}

/// For a grouping error, the lenient reading of `expr` printed with explicit
/// parentheses.
pub fn grouping_suggestion(expr: &str, err: &FilterError) -> Option<String> {
    match err {
        FilterError::GroupingRequired { .. } => {
            let parsed = FilterParser::parse(expr);
            parsed.is_clean().then(|| parsed.filter.to_string())
        }
        _ => None,
    }
}
