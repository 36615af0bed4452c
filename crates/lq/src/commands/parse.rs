//! Parse command implementation.
//!
//! Parses an expression and prints its canonical form, along with anything
//! the lenient parser had to recover from.

use ledger_filter::filter::{Filter, FilterError, FilterParser};

use super::{CommandContext, Result};
use crate::output::{format_parse_json, format_parse_text};

/// Options for the parse command.
#[derive(Debug)]
pub struct ParseOptions {
    /// The expression to parse.
    pub expr: String,
    /// Parse strictly instead of leniently.
    pub strict: bool,
}

/// Result of parsing an expression.
#[derive(Debug)]
pub struct ParseResult {
    /// The expression as given.
    pub input: String,
    /// The parsed filter.
    pub filter: Filter,
    /// Whether the strict grammar was used.
    pub strict: bool,
    /// Problems the lenient parser recovered from.
    pub diagnostics: Vec<FilterError>,
}

/// Parses `expr` in the requested mode.
///
/// # Errors
///
/// Returns a filter error if `strict` is set and the expression is rejected.
pub fn parse_expression(expr: &str, strict: bool) -> Result<ParseResult> {
    let (filter, diagnostics) = if strict {
        (FilterParser::parse_strict(expr)?, Vec::new())
    } else {
        let parsed = FilterParser::parse(expr);
        (parsed.filter, parsed.diagnostics)
    };

    Ok(ParseResult {
        input: expr.to_string(),
        filter,
        strict,
        diagnostics,
    })
}

/// Executes the parse command.
///
/// # Errors
///
/// Returns an error if strict parsing fails or JSON output fails.
pub fn execute(ctx: &CommandContext, opts: &ParseOptions) -> Result<()> {
    let result = parse_expression(&opts.expr, opts.strict)?;

    if ctx.json_output {
        println!("{}", format_parse_json(&result)?);
        return Ok(());
    }

    for diagnostic in &result.diagnostics {
        ctx.warn(diagnostic);
    }
    if !ctx.quiet {
        print!("{}", format_parse_text(&result, ctx.verbose, ctx.use_colors));
    }

    Ok(())
}
