//! Filter command implementation.
//!
//! Reads records as JSON, evaluates a filter against each one and prints the
//! matches.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use ledger_filter::filter::{and_node, has_field_predicate, Filter, FilterEvaluator, FilterParser};
use ledger_filter::TaggedTransaction;

use super::config::{load_config, Config};
use super::{CommandContext, CommandError, Result};
use crate::output::{format_records_json, format_records_table};

/// Default width of the description column.
const DEFAULT_DESCRIPTION_WIDTH: usize = 40;

/// Options for the filter command.
#[derive(Debug, Default)]
pub struct FilterOptions {
    /// Filter expression.
    pub expr: Option<String>,
    /// Name of a saved filter to use instead of `expr`.
    pub saved: Option<String>,
    /// Extra scope ANDed onto the filter.
    pub within: Option<String>,
    /// Records file. Reads stdin when absent.
    pub file: Option<PathBuf>,
    /// Parse `expr` strictly.
    pub strict: bool,
}

/// Executes the filter command.
///
/// # Errors
///
/// Returns an error if the expression or scope is rejected, the saved filter
/// does not exist, or the records cannot be read.
pub fn execute(ctx: &CommandContext, opts: &FilterOptions) -> Result<()> {
    let config = load_config()?;
    let ctx = &ctx.with_config(&config);
    let filter = resolve_filter(ctx, opts, &config)?;

    let records = read_records(opts.file.as_deref())?;
    let matched = FilterEvaluator::new(&filter).filter_records(&records);
    let search = !has_field_predicate(&filter);

    tracing::debug!(
        filter = %filter,
        total = records.len(),
        matched = matched.len(),
        search,
        "evaluated filter"
    );

    if ctx.json_output {
        let output = format_records_json(&filter, search, &matched, records.len())?;
        println!("{output}");
    } else if !ctx.quiet {
        let width = config
            .output
            .description_width
            .unwrap_or(DEFAULT_DESCRIPTION_WIDTH);
        let output = format_records_table(&matched, records.len(), search, width, ctx.use_colors);
        print!("{output}");
    }

    Ok(())
}

/// Builds the filter to evaluate from an expression or saved name, then
/// applies the `--within` scope.
fn resolve_filter(ctx: &CommandContext, opts: &FilterOptions, config: &Config) -> Result<Filter> {
    let base = match (&opts.saved, &opts.expr) {
        (Some(name), _) => config
            .saved
            .get(name)
            .cloned()
            .ok_or_else(|| CommandError::NotFound(name.clone()))?,
        (None, Some(expr)) if opts.strict => FilterParser::parse_strict(expr)?,
        (None, Some(expr)) => {
            let parsed = FilterParser::parse(expr);
            for diagnostic in &parsed.diagnostics {
                ctx.warn(diagnostic);
            }
            parsed.filter
        }
        (None, None) => Filter::free_text(""),
    };

    match &opts.within {
        Some(scope) => {
            let scope = FilterParser::parse_strict(scope)?;
            Ok(and_node(&base, &scope))
        }
        None => Ok(base),
    }
}

/// Reads a JSON array of records from `path`, or from stdin.
fn read_records(path: Option<&Path>) -> Result<Vec<TaggedTransaction>> {
    let content = match path {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    Ok(serde_json::from_str(&content)?)
}
