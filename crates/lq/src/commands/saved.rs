//! Saved filters command implementation.
//!
//! Saved filters live in the `[saved]` table of the config file. They are
//! always validated with the strict grammar and stored in canonical form.

use ledger_filter::filter::{Filter, FilterParser};

use super::config::{load_config, save_config, Config};
use super::{CommandContext, CommandError, Result};
use crate::output::{format_saved_filter, format_saved_json, format_saved_table};

/// Executes the saved list command.
pub fn execute_list(ctx: &CommandContext) -> Result<()> {
    let config = load_config()?;
    let ctx = &ctx.with_config(&config);
    let entries: Vec<(&str, &Filter)> = config
        .saved
        .iter()
        .map(|(name, filter)| (name.as_str(), filter))
        .collect();

    if ctx.json_output {
        println!("{}", format_saved_json(&entries)?);
    } else if !ctx.quiet {
        print!("{}", format_saved_table(&entries, ctx.use_colors));
    }

    Ok(())
}

/// Executes the saved show command.
///
/// # Errors
///
/// Returns `CommandError::NotFound` if no filter has that name.
pub fn execute_show(ctx: &CommandContext, name: &str) -> Result<()> {
    let config = load_config()?;
    let ctx = &ctx.with_config(&config);
    let filter = config
        .saved
        .get(name)
        .ok_or_else(|| CommandError::NotFound(name.to_string()))?;

    if ctx.json_output {
        println!("{}", format_saved_filter(name, filter)?);
    } else if !ctx.quiet {
        println!("{filter}");
    }

    Ok(())
}

/// Options for the saved add command.
#[derive(Debug)]
pub struct SavedAddOptions {
    /// Name to save under.
    pub name: String,
    /// Filter expression.
    pub query: String,
    /// Replace an existing filter.
    pub force: bool,
}

/// Adds a filter to `config`, returning it in canonical form.
///
/// # Errors
///
/// Returns a filter error if the query is rejected by the strict parser, or a
/// config error if the name is taken and `force` is not set.
pub fn add_saved(config: &mut Config, opts: &SavedAddOptions) -> Result<Filter> {
    let name = opts.name.trim();
    if name.is_empty() {
        return Err(CommandError::Config(
            "Saved filter name cannot be empty".to_string(),
        ));
    }
    if config.saved.contains_key(name) && !opts.force {
        return Err(CommandError::Config(format!(
            "Saved filter '{name}' already exists (use --force to replace it)"
        )));
    }

    let filter = FilterParser::parse_strict(&opts.query)?;
    config.saved.insert(name.to_string(), filter.clone());
    Ok(filter)
}

/// Executes the saved add command.
pub fn execute_add(ctx: &CommandContext, opts: &SavedAddOptions) -> Result<()> {
    let mut config = load_config()?;
    let filter = add_saved(&mut config, opts)?;
    save_config(&config)?;

    if ctx.json_output {
        println!("{}", format_saved_filter(opts.name.trim(), &filter)?);
    } else if !ctx.quiet {
        println!("Saved {}: {}", opts.name.trim(), filter);
    }

    Ok(())
}

/// Executes the saved remove command.
///
/// # Errors
///
/// Returns `CommandError::NotFound` if no filter has that name.
pub fn execute_remove(ctx: &CommandContext, name: &str) -> Result<()> {
    let mut config = load_config()?;
    let removed = config
        .saved
        .remove(name)
        .ok_or_else(|| CommandError::NotFound(name.to_string()))?;
    save_config(&config)?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "removed",
            "name": name,
            "query": removed,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("Removed {name}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_filter::filter::FilterError;

    fn add_opts(name: &str, query: &str, force: bool) -> SavedAddOptions {
        SavedAddOptions {
            name: name.to_string(),
            query: query.to_string(),
            force,
        }
    }

    #[test]
    fn test_add_saved_stores_canonical() {
        let mut config = Config::default();
        let filter = add_saved(&mut config, &add_opts("food", "Category:Food or TAG:groceries", false)).unwrap();
        assert_eq!(filter.to_string(), "cat:Food OR tag:groceries");
        assert_eq!(config.saved["food"], filter);
    }

    #[test]
    fn test_add_saved_rejects_ambiguous() {
        let mut config = Config::default();
        let err = add_saved(&mut config, &add_opts("x", "a OR b AND c", false)).unwrap_err();
        assert!(matches!(
            err,
            CommandError::Filter(FilterError::GroupingRequired { .. })
        ));
        assert!(config.saved.is_empty());
    }

    #[test]
    fn test_add_saved_requires_force_to_replace() {
        let mut config = Config::default();
        add_saved(&mut config, &add_opts("x", "a", false)).unwrap();

        let err = add_saved(&mut config, &add_opts("x", "b", false)).unwrap_err();
        assert!(matches!(err, CommandError::Config(_)));
        assert_eq!(config.saved["x"].to_string(), "a");

        add_saved(&mut config, &add_opts("x", "b", true)).unwrap();
        assert_eq!(config.saved["x"].to_string(), "b");
    }

    #[test]
    fn test_add_saved_rejects_empty_name() {
        let mut config = Config::default();
        let err = add_saved(&mut config, &add_opts("  ", "a", false)).unwrap_err();
        assert!(matches!(err, CommandError::Config(_)));
    }
}
