use clap::{CommandFactory, Parser};
use std::io;
use std::process::ExitCode;

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands, ConfigCommands, SavedCommands};
use commands::filter::FilterOptions;
use commands::parse::ParseOptions;
use commands::saved::SavedAddOptions;
use commands::{CommandContext, CommandError};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                let error_json = serde_json::json!({
                    "error": {
                        "code": error_code(&e),
                        "message": e.to_string(),
                    }
                });
                eprintln!("{error_json:#}");
            } else {
                eprintln!("Error: {e}");
            }
            error_exit_code(&e)
        }
    }
}

/// Initialize tracing subscriber.
///
/// `RUST_LOG` wins over the verbosity flags.
fn init_tracing(cli: &Cli) {
    use tracing_subscriber::EnvFilter;

    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli) -> commands::Result<()> {
    let ctx = CommandContext::from_cli(cli);

    let Some(command) = &cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Config { command } => match command {
            Some(ConfigCommands::Path) => commands::config::execute_path(&ctx),
            Some(ConfigCommands::Show) | None => commands::config::execute_show(&ctx),
        },
        Commands::Completions { shell } => Ok(commands::completions::execute(shell)?),
        Commands::Parse { expr, strict } => commands::parse::execute(
            &ctx,
            &ParseOptions {
                expr: expr.clone(),
                strict: *strict,
            },
        ),
        Commands::Check { expr } => commands::check::execute(&ctx, expr),

        Commands::Filter {
            expr,
            saved,
            within,
            file,
            strict,
        } => commands::filter::execute(
            &ctx,
            &FilterOptions {
                expr: expr.clone(),
                saved: saved.clone(),
                within: within.clone(),
                file: file.clone(),
                strict: *strict,
            },
        ),
        Commands::Saved { command } => match command {
            Some(SavedCommands::List) | None => commands::saved::execute_list(&ctx),
            Some(SavedCommands::Show { name }) => commands::saved::execute_show(&ctx, name),
            Some(SavedCommands::Add { name, query, force }) => commands::saved::execute_add(
                &ctx,
                &SavedAddOptions {
                    name: name.clone(),
                    query: query.clone(),
                    force: *force,
                },
            ),
            Some(SavedCommands::Remove { name }) => commands::saved::execute_remove(&ctx, name),
        },
    }
}

/// Returns the error code string for JSON output.
fn error_code(e: &CommandError) -> &'static str {
    match e {
        CommandError::Filter(_) => "FILTER_ERROR",
        CommandError::NotFound(_) => "NOT_FOUND",
        CommandError::Config(_) => "CONFIG_ERROR",
        CommandError::Io(_) => "IO_ERROR",
        CommandError::Json(_) => "JSON_ERROR",
    }
}

/// Returns the exit code for an error.
fn error_exit_code(e: &CommandError) -> ExitCode {
    match e {
        CommandError::Filter(_) => ExitCode::from(1),
        CommandError::Json(_) => ExitCode::from(1),
        CommandError::Io(_) => ExitCode::from(3),
        CommandError::NotFound(_) => ExitCode::from(4),
        CommandError::Config(_) => ExitCode::from(5),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_filter::filter::FilterError;

    #[test]
    fn test_error_codes() {
        let filter = CommandError::Filter(FilterError::EmptyExpression);
        assert_eq!(error_code(&filter), "FILTER_ERROR");
        assert_eq!(error_exit_code(&filter), ExitCode::from(1));

        let missing = CommandError::NotFound("food".to_string());
        assert_eq!(error_code(&missing), "NOT_FOUND");
        assert_eq!(error_exit_code(&missing), ExitCode::from(4));

        let config = CommandError::Config("bad".to_string());
        assert_eq!(error_code(&config), "CONFIG_ERROR");
        assert_eq!(error_exit_code(&config), ExitCode::from(5));
    }
}
