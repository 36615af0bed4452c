//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the lq CLI.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// lq - Query ledger transactions with filter expressions
#[derive(Parser, Debug)]
#[command(name = "lq")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (show debug information)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse an expression and print its canonical form
    #[command(alias = "p")]
    Parse {
        /// Filter expression (e.g., "cat:Food AND amt:<0")
        expr: String,

        /// Reject ambiguous or malformed input instead of recovering
        #[arg(long)]
        strict: bool,
    },

    /// Check that an expression is valid for saving
    #[command(alias = "c")]
    Check {
        /// Filter expression
        expr: String,
    },

    /// Print the records that match a filter
    #[command(alias = "f")]
    Filter {
        /// Filter expression (default: match everything)
        #[arg(conflicts_with = "saved")]
        expr: Option<String>,

        /// Use a saved filter instead of an expression
        #[arg(short, long)]
        saved: Option<String>,

        /// Narrow the filter to this scope (e.g., "date:2025-03")
        #[arg(short, long)]
        within: Option<String>,

        /// JSON file with an array of records (default: stdin)
        #[arg(long)]
        file: Option<PathBuf>,

        /// Parse the expression strictly
        #[arg(long)]
        strict: bool,
    },

    /// List and manage saved filters
    #[command(alias = "s")]
    Saved {
        #[command(subcommand)]
        command: Option<SavedCommands>,
    },

    /// View configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Shell types for completions
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

/// Saved filter subcommands
#[derive(Subcommand, Debug)]
pub enum SavedCommands {
    /// List saved filters (default)
    List,

    /// Show a saved filter
    Show {
        /// Saved filter name
        name: String,
    },

    /// Save a filter under a name
    Add {
        /// Saved filter name
        name: String,

        /// Filter expression
        query: String,

        /// Replace an existing filter with the same name
        #[arg(short, long)]
        force: bool,
    },

    /// Remove a saved filter
    #[command(alias = "rm")]
    Remove {
        /// Saved filter name
        name: String,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration (default)
    Show,

    /// Print config file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_debug_assert() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["lq", "--verbose", "check", "x"]);
        assert!(cli.verbose);
        assert!(!cli.quiet);
        assert!(!cli.json);

        let cli = Cli::parse_from(["lq", "check", "x", "--quiet", "--json", "--no-color"]);
        assert!(cli.quiet);
        assert!(cli.json);
        assert!(cli.no_color);
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        let result = Cli::try_parse_from(["lq", "-v", "-q", "check", "x"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_command() {
        let cli = Cli::parse_from(["lq", "parse", "cat:Food OR tag:x", "--strict"]);
        if let Some(Commands::Parse { expr, strict }) = cli.command {
            assert_eq!(expr, "cat:Food OR tag:x");
            assert!(strict);
        } else {
            panic!("Expected Parse command");
        }
    }

    #[test]
    fn test_filter_with_options() {
        let cli = Cli::parse_from([
            "lq",
            "filter",
            "type:debit",
            "--within",
            "date:2025-03",
            "--file",
            "ledger.json",
        ]);
        if let Some(Commands::Filter {
            expr,
            saved,
            within,
            file,
            strict,
        }) = cli.command
        {
            assert_eq!(expr, Some("type:debit".to_string()));
            assert_eq!(saved, None);
            assert_eq!(within, Some("date:2025-03".to_string()));
            assert_eq!(file, Some(PathBuf::from("ledger.json")));
            assert!(!strict);
        } else {
            panic!("Expected Filter command");
        }
    }

    #[test]
    fn test_filter_expr_conflicts_with_saved() {
        let result = Cli::try_parse_from(["lq", "filter", "cat:Food", "--saved", "food"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_saved_add() {
        let cli = Cli::parse_from(["lq", "saved", "add", "food", "cat:Food", "--force"]);
        if let Some(Commands::Saved {
            command: Some(SavedCommands::Add { name, query, force }),
        }) = cli.command
        {
            assert_eq!(name, "food");
            assert_eq!(query, "cat:Food");
            assert!(force);
        } else {
            panic!("Expected Saved Add command");
        }
    }

    #[test]
    fn test_saved_remove_alias() {
        let cli = Cli::parse_from(["lq", "saved", "rm", "food"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Saved {
                command: Some(SavedCommands::Remove { .. })
            })
        ));
    }

    #[test]
    fn test_aliases() {
        let cli = Cli::parse_from(["lq", "p", "x"]);
        assert!(matches!(cli.command, Some(Commands::Parse { .. })));

        let cli = Cli::parse_from(["lq", "c", "x"]);
        assert!(matches!(cli.command, Some(Commands::Check { .. })));

        let cli = Cli::parse_from(["lq", "f"]);
        assert!(matches!(cli.command, Some(Commands::Filter { .. })));
    }

    #[test]
    fn test_completions_command() {
        let cli = Cli::parse_from(["lq", "completions", "zsh"]);
        if let Some(Commands::Completions { shell }) = cli.command {
            assert!(matches!(shell, Shell::Zsh));
        } else {
            panic!("Expected Completions command");
        }
    }
}
