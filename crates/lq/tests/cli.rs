//! End-to-end tests for the `lq` binary.
//!
//! Each test runs the real binary against a throwaway config file so saved
//! filters never touch the user's configuration.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use serde_json::Value;
use tempfile::TempDir;

const LEDGER: &str = r#"[
    {"description": "Coffee Shop", "category": "Food", "account": "ANZ Savings",
     "amount": -120.50, "date": "2025-03-15", "tags": ["groceries"]},
    {"description": "Salary", "category": "Income", "account": "ANZ Savings",
     "amount": 3000.0, "date": "2025-03-28"},
    {"description": "Bus fare", "category": "Transport", "account": "Everyday",
     "amount": -4.20, "date": "2025-02-03", "tags": ["commute"]}
]"#;

struct CliContext {
    sandbox: TempDir,
    config_path: PathBuf,
    ledger_path: PathBuf,
}

impl CliContext {
    fn new() -> Self {
        let sandbox = TempDir::new().expect("failed to create temporary sandbox");
        let config_path = sandbox.path().join("lq-config.toml");
        let ledger_path = sandbox.path().join("ledger.json");
        fs::write(&ledger_path, LEDGER).expect("failed to write ledger");

        Self {
            sandbox,
            config_path,
            ledger_path,
        }
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_lq"));
        cmd.args(args);
        cmd.env("LQ_CONFIG", &self.config_path);
        cmd.env("XDG_CONFIG_HOME", self.sandbox.path());
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("RUST_LOG");
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.command(args).output().expect("failed to run lq")
    }

    fn run_with_stdin(&self, args: &[&str], input: &str) -> Output {
        let mut child = self
            .command(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("failed to spawn lq");
        child
            .stdin
            .take()
            .expect("stdin is piped")
            .write_all(input.as_bytes())
            .expect("failed to write stdin");
        child.wait_with_output().expect("failed to wait for lq")
    }

    fn run_with_terminal_colors(&self, args: &[&str]) -> Output {
        let mut cmd = self.command(args);
        cmd.env_remove("NO_COLOR");
        cmd.output().expect("failed to run lq")
    }

    fn ledger(&self) -> &str {
        self.ledger_path.to_str().expect("sandbox path is UTF-8")
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

fn matched_descriptions(value: &Value) -> Vec<String> {
    value["records"]
        .as_array()
        .expect("records array")
        .iter()
        .map(|record| record["description"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[test]
fn test_parse_prints_canonical_form() {
    let ctx = CliContext::new();

    let output = ctx.run(&["parse", "category:Food  or  tag:groceries"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "cat:Food OR tag:groceries\n");
}

#[test]
fn test_parse_lenient_reports_diagnostics() {
    let ctx = CliContext::new();

    let output = ctx.run(&["--json", "parse", "coffee catgory:x"]);
    assert!(output.status.success());
    let value = json(&output);
    assert_eq!(value["mode"], "lenient");
    assert_eq!(value["search"], true);
    assert_eq!(
        value["diagnostics"][0],
        "unknown field: catgory (did you mean 'category'?)"
    );
}

#[test]
fn test_check_rejects_ambiguous_grouping() {
    let ctx = CliContext::new();

    let output = ctx.run(&["check", "cat:Food OR cat:Transport AND amt:>50"]);
    assert_eq!(output.status.code(), Some(1));

    let err = stderr(&output);
    assert!(err.contains("warning: did you mean: cat:Food OR (cat:Transport AND amt:>50)"));
    assert!(err.contains("Error: ambiguous mix of AND and OR"));
}

#[test]
fn test_check_json_error() {
    let ctx = CliContext::new();

    let output = ctx.run(&["--json", "check", "amt:100..10"]);
    assert_eq!(output.status.code(), Some(1));

    let value: Value = serde_json::from_slice(&output.stderr).expect("stderr is JSON");
    assert_eq!(value["error"]["code"], "FILTER_ERROR");
}

#[test]
fn test_filter_file_json() {
    let ctx = CliContext::new();

    let output = ctx.run(&["--json", "filter", "type:debit", "--file", ctx.ledger()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let value = json(&output);
    assert_eq!(value["filter"], "type:debit");
    assert_eq!(value["search"], false);
    assert_eq!(value["total"], 3);
    assert_eq!(value["matched"], 2);
    assert_eq!(matched_descriptions(&value), ["Coffee Shop", "Bus fare"]);
}

#[test]
fn test_filter_reads_stdin() {
    let ctx = CliContext::new();

    let output = ctx.run_with_stdin(&["filter", "coffee"], LEDGER);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let text = stdout(&output);
    assert!(text.contains("Coffee Shop"));
    assert!(!text.contains("Salary"));
    assert!(text.ends_with("1 of 3 records match (free-text search)\n"));
}

#[test]
fn test_filter_without_expression_matches_everything() {
    let ctx = CliContext::new();

    let output = ctx.run(&["--json", "filter", "--file", ctx.ledger()]);
    assert!(output.status.success());
    assert_eq!(json(&output)["matched"], 3);
}

#[test]
fn test_filter_within_scope() {
    let ctx = CliContext::new();

    let output = ctx.run(&[
        "--json",
        "filter",
        "acc:anz",
        "--within",
        "date:2025-03 amt:<0",
        "--file",
        ctx.ledger(),
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let value = json(&output);
    assert_eq!(value["filter"], "acc:anz AND (date:2025-03 AND amt:<0)");
    assert_eq!(matched_descriptions(&value), ["Coffee Shop"]);
}

#[test]
fn test_filter_invalid_within_fails() {
    let ctx = CliContext::new();

    let output = ctx.run(&["filter", "acc:anz", "-w", "a OR b AND c", "--file", ctx.ledger()]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_saved_filter_workflow() {
    let ctx = CliContext::new();

    let output = ctx.run(&["saved", "add", "food", "category:food or tag:groceries"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "Saved food: cat:food OR tag:groceries\n");

    let stored = fs::read_to_string(&ctx.config_path).expect("config written");
    assert!(stored.contains("food = \"cat:food OR tag:groceries\""));

    let output = ctx.run(&["saved", "show", "food"]);
    assert_eq!(stdout(&output), "cat:food OR tag:groceries\n");

    let output = ctx.run(&["--json", "saved"]);
    let value = json(&output);
    assert_eq!(value["saved"][0]["name"], "food");
    assert_eq!(value["saved"][0]["search"], false);

    let output = ctx.run(&["--json", "filter", "-s", "food", "--file", ctx.ledger()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(matched_descriptions(&json(&output)), ["Coffee Shop"]);

    let output = ctx.run(&["saved", "add", "food", "cat:Income"]);
    assert_eq!(output.status.code(), Some(5));

    let output = ctx.run(&["saved", "add", "food", "cat:Income", "--force"]);
    assert!(output.status.success());

    let output = ctx.run(&["saved", "rm", "food"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "Removed food\n");

    let output = ctx.run(&["saved", "show", "food"]);
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("saved filter not found: food"));
}

#[test]
fn test_saved_add_rejects_ambiguous_query() {
    let ctx = CliContext::new();

    let output = ctx.run(&["saved", "add", "mixed", "a OR b AND c"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(!ctx.config_path.exists());
}

#[test]
fn test_broken_saved_filter_is_a_config_error() {
    let ctx = CliContext::new();
    fs::write(&ctx.config_path, "version = 1\n\n[saved]\nbad = \"a OR b AND c\"\n")
        .expect("failed to write config");

    let output = ctx.run(&["saved", "list"]);
    assert_eq!(output.status.code(), Some(5));
}

#[test]
fn test_config_color_off_applies_to_saved_commands() {
    let ctx = CliContext::new();
    fs::write(
        &ctx.config_path,
        "version = 1\n\n[output]\ncolor = false\n\n[saved]\nfood = \"cat:Food\"\n",
    )
    .expect("failed to write config");

    for args in [&["saved", "list"][..], &["saved", "show", "food"][..]] {
        let output = ctx.run_with_terminal_colors(args);
        assert!(output.status.success(), "stderr: {}", stderr(&output));
        let text = stdout(&output);
        assert!(text.contains("cat:Food"), "{args:?}: {text}");
        assert!(!text.contains('\x1b'), "{args:?} printed colors: {text:?}");
    }
}

#[test]
fn test_config_path() {
    let ctx = CliContext::new();

    let output = ctx.run(&["config", "path"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), ctx.config_path.display().to_string());
}

#[test]
fn test_completions() {
    let ctx = CliContext::new();

    let output = ctx.run(&["completions", "bash"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("lq"));
}
