//! CLI integration tests for the aiengine command-line interface.
//!
//! These tests verify:
//! - Help text is displayed correctly
//! - Argument parsing works as expected
//! - Invalid inputs are rejected with appropriate messages
//! - Context management round-trips through the config file
//!
//! Note: These tests do not talk to a server. Each test that touches config
//! points `AIENGINE_CONFIG_DIR` at its own temporary directory.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a command for the aiengine binary with a clean environment.
fn aiengine(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("aiengine").unwrap();
    cmd.env("AIENGINE_CONFIG_DIR", config_dir.path())
        .env_remove("AV_API_KEY")
        .env_remove("AIENGINE_SERVER_URL");
    cmd
}

// ─────────────────────────────────────────────────────────────────────────────
// Help and Version Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_help_lists_subcommands() {
    let dir = TempDir::new().unwrap();
    aiengine(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("groups"))
        .stdout(predicate::str::contains("functions"))
        .stdout(predicate::str::contains("credits"))
        .stdout(predicate::str::contains("models"))
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("execute"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_version_displays() {
    let dir = TempDir::new().unwrap();
    aiengine(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("aiengine"));
}

#[test]
fn test_global_flags_accepted() {
    let dir = TempDir::new().unwrap();
    aiengine(&dir)
        .args([
            "--verbose",
            "--json",
            "--server",
            "http://localhost:9999",
            "--api-key",
            "k",
            "--context",
            "prod",
            "--help",
        ])
        .assert()
        .success();
}

#[test]
fn test_chat_help() {
    let dir = TempDir::new().unwrap();
    aiengine(&dir)
        .args(["chat", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--group"))
        .stdout(predicate::str::contains("--poll-interval-ms"))
        .stdout(predicate::str::contains("--max-empty-polls"));
}

#[test]
fn test_groups_help() {
    let dir = TempDir::new().unwrap();
    aiengine(&dir)
        .args(["groups", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("share"))
        .stdout(predicate::str::contains("find"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Invalid Input Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_unknown_subcommand_fails() {
    let dir = TempDir::new().unwrap();
    aiengine(&dir)
        .arg("unknown-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_chat_requires_group() {
    let dir = TempDir::new().unwrap();
    aiengine(&dir)
        .args(["chat", "--objective", "find a flight"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--group"));
}

#[test]
fn test_execute_requires_function() {
    let dir = TempDir::new().unwrap();
    aiengine(&dir)
        .args(["execute", "--group", "g1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--function"));
}

#[test]
fn test_groups_list_flags_conflict() {
    let dir = TempDir::new().unwrap();
    aiengine(&dir)
        .args(["groups", "list", "--public", "--private"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_share_requires_target() {
    let dir = TempDir::new().unwrap();
    aiengine(&dir)
        .args(["groups", "share", "g1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--email"));
}

#[test]
fn test_functions_query_must_be_key_value() {
    let dir = TempDir::new().unwrap();
    aiengine(&dir)
        .args(["functions", "list", "--query", "novalue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("KEY=VALUE"));
}

#[test]
fn test_missing_api_key_is_reported() {
    let dir = TempDir::new().unwrap();
    aiengine(&dir)
        .args(["credits"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no API key found"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Config Subcommand Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_set_context_requires_server_for_new_context() {
    let dir = TempDir::new().unwrap();
    aiengine(&dir)
        .args(["config", "set-context", "prod"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--server is required"));
}

#[test]
fn test_context_lifecycle() {
    let dir = TempDir::new().unwrap();

    aiengine(&dir)
        .args([
            "config",
            "set-context",
            "prod",
            "--server",
            "https://agentverse.ai",
            "--key-env",
            "PROD_KEY",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("set as current context"));

    aiengine(&dir)
        .args([
            "config",
            "set-context",
            "local",
            "--server",
            "http://localhost:8000",
        ])
        .assert()
        .success();

    let written = std::fs::read_to_string(dir.path().join("client.yaml")).unwrap();
    assert!(written.contains("current-context: prod"));
    assert!(written.contains("key-env: PROD_KEY"));

    aiengine(&dir)
        .args(["config", "use-context", "local"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Switched to context \"local\""));

    aiengine(&dir)
        .args(["--json", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"context\": \"local\""))
        .stdout(predicate::str::contains("\"server\": \"http://localhost:8000\""));

    aiengine(&dir)
        .args(["config", "remove-context", "local"])
        .assert()
        .success()
        .stdout(predicate::str::contains("deleted"));

    aiengine(&dir)
        .args(["config", "use-context", "local"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_show_reports_key_source_without_leaking_key() {
    let dir = TempDir::new().unwrap();
    aiengine(&dir)
        .args(["--json", "--api-key", "super-secret", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"api_key_source\": \"flag\""))
        .stdout(predicate::str::contains("super-secret").not())
        .stdout(predicate::str::contains("https://agentverse.ai"));
}
