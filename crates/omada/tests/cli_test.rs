//! Integration tests for the `omada` CLI binary.
//!
//! These tests cover argument parsing, help output, shell completions,
//! and configuration errors, all without a live controller.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `omada` binary with config and data dirs
/// pointed at `home`, and every `OMADA_*` override cleared.
fn omada_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("omada");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env_remove("OMADA_PROFILE")
        .env_remove("OMADA_SITE")
        .env_remove("OMADA_OUTPUT")
        .env_remove("OMADA_INSECURE")
        .env_remove("OMADA_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

fn write_config(home: &Path, body: &str) {
    let dir = home.join("config").join("omada");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), body).unwrap();
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = tempfile::tempdir().unwrap();
    let output = omada_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_lists_commands() {
    let home = tempfile::tempdir().unwrap();
    omada_cmd(home.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("Omada")
            .and(predicate::str::contains("devices"))
            .and(predicate::str::contains("watch"))
            .and(predicate::str::contains("poe")),
    );
}

#[test]
fn test_version_flag() {
    let home = tempfile::tempdir().unwrap();
    omada_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("omada"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_zsh() {
    let home = tempfile::tempdir().unwrap();
    omada_cmd(home.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_bash() {
    let home = tempfile::tempdir().unwrap();
    omada_cmd(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Argument errors ─────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let home = tempfile::tempdir().unwrap();
    let output = omada_cmd(home.path()).arg("foobar").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("foobar"));
}

#[test]
fn test_port_poe_requires_state() {
    let home = tempfile::tempdir().unwrap();
    omada_cmd(home.path())
        .args(["port", "poe", "AA-BB-CC-DD-EE-02", "3"])
        .assert()
        .code(2);
}

#[test]
fn test_invalid_output_format() {
    let home = tempfile::tempdir().unwrap();
    omada_cmd(home.path())
        .args(["--output", "xml", "sites"])
        .assert()
        .code(2);
}

// ── Configuration errors ────────────────────────────────────────────

#[test]
fn test_missing_profile_exits_not_found() {
    let home = tempfile::tempdir().unwrap();
    omada_cmd(home.path())
        .arg("devices")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("not found in configuration"));
}

#[test]
fn test_profile_without_secret_exits_auth() {
    let home = tempfile::tempdir().unwrap();
    write_config(
        home.path(),
        r#"
default_profile = "cli-test-no-keyring"

[profiles.cli-test-no-keyring]
region = "eu"
omada_id = "omadac-1"
client_id = "client-id"
"#,
    );
    omada_cmd(home.path())
        .arg("sites")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("No client secret"));
}

#[test]
fn test_profile_without_url_is_usage_error() {
    let home = tempfile::tempdir().unwrap();
    write_config(
        home.path(),
        r#"
[profiles.default]
omada_id = "omadac-1"
client_id = "client-id"
client_secret = "secret"
"#,
    );
    omada_cmd(home.path())
        .arg("sites")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("api_url"));
}

// ── Local commands ──────────────────────────────────────────────────

#[test]
fn test_token_show_without_cache() {
    let home = tempfile::tempdir().unwrap();
    omada_cmd(home.path())
        .args(["token", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No cached token"));
}

#[test]
fn test_token_show_reads_cache() {
    let home = tempfile::tempdir().unwrap();
    let data = home.path().join("data").join("omada");
    std::fs::create_dir_all(&data).unwrap();
    std::fs::write(
        data.join("tokens.toml"),
        r#"
[profiles.default]
access_token = "at"
refresh_token = "rt"
expires_at = "2030-01-01T00:00:00Z"
"#,
    )
    .unwrap();

    omada_cmd(home.path())
        .args(["--output", "json-compact", "token", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains(r#""cached":true"#)
                .and(predicate::str::contains("2030-01-01T00:00:00")),
        );
}

#[test]
fn test_config_profiles_marks_active() {
    let home = tempfile::tempdir().unwrap();
    write_config(
        home.path(),
        r#"
default_profile = "home"

[profiles.home]
region = "us"
omada_id = "a"
client_id = "b"

[profiles.lab]
api_url = "https://10.0.0.2:8043"
omada_id = "c"
client_id = "d"
"#,
    );
    omada_cmd(home.path())
        .args(["config", "profiles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("home (active)").and(predicate::str::contains("lab")));
}
