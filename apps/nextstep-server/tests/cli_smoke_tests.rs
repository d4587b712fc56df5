//! CLI smoke tests for the nextstep-server binary.
//!
//! These spawn the real binary and verify configuration validation, help
//! output and the `check` command against an in-memory database.

use std::process::{Command, Stdio};
use tempfile::TempDir;

fn run_server_binary(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_nextstep-server"))
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute nextstep-server")
}

fn write_config(dir: &TempDir, body: &str) -> String {
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, body).expect("Failed to write config");
    path.to_string_lossy().to_string()
}

#[test]
fn help_lists_commands_and_options() {
    let output = run_server_binary(&["--help"]);
    assert!(output.status.success(), "Help command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("nextstep-server"), "Should contain binary name");
    assert!(
        stdout.contains("Usage:") || stdout.contains("USAGE:"),
        "Should contain usage information"
    );
    assert!(stdout.contains("run"), "Should contain 'run' subcommand");
    assert!(stdout.contains("check"), "Should contain 'check' subcommand");
    assert!(stdout.contains("--config"), "Should mention config option");
}

#[test]
fn version_prints_binary_name_and_number() {
    let output = run_server_binary(&["--version"]);
    assert!(output.status.success(), "Version command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("nextstep-server"), "Should contain binary name");
    assert!(
        stdout.chars().any(|c| c.is_ascii_digit()),
        "Should contain version numbers"
    );
}

#[test]
fn unknown_subcommand_fails() {
    let output = run_server_binary(&["invalid-command"]);
    assert!(!output.status.success(), "Invalid command should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("error") || stderr.contains("invalid") || stderr.contains("unexpected"),
        "Should report the invalid command: {}",
        stderr
    );
}

#[test]
fn missing_config_file_fails() {
    let output = run_server_binary(&["--config", "/nonexistent/config.yaml", "check"]);
    assert!(!output.status.success(), "Should fail with missing config");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("not found") || stderr.contains("config"),
        "Should mention the missing config file: {}",
        stderr
    );
}

#[test]
fn invalid_yaml_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(&temp_dir, "invalid: yaml: content: [unclosed");

    let output = run_server_binary(&["--config", &config_path, "check"]);
    assert!(!output.status.success(), "Should fail with invalid YAML");
}

#[test]
fn unknown_config_section_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(
        &temp_dir,
        "serverr:\n  port: 8090\n",
    );

    let output = run_server_binary(&["--config", &config_path, "check"]);
    assert!(!output.status.success(), "Should reject unknown sections");
}

#[test]
fn check_passes_with_in_memory_database() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(
        &temp_dir,
        &format!(
            "server:\n  home_dir: \"{}\"\ndatabase:\n  url: \"sqlite::memory:\"\n",
            temp_dir.path().display()
        ),
    );

    let output = run_server_binary(&["--config", &config_path, "check"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "Check should pass: {}", stderr);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Configuration check passed"));
    assert!(stdout.contains("Pending migrations"));
}

#[test]
fn print_config_emits_yaml_and_exits() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(
        &temp_dir,
        &format!(
            "server:\n  home_dir: \"{}\"\n  port: 9181\n",
            temp_dir.path().display()
        ),
    );

    let output = run_server_binary(&["--config", &config_path, "--print-config"]);
    assert!(output.status.success(), "print-config should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("port: 9181"));
    assert!(stdout.contains("server:"));
}

#[test]
fn cli_port_overrides_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(
        &temp_dir,
        &format!(
            "server:\n  home_dir: \"{}\"\n  port: 9181\n",
            temp_dir.path().display()
        ),
    );

    let output = run_server_binary(&[
        "--config",
        &config_path,
        "--port",
        "9282",
        "--print-config",
    ]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("port: 9282"), "CLI port should win: {}", stdout);
}
