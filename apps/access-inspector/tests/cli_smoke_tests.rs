#![allow(clippy::unwrap_used, clippy::expect_used)]

//! CLI smoke tests for the access-inspector binary.

use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use httpmock::prelude::*;
use serde_json::{Value, json};
use tempfile::TempDir;

fn run_inspector(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_access-inspector"))
        .args(args)
        .env_remove("DDS_ACCESS_TOKEN")
        .env_remove("DDS_LOG")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute access-inspector")
}

/// Config pointing at `server` with plain HTTP and fast timings.
fn write_config(dir: &TempDir, server: &MockServer) -> PathBuf {
    let path = dir.path().join("inspector.yaml");
    std::fs::write(
        &path,
        format!(
            r"
access_control:
  base_url: {}
  settle_delay_ms: 0
  attempt_timeout_ms: 2000
  max_retries: 0
http:
  allow_insecure_http: true
",
            server.base_url()
        ),
    )
    .unwrap();
    path
}

fn mock_backend(permissions: &[&str], roles: &[&str]) -> MockServer {
    let server = MockServer::start();
    let permissions = permissions.to_vec();
    let roles = roles.to_vec();
    server.mock(|when, then| {
        when.method(GET)
            .path("/api/auth/user-permissions")
            .header("authorization", "Bearer tok-7");
        then.status(200).json_body(json!({ "permissions": permissions }));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/api/auth/user-roles")
            .header("authorization", "Bearer tok-7");
        then.status(200).json_body(json!({ "roles": roles }));
    });
    server
}

#[test]
fn help_lists_subcommands() {
    let output = run_inspector(&["--help"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("menu"));
    assert!(stdout.contains("check"));
    assert!(stdout.contains("print-config"));
    assert!(stdout.contains("--token"));
}

#[test]
fn missing_config_file_fails() {
    let output = run_inspector(&["--config", "/nonexistent/inspector.yaml", "print-config"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("config file does not exist"));
}

#[test]
fn print_config_shows_layered_values() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("inspector.yaml");
    std::fs::write(&path, "access_control:\n  base_url: https://dds.example.com\n").unwrap();

    let output = run_inspector(&[
        "--config",
        path.to_str().unwrap(),
        "--base-url",
        "https://cli.example.com",
        "print-config",
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("https://cli.example.com"));
    assert!(stdout.contains("/api/auth/user-permissions"));
}

#[test]
fn check_without_token_fails() {
    let output = run_inspector(&["check", "--permission", "invoice.view"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing access token"));
}

#[test]
fn check_granted_exits_zero() {
    let server = mock_backend(&["invoice.create"], &[]);
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server);

    let output = run_inspector(&[
        "--config",
        config.to_str().unwrap(),
        "--token",
        "tok-7",
        "check",
        "--permission",
        "invoice.create",
    ]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "granted");
}

#[test]
fn check_denied_exits_one() {
    let server = mock_backend(&["invoice.create"], &[]);
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server);

    let output = run_inspector(&[
        "--config",
        config.to_str().unwrap(),
        "--token",
        "tok-7",
        "check",
        "--role",
        "admin",
    ]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "denied");
}

#[test]
fn check_require_all_roles() {
    let server = mock_backend(&[], &["admin"]);
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server);
    let config = config.to_str().unwrap();

    let any = run_inspector(&[
        "--config", config, "--token", "tok-7", "check", "--role", "admin", "--role", "finance",
    ]);
    assert!(any.status.success());

    let all = run_inspector(&[
        "--config",
        config,
        "--token",
        "tok-7",
        "check",
        "--role",
        "admin",
        "--role",
        "finance",
        "--require-all",
    ]);
    assert_eq!(all.status.code(), Some(1));
}

#[test]
fn menu_prints_visible_navigation() {
    let server = mock_backend(&["invoice.view", "user.view"], &["admin"]);
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server);

    let output = run_inspector(&["--config", config.to_str().unwrap(), "--token", "tok-7", "menu"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let menu: Value = serde_json::from_slice(&output.stdout).unwrap();
    let labels: Vec<&str> = menu
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["label"].as_str().unwrap())
        .collect();
    assert!(labels.contains(&"Documents"));
    assert!(labels.contains(&"Administration"));
    assert!(!labels.contains(&"Distribution"));
}

#[test]
fn menu_fails_closed_when_backend_errors() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET);
        then.status(500).body("Server Error");
    });
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server);

    let output = run_inspector(&["--config", config.to_str().unwrap(), "--token", "tok-7", "menu"]);
    assert!(output.status.success());

    let menu: Value = serde_json::from_slice(&output.stdout).unwrap();
    let labels: Vec<&str> = menu
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["label"].as_str().unwrap())
        .collect();
    // only the unrestricted dashboard survives
    assert_eq!(labels, vec!["Main"]);
}

#[test]
fn plain_http_backend_is_refused_without_insecure() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("inspector.yaml");
    std::fs::write(&path, "access_control:\n  base_url: http://127.0.0.1:9\n").unwrap();

    let output = run_inspector(&[
        "--config",
        path.to_str().unwrap(),
        "--token",
        "tok-7",
        "check",
        "--role",
        "admin",
    ]);
    assert!(!output.status.success());
    assert_ne!(String::from_utf8_lossy(&output.stdout).trim(), "denied");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("plain http"), "stderr: {stderr}");
}

#[test]
fn check_admin_uses_configured_admin_roles() {
    let server = mock_backend(&["user.view"], &["owner"]);
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server);
    let mut yaml = std::fs::read_to_string(&config).unwrap();
    yaml = yaml.replace(
        "  max_retries: 0\n",
        "  max_retries: 0\n  admin_roles: [owner]\n",
    );
    std::fs::write(&config, yaml).unwrap();
    let config = config.to_str().unwrap();

    let check = run_inspector(&["--config", config, "--token", "tok-7", "check", "--admin"]);
    assert!(check.status.success(), "stderr: {}", String::from_utf8_lossy(&check.stderr));
    assert_eq!(String::from_utf8_lossy(&check.stdout).trim(), "granted");

    let menu = run_inspector(&["--config", config, "--token", "tok-7", "menu"]);
    let menu: Value = serde_json::from_slice(&menu.stdout).unwrap();
    assert!(
        menu.as_array()
            .unwrap()
            .iter()
            .any(|g| g["label"] == "Administration")
    );
}
