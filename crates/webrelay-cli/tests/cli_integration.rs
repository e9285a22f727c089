//! CLI integration tests for the `webrelay` binary.
//!
//! These tests run the actual compiled binary via `std::process::Command`.
//! Each test spawns a fresh process with `WEBRELAY_CONFIG` pointing at a
//! nonexistent path so the config loader falls back to defaults.

use std::io::Write;
use std::process::{Command, Stdio};

const HELLO_SIG: &str = "84b6f3dc189ab46f2f1874554ed5f675751155077e680db18abce413b8381aa3";

/// Build a `Command` pointing at the compiled `webrelay` binary.
///
/// Prevents tests from loading a real user config from
/// `~/.webrelay/config.json` or picking up a secret from the environment.
fn webrelay_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_webrelay"));
    cmd.env("WEBRELAY_CONFIG", "/tmp/.webrelay-test-nonexistent-config.json");
    cmd.env_remove("WEBRELAY_CLIENT_SECRET");
    // Suppress tracing output so test assertions only match program output.
    cmd.env("RUST_LOG", "off");
    cmd
}

// ── 1. Version and help ─────────────────────────────────────────────────

#[test]
fn version_output() {
    let output = webrelay_bin()
        .arg("--version")
        .output()
        .expect("failed to run webrelay");

    assert!(output.status.success(), "exit code should be 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("webrelay") && stdout.contains(env!("CARGO_PKG_VERSION")),
        "version output should contain name and version, got: {stdout}"
    );
}

#[test]
fn help_lists_subcommands() {
    let output = webrelay_bin()
        .arg("--help")
        .output()
        .expect("failed to run webrelay");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for sub in ["serve", "sign", "config"] {
        assert!(stdout.contains(sub), "help should list '{sub}', got: {stdout}");
    }
}

#[test]
fn unknown_subcommand_fails() {
    let output = webrelay_bin()
        .arg("this-subcommand-does-not-exist")
        .output()
        .expect("failed to run webrelay");

    assert!(!output.status.success());
}

// ── 2. sign ─────────────────────────────────────────────────────────────

#[test]
fn sign_file_with_explicit_secret() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("body.txt");
    std::fs::write(&path, b"hello").unwrap();

    let output = webrelay_bin()
        .args(["sign", "--secret", "f9876"])
        .arg(&path)
        .output()
        .expect("failed to run webrelay");

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), HELLO_SIG);
}

#[test]
fn sign_stdin_with_env_secret() {
    let mut child = webrelay_bin()
        .arg("sign")
        .env("WEBRELAY_CLIENT_SECRET", "f9876")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("failed to run webrelay");

    child.stdin.take().unwrap().write_all(b"hello").unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), HELLO_SIG);
}

#[test]
fn sign_without_secret_fails() {
    let output = webrelay_bin()
        .arg("sign")
        .stdin(Stdio::null())
        .output()
        .expect("failed to run webrelay");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no secret"), "got: {stderr}");
}

// ── 3. config ───────────────────────────────────────────────────────────

#[test]
fn config_show_prints_defaults() {
    let output = webrelay_bin()
        .args(["config", "show"])
        .output()
        .expect("failed to run webrelay");

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["relay"]["label"], "web");
    assert_eq!(json["relay"]["signature_header"], "Post-Signature");
    assert_eq!(json["server"]["port"], 8080);
}

#[test]
fn config_show_never_prints_secret() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"relay": {"clientSecret": "hunter2"}}"#).unwrap();

    let output = webrelay_bin()
        .args(["config", "show", "--config"])
        .arg(&path)
        .env("WEBRELAY_CLIENT_SECRET", "also-secret")
        .output()
        .expect("failed to run webrelay");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("hunter2"));
    assert!(!stdout.contains("also-secret"));
}

#[test]
fn invalid_config_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{"relay": {"labelColor": "red", "messageColor": "red"}}"#,
    )
    .unwrap();

    let output = webrelay_bin()
        .args(["config", "show", "--config"])
        .arg(&path)
        .output()
        .expect("failed to run webrelay");

    assert!(!output.status.success());
}

// ── 4. serve ────────────────────────────────────────────────────────────

#[test]
fn serve_with_missing_config_fails() {
    let output = webrelay_bin()
        .args(["serve", "--config", "/tmp/.webrelay-test-missing.json"])
        .output()
        .expect("failed to run webrelay");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("config file not found"), "got: {stderr}");
}

#[test]
fn serve_without_irc_server_fails() {
    let output = webrelay_bin()
        .arg("serve")
        .output()
        .expect("failed to run webrelay");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("irc.server"), "got: {stderr}");
}
