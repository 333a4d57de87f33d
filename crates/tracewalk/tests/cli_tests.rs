use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tracewalk_tui::CONFIG_FILE_NAME;
use tracing::info;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join(name)
}

/// The binary, isolated from the operator's home directory and node
fn tracewalk(home: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("tracewalk").unwrap();
    cmd.env("HOME", home.path()).env_remove("ETH_RPC_URL").env("RUST_LOG", "warn");
    cmd
}

#[test]
fn test_help_command() {
    tracewalk_common::ensure_test_logging(None);
    info!("Testing CLI help command");

    let home = tempfile::tempdir().unwrap();
    tracewalk(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("step through EVM execution traces"));
}

#[test]
fn test_version_command() {
    tracewalk_common::ensure_test_logging(None);
    info!("Running test");

    let home = tempfile::tempdir().unwrap();
    tracewalk(&home).arg("--version").assert().success().stdout(predicate::str::contains("tracewalk"));
}

#[test]
fn test_replay_subcommand_help() {
    tracewalk_common::ensure_test_logging(None);
    info!("Running test");

    let home = tempfile::tempdir().unwrap();
    tracewalk(&home)
        .arg("replay")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Replay an existing transaction"));
}

#[test]
fn test_invalid_tx_hash() {
    tracewalk_common::ensure_test_logging(None);
    info!("Running test");

    let home = tempfile::tempdir().unwrap();
    tracewalk(&home)
        .args(["--plain", "replay", "invalid_hash"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid transaction hash"));
}

#[test]
fn test_missing_subcommand() {
    tracewalk_common::ensure_test_logging(None);
    info!("Running test");

    let home = tempfile::tempdir().unwrap();
    tracewalk(&home).assert().failure().stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_scripted_session_over_file() {
    tracewalk_common::ensure_test_logging(None);
    info!("Running test");

    let home = tempfile::tempdir().unwrap();
    tracewalk(&home)
        .arg("--script")
        .arg("next,next,next,quit")
        .arg("file")
        .arg(fixture("call_trace.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("== Opcode 1 of 6 =="))
        .stdout(predicate::str::contains("== Opcode 4 of 6 =="))
        .stdout(predicate::str::contains("pc 2 | SSTORE | depth 2 | gas 74997 | cost 20000"))
        .stdout(predicate::str::contains("Call path: CALL"))
        .stdout(predicate::str::contains(
            "0000000000000000000000000000000000000000000000000000000000000000: \
             000000000000000000000000000000000000000000000000000000000000002a",
        ))
        .stdout(predicate::str::contains("Exiting..."))
        .stdout(predicate::str::contains("== Opcode 5 of 6 ==").not());
}

#[test]
fn test_window_flag() {
    tracewalk_common::ensure_test_logging(None);
    info!("Running test");

    let home = tempfile::tempdir().unwrap();
    let output = tracewalk(&home)
        .args(["--window", "0", "--script", "quit", "file"])
        .arg(fixture("call_trace.json"))
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("  > PUSH1"));
    assert!(!stdout.contains("CALL\n"));
}

#[test]
fn test_plain_session_reads_stdin() {
    tracewalk_common::ensure_test_logging(None);
    info!("Running test");

    let home = tempfile::tempdir().unwrap();
    tracewalk(&home)
        .args(["--plain", "file"])
        .arg(fixture("call_trace.json"))
        .write_stdin("down\nup\ndown\ndown\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("== Opcode 3 of 6 =="))
        .stdout(predicate::str::contains("Exiting..."));
}

#[test]
fn test_tree_printing() {
    tracewalk_common::ensure_test_logging(None);
    info!("Running test");

    let home = tempfile::tempdir().unwrap();
    tracewalk(&home)
        .args(["--tree", "file"])
        .arg(fixture("call_trace.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("CALL (depth 1, step 2)\n  PUSH1 (depth 2, step 3)"))
        .stdout(predicate::str::contains("  STOP (depth 2, step 5)\nRETURN (depth 1, step 6)"));
}

#[test]
fn test_empty_trace_fails() {
    tracewalk_common::ensure_test_logging(None);
    info!("Running test");

    let home = tempfile::tempdir().unwrap();
    tracewalk(&home)
        .args(["--script", "quit", "file"])
        .arg(fixture("empty_trace.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("no steps"));
}

#[test]
fn test_missing_trace_file() {
    tracewalk_common::ensure_test_logging(None);
    info!("Running test");

    let home = tempfile::tempdir().unwrap();
    tracewalk(&home)
        .args(["--plain", "file", "/definitely/not/here.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read trace file"));
}

#[test]
fn test_explicit_config_file() {
    tracewalk_common::ensure_test_logging(None);
    info!("Running test");

    let home = tempfile::tempdir().unwrap();
    let config = home.path().join("custom.toml");
    std::fs::write(&config, "[view]\nwindow_radius = 0\n").unwrap();

    let output = tracewalk(&home)
        .arg("--config")
        .arg(&config)
        .args(["--script", "next,quit", "file"])
        .arg(fixture("call_trace.json"))
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    // Radius 0 shows only the current opcode
    assert!(stdout.contains("Opcodes:\n  > CALL\nStack:"));
}

#[test]
fn test_text_runs_do_not_write_config() {
    tracewalk_common::ensure_test_logging(None);
    info!("Running test");

    let home = tempfile::tempdir().unwrap();
    tracewalk(&home)
        .args(["--script", "quit", "file"])
        .arg(fixture("call_trace.json"))
        .assert()
        .success();
    tracewalk(&home).args(["--tree", "file"]).arg(fixture("call_trace.json")).assert().success();

    assert!(!home.path().join(CONFIG_FILE_NAME).exists());
}

#[test]
fn test_text_session_reads_existing_config() {
    tracewalk_common::ensure_test_logging(None);
    info!("Running test");

    let home = tempfile::tempdir().unwrap();
    std::fs::write(home.path().join(CONFIG_FILE_NAME), "[view]\nwindow_radius = 0\n").unwrap();

    tracewalk(&home)
        .args(["--script", "quit", "file"])
        .arg(fixture("call_trace.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Opcodes:\n  > PUSH1\nStack:"));
}

#[cfg(unix)]
#[test]
fn test_interrupt_ends_plain_session_with_farewell() {
    use std::{
        io::{BufRead, BufReader, Read},
        process::{Command as StdCommand, Stdio},
        time::Duration,
    };

    tracewalk_common::ensure_test_logging(None);
    info!("Running test");

    let home = tempfile::tempdir().unwrap();
    let mut child = StdCommand::new(env!("CARGO_BIN_EXE_tracewalk"))
        .env("HOME", home.path())
        .env_remove("ETH_RPC_URL")
        .env("RUST_LOG", "warn")
        .args(["--plain", "file"])
        .arg(fixture("call_trace.json"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    // Keep stdin open so the session waits for a command
    let _stdin = child.stdin.take().unwrap();
    let mut stdout = BufReader::new(child.stdout.take().unwrap());
    loop {
        let mut line = String::new();
        assert!(stdout.read_line(&mut line).unwrap() > 0, "session ended before rendering");
        if line.contains("== Opcode 1 of 6 ==") {
            break;
        }
    }
    std::thread::sleep(Duration::from_millis(300));

    let kill = StdCommand::new("kill").arg("-INT").arg(child.id().to_string()).status().unwrap();
    assert!(kill.success());

    let mut rest = String::new();
    stdout.read_to_string(&mut rest).unwrap();
    let status = child.wait().unwrap();

    assert!(status.success(), "exit status: {status:?}");
    assert!(rest.contains("Exiting..."));
}
