//! End-to-end tests for the node-warden binary
//!
//! Drives the interactive menu through stdin and checks output and exit codes.
#![allow(deprecated)] // cargo_bin is deprecated but still functional

use assert_cmd::Command;
use predicates::prelude::*;
use std::process::Stdio;

const NO_SUCH_PREFIX: &str = "__no_such_process_prefix__";

// =============================================================================
// --list オプションの出力確認テスト
// =============================================================================

#[test]
fn test_list_command_runs_successfully() {
    let mut cmd = Command::cargo_bin("node-warden").unwrap();
    cmd.arg("--list").assert().success().stdout(
        predicate::str::contains("Running node processes")
            .or(predicate::str::contains("No running node processes found.")),
    );
}

#[test]
fn test_list_command_none_found() {
    let mut cmd = Command::cargo_bin("node-warden").unwrap();
    cmd.args(["--list", "--prefix", NO_SUCH_PREFIX])
        .assert()
        .success()
        .stdout(predicate::str::contains("No running"));
}

#[test]
fn test_list_command_shows_header_format() {
    let child = std::process::Command::new("sleep")
        .arg("30")
        .stdout(Stdio::null())
        .spawn();

    if let Ok(mut child) = child {
        let mut cmd = Command::cargo_bin("node-warden").unwrap();
        cmd.args(["--list", "--prefix", "sleep"])
            .assert()
            .success()
            .stdout(
                predicate::str::contains("PID")
                    .and(predicate::str::contains("STATUS"))
                    .and(predicate::str::contains("sleep 30")),
            );

        let _ = child.kill();
        let _ = child.wait();
    }
}

// =============================================================================
// メニュー操作のテスト
// =============================================================================

#[test]
fn test_exit_option_exits_zero() {
    let mut cmd = Command::cargo_bin("node-warden").unwrap();
    cmd.write_stdin("4\n")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Choose an action:")
                .and(predicate::str::contains("Goodbye.")),
        );
}

#[test]
fn test_end_of_input_exits_nonzero() {
    let mut cmd = Command::cargo_bin("node-warden").unwrap();
    cmd.write_stdin("")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Interrupted by user."));
}

#[test]
fn test_sigint_prints_message_and_exits_one() {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;
    use std::io::Read;
    use std::time::{Duration, Instant};

    let mut child = std::process::Command::new(assert_cmd::cargo::cargo_bin("node-warden"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    // stdin stays open so the session blocks at the menu prompt
    std::thread::sleep(Duration::from_millis(500));
    kill(Pid::from_raw(child.id() as i32), Signal::SIGINT).unwrap();

    let deadline = Instant::now() + Duration::from_secs(5);
    let status = loop {
        if let Some(status) = child.try_wait().unwrap() {
            break status;
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            panic!("node-warden did not exit after SIGINT");
        }
        std::thread::sleep(Duration::from_millis(50));
    };

    let mut stdout = String::new();
    child
        .stdout
        .take()
        .unwrap()
        .read_to_string(&mut stdout)
        .unwrap();

    assert_eq!(status.code(), Some(1));
    assert!(stdout.contains("Interrupted by user."));
}

#[test]
fn test_invalid_option_returns_to_menu() {
    let mut cmd = Command::cargo_bin("node-warden").unwrap();
    cmd.write_stdin("7\n4\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid option '7'"));
}

#[test]
fn test_list_from_menu_none_found() {
    let mut cmd = Command::cargo_bin("node-warden").unwrap();
    cmd.args(["--prefix", NO_SUCH_PREFIX])
        .write_stdin("1\n4\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("No running"));
}

#[test]
fn test_kill_by_pid_rejects_invalid_input() {
    let mut cmd = Command::cargo_bin("node-warden").unwrap();
    cmd.args(["--prefix", NO_SUCH_PREFIX])
        .write_stdin("2\nabc\n-5\n0\n999999999\n4\n")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Please enter a valid positive integer PID")
                .count(3)
                .and(predicate::str::contains("No process with PID 999999999")),
        );
}

#[test]
fn test_kill_all_declined() {
    let mut cmd = Command::cargo_bin("node-warden").unwrap();
    cmd.args(["--prefix", NO_SUCH_PREFIX])
        .write_stdin("3\nno\n4\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cancelled."));
}

#[test]
fn test_kill_all_nothing_to_do() {
    let mut cmd = Command::cargo_bin("node-warden").unwrap();
    cmd.args(["--prefix", NO_SUCH_PREFIX])
        .write_stdin("3\ny\n4\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("processes to terminate."));
}

// =============================================================================
// 実際のプロセス終了テスト（子プロセスを生成してテスト）
// =============================================================================

#[test]
fn test_kill_child_process_by_pid() {
    let child = std::process::Command::new("sleep")
        .arg("60")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();

    if let Ok(mut child) = child {
        let child_pid = child.id();

        let mut cmd = Command::cargo_bin("node-warden").unwrap();
        cmd.args(["--prefix", "sleep"])
            .write_stdin(format!("2\n{}\n4\n", child_pid))
            .assert()
            .success()
            .stdout(predicate::str::contains(format!(
                "Terminated process PID {}",
                child_pid
            )));

        let status = child.wait().unwrap();
        assert!(!status.success());
    }
}

#[test]
fn test_wrong_process_type_is_not_killed() {
    let child = std::process::Command::new("sleep")
        .arg("60")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();

    if let Ok(mut child) = child {
        let child_pid = child.id();

        let mut cmd = Command::cargo_bin("node-warden").unwrap();
        cmd.write_stdin(format!("2\n{}\n4\n", child_pid))
            .assert()
            .success()
            .stdout(predicate::str::contains("is not a node process"));

        assert!(child.try_wait().unwrap().is_none());

        let _ = child.kill();
        let _ = child.wait();
    }
}

// =============================================================================
// CLI引数バリデーションテスト
// =============================================================================

#[test]
fn test_help_option() {
    let mut cmd = Command::cargo_bin("node-warden").unwrap();
    cmd.arg("--help").assert().success().stdout(
        predicate::str::contains("node-warden")
            .and(predicate::str::contains("--list"))
            .and(predicate::str::contains("--prefix")),
    );
}

#[test]
fn test_version_option() {
    let mut cmd = Command::cargo_bin("node-warden").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("node-warden"));
}

#[test]
fn test_empty_prefix_is_rejected() {
    let mut cmd = Command::cargo_bin("node-warden").unwrap();
    cmd.args(["--prefix", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--prefix must not be empty"));
}
