#![allow(dead_code)]
use assert_cmd::Command;
use std::io::Write;
use tempfile::NamedTempFile;

pub const SUCCESS: i32 = 0;
pub const USAGE_ERROR: i32 = 64;
pub const BUILD_ERROR: i32 = 65;
pub const RUNTIME_ERROR: i32 = 70;

fn script_file(program: &str) -> NamedTempFile {
    let mut script = NamedTempFile::new().expect("Failed to create temp file");
    write!(script, "{program}").expect("Failed to write to temp file");
    script
}

fn plox() -> Command {
    Command::cargo_bin("plox").expect("Binary not found")
}

/// Runs `plox <file>` on the given program and asserts the exact stdout and
/// exit code.
pub fn run_program(program: &str, expected: &str, expected_code: i32) {
    let script = script_file(program);

    let output = plox()
        .arg(script.path())
        .output()
        .expect("Failed to run binary");

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let exit_code = output.status.code().unwrap_or(-1);

    assert_eq!(stdout, expected);
    assert_eq!(exit_code, expected_code);
}

/// Runs the program and asserts that stderr carries the given diagnostic
/// and the process exits with the given code.
pub fn run_expecting_error(program: &str, expected_error: &str, expected_code: i32) {
    let script = script_file(program);

    let output = plox()
        .arg(script.path())
        .output()
        .expect("Failed to run binary");

    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    let exit_code = output.status.code().unwrap_or(-1);

    assert!(
        stderr.contains(expected_error),
        "expected stderr to contain {expected_error:?}, got:\n{stderr}"
    );
    assert_eq!(exit_code, expected_code);
}

/// Like run_program, with the given text piped to the process's stdin.
pub fn run_with_stdin(program: &str, stdin: &str, expected: &str, expected_code: i32) {
    let script = script_file(program);

    let output = plox()
        .arg(script.path())
        .write_stdin(stdin)
        .output()
        .expect("Failed to run binary");

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let exit_code = output.status.code().unwrap_or(-1);

    assert_eq!(stdout, expected);
    assert_eq!(exit_code, expected_code);
}
