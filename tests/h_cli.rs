mod util;

use assert_cmd::Command;
use predicates::prelude::*;
use util::USAGE_ERROR;

fn plox() -> Command {
    Command::cargo_bin("plox").expect("Binary not found")
}

#[test]
fn too_many_arguments_prints_usage() {
    plox()
        .args(["one.lox", "two.lox"])
        .assert()
        .code(USAGE_ERROR)
        .stderr(predicate::str::contains("Usage: plox [script]"));
}

#[test]
fn missing_file_is_reported() {
    plox()
        .arg("no_such_file.lox")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

#[test]
fn repl_evaluates_lines() {
    plox()
        .write_stdin("print 10 + 2;\nprint 3 * 9;\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("12").and(predicate::str::contains("27")));
}

#[test]
fn repl_state_persists_between_lines() {
    plox()
        .write_stdin("var x = 10;\nprint x + 5;\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("15"));
}

#[test]
fn repl_closures_survive_across_lines() {
    let session = "fun make() { var i = 0; fun inc() { i = i + 1; return i; } return inc; }\n\
                   var c = make();\n\
                   print c();\n\
                   print c();\n";
    plox()
        .write_stdin(session)
        .assert()
        .success()
        .stdout(predicate::str::contains("1").and(predicate::str::contains("2")));
}

#[test]
fn repl_recovers_after_an_error() {
    // A static error on one line must not poison the next, and the session
    // still exits cleanly.
    plox()
        .write_stdin("return 1;\nprint 3 + 4;\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Can't return from top-level code."))
        .stdout(predicate::str::contains("7"));
}

#[test]
fn repl_ends_on_empty_line() {
    plox()
        .write_stdin("print 2 + 3;\n\nprint 9 + 9;\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("5").and(predicate::str::contains("18").not()));
}
