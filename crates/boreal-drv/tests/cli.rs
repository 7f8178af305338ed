//! End-to-end tests for the `boreal` CLI binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn boreal_bin() -> Command {
    Command::cargo_bin("boreal").expect("boreal binary should build")
}

fn write_source(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn cli_help_lists_both_subcommands() {
    boreal_bin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("analyze"))
        .stdout(predicate::str::contains("goto-def"));
}

#[test]
fn analyze_clean_program_exits_success_and_reports_no_errors() {
    let dir = TempDir::new().unwrap();
    let file = write_source(&dir, "clean.bor", "program P; var x: integer; begin x := 1; end;");

    boreal_bin()
        .arg("analyze")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"accepted\":true"))
        .stdout(predicate::str::contains("\"lexical_errors\":[]"));
}

#[test]
fn analyze_undeclared_variable_exits_failure_and_reports_it() {
    let dir = TempDir::new().unwrap();
    let file = write_source(&dir, "bad.bor", "program P; begin y := 1; end;");

    boreal_bin()
        .arg("analyze")
        .arg(&file)
        .assert()
        .failure()
        .stdout(predicate::str::contains("not declared"));
}

#[test]
fn analyze_missing_file_reports_an_io_error() {
    boreal_bin()
        .arg("analyze")
        .arg("/no/such/file.bor")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn goto_def_resolves_a_use_site_back_to_its_declaration() {
    let dir = TempDir::new().unwrap();
    let file = write_source(
        &dir,
        "lookup.bor",
        "program P; var count: integer; begin count := count + 1; end;",
    );

    boreal_bin()
        .arg("goto-def")
        .arg(&file)
        .arg("1")
        .arg("37")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"found\":true"));
}

#[test]
fn goto_def_rejects_a_zero_line() {
    let dir = TempDir::new().unwrap();
    let file = write_source(&dir, "any.bor", "program P; begin end;");

    boreal_bin()
        .arg("goto-def")
        .arg(&file)
        .arg("0")
        .arg("0")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("line and column"));
}
