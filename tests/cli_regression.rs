// Regression tests for the `aifl` binary: output on stdout, miette
// diagnostics on stderr, exit status 1 on failure.

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};

fn aifl() -> Command {
    let mut cmd = Command::cargo_bin("aifl").unwrap();
    cmd.arg("--color").arg("never");
    cmd
}

fn temp_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("aifl-{}-{}", std::process::id(), name));
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn cli_execute_prints_trace() {
    aifl()
        .args(["execute", "ΔΔ1 ∧ ΔΙ5"])
        .assert()
        .success()
        .stdout("Executed operation: ∧ on Executed symbol: ΔΔ1 and Executed symbol: ΔΙ5\n");
}

#[test]
fn cli_ast_prints_json() {
    aifl()
        .args(["ast", "ΜΑΝ1 ∧ ΜΑΒ2"])
        .assert()
        .success()
        .stdout(contains(r#""type": "operation""#).and(contains(r#""operator": "∧""#)));

    aifl()
        .args(["ast", "--compact", "ΜΑΝ1"])
        .assert()
        .success()
        .stdout("{\"type\":\"symbol_call\",\"symbol\":\"ΜΑΝ1\",\"parameters\":{}}\n");
}

#[test]
fn cli_ast_prints_yaml() {
    aifl()
        .args(["ast", "--format", "yaml", "ΔΕ1(Data: 'x')"])
        .assert()
        .success()
        .stdout(contains("type: symbol_call").and(contains("Data: x")));
}

#[test]
fn cli_tokens_lists_token_kinds() {
    aifl()
        .args(["tokens", "¬ΔΔ1 ∧ ΔΙ5"])
        .assert()
        .success()
        .stdout(contains("NOT").and(contains("SYMBOL")).and(contains("AND")).and(contains("2..7")));
}

#[test]
fn cli_check_accepts_valid_expression() {
    aifl()
        .args(["check", "(ΔΔ1 ∨ ΔΔ2) ⇒ ΔΖ3"])
        .assert()
        .success()
        .stdout(contains("ok: operation"));
}

#[test]
fn cli_reports_miette_diagnostics_on_error() {
    aifl()
        .args(["execute", "ΔΕ1 ∧"])
        .assert()
        .failure()
        .code(1)
        .stdout("")
        .stderr(contains("aifl::semantic_violation").and(contains("missing its right-hand operand")));

    aifl()
        .args(["check", "ΔΕ1(Data:)"])
        .assert()
        .failure()
        .stderr(contains("aifl::syntax"));
}

#[test]
fn cli_reads_expression_from_stdin_and_file() {
    aifl()
        .arg("execute")
        .write_stdin("¬ΔΔ1\n")
        .assert()
        .success()
        .stdout("Executed operation: ¬ on Executed symbol: ΔΔ1\n");

    let path = temp_file("single.aifl", "ΔΕ1(Data: 'SensitiveInfo', EncryptionType: 'AES256')\n");
    aifl()
        .arg("execute")
        .arg("--file")
        .arg(&path)
        .assert()
        .success()
        .stdout("Executed function: ΔΕ1(Data: SensitiveInfo, EncryptionType: AES256)\n");
    let _ = fs::remove_file(path);
}

#[test]
fn cli_missing_file_is_an_io_error() {
    aifl()
        .args(["execute", "--file", "does/not/exist.aifl"])
        .assert()
        .failure()
        .stderr(contains("aifl::io"));
}

#[test]
fn cli_batch_reports_each_line() {
    let path = temp_file("batch.aifl", "# smoke\nΔΔ1\n\nΔΕ1 ∧\n");
    aifl()
        .arg("batch")
        .arg(&path)
        .assert()
        .failure()
        .code(1)
        .stdout(
            contains(r#""line":2,"expression":"ΔΔ1","status":"success""#)
                .and(contains(r#""line":4,"expression":"ΔΕ1 ∧","status":"error","error_kind":"semantic_violation""#)),
        );
    let _ = fs::remove_file(path);

    let path = temp_file("batch-ok.aifl", "ΔΔ1 ∧ ΔΙ5\nΔΕ1(Data: 'TestData') ⇒ ΔΖ3\n");
    aifl()
        .arg("batch")
        .arg(&path)
        .assert()
        .success()
        .stdout(contains(r#""executed_result":"Executed operation: ⇒ on Executed function: ΔΕ1(Data: TestData) and Executed symbol: ΔΖ3""#));
    let _ = fs::remove_file(path);
}
