use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

use critique::sandbox::interpreter_available;

fn critique() -> Command {
    let mut cmd = Command::cargo_bin("critique").expect("binary exists");
    cmd.env_remove("OPENAI_API_KEY")
        .env_remove("GITHUB_TOKEN")
        .env("NO_COLOR", "1");
    cmd
}

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"))
}

fn python_available() -> bool {
    if interpreter_available("python3") {
        true
    } else {
        eprintln!("skipping: python3 not available");
        false
    }
}

fn json_output(cmd: &mut Command) -> Value {
    let output = cmd.output().expect("command runs");
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

// ---------------------------------------------------------------------------
// CLI smoke tests
// ---------------------------------------------------------------------------

#[test]
fn test_help_output() {
    critique()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Multi-dimensional"));
}

#[test]
fn test_init_prints_default_config() {
    critique()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("[weights]"))
        .stdout(predicate::str::contains("[sandbox]"));
}

#[test]
fn test_missing_subcommand_fails() {
    critique().assert().failure();
}

// ---------------------------------------------------------------------------
// Static analysis
// ---------------------------------------------------------------------------

#[test]
fn test_analyze_file_json() {
    let value = json_output(critique().args(["-f", "json", "analyze", "--file", &fixture("add.py")]));
    assert_eq!(value["success"], true);
    assert_eq!(value["result"]["language"], "python");
    assert_eq!(value["result"]["outcomes"]["quality"]["score"], 100.0);
    assert!(value["result"]["outcomes"].get("correctness").is_none());
}

#[test]
fn test_analyze_broken_file_zeroes_quality() {
    let value =
        json_output(critique().args(["-f", "json", "analyze", "--file", &fixture("broken.py")]));
    assert_eq!(value["success"], true);
    assert_eq!(value["result"]["outcomes"]["quality"]["status"], "parse_failure");
}

#[test]
fn test_analyze_markdown() {
    critique()
        .args(["-f", "markdown", "analyze", "--code", "value = 1\n"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Static Analysis"))
        .stdout(predicate::str::contains("| Readability |"));
}

#[test]
fn test_missing_file_is_reported() {
    let output = critique()
        .args(["-f", "json", "analyze", "--file", "/definitely/missing.py"])
        .output()
        .expect("command runs");
    assert!(!output.status.success());
    let value: Value = serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(value["success"], false);
    assert!(value["error"]
        .as_str()
        .is_some_and(|e| e.contains("Source unavailable")));
}

// ---------------------------------------------------------------------------
// Full evaluation
// ---------------------------------------------------------------------------

#[test]
fn test_evaluate_without_tests() {
    let value = json_output(critique().args(["-f", "json", "evaluate", "--file", &fixture("add.py")]));
    let result = &value["result"];
    assert_eq!(result["correctness_score"], 85.0);
    assert_eq!(result["suggestions"].as_array().map(Vec::len), Some(2));
    assert_eq!(result["strengths"].as_array().map(Vec::len), Some(2));
    assert!(result["feedback"]["edge_cases"].is_array());
    assert!(result["overall_score"].as_f64().is_some());
}

#[test]
fn test_evaluate_with_tests() {
    if !python_available() {
        return;
    }
    let value = json_output(critique().args([
        "-f",
        "json",
        "evaluate",
        "--file",
        &fixture("add.py"),
        "--tests",
        &fixture("add_tests.json"),
    ]));
    assert_eq!(value["result"]["correctness_score"], 66.7);
}

#[test]
fn test_evaluate_wrong_implementation() {
    if !python_available() {
        return;
    }
    let value = json_output(critique().args([
        "-f",
        "json",
        "evaluate",
        "--file",
        &fixture("add_wrong.py"),
        "--tests",
        &fixture("add_tests.json"),
    ]));
    assert_eq!(value["result"]["correctness_score"], 0.0);
    assert_eq!(value["result"]["feedback"]["correctness"][0], "Code fails several test cases");
}

#[test]
fn test_evaluate_text_output() {
    critique()
        .args(["evaluate", "--code", "total = 1\n", "--language", "java"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Overall score:"))
        .stdout(predicate::str::contains("Suggestions:"));
}

#[test]
fn test_invalid_test_file_fails() {
    let dir = TempDir::new().unwrap();
    let tests = dir.path().join("tests.json");
    std::fs::write(&tests, "{not json").unwrap();
    critique()
        .args(["evaluate", "--code", "x = 1\n", "--tests"])
        .arg(&tests)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid test case file"));
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn test_config_file_changes_weights() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("critique.toml"),
        "[weights]\ncorrectness = 0.0\nquality = 1.0\nefficiency = 0.0\nreadability = 0.0\nedge_cases = 0.0\n",
    )
    .unwrap();
    let value = json_output(
        critique()
            .current_dir(dir.path())
            .args(["-f", "json", "evaluate", "--file", &fixture("add.py")]),
    );
    assert_eq!(value["result"]["overall_score"], 100.0);
}

#[test]
fn test_invalid_config_rejected() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("bad.toml");
    std::fs::write(&config, "[weights]\ncorrectness = 0.9\n").unwrap();
    critique()
        .arg("--config")
        .arg(&config)
        .args(["analyze", "--code", "x = 1\n"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_env_overrides_config() {
    let dir = TempDir::new().unwrap();
    critique()
        .current_dir(dir.path())
        .env("CRITIQUE_WEIGHTS__CORRECTNESS", "0.5")
        .args(["analyze", "--code", "x = 1\n"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("weights"));
}
