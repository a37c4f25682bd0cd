//! Tests for `asmguard modules`, `completion` and `version`

#[allow(dead_code)]
mod support;

use support::harness::{stderr, stdout, TestHarness};

#[test]
fn test_modules_lists_sorted_with_groups() {
    let harness = TestHarness::new();
    harness.add_module("SharedCore", &["Unity.Mathematics", "External"]);
    harness.add_module("Unity.Mathematics", &[]);
    harness.add_module("FeatureLogin", &["SharedCore", "Unity.Mathematics"]);

    let output = harness.run(&["modules"]);
    let out = stdout(&output);

    assert_eq!(output.status.code(), Some(0));
    assert!(out.contains("3 internal assemblies"));

    let lines: Vec<&str> = out.lines().filter(|l| l.trim_start().starts_with("- ")).collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("FeatureLogin") && lines[0].contains("feature"));
    assert!(lines[0].contains("(2 dependencies)"));
    assert!(lines[1].contains("SharedCore") && lines[1].contains("shared"));
    assert!(lines[1].contains("(1 dependency)"));
    assert!(lines[2].contains("Unity.Mathematics") && lines[2].contains("platform"));
}

#[test]
fn test_modules_warns_on_malformed() {
    let harness = TestHarness::new();
    harness.add_module("A", &[]);
    harness.write_file("Assets/Bad/Bad.asmdef", "not json");

    let output = harness.run(&["modules"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(stderr(&output).contains("Bad.asmdef"));
    assert!(stdout(&output).contains("1 internal assembly"));
}

#[test]
fn test_modules_empty() {
    let harness = TestHarness::new();

    let output = harness.run(&["modules"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("No modules found"));
}

#[test]
fn test_completion_bash() {
    let harness = TestHarness::new();

    let output = harness.run(&["completion", "bash"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("asmguard"));
}

#[test]
fn test_version() {
    let harness = TestHarness::new();

    let output = harness.run(&["version"]);
    let out = stdout(&output);
    assert_eq!(output.status.code(), Some(0));
    assert!(out.starts_with(&format!("asmguard {}", env!("CARGO_PKG_VERSION"))));
    assert!(out.contains("commit:"));
}
