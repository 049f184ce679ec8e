//! Integration test: built-in rules end-to-end via the Validator.
//!
//! Uses fixture files under `tests/fixtures/src/users/` to verify that file
//! selection, the ordered rule list and report grouping work together.

use guideline_lint_core::{
    Config, FileSelector, FileSet, Selection, Severity, ValidationReport, Validator,
};
use guideline_lint_rules::default_rules;
use std::path::{Path, PathBuf};

fn fixture_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn users_dir() -> PathBuf {
    fixture_root().join("src/users")
}

fn run(files: &FileSet) -> ValidationReport {
    let config = Config::default();
    Validator::builder()
        .rules(default_rules(&config))
        .config(config)
        .build()
        .validate(files)
}

fn describe(report: &ValidationReport) -> Vec<String> {
    report
        .findings()
        .map(|f| format!("{} {} {}", f.severity, f.rule, f.message))
        .collect()
}

// ── Happy path ──

#[test]
fn bad_example_fails_with_every_listed_violation() {
    let dir = users_dir();
    let files: FileSet = [dir.join("Test.ts"), dir.join("badExample.controller.ts")]
        .into_iter()
        .collect();

    let report = run(&files);

    // Expected errors, all in badExample.controller.ts:
    //   1. file-naming: lowercase base name
    //   2. interface-naming: UserDto
    //   3. controller-return-type: findAll has no return type
    //   4. controller-return-type: create returns string
    //   5. controller-return-type: getCount returns number
    assert!(!report.success);
    assert_eq!(report.error_count, 5, "{:#?}", describe(&report));
    assert_eq!(report.warning_count, 0, "{:#?}", describe(&report));
    assert_eq!(report.files_checked, 2);

    assert_eq!(report.files.len(), 1);
    let bad = &report.files[0];
    assert!(bad.file.ends_with("badExample.controller.ts"));

    let rules: Vec<&str> = bad.findings.iter().map(|f| f.rule.as_str()).collect();
    assert_eq!(
        rules,
        vec![
            "file-naming",
            "interface-naming",
            "controller-return-type",
            "controller-return-type",
            "controller-return-type",
        ]
    );

    assert!(bad.findings[2].message.contains("'findAll'"));
    assert!(bad.findings[3].message.contains("'string'"));
    assert!(bad.findings[4].message.contains("'number'"));
    assert_eq!(bad.findings[1].line, Some(4));
}

#[test]
fn good_controller_only_warns_about_sync_promises() {
    let files: FileSet = [users_dir().join("User.controller.ts")].into_iter().collect();

    let report = run(&files);

    assert!(report.success, "{:#?}", describe(&report));
    assert_eq!(report.error_count, 0);
    assert_eq!(report.warning_count, 2);
    assert!(report
        .findings()
        .all(|f| f.severity == Severity::Warning && f.message.contains("not marked async")));
}

#[test]
fn runs_are_idempotent() {
    let dir = users_dir();
    let files: FileSet = [
        dir.join("badExample.controller.ts"),
        dir.join("User.controller.ts"),
        dir.join("Test.ts"),
    ]
    .into_iter()
    .collect();

    let first = run(&files);
    let second = run(&files);

    assert_eq!(describe(&first), describe(&second));
    assert_eq!(first, second);
}

// ── Selection feeding validation ──

fn selector() -> FileSelector {
    FileSelector::new(fixture_root(), &Config::default().selector)
        .expect("default selector config should be valid")
}

#[test]
fn full_scan_of_fixture_project_finds_all_files() {
    let outcome = selector().select(&Selection::FullScan);

    let names: Vec<_> = outcome
        .files
        .iter()
        .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
        .collect();
    assert_eq!(names, vec!["Test.ts", "User.controller.ts", "badExample.controller.ts"]);

    // Entries stay relative to the fixture root, which differs from the
    // test's working directory.
    assert!(outcome.files.iter().all(|p| p.is_relative()));
    let report = run(&outcome.files);
    assert_eq!(report.error_count, 5, "{:#?}", describe(&report));
    assert_eq!(report.warning_count, 2, "{:#?}", describe(&report));
    assert!(report.files.iter().all(|f| f.file.starts_with("src/users")));
}

#[test]
fn explicit_selection_drops_missing_files() {
    let outcome = selector().select(&Selection::Explicit(vec![
        users_dir().join("Test.ts"),
        PathBuf::from("src/users/User.controller.ts"),
        PathBuf::from("src/users/Missing.ts"),
    ]));

    assert_eq!(outcome.files.len(), 2);
    assert_eq!(outcome.files.as_slice()[0], users_dir().join("Test.ts"));
    assert_eq!(
        outcome.files.as_slice()[1],
        Path::new("src/users/User.controller.ts")
    );
    assert!(outcome.warnings.is_empty());

    let report = run(&outcome.files);
    assert_eq!(report.files_checked, 2);
    assert_eq!(report.error_count, 0, "{:#?}", describe(&report));
    assert_eq!(report.warning_count, 2, "{:#?}", describe(&report));
}
