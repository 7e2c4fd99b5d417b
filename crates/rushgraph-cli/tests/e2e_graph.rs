//! E2E CLI tests for `rushgraph graph`:
//! - arity errors exit 1 with usage on stderr
//! - fatal input conditions exit 1 with an error code
//! - a minimal workspace produces deps.nq with typed edges
//!
//! Each test runs the `rushgraph` binary as a subprocess against a temp
//! workspace.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test Harness
// ---------------------------------------------------------------------------

fn rushgraph() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("rushgraph"));
    cmd.env("RUSHGRAPH_LOG", "error");
    cmd
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().expect("has parent")).expect("mkdir");
    std::fs::write(path, content).expect("write file");
}

fn minimal_workspace() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    let root = dir.path();
    write(
        root,
        "rush.json",
        r#"{ "projects": [ { "packageName": "pkg-a", "projectFolder": "projects/pkg-a" } ] }"#,
    );
    write(
        root,
        "projects/pkg-a/package.json",
        r#"{ "name": "pkg-a", "version": "1.0.0", "dependencies": { "lodash": "^4.17.0" } }"#,
    );
    write(
        root,
        "common/config/rush/pnpm-lock.yaml",
        "packages:\n  /lodash/4.17.21:\n    dev: false\n  file:projects/pkg-a.tgz:\n    dependencies:\n      lodash: 4.17.21\n",
    );
    write(
        root,
        "common/temp/node_modules/.pnpm/lodash@4.17.21/node_modules/lodash/package.json",
        r#"{ "name": "lodash", "version": "4.17.21", "license": "MIT" }"#,
    );
    dir
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn wrong_arity_exits_one_with_usage() {
    rushgraph()
        .args(["graph", "only-one-arg"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage"));

    rushgraph()
        .args(["graph", "a", "b", "c"])
        .assert()
        .code(1);
}

#[test]
fn help_exits_zero() {
    rushgraph()
        .args(["graph", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("REPO_ROOT"));
}

#[test]
fn writes_statement_file() {
    let repo = minimal_workspace();
    let out = TempDir::new().expect("out dir");

    rushgraph()
        .arg("graph")
        .arg(repo.path())
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("graph: projects=1"));

    let content = std::fs::read_to_string(out.path().join("deps.nq")).expect("deps.nq");
    assert!(content.contains("<pkg-a> <has_role> <primary> ."));
    assert!(content.contains("<pkg-a> <depends_prod> <lodash/4.17.21> ."));
    assert!(content.lines().all(|line| line.ends_with(" .")));
}

#[test]
fn json_report() {
    let repo = minimal_workspace();
    let out = TempDir::new().expect("out dir");

    let output = rushgraph()
        .arg("graph")
        .arg(repo.path())
        .arg(out.path())
        .arg("--json")
        .output()
        .expect("graph should not crash");
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["projects"], 1);
    assert_eq!(json["included_nodes"], 2);
    assert_eq!(json["workspace_edges"], 0);
    assert!(
        json["digest"]
            .as_str()
            .is_some_and(|d| d.starts_with("blake3:"))
    );
}

#[test]
fn missing_workspace_manifest_exits_one_with_code() {
    let repo = TempDir::new().expect("tempdir");
    let out = TempDir::new().expect("out dir");

    rushgraph()
        .arg("graph")
        .arg(repo.path())
        .arg(out.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("E1001"));
}

#[test]
fn stale_lockfile_exits_one_with_code() {
    let repo = minimal_workspace();
    write(
        repo.path(),
        "common/config/rush/pnpm-lock.yaml",
        "packages:\n  /lodash/4.17.21:\n    dev: false\n",
    );
    let out = TempDir::new().expect("out dir");

    rushgraph()
        .arg("graph")
        .arg(repo.path())
        .arg(out.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("E2004"));
    assert!(!out.path().join("deps.nq").exists());
}
