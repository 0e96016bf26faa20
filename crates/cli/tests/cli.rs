//! Integration tests for the s3pilot binary surface

use assert_cmd::Command;
use predicates::prelude::*;

fn s3pilot() -> Command {
    Command::cargo_bin("s3pilot").unwrap()
}

#[test]
fn help_lists_all_subcommands() {
    s3pilot()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("list-buckets"))
        .stdout(predicate::str::contains("list-bucket-objects"))
        .stdout(predicate::str::contains("setup-bucket"))
        .stdout(predicate::str::contains("sync"))
        .stdout(predicate::str::contains("url"))
        .stdout(predicate::str::contains("doctor"));
}

#[test]
fn version_prints() {
    s3pilot()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("s3pilot"));
}

#[test]
fn sync_missing_path_fails_fast() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("no-such-site");

    s3pilot()
        .arg("sync")
        .arg(&missing)
        .arg("some-bucket")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Path not found"));
}

#[test]
fn sync_requires_pathname() {
    s3pilot().arg("sync").assert().failure();
}

#[test]
fn completion_bash_prints_script() {
    s3pilot()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("s3pilot"));
}

#[test]
fn completion_unknown_shell_fails() {
    s3pilot()
        .args(["completion", "tcsh"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported shell"));
}

#[test]
fn unknown_subcommand_fails() {
    s3pilot().arg("frobnicate").assert().failure();
}
