//! End-to-end runs of the `sorttf` binary
//!
//! All runs pass `--no-format` so they do not depend on a terraform installation.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

const UNSORTED: &str = "resource \"aws_instance\" \"web\" {\n  b = 1\n  a = 2\n}\nprovider \"aws\" {}\n";

fn sorttf() -> Command {
    let mut command = Command::cargo_bin("sorttf").unwrap();
    command.env("NO_COLOR", "1").arg("--no-format");
    command
}

fn write(dir: &Path, name: &str, contents: &str) {
    let path = dir.join(name);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

fn read(dir: &Path, name: &str) -> String {
    std::fs::read_to_string(dir.join(name)).unwrap()
}

fn assert_sorted(text: &str) {
    assert!(text.find("provider") < text.find("resource"), "{text}");
    assert!(text.find("a = 2") < text.find("b = 1"), "{text}");
}

#[test]
fn sorts_files_in_place() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "main.tf", UNSORTED);

    sorttf()
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated:"))
        .stdout(predicate::str::contains("Processed 1 files, 1 updated"));

    assert_sorted(&read(dir.path(), "main.tf"));
}

#[test]
fn second_run_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "main.tf", UNSORTED);

    sorttf().arg(dir.path()).assert().success();
    let first = read(dir.path(), "main.tf");

    sorttf()
        .arg("--validate")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("all sorted"));
    assert_eq!(read(dir.path(), "main.tf"), first);
}

#[test]
fn sorted_file_is_left_alone() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "main.tf", UNSORTED);
    sorttf().arg(dir.path()).assert().success();
    let sorted = read(dir.path(), "main.tf");

    sorttf()
        .arg("--verbose")
        .arg(dir.path().join("main.tf"))
        .assert()
        .success()
        .stdout(predicate::str::contains("No changes needed:"))
        .stdout(predicate::str::contains("Processed 1 files, 0 updated"));

    assert_eq!(read(dir.path(), "main.tf"), sorted);
}

#[test]
fn dry_run_prints_diff_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "main.tf", UNSORTED);

    sorttf()
        .arg("--dry-run")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Would update:"))
        .stdout(predicate::str::contains("(original)"))
        .stdout(predicate::str::contains("(sorted)"))
        .stdout(predicate::str::contains("+provider"))
        .stdout(predicate::str::contains("1 would be updated"));

    assert_eq!(read(dir.path(), "main.tf"), UNSORTED);
}

#[test]
fn validate_fails_on_unsorted_files() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "main.tf", UNSORTED);

    sorttf()
        .arg("--validate")
        .arg(dir.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Needs update:"))
        .stdout(predicate::str::contains("1 need updates"));

    assert_eq!(read(dir.path(), "main.tf"), UNSORTED);
}

#[test]
fn recursive_discovery() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "main.tf", "provider \"aws\" {}\n");
    write(dir.path(), "modules/app/main.tf", UNSORTED);
    write(dir.path(), ".terraform/modules/cached/main.tf", UNSORTED);

    sorttf()
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Processed 1 files, 0 updated"));

    sorttf()
        .arg("--recursive")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Processed 2 files, 1 updated"));

    assert_sorted(&read(dir.path(), "modules/app/main.tf"));
    assert_eq!(
        read(dir.path(), ".terraform/modules/cached/main.tf"),
        UNSORTED
    );
}

#[test]
fn failures_do_not_stop_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a_broken.tf", "resource \"a\" {\n");
    write(dir.path(), "b_backend.tf", "backend \"s3\" {}\n");
    write(dir.path(), "c_main.tf", UNSORTED);

    sorttf()
        .arg(dir.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Processed 3 files, 1 updated"))
        .stderr(predicate::str::contains("Unable to parse document"))
        .stderr(predicate::str::contains(
            "backend block \"s3\" must be inside a terraform block",
        ))
        .stderr(predicate::str::contains("Encountered 2 errors"));

    assert_sorted(&read(dir.path(), "c_main.tf"));
    assert_eq!(read(dir.path(), "b_backend.tf"), "backend \"s3\" {}\n");
}

#[test]
fn missing_formatter() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "main.tf", UNSORTED);

    let mut command = Command::cargo_bin("sorttf").unwrap();
    command
        .env("NO_COLOR", "1")
        .args(["--formatter", "sorttf-test-formatter-that-does-not-exist"])
        .arg(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not found"));
    assert_eq!(read(dir.path(), "main.tf"), UNSORTED);

    let mut command = Command::cargo_bin("sorttf").unwrap();
    command
        .env("NO_COLOR", "1")
        .args(["--formatter", "sorttf-test-formatter-that-does-not-exist"])
        .arg("--allow-missing-formatter")
        .arg(dir.path())
        .assert()
        .success();
    assert_sorted(&read(dir.path(), "main.tf"));
}

#[test]
fn unsupported_file() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "notes.txt", "");

    sorttf()
        .arg(dir.path().join("notes.txt"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not a supported file type"));
}

#[test]
fn empty_directory() {
    let dir = tempfile::tempdir().unwrap();

    sorttf()
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No Terraform or Terragrunt files found."));
}

#[test]
fn usage_error() {
    sorttf()
        .arg("--dry-run")
        .arg("--validate")
        .assert()
        .code(2);
}
