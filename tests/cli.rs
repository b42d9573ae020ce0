#![cfg(unix)]
#![allow(clippy::expect_used, clippy::unwrap_used)]
//! Integration tests for top-level CLI behaviour: exit codes and console
//! output of the `globlink` binary.

mod common;

use std::process::{Command, Output};

use common::TestContextBuilder;

fn run_globlink(args: &[&str]) -> Output {
    let bin = env!("CARGO_BIN_EXE_globlink");
    Command::new(bin)
        .args(args)
        .output()
        .expect("failed to run globlink binary")
}

fn path_arg(path: &std::path::Path) -> String {
    path.to_string_lossy().to_string()
}

#[test]
fn successful_run_exits_zero() {
    let ctx = TestContextBuilder::new().with_file("x.txt").build();
    let (base, out) = (path_arg(&ctx.base()), path_arg(&ctx.out()));

    let output = run_globlink(&["-b", &base, "-t", "*.txt", "-d", &out, "--create"]);

    assert!(output.status.success(), "{output:?}");
    assert!(output.stdout.is_empty(), "quiet run prints nothing");
    assert!(ctx.out().join("x.txt").is_symlink());
}

#[test]
fn verbose_run_prints_outcome_lines() {
    let ctx = TestContextBuilder::new().with_file("a/x.txt").build();
    let (base, out) = (path_arg(&ctx.base()), path_arg(&ctx.out()));

    let output = run_globlink(&[
        "-b", &base, "-t", "*.txt", "-d", &out, "--create", "--recursive", "-v",
    ]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "{output:?}");
    assert!(stdout.contains("==> Resolving tokens\n"), "{stdout}");
    assert!(stdout.contains("found 1 match(es) for token '*.txt'"), "{stdout}");
    let expected = format!(
        "created: {} -> {}",
        ctx.out().join("a/x.txt").display(),
        ctx.canonical_base().join("a/x.txt").display()
    );
    assert!(stdout.lines().any(|l| l == expected), "{stdout}");
    assert!(stdout.contains("1 created, 0 already linked, 0 replaced, 0 skipped, 0 failed"));
}

#[test]
fn summary_flag_prints_totals() {
    let ctx = TestContextBuilder::new()
        .with_file("x.txt")
        .with_file("y.txt")
        .build();
    let (base, out) = (path_arg(&ctx.base()), path_arg(&ctx.out()));
    let args: &[&str] = &["-b", &base, "-t", "*.txt", "-d", &out, "--create", "--summary"];

    let first = run_globlink(args);
    assert_eq!(
        String::from_utf8_lossy(&first.stdout),
        "2 created, 0 already linked, 0 replaced, 0 skipped, 0 failed\n"
    );

    let second = run_globlink(args);
    assert_eq!(
        String::from_utf8_lossy(&second.stdout),
        "0 created, 2 already linked, 0 replaced, 0 skipped, 0 failed\n"
    );
}

#[test]
fn failed_link_exits_one() {
    let ctx = TestContextBuilder::new().with_file("x.txt").build();
    let (base, out) = (path_arg(&ctx.base()), path_arg(&ctx.out()));

    let output = run_globlink(&["-b", &base, "-t", "*.txt", "-d", &out]);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("1 link(s) failed"), "{stderr}");
    assert!(!ctx.out().exists());
}

#[test]
fn skipped_conflict_is_not_a_failure() {
    let ctx = TestContextBuilder::new().with_file("x.txt").with_out().build();
    std::fs::write(ctx.out().join("x.txt"), "occupant").unwrap();
    let (base, out) = (path_arg(&ctx.base()), path_arg(&ctx.out()));

    let output = run_globlink(&["-b", &base, "-t", "x.txt", "-d", &out]);

    assert!(output.status.success(), "{output:?}");
    assert_eq!(std::fs::read_to_string(ctx.out().join("x.txt")).unwrap(), "occupant");
}

#[test]
fn missing_base_dir_exits_one() {
    let ctx = TestContextBuilder::new().build();
    let base = path_arg(&ctx.root.path().join("nope"));
    let out = path_arg(&ctx.out());

    let output = run_globlink(&["-b", &base, "-t", "*", "-d", &out, "--create"]);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("base directory not found"), "{stderr}");
    assert!(!ctx.out().exists());
}

#[test]
fn invalid_pattern_exits_one() {
    let ctx = TestContextBuilder::new().build();
    let (base, out) = (path_arg(&ctx.base()), path_arg(&ctx.out()));

    let output = run_globlink(&["-b", &base, "-t", "[", "-d", &out]);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("invalid pattern '['"), "{stderr}");
}

#[test]
fn missing_required_argument_is_a_usage_error() {
    let output = run_globlink(&["-b", "."]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr.contains("--token") || stderr.contains("--dest-dir"), "{stderr}");
}

#[test]
fn version_flag_prints_version() {
    let output = run_globlink(&["--version"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.starts_with("globlink "), "{stdout}");
}

#[test]
fn filters_and_flatten_apply_end_to_end() {
    let ctx = TestContextBuilder::new()
        .with_file("a/keep.log")
        .with_file("a/drop.log")
        .with_file("b/note.txt")
        .build();
    let (base, out) = (path_arg(&ctx.base()), path_arg(&ctx.out()));

    let output = run_globlink(&[
        "-b", &base, "-t", "*", "-d", &out, "--recursive", "--create", "--flatten",
        "--exclude", "*.log", "--include", "*/keep.log",
    ]);

    assert!(output.status.success(), "{output:?}");
    let mut names: Vec<String> = std::fs::read_dir(ctx.out())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    assert_eq!(names, vec!["a", "b", "keep.log", "note.txt"]);
}

#[test]
fn recursive_wildcard_over_nested_tree_exits_zero() {
    let ctx = TestContextBuilder::new()
        .with_file("a/x.txt")
        .with_file("a/b/y.txt")
        .build();
    let (base, out) = (path_arg(&ctx.base()), path_arg(&ctx.out()));
    let args: &[&str] = &["-b", &base, "-t", "*", "-d", &out, "--recursive", "--create", "--summary"];

    let output = run_globlink(args);

    assert!(output.status.success(), "{output:?}");
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "1 created, 3 already linked, 0 replaced, 0 skipped, 0 failed\n"
    );
    assert!(ctx.out().join("a/b/y.txt").is_file());
}
