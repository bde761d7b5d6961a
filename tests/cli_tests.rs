use assert_cmd::cargo;
use predicates::prelude::*;
use tempfile::TempDir;

/// A command with a clean environment, run from an empty directory so no
/// `.env` file is picked up.
fn reporter(dir: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo::cargo_bin_cmd!("activity-reporter");
    cmd.env_clear().current_dir(dir.path());
    cmd
}

#[test]
fn test_rejects_bad_date_format() {
    let dir = TempDir::new().unwrap();

    reporter(&dir)
        .args([
            "octocat/Hello-World",
            "--action",
            "commits",
            "--start",
            "2023/01/01",
            "--end",
            "2023-01-31",
            "--credential",
            "inline",
            "--token",
            "ghp_unused",
        ])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Invalid date '2023/01/01'"));
}

#[test]
fn test_rejects_repository_without_separator() {
    let dir = TempDir::new().unwrap();

    reporter(&dir)
        .args([
            "octocat",
            "--action",
            "issues",
            "--start",
            "2023-01-01",
            "--end",
            "2023-01-31",
            "--credential",
            "inline",
            "--token",
            "ghp_unused",
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid repository 'octocat'"));
}

#[test]
fn test_rejects_inverted_window() {
    let dir = TempDir::new().unwrap();

    reporter(&dir)
        .args([
            "octocat/Hello-World",
            "--action",
            "pulls",
            "--start",
            "2023-02-01",
            "--end",
            "2023-01-01",
            "--credential",
            "inline",
            "--token",
            "ghp_unused",
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("is after end date"));
}

#[test]
fn test_rejects_unknown_action() {
    let dir = TempDir::new().unwrap();

    reporter(&dir)
        .args([
            "octocat/Hello-World",
            "--action",
            "merges",
            "--start",
            "2023-01-01",
            "--end",
            "2023-01-31",
        ])
        .assert()
        .failure();
}

#[test]
fn test_inline_strategy_requires_token() {
    let dir = TempDir::new().unwrap();

    reporter(&dir)
        .args([
            "octocat/Hello-World",
            "--action",
            "commits",
            "--start",
            "2023-01-01",
            "--end",
            "2023-01-31",
            "--credential",
            "inline",
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("No credential available from --token"));
}

#[test]
fn test_missing_credential_file() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("no-such-token");

    reporter(&dir)
        .env("ACTIVITY_CREDENTIAL_FILE", &missing)
        .env("ACTIVITY_REPO", "octocat/Hello-World")
        .args([
            "--action",
            "commits",
            "--start",
            "2023-01-01",
            "--end",
            "2023-01-31",
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to read credential file"));
}

#[test]
fn test_error_is_printed_when_logging_is_filtered_out() {
    for filter in ["octocrab=debug", "off"] {
        let dir = TempDir::new().unwrap();

        reporter(&dir)
            .env("RUST_LOG", filter)
            .args([
                "octocat/Hello-World",
                "--action",
                "commits",
                "--start",
                "2023/01/01",
                "--end",
                "2023-01-31",
                "--credential",
                "inline",
                "--token",
                "ghp_unused",
            ])
            .assert()
            .failure()
            .code(1)
            .stderr(predicate::str::contains("Error: Invalid date '2023/01/01'"));
    }
}

#[test]
fn test_piped_stderr_has_no_ansi_escapes() {
    let dir = TempDir::new().unwrap();

    reporter(&dir)
        .env("RUST_LOG", "activity_reporter=info")
        .args([
            "octocat/Hello-World",
            "--action",
            "commits",
            "--start",
            "2023-02-01",
            "--end",
            "2023-01-01",
            "--credential",
            "inline",
            "--token",
            "ghp_unused",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is after end date"))
        .stderr(predicate::str::contains("\u{1b}[").not());
}
