// Contract tests: assert only durable external invariants (stream routing,
// exit codes, the bypass hint, color handling) rather than exact wording.

mod common;

use common::{binary_path, run_in, Repo};
use std::process::Command;

// ---- Surface ----

#[test]
fn contract_help_lists_entry_points() {
    let output = Command::new(binary_path()).arg("--help").output().unwrap();
    let help = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    for command in [
        "run",
        "pre-commit",
        "pre-push",
        "commit-msg",
        "commit-wizard",
        "install",
        "uninstall",
    ] {
        assert!(help.contains(command), "help should list {command}:\n{help}");
    }
}

#[test]
fn contract_version_flag() {
    let output = Command::new(binary_path()).arg("--version").output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("prehook "));
}

#[test]
fn contract_unknown_subcommand_is_a_usage_error() {
    let output = Command::new(binary_path()).arg("pre-rebase").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ---- Streams ----

#[test]
fn contract_task_output_passes_through_unmodified() {
    let repo = Repo::with_manifest(r#"pre-push "printf 'raw\tline\n'" "echo oops >&2""#);

    let (stdout, stderr, code) = repo.run(&["pre-push"]);

    assert_eq!(code, 0);
    assert!(stdout.contains("raw\tline\n"));
    assert!(stderr.contains("oops\n"));
}

#[test]
fn contract_failure_report_goes_to_stderr() {
    let repo = Repo::with_manifest(r#"pre-push "exit 3""#);

    let (stdout, stderr, code) = repo.run(&["pre-push"]);

    assert_eq!(code, 1);
    assert!(stderr.contains("You've failed to pass all the hooks."));
    assert!(!stdout.contains("You've failed to pass all the hooks."));
}

#[test]
fn contract_successful_runs_log_nothing_by_default() {
    let repo = Repo::with_manifest(r#"pre-push "true""#);

    let (_, install, code) = repo.run(&["install"]);
    assert_eq!(code, 0);
    assert!(install.is_empty(), "{install}");

    let (_, push, code) = repo.run(&["pre-push"]);
    assert_eq!(code, 0);
    assert!(!push.contains("INFO"), "{push}");
}

#[test]
fn contract_no_color_means_no_escape_codes() {
    let repo = Repo::with_manifest(r#"pre-push "exit 1""#);

    let (stdout, stderr, _) = repo.run(&["pre-push"]);

    assert!(!stderr.contains('\u{1b}'), "{stderr}");
    assert!(!stdout.contains('\u{1b}'), "{stdout}");
}

// ---- Exit codes and hints ----

#[test]
fn contract_bypass_hint_depends_on_label() {
    let repo = Repo::with_manifest("pre-push \"exit 1\"\npre-commit \"exit 1\"\n");

    let (_, push, _) = repo.run(&["pre-push"]);
    assert!(push.contains("--no-verify"));
    assert!(!push.contains("-n (--no-verify)"));

    let (_, commit, _) = repo.run(&["pre-commit", "--force"]);
    assert!(commit.contains("-n (--no-verify)"));
}

#[test]
fn contract_empty_git_prefix_is_accepted() {
    let repo = Repo::with_manifest("pre-push \"touch ran\"\nwizard \"simple\"\n");
    repo.write("MSG", "feat: add login\n");

    let (_, stderr, code) = run_in(repo.path(), &["pre-push"], &[("GIT_PREFIX", "")]);
    assert_eq!(code, 0, "{stderr}");
    assert!(repo.exists("ran"));

    let (_, stderr, code) = run_in(repo.path(), &["commit-msg", "MSG"], &[("GIT_PREFIX", "")]);
    assert_eq!(code, 0, "{stderr}");
}

#[test]
fn contract_missing_manifest_fails_task_hooks() {
    // Assumes no prehook.kdl above the temp dir.
    let repo = Repo::new();

    let (_, stderr, code) = repo.run(&["pre-push"]);

    assert_eq!(code, 1);
    assert!(stderr.contains("prehook.kdl"), "{stderr}");
}

#[test]
fn contract_outside_repository_fails() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("prehook.kdl"), r#"pre-push "true""#).unwrap();

    // Assumes the temp dir is not inside a git repository.
    let (_, stderr, code) = run_in(dir.path(), &["pre-push"], &[]);

    assert_eq!(code, 1);
    assert!(stderr.contains("git root"), "{stderr}");
}

#[test]
fn contract_malformed_manifest_fails() {
    let repo = Repo::with_manifest("pre-push 42\n");

    let (_, stderr, code) = repo.run(&["pre-push"]);

    assert_eq!(code, 1);
    assert!(stderr.contains("prehook::manifest_malformed"), "{stderr}");
}

#[test]
fn contract_invalid_label_fails() {
    let repo = Repo::with_manifest(r#"pre-push "true""#);

    let (_, _, code) = repo.run(&["run", "not a label"]);

    assert_eq!(code, 1);
}

#[test]
fn contract_rejected_message_exits_255() {
    let repo = Repo::with_manifest(r#"wizard "simple""#);
    repo.write("MSG", "\nbody without header\n");

    let (_, _, code) = repo.run(&["commit-msg", "MSG"]);

    assert_eq!(code, 255);
}

#[test]
fn contract_install_is_idempotent() {
    let repo = Repo::new();

    let (_, _, first) = repo.run(&["install"]);
    let before = std::fs::read_to_string(repo.path().join(".git/hooks/pre-push")).unwrap();
    let (_, _, second) = repo.run(&["install"]);
    let after = std::fs::read_to_string(repo.path().join(".git/hooks/pre-push")).unwrap();

    assert_eq!((first, second), (0, 0));
    assert_eq!(before, after);
}
