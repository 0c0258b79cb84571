// Shared helpers for binary tests: throwaway git repositories and a runner
// for the prehook binary.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

pub fn binary_path() -> PathBuf {
    let path = PathBuf::from(env!("CARGO_BIN_EXE_prehook"));
    assert!(path.exists(), "binary not found at {}", path.display());
    path
}

/// A git repository in a temp dir.
pub struct Repo {
    dir: TempDir,
}

impl Repo {
    pub fn new() -> Self {
        let repo = Repo {
            dir: TempDir::new().expect("failed to create temp dir"),
        };
        repo.git(&["init", "--quiet"]);
        repo.git(&["config", "user.email", "dev@example.com"]);
        repo.git(&["config", "user.name", "Dev"]);
        repo.git(&["config", "commit.gpgsign", "false"]);
        repo
    }

    /// A repository with `prehook.kdl` at its root.
    pub fn with_manifest(manifest: &str) -> Self {
        let repo = Repo::new();
        repo.write("prehook.kdl", manifest);
        repo
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, rel: &str, content: &str) {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent dir");
        }
        fs::write(path, content).expect("failed to write file");
    }

    pub fn exists(&self, rel: &str) -> bool {
        self.path().join(rel).exists()
    }

    /// Run git in the repository root; panics on failure.
    pub fn git(&self, args: &[&str]) -> String {
        let output = Command::new("git")
            .args(args)
            .current_dir(self.path())
            .output()
            .expect("failed to run git");
        assert!(
            output.status.success(),
            "git {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).into_owned()
    }

    /// Run git and return (stdout, stderr, exit_code) without asserting.
    pub fn try_git(&self, args: &[&str]) -> (String, String, i32) {
        let output = Command::new("git")
            .args(args)
            .current_dir(self.path())
            .env("NO_COLOR", "1")
            .output()
            .expect("failed to run git");
        (
            String::from_utf8_lossy(&output.stdout).into_owned(),
            String::from_utf8_lossy(&output.stderr).into_owned(),
            output.status.code().unwrap_or(-1),
        )
    }

    /// Stage and commit everything without running hooks.
    pub fn commit_all(&self) {
        self.git(&["add", "-A"]);
        self.git(&["commit", "--quiet", "--no-verify", "-m", "chore: setup"]);
    }

    pub fn run(&self, args: &[&str]) -> (String, String, i32) {
        run_in(self.path(), args, &[])
    }
}

/// Runs the binary in `dir` with `args` and extra environment.
/// Returns (stdout, stderr, exit_code).
pub fn run_in(dir: &Path, args: &[&str], env: &[(&str, &str)]) -> (String, String, i32) {
    let mut cmd = Command::new(binary_path());
    cmd.args(args)
        .current_dir(dir)
        .env_remove("GIT_PREFIX")
        .env_remove("PREHOOK_LOG")
        .env("NO_COLOR", "1");
    for (key, value) in env {
        cmd.env(key, value);
    }
    let output = cmd.output().expect("failed to execute binary");

    let stdout = String::from_utf8(output.stdout).expect("stdout not valid UTF-8");
    let stderr = String::from_utf8(output.stderr).expect("stderr not valid UTF-8");
    let exit_code = output.status.code().unwrap_or(-1);
    (stdout, stderr, exit_code)
}
