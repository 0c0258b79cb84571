//! Version control adapter.
//!
//! Everything prehook needs from git goes through the [`Vcs`] trait so the
//! orchestrator can be exercised without a repository. [`GitCli`] shells out
//! to the `git` binary.

use std::path::{Path, PathBuf};

/// Errors from invoking the version-control tool.
#[derive(Debug, thiserror::Error)]
pub enum VcsError {
    #[error("failed to run git: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("`git {args}` exited with code {code}: {stderr}")]
    CommandFailed {
        args: String,
        code: i32,
        stderr: String,
    },
}

/// Repository operations used by the hooks and the commit wizard.
pub trait Vcs {
    /// Absolute path of the repository's top-level directory.
    fn toplevel(&self, cwd: &Path) -> Result<PathBuf, VcsError>;

    /// Whether the working tree has anything to commit.
    fn has_changes(&self, cwd: &Path) -> Result<bool, VcsError>;

    /// Absolute path of the `.git` directory.
    fn git_dir(&self, cwd: &Path) -> Result<PathBuf, VcsError>;

    /// Directory git reads hooks from (honors `core.hooksPath`).
    fn hooks_dir(&self, cwd: &Path) -> Result<PathBuf, VcsError>;

    /// Create a commit with `message` and return git's summary output.
    fn commit(&self, cwd: &Path, message: &str) -> Result<String, VcsError>;
}

/// [`Vcs`] backed by the `git` command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitCli;

impl GitCli {
    fn git(&self, cwd: &Path, args: &[&str]) -> Result<String, VcsError> {
        tracing::debug!(cwd = %cwd.display(), ?args, "running git");
        let output = duct::cmd("git", args)
            .dir(cwd)
            .stdout_capture()
            .stderr_capture()
            .unchecked()
            .run()?;

        if !output.status.success() {
            return Err(VcsError::CommandFailed {
                args: args.join(" "),
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Run a `rev-parse` style query and resolve the printed path against `cwd`.
    fn path_query(&self, cwd: &Path, args: &[&str]) -> Result<PathBuf, VcsError> {
        let printed = self.git(cwd, args)?;
        Ok(cwd.join(printed.trim()))
    }
}

impl Vcs for GitCli {
    fn toplevel(&self, cwd: &Path) -> Result<PathBuf, VcsError> {
        self.path_query(cwd, &["rev-parse", "--show-toplevel"])
    }

    fn has_changes(&self, cwd: &Path) -> Result<bool, VcsError> {
        let status = self.git(cwd, &["status", "--porcelain"])?;
        Ok(!status.trim().is_empty())
    }

    fn git_dir(&self, cwd: &Path) -> Result<PathBuf, VcsError> {
        self.path_query(cwd, &["rev-parse", "--git-dir"])
    }

    fn hooks_dir(&self, cwd: &Path) -> Result<PathBuf, VcsError> {
        self.path_query(cwd, &["rev-parse", "--git-path", "hooks"])
    }

    fn commit(&self, cwd: &Path, message: &str) -> Result<String, VcsError> {
        self.git(cwd, &["commit", "-m", message])
    }
}
