//! Git hook shims that call back into prehook.
//!
//! Installation is additive: when a hook script already exists, the prehook
//! call is appended below a marker comment so user-written hooks keep
//! working. Uninstall strips only the marked lines.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::vcs::VcsError;

/// Hooks prehook installs shims for.
pub const MANAGED_HOOKS: [&str; 3] = ["pre-commit", "pre-push", "commit-msg"];

/// Marker comment placed on the line before each prehook call.
pub const MARKER: &str = "# prehook: managed hook, remove with `prehook uninstall`";

#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    #[error("failed to locate the git hooks directory")]
    HooksDir(#[source] VcsError),
    #[error("failed to update {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// What `install` did to one hook file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Installed {
    Created,
    Appended,
    AlreadyPresent,
}

/// What `uninstall` did to one hook file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removed {
    Deleted,
    Stripped,
    NotPresent,
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> InstallError + '_ {
    move |source| InstallError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Single-quote `program` for `sh`.
fn shell_quote(program: &str) -> String {
    format!("'{}'", program.replace('\'', r"'\''"))
}

fn shim_call(program: &str, hook: &str) -> String {
    format!("{MARKER}\n{} {hook} \"$@\" || exit $?", shell_quote(program))
}

/// Write a shim for every managed hook into `hooks_dir`, calling `program`.
pub fn install(
    hooks_dir: &Path,
    program: &str,
) -> Result<Vec<(&'static str, Installed)>, InstallError> {
    fs::create_dir_all(hooks_dir).map_err(io_error(hooks_dir))?;

    let mut actions = Vec::with_capacity(MANAGED_HOOKS.len());
    for hook in MANAGED_HOOKS {
        let path = hooks_dir.join(hook);
        let call = shim_call(program, hook);

        let action = match fs::read_to_string(&path) {
            Ok(content) if content.contains(MARKER) => Installed::AlreadyPresent,
            Ok(content) => {
                let updated = format!("{}\n\n{call}\n", content.trim_end());
                fs::write(&path, updated).map_err(io_error(&path))?;
                Installed::Appended
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                fs::write(&path, format!("#!/bin/sh\n\n{call}\n")).map_err(io_error(&path))?;
                Installed::Created
            }
            Err(e) => return Err(io_error(&path)(e)),
        };
        if action != Installed::AlreadyPresent {
            make_executable(&path)?;
        }
        tracing::debug!(hook, path = %path.display(), ?action, "installed hook");
        actions.push((hook, action));
    }
    Ok(actions)
}

/// Remove prehook's lines from every managed hook in `hooks_dir`.
///
/// Files left with nothing but a shebang and blank lines are deleted.
pub fn uninstall(hooks_dir: &Path) -> Result<Vec<(&'static str, Removed)>, InstallError> {
    let mut actions = Vec::with_capacity(MANAGED_HOOKS.len());
    for hook in MANAGED_HOOKS {
        let path = hooks_dir.join(hook);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                actions.push((hook, Removed::NotPresent));
                continue;
            }
            Err(e) => return Err(io_error(&path)(e)),
        };
        if !content.contains(MARKER) {
            actions.push((hook, Removed::NotPresent));
            continue;
        }

        let kept = strip_marked(&content);
        let meaningful = kept
            .iter()
            .any(|line| !line.trim().is_empty() && !line.starts_with("#!"));

        let action = if meaningful {
            fs::write(&path, format!("{}\n", kept.join("\n").trim_end()))
                .map_err(io_error(&path))?;
            Removed::Stripped
        } else {
            fs::remove_file(&path).map_err(io_error(&path))?;
            Removed::Deleted
        };
        tracing::debug!(hook, path = %path.display(), ?action, "uninstalled hook");
        actions.push((hook, action));
    }
    Ok(actions)
}

/// Drop each marker line and the call that follows it.
fn strip_marked(content: &str) -> Vec<&str> {
    let mut kept = Vec::new();
    let mut lines = content.lines();
    while let Some(line) = lines.next() {
        if line == MARKER {
            lines.next();
        } else {
            kept.push(line);
        }
    }
    kept
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<(), InstallError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).map_err(io_error(path))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<(), InstallError> {
    Ok(())
}
