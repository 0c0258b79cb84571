use std::path::{Path, PathBuf};

use crate::install::{self, InstallError, Installed, Removed};
use crate::root::HookEnv;
use crate::vcs::{GitCli, Vcs};

use super::{print_error, EXIT_FAILURE, EXIT_OK};

/// Write hook shims into `hooks_dir`, or git's hooks directory by default.
pub fn run_install(hooks_dir: Option<&Path>, env: &HookEnv) -> i32 {
    let result = hooks_path(&GitCli, hooks_dir, env).and_then(|dir| {
        let program = program()?;
        Ok((install::install(&dir, &program)?, dir))
    });
    match result {
        Ok((actions, dir)) => {
            for (hook, action) in actions {
                let what = match action {
                    Installed::Created => "installed",
                    Installed::Appended => "appended to existing",
                    Installed::AlreadyPresent => "already installed",
                };
                println!("{hook}: {what} ({})", dir.join(hook).display());
            }
            EXIT_OK
        }
        Err(e) => {
            print_error(&e);
            EXIT_FAILURE
        }
    }
}

/// Remove prehook's shims from `hooks_dir`, or git's hooks directory.
pub fn run_uninstall(hooks_dir: Option<&Path>, env: &HookEnv) -> i32 {
    let result =
        hooks_path(&GitCli, hooks_dir, env).and_then(|dir| install::uninstall(&dir));
    match result {
        Ok(actions) => {
            for (hook, action) in actions {
                let what = match action {
                    Removed::Deleted => "removed",
                    Removed::Stripped => "removed prehook lines",
                    Removed::NotPresent => "not installed",
                };
                println!("{hook}: {what}");
            }
            EXIT_OK
        }
        Err(e) => {
            print_error(&e);
            EXIT_FAILURE
        }
    }
}

fn hooks_path(
    vcs: &dyn Vcs,
    hooks_dir: Option<&Path>,
    env: &HookEnv,
) -> Result<PathBuf, InstallError> {
    match hooks_dir {
        Some(dir) => Ok(env.cwd.join(dir)),
        None => vcs.hooks_dir(&env.cwd).map_err(InstallError::HooksDir),
    }
}

/// Path of the running binary, for the shims to call.
fn program() -> Result<String, InstallError> {
    let exe = std::env::current_exe().map_err(|source| InstallError::Io {
        path: PathBuf::from("prehook"),
        source,
    })?;
    Ok(exe.to_string_lossy().into_owned())
}
