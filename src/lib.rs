pub mod domain;
pub mod hook;
pub mod install;
pub mod logging;
pub mod manifest;
pub mod root;
pub mod tasks;
pub mod vcs;
pub mod wizard;

pub(crate) mod cli;

#[cfg(test)]
mod testing;

use std::path::Path;

pub use root::HookEnv;

// Binary entry points. They bridge `main.rs` to the library without exposing
// `cli` internals; each returns the process exit code. Library callers should
// use [`hook::Orchestrator`] and [`wizard::WizardRegistry`] directly.

/// Run the tasks declared for any hook label.
pub fn run_hook(label: &str, env: &HookEnv) -> i32 {
    cli::hook::run(label, env)
}

/// Run `pre-commit`, skipping it on a clean tree unless `force` is set.
pub fn run_pre_commit(force: bool, env: &HookEnv) -> i32 {
    cli::pre_commit::run(force, env)
}

/// Validate the commit message in `file` (git's pending message by default).
pub fn run_commit_msg(file: Option<&Path>, env: &HookEnv) -> i32 {
    cli::commit_msg::run(file, env)
}

/// Interactive commit: pre-commit tasks, message prompt, commit.
pub fn run_commit_wizard(env: &HookEnv) -> i32 {
    cli::wizard::run(env)
}

pub fn run_install(hooks_dir: Option<&Path>, env: &HookEnv) -> i32 {
    cli::install::run_install(hooks_dir, env)
}

pub fn run_uninstall(hooks_dir: Option<&Path>, env: &HookEnv) -> i32 {
    cli::install::run_uninstall(hooks_dir, env)
}
