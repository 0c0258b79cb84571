use crate::hook::Orchestrator;
use crate::root::HookEnv;
use crate::tasks::ShellRunner;
use crate::vcs::{GitCli, Vcs};

use super::{hook, EXIT_FAILURE, EXIT_OK};

const LABEL: &str = "pre-commit";

/// The `pre-commit` entry point: skip the hook when there is nothing staged
/// or modified, unless `force` is set.
pub fn run(force: bool, env: &HookEnv) -> i32 {
    let vcs = GitCli;
    let runner = ShellRunner;
    execute(&vcs, &Orchestrator::new(&vcs, &runner), force, env)
}

pub(crate) fn execute(
    vcs: &dyn Vcs,
    orchestrator: &Orchestrator<'_>,
    force: bool,
    env: &HookEnv,
) -> i32 {
    if force {
        println!("forcing {LABEL} execution");
    } else {
        match vcs.has_changes(&env.cwd) {
            Ok(true) => {}
            Ok(false) => {
                println!();
                println!("{LABEL}: No changes detected, bailing out.");
                println!();
                return EXIT_OK;
            }
            Err(e) => {
                tracing::warn!(error = %e, "git status failed");
                eprintln!("{LABEL}: Failed to check for changes. Cannot run the tests.");
                eprintln!("{e}");
                return EXIT_FAILURE;
            }
        }
    }

    hook::execute(orchestrator, LABEL, env)
}
