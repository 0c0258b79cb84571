use crate::hook::{report, HookOutcome, Orchestrator};
use crate::root::HookEnv;
use crate::tasks::ShellRunner;
use crate::vcs::GitCli;

use super::{EXIT_FAILURE, EXIT_OK};

/// Execute the hook for `label` against the real repository and shell.
pub fn run(label: &str, env: &HookEnv) -> i32 {
    let vcs = GitCli;
    let runner = ShellRunner;
    execute(&Orchestrator::new(&vcs, &runner), label, env)
}

/// Run `label` through `orchestrator` and turn the outcome into an exit code.
///
/// Failures are reported on stderr before returning.
pub(crate) fn execute(orchestrator: &Orchestrator<'_>, label: &str, env: &HookEnv) -> i32 {
    match orchestrator.run(label, env) {
        Ok(HookOutcome::Completed { .. }) => EXIT_OK,
        Ok(HookOutcome::NothingToDo(_)) => {
            println!();
            println!("{label}: Nothing the hook needs to do. Bailing out.");
            println!();
            EXIT_OK
        }
        Err(failure) => {
            report::print(&failure);
            EXIT_FAILURE
        }
    }
}
