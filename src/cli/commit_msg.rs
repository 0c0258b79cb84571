use std::fs;
use std::path::Path;

use crate::manifest::{self, Manifest};
use crate::root::HookEnv;
use crate::vcs::{GitCli, Vcs};
use crate::wizard::{check_message, WizardError, WizardRegistry};

use super::{print_error, EXIT_OK, EXIT_REJECTED};

/// The `commit-msg` entry point: validate the message git is about to record.
pub fn run(file: Option<&Path>, env: &HookEnv) -> i32 {
    match execute(&GitCli, &WizardRegistry::builtin(), file, env) {
        Ok(()) => EXIT_OK,
        Err(e) => {
            print_error(&e);
            EXIT_REJECTED
        }
    }
}

/// Check the message in `file` (default `<git-dir>/COMMIT_EDITMSG`) against
/// the manifest's wizard. No wizard means nothing to check.
pub(crate) fn execute(
    vcs: &dyn Vcs,
    registry: &WizardRegistry,
    file: Option<&Path>,
    env: &HookEnv,
) -> Result<(), WizardError> {
    // Unlike the task hooks, a missing manifest is an error here.
    let path = manifest::locate(&env.cwd, env.prefix.as_deref())?;
    let manifest = Manifest::load(&path)?;

    let Some(wizard) = registry.pick(&manifest)? else {
        tracing::debug!(manifest = %path.display(), "no commit message wizard defined");
        return Ok(());
    };
    if !wizard.supports_validation() {
        return Err(WizardError::MalformedWizard {
            name: wizard.name().to_string(),
            reason: "wizard cannot validate messages".to_string(),
        });
    }

    let file = match file {
        Some(file) => env.cwd.join(file),
        None => vcs.git_dir(&env.cwd)?.join("COMMIT_EDITMSG"),
    };
    let raw = fs::read_to_string(&file).map_err(|source| WizardError::MessageFile {
        path: file.clone(),
        source,
    })?;

    let message = commit_message(&raw);
    tracing::debug!(wizard = wizard.name(), file = %file.display(), "checking commit message");
    check_message(wizard.as_ref(), &message)
}

/// The message as git will record it: comment lines and trailing whitespace
/// removed.
fn commit_message(raw: &str) -> String {
    raw.lines()
        .filter(|line| !line.starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n")
        .trim_end()
        .to_string()
}
