use owo_colors::OwoColorize;

use crate::hook::{report, Orchestrator};
use crate::manifest::{self, Manifest};
use crate::root::HookEnv;
use crate::tasks::{self, ShellRunner, TaskRunner};
use crate::vcs::{GitCli, Vcs};
use crate::wizard::{check_message, PromptIo, TerminalPrompt, Wizard, WizardError, WizardRegistry};

use super::{hook, print_error, EXIT_OK, EXIT_REJECTED};

const PRE_COMMIT: &str = "pre-commit";

/// The `commit-wizard` entry point: run pre-commit tasks, then guide the
/// user through writing a message and commit with it.
pub fn run(env: &HookEnv) -> i32 {
    println!("running commit-wizard in folder {}", env.cwd.display());
    let vcs = GitCli;
    let runner = ShellRunner;
    let mut io = TerminalPrompt::default();
    execute(&vcs, &runner, &WizardRegistry::builtin(), &mut io, env)
}

pub(crate) fn execute(
    vcs: &dyn Vcs,
    runner: &dyn TaskRunner,
    registry: &WizardRegistry,
    io: &mut dyn PromptIo,
    env: &HookEnv,
) -> i32 {
    match vcs.has_changes(&env.cwd) {
        Ok(true) => {}
        Ok(false) => {
            println!("Nothing to commit");
            return EXIT_OK;
        }
        Err(e) => {
            print_error(&e);
            return EXIT_REJECTED;
        }
    }

    let (manifest, wizard) = match load(registry, env) {
        Ok(loaded) => loaded,
        Err(e) => {
            print_error(&e);
            return EXIT_REJECTED;
        }
    };

    match tasks::resolve(&manifest, PRE_COMMIT) {
        Some(tasks) if !tasks.is_empty() => {
            println!("{} has {PRE_COMMIT} commands", manifest.path.display());
            println!("{}", tasks.as_slice().join(", "));
            let code = hook::execute(&Orchestrator::new(vcs, runner), PRE_COMMIT, env);
            if code != EXIT_OK {
                return code;
            }
            println!("finished {PRE_COMMIT} check");
        }
        _ => tracing::debug!("no {PRE_COMMIT} commands to run first"),
    }

    let Some(wizard) = wizard else {
        print_guidance();
        return EXIT_REJECTED;
    };

    match author_and_commit(vcs, wizard.as_ref(), io, env) {
        Ok(summary) => {
            println!("{}", summary.trim_end());
            println!("commit wizard has finished");
            EXIT_OK
        }
        Err(e) => {
            print_error(&e);
            EXIT_REJECTED
        }
    }
}

fn load(
    registry: &WizardRegistry,
    env: &HookEnv,
) -> Result<(Manifest, Option<Box<dyn Wizard>>), WizardError> {
    let path = manifest::locate(&env.cwd, env.prefix.as_deref())?;
    let manifest = Manifest::load(&path)?;
    let wizard = registry.pick(&manifest)?;
    Ok((manifest, wizard))
}

/// Prompt, check and commit. The commit is not undone if printing fails
/// afterwards.
fn author_and_commit(
    vcs: &dyn Vcs,
    wizard: &dyn Wizard,
    io: &mut dyn PromptIo,
    env: &HookEnv,
) -> Result<String, WizardError> {
    let message = wizard
        .prompt(io)?
        .filter(|m| !m.is_empty())
        .ok_or_else(|| WizardError::EmptyOrInvalidMessage("No commit message".to_string()))?;
    let message = message.trim();
    println!("{message}");

    check_message(wizard, message)?;
    tracing::debug!(wizard = wizard.name(), "committing");
    Ok(vcs.commit(&env.cwd, message)?)
}

fn print_guidance() {
    let heading = "You have not set the commit message format";
    if report::stderr_supports_color() {
        eprintln!("{}", heading.yellow());
    } else {
        eprintln!("{heading}");
    }
    eprintln!("This wizard does not know what to ask you");
    eprintln!(
        "Maybe try setting up \"simple\" commit message format: add wizard \"simple\" to {}",
        manifest::MANIFEST_FILE
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeVcs, NoPlugins, RecordingRunner, ScriptedPrompt};
    use crate::wizard::Verdict;
    use std::fs;
    use tempfile::TempDir;

    /// Prompts with a padded message and rejects everything.
    struct Sloppy;

    impl Wizard for Sloppy {
        fn name(&self) -> &str {
            "sloppy"
        }

        fn validate(&self, _message: &str) -> Result<Verdict, WizardError> {
            Ok(Verdict::Invalid(None))
        }

        fn prompt(&self, _io: &mut dyn PromptIo) -> Result<Option<String>, WizardError> {
            Ok(Some("  wip  \n".to_string()))
        }
    }

    fn registry() -> WizardRegistry {
        WizardRegistry::builtin_with(Box::new(NoPlugins)).with_wizard("sloppy", || Box::new(Sloppy))
    }

    fn project(manifest: &str) -> TempDir {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("prehook.kdl"), manifest).unwrap();
        tmp
    }

    fn wizard(
        vcs: &FakeVcs,
        runner: &RecordingRunner,
        io: &mut ScriptedPrompt,
        dir: &TempDir,
    ) -> i32 {
        execute(vcs, runner, &registry(), io, &HookEnv::new(dir.path(), None))
    }

    #[test]
    fn nothing_to_commit_exits_zero() {
        let tmp = project("wizard \"simple\"\n");
        let vcs = FakeVcs::at(tmp.path()).clean();
        let mut io = ScriptedPrompt::default();

        let code = wizard(&vcs, &RecordingRunner::default(), &mut io, &tmp);

        assert_eq!(code, EXIT_OK);
        assert!(io.asked.is_empty());
        assert!(vcs.commits().is_empty());
    }

    #[test]
    fn prompts_then_commits() {
        let tmp = project("wizard \"simple\"\n");
        let vcs = FakeVcs::at(tmp.path());
        let mut io = ScriptedPrompt::new(&[0], &["", "add login"]);

        let code = wizard(&vcs, &RecordingRunner::default(), &mut io, &tmp);

        assert_eq!(code, EXIT_OK);
        assert_eq!(vcs.commits(), vec!["feat: add login"]);
    }

    #[test]
    fn pre_commit_tasks_run_before_prompt() {
        let tmp = project("wizard \"simple\"\npre-commit \"lint\" \"test\"\n");
        let vcs = FakeVcs::at(tmp.path());
        let runner = RecordingRunner::default();
        let mut io = ScriptedPrompt::new(&[1], &["", "typo"]);

        let code = wizard(&vcs, &runner, &mut io, &tmp);

        assert_eq!(code, EXIT_OK);
        assert_eq!(runner.ran(), vec!["lint", "test"]);
        assert_eq!(vcs.commits(), vec!["fix: typo"]);
    }

    #[test]
    fn failing_pre_commit_stops_before_prompt() {
        let tmp = project("wizard \"simple\"\npre-commit \"lint\"\n");
        let vcs = FakeVcs::at(tmp.path());
        let runner = RecordingRunner::failing("lint", 1);
        let mut io = ScriptedPrompt::new(&[0], &["", "x"]);

        let code = wizard(&vcs, &runner, &mut io, &tmp);

        assert_eq!(code, 1);
        assert!(io.asked.is_empty());
        assert!(vcs.commits().is_empty());
    }

    #[test]
    fn no_wizard_is_rejected_without_prompting() {
        let tmp = project("pre-push \"test\"\n");
        let vcs = FakeVcs::at(tmp.path());
        let mut io = ScriptedPrompt::default();

        let code = wizard(&vcs, &RecordingRunner::default(), &mut io, &tmp);

        assert_eq!(code, EXIT_REJECTED);
        assert!(io.asked.is_empty());
        assert!(vcs.commits().is_empty());
    }

    #[test]
    fn invalid_message_is_not_committed() {
        let tmp = project("wizard \"sloppy\"\n");
        let vcs = FakeVcs::at(tmp.path());
        let mut io = ScriptedPrompt::default();

        let code = wizard(&vcs, &RecordingRunner::default(), &mut io, &tmp);

        assert_eq!(code, EXIT_REJECTED);
        assert!(vcs.commits().is_empty());
    }

    #[test]
    fn cancelled_prompt_is_rejected() {
        let tmp = project("wizard \"conventional\"\n");
        let vcs = FakeVcs::at(tmp.path());
        let mut io = ScriptedPrompt::default();

        let code = wizard(&vcs, &RecordingRunner::default(), &mut io, &tmp);

        assert_eq!(code, EXIT_REJECTED);
        assert!(vcs.commits().is_empty());
    }

    #[test]
    fn unknown_wizard_fails_before_tasks() {
        let tmp = project("wizard \"acme\"\npre-commit \"lint\"\n");
        let vcs = FakeVcs::at(tmp.path());
        let runner = RecordingRunner::default();
        let mut io = ScriptedPrompt::default();

        let code = wizard(&vcs, &runner, &mut io, &tmp);

        assert_eq!(code, EXIT_REJECTED);
        assert!(runner.ran().is_empty());
    }
}
