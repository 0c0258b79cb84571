pub mod report;

use std::fmt;
use std::path::PathBuf;

use crate::domain::{bypass_flag, HookLabel, LabelError};
use crate::manifest::ManifestError;
use crate::root::{self, HookEnv, RootError};
use crate::tasks::{self, TaskError, TaskRunner};
use crate::vcs::{Vcs, VcsError};

/// Lifecycle of one hook invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    RootResolving,
    TasksListed,
    Running,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::RootResolving => "resolving the project root",
            Stage::TasksListed => "listing tasks",
            Stage::Running => "running tasks",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Errors that fail a hook.
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("invalid hook label")]
    InvalidLabel(#[from] LabelError),
    #[error("failed to find the git root, cannot run the hook")]
    NoVersionControlRoot(#[source] VcsError),
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    #[error("{command} closed with code {code}")]
    TaskFailed { command: String, code: i32 },
    #[error("failed to start task {command:?}")]
    TaskSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to check for changes, cannot run the hook")]
    ChangesCheck(#[source] VcsError),
}

impl HookError {
    /// Stable identifier of the error class, shown in failure reports.
    pub fn class(&self) -> &'static str {
        match self {
            HookError::InvalidLabel(_) => "prehook::invalid_label",
            HookError::NoVersionControlRoot(_) => "prehook::no_version_control_root",
            HookError::Manifest(ManifestError::NotFound { .. }) => "prehook::manifest_not_found",
            HookError::Manifest(ManifestError::Malformed { .. })
            | HookError::Manifest(ManifestError::ParseError(_)) => "prehook::manifest_malformed",
            HookError::Manifest(ManifestError::ReadError(_)) => "prehook::manifest_unreadable",
            HookError::TaskFailed { .. } => "prehook::task_failed",
            HookError::TaskSpawn { .. } => "prehook::task_spawn",
            HookError::ChangesCheck(_) => "prehook::changes_check",
        }
    }

    /// The task command involved, if any.
    pub fn command(&self) -> Option<&str> {
        match self {
            HookError::TaskFailed { command, .. } | HookError::TaskSpawn { command, .. } => {
                Some(command)
            }
            _ => None,
        }
    }
}

impl From<RootError> for HookError {
    fn from(e: RootError) -> Self {
        match e {
            RootError::NoVersionControlRoot(source) => HookError::NoVersionControlRoot(source),
            RootError::Manifest(source) => HookError::Manifest(source),
        }
    }
}

impl From<TaskError> for HookError {
    fn from(e: TaskError) -> Self {
        match e {
            TaskError::Failed { command, code } => HookError::TaskFailed { command, code },
            TaskError::Spawn { command, source } => HookError::TaskSpawn { command, source },
        }
    }
}

/// A failed hook: the error plus where it happened.
///
/// Implements [`miette::Diagnostic`]: the code is the error class and the
/// help text is the git flag that bypasses the hook.
#[derive(Debug)]
pub struct HookFailure {
    pub label: String,
    pub stage: Stage,
    pub error: HookError,
}

impl HookFailure {
    pub fn new(label: &str, stage: Stage, error: HookError) -> Self {
        HookFailure {
            label: label.to_string(),
            stage,
            error,
        }
    }

    pub fn bypass_flag(&self) -> &'static str {
        bypass_flag(&self.label)
    }
}

impl fmt::Display for HookFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} hook failed while {}", self.label, self.stage)
    }
}

impl std::error::Error for HookFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl miette::Diagnostic for HookFailure {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.error.class()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!(
            "You can skip the git hook by running with {}",
            self.bypass_flag()
        )))
    }
}

/// Why a hook had nothing to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoWork {
    /// The manifest does not mention the label.
    Undeclared,
    /// The label is declared with no commands.
    EmptyTaskList,
}

/// Successful end of a hook invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookOutcome {
    /// Every task passed, in order.
    Completed { root: PathBuf, passed: Vec<String> },
    NothingToDo(NoWork),
}

/// Sequences root resolution, task resolution and task execution for a hook.
pub struct Orchestrator<'a> {
    vcs: &'a dyn Vcs,
    runner: &'a dyn TaskRunner,
}

impl<'a> Orchestrator<'a> {
    pub fn new(vcs: &'a dyn Vcs, runner: &'a dyn TaskRunner) -> Self {
        Orchestrator { vcs, runner }
    }

    /// Run every task declared for `label`, stopping at the first failure.
    #[tracing::instrument(skip(self, env), fields(cwd = %env.cwd.display()))]
    pub fn run(&self, label: &str, env: &HookEnv) -> Result<HookOutcome, HookFailure> {
        let mut stage = Stage::Idle;
        match self.drive(label, env, &mut stage) {
            Ok(outcome) => {
                transition(&mut stage, Stage::Done);
                Ok(outcome)
            }
            Err(error) => {
                let failed_at = stage;
                transition(&mut stage, Stage::Failed);
                tracing::debug!(class = error.class(), %failed_at, "hook failed");
                Err(HookFailure::new(label, failed_at, error))
            }
        }
    }

    fn drive(
        &self,
        label: &str,
        env: &HookEnv,
        stage: &mut Stage,
    ) -> Result<HookOutcome, HookError> {
        let label = HookLabel::new(label)?;

        transition(stage, Stage::RootResolving);
        let resolved = root::resolve(self.vcs, env)?;
        tracing::debug!(root = %resolved.root.display(), "running hook at root");

        transition(stage, Stage::TasksListed);
        // Root resolution tolerates a missing manifest; task lookup does not.
        let manifest = resolved
            .manifest
            .as_ref()
            .ok_or_else(|| ManifestError::NotFound {
                start: resolved.search_start.clone(),
            })?;
        let tasks = match tasks::resolve(manifest, label.as_str()) {
            Some(tasks) if tasks.is_empty() => {
                tracing::debug!(%label, "label declared with an empty task list");
                return Ok(HookOutcome::NothingToDo(NoWork::EmptyTaskList));
            }
            Some(tasks) => tasks,
            None => {
                tracing::debug!(%label, manifest = %manifest.path.display(), "label not declared in manifest");
                return Ok(HookOutcome::NothingToDo(NoWork::Undeclared));
            }
        };

        transition(stage, Stage::Running);
        let mut passed = Vec::with_capacity(tasks.len());
        for command in &tasks {
            let message = self.runner.run(&resolved.root, command)?;
            println!("{message}");
            passed.push(message);
        }
        tracing::debug!(%label, count = passed.len(), "finished all tasks");

        Ok(HookOutcome::Completed {
            root: resolved.root,
            passed,
        })
    }
}

fn transition(stage: &mut Stage, next: Stage) {
    tracing::debug!(from = %stage, to = %next, "hook stage");
    *stage = next;
}
