//! Test doubles shared by unit tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use crate::tasks::{TaskError, TaskRunner};
use crate::vcs::{Vcs, VcsError};
use crate::wizard::{PluginResolver, PromptError, PromptIo, Wizard, WizardError};

/// In-memory [`Vcs`] with a fixed top level.
pub(crate) struct FakeVcs {
    root: Option<PathBuf>,
    changes: bool,
    toplevel_calls: Cell<usize>,
    commits: RefCell<Vec<String>>,
}

impl FakeVcs {
    pub(crate) fn at(root: &Path) -> Self {
        FakeVcs {
            root: Some(root.to_path_buf()),
            changes: true,
            toplevel_calls: Cell::new(0),
            commits: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn outside_repository() -> Self {
        FakeVcs {
            root: None,
            ..FakeVcs::at(Path::new("/"))
        }
    }

    pub(crate) fn clean(mut self) -> Self {
        self.changes = false;
        self
    }

    pub(crate) fn toplevel_calls(&self) -> usize {
        self.toplevel_calls.get()
    }

    pub(crate) fn commits(&self) -> Vec<String> {
        self.commits.borrow().clone()
    }

    fn not_a_repository() -> VcsError {
        VcsError::CommandFailed {
            args: "rev-parse --show-toplevel".to_string(),
            code: 128,
            stderr: "fatal: not a git repository".to_string(),
        }
    }
}

impl Vcs for FakeVcs {
    fn toplevel(&self, _cwd: &Path) -> Result<PathBuf, VcsError> {
        self.toplevel_calls.set(self.toplevel_calls.get() + 1);
        self.root.clone().ok_or_else(FakeVcs::not_a_repository)
    }

    fn has_changes(&self, _cwd: &Path) -> Result<bool, VcsError> {
        match self.root {
            Some(_) => Ok(self.changes),
            None => Err(FakeVcs::not_a_repository()),
        }
    }

    fn git_dir(&self, _cwd: &Path) -> Result<PathBuf, VcsError> {
        self.root
            .as_ref()
            .map(|root| root.join(".git"))
            .ok_or_else(FakeVcs::not_a_repository)
    }

    fn hooks_dir(&self, cwd: &Path) -> Result<PathBuf, VcsError> {
        self.git_dir(cwd).map(|dir| dir.join("hooks"))
    }

    fn commit(&self, _cwd: &Path, message: &str) -> Result<String, VcsError> {
        self.commits.borrow_mut().push(message.to_string());
        Ok(format!("[main 0000000] {}", message.lines().next().unwrap_or("")))
    }
}

/// [`TaskRunner`] that records commands instead of running them.
#[derive(Default)]
pub(crate) struct RecordingRunner {
    fail: Option<(String, i32)>,
    ran: RefCell<Vec<(PathBuf, String)>>,
}

impl RecordingRunner {
    /// Fails `command` with `code`; every other command passes.
    pub(crate) fn failing(command: &str, code: i32) -> Self {
        RecordingRunner {
            fail: Some((command.to_string(), code)),
            ran: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn ran(&self) -> Vec<String> {
        self.ran.borrow().iter().map(|(_, c)| c.clone()).collect()
    }

    pub(crate) fn roots(&self) -> Vec<PathBuf> {
        self.ran.borrow().iter().map(|(r, _)| r.clone()).collect()
    }
}

impl TaskRunner for RecordingRunner {
    fn run(&self, root: &Path, command: &str) -> Result<String, TaskError> {
        self.ran
            .borrow_mut()
            .push((root.to_path_buf(), command.to_string()));
        match &self.fail {
            Some((failing, code)) if failing == command => Err(TaskError::Failed {
                command: command.to_string(),
                code: *code,
            }),
            _ => Ok(format!("task \"{command}\" passed")),
        }
    }
}

/// [`PromptIo`] answering from a queue, recording the prompts it saw.
#[derive(Default)]
pub(crate) struct ScriptedPrompt {
    selections: VecDeque<usize>,
    inputs: VecDeque<String>,
    pub(crate) asked: Vec<String>,
}

impl ScriptedPrompt {
    pub(crate) fn new(selections: &[usize], inputs: &[&str]) -> Self {
        ScriptedPrompt {
            selections: selections.iter().copied().collect(),
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            asked: Vec::new(),
        }
    }
}

impl PromptIo for ScriptedPrompt {
    fn select(&mut self, prompt: &str, _items: &[String]) -> Result<usize, PromptError> {
        self.asked.push(prompt.to_string());
        self.selections.pop_front().ok_or(PromptError::Cancelled)
    }

    fn input(&mut self, prompt: &str, _allow_empty: bool) -> Result<String, PromptError> {
        self.asked.push(prompt.to_string());
        self.inputs.pop_front().ok_or(PromptError::Cancelled)
    }
}

/// [`PluginResolver`] that knows no plugins.
pub(crate) struct NoPlugins;

impl PluginResolver for NoPlugins {
    fn resolve(&self, name: &str) -> Result<Box<dyn Wizard>, WizardError> {
        Err(WizardError::WizardLoadFailed {
            name: name.to_string(),
            reason: "no plugins configured".to_string(),
        })
    }
}
