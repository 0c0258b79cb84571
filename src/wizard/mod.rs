//! Commit message wizards: selection, validation and guided authoring.
//!
//! A wizard is named in the manifest (`wizard "<name>"`, or a single-string
//! `commit-msg` entry). Names go through the alias table first; anything the
//! registry does not know is handed to a [`PluginResolver`].

pub mod builtin;
pub mod external;
pub mod prompt;
pub mod protocol;

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::manifest::{Manifest, ManifestError};
use crate::vcs::VcsError;

pub use builtin::{ConventionalWizard, SimpleWizard};
pub use external::{ExternalWizard, PathPluginResolver};
pub use prompt::TerminalPrompt;

/// Errors from picking, running or checking a wizard.
#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("unknown commit message wizard {name:?}: {implementation} is not available")]
    UnknownWizard {
        name: String,
        implementation: String,
    },
    #[error("could not load commit message wizard {name:?}: {reason}")]
    WizardLoadFailed { name: String, reason: String },
    #[error("commit message wizard {name:?} is malformed: {reason}")]
    MalformedWizard { name: String, reason: String },
    #[error("{0}")]
    EmptyOrInvalidMessage(String),
    #[error("failed to read commit message from {}", path.display())]
    MessageFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Prompt(#[from] PromptError),
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    #[error(transparent)]
    Vcs(#[from] VcsError),
}

/// Errors from an interactive prompt.
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("prompt cancelled")]
    Cancelled,
    #[error("terminal prompt failed: {0}")]
    Terminal(#[from] dialoguer::Error),
}

/// Question/answer channel a wizard talks to while authoring a message.
pub trait PromptIo {
    /// Ask the user to pick one of `items`; returns its index.
    fn select(&mut self, prompt: &str, items: &[String]) -> Result<usize, PromptError>;

    /// Ask for a line of text.
    fn input(&mut self, prompt: &str, allow_empty: bool) -> Result<String, PromptError>;
}

/// Result of validating a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    Invalid(Option<String>),
}

impl Verdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid)
    }

    fn invalid(reason: impl Into<String>) -> Self {
        Verdict::Invalid(Some(reason.into()))
    }
}

/// A commit message wizard.
pub trait Wizard {
    fn name(&self) -> &str;

    /// Whether [`Wizard::validate`] is meaningful for this wizard.
    fn supports_validation(&self) -> bool {
        true
    }

    fn validate(&self, message: &str) -> Result<Verdict, WizardError>;

    /// Guide the user through writing a message. `None` means the user
    /// produced no message.
    fn prompt(&self, io: &mut dyn PromptIo) -> Result<Option<String>, WizardError>;
}

/// Loads wizards the registry does not know by name.
pub trait PluginResolver {
    fn resolve(&self, name: &str) -> Result<Box<dyn Wizard>, WizardError>;
}

type Factory = fn() -> Box<dyn Wizard>;

/// Maps wizard names to built-in implementations, falling back to plugins.
pub struct WizardRegistry {
    aliases: BTreeMap<String, String>,
    wizards: BTreeMap<String, Factory>,
    plugins: Box<dyn PluginResolver>,
}

impl WizardRegistry {
    /// Registry with no aliases or built-ins.
    pub fn empty(plugins: Box<dyn PluginResolver>) -> Self {
        WizardRegistry {
            aliases: BTreeMap::new(),
            wizards: BTreeMap::new(),
            plugins,
        }
    }

    /// The built-in aliases and wizards, with external plugins from `PATH`.
    pub fn builtin() -> Self {
        Self::builtin_with(Box::new(PathPluginResolver::from_env()))
    }

    pub fn builtin_with(plugins: Box<dyn PluginResolver>) -> Self {
        Self::empty(plugins)
            .with_alias("simple", builtin::SIMPLE_ID)
            .with_alias("conventional", builtin::CONVENTIONAL_ID)
            .with_alias("cz-conventional-changelog", builtin::CONVENTIONAL_ID)
            .with_wizard(builtin::SIMPLE_ID, || Box::new(SimpleWizard))
            .with_wizard(builtin::CONVENTIONAL_ID, || Box::new(ConventionalWizard))
    }

    pub fn with_alias(mut self, name: &str, implementation: &str) -> Self {
        self.aliases
            .insert(name.to_string(), implementation.to_string());
        self
    }

    pub fn with_wizard(mut self, implementation: &str, factory: Factory) -> Self {
        self.wizards.insert(implementation.to_string(), factory);
        self
    }

    /// Load the wizard called `name`.
    pub fn load(&self, name: &str) -> Result<Box<dyn Wizard>, WizardError> {
        if let Some(implementation) = self.aliases.get(name) {
            tracing::debug!(name, %implementation, "loading built-in wizard");
            return match self.wizards.get(implementation) {
                Some(factory) => Ok(factory()),
                None => Err(WizardError::UnknownWizard {
                    name: name.to_string(),
                    implementation: implementation.clone(),
                }),
            };
        }
        if let Some(factory) = self.wizards.get(name) {
            tracing::debug!(name, "loading built-in wizard by implementation id");
            return Ok(factory());
        }
        tracing::debug!(name, "resolving external wizard");
        self.plugins.resolve(name)
    }

    /// The wizard the manifest asks for, if any.
    pub fn pick(&self, manifest: &Manifest) -> Result<Option<Box<dyn Wizard>>, WizardError> {
        match manifest.wizard_name() {
            Some(name) => {
                tracing::debug!(name, manifest = %manifest.path.display(), "using commit message wizard");
                self.load(name).map(Some)
            }
            None => {
                tracing::debug!(manifest = %manifest.path.display(), "no commit message wizard set");
                Ok(None)
            }
        }
    }
}

/// Check a complete message against `wizard`.
///
/// Empty messages and messages with an empty first line are rejected without
/// consulting the wizard.
pub fn check_message(wizard: &dyn Wizard, message: &str) -> Result<(), WizardError> {
    if message.is_empty() {
        return Err(WizardError::EmptyOrInvalidMessage(
            "missing commit message".to_string(),
        ));
    }
    if message.lines().next().unwrap_or("").is_empty() {
        return Err(WizardError::EmptyOrInvalidMessage(
            "missing first line".to_string(),
        ));
    }

    match wizard.validate(message)? {
        Verdict::Valid => Ok(()),
        Verdict::Invalid(reason) => {
            let heading = match reason {
                Some(reason) => format!("Invalid commit message ({reason})"),
                None => "Invalid commit message".to_string(),
            };
            Err(WizardError::EmptyOrInvalidMessage(format!(
                "{heading}\n{message}"
            )))
        }
    }
}
