//! Wizards provided by executables on `PATH`.

use std::ffi::OsString;
use std::path::PathBuf;

use serde::de::DeserializeOwned;

use super::protocol::{Capability, Description, PromptReply, ValidateReply, ValidateRequest};
use super::{PluginResolver, PromptIo, Verdict, Wizard, WizardError};

/// Executable name prefix for wizard plugins.
pub const PLUGIN_PREFIX: &str = "prehook-wizard-";

/// Finds `prehook-wizard-<name>` executables on a search path.
#[derive(Debug, Clone)]
pub struct PathPluginResolver {
    path: Option<OsString>,
    cwd: PathBuf,
}

impl PathPluginResolver {
    pub fn new(path: impl Into<OsString>, cwd: impl Into<PathBuf>) -> Self {
        PathPluginResolver {
            path: Some(path.into()),
            cwd: cwd.into(),
        }
    }

    /// Search the process `PATH` from the current directory.
    pub fn from_env() -> Self {
        PathPluginResolver {
            path: std::env::var_os("PATH"),
            cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }
}

impl PluginResolver for PathPluginResolver {
    fn resolve(&self, name: &str) -> Result<Box<dyn Wizard>, WizardError> {
        let load_failed = |reason: String| WizardError::WizardLoadFailed {
            name: name.to_string(),
            reason,
        };

        if name.is_empty() || name.contains(['/', '\\']) {
            return Err(load_failed("not a valid plugin name".to_string()));
        }
        let executable = format!("{PLUGIN_PREFIX}{name}");
        let exe = which::which_in(&executable, self.path.as_ref(), &self.cwd)
            .map_err(|e| load_failed(format!("{executable}: {e}")))?;

        tracing::debug!(name, exe = %exe.display(), "found wizard plugin");
        Ok(Box::new(ExternalWizard::describe(name, exe)?))
    }
}

/// A wizard plugin speaking the JSON protocol in [`super::protocol`].
#[derive(Debug)]
pub struct ExternalWizard {
    name: String,
    exe: PathBuf,
    validates: bool,
}

impl ExternalWizard {
    /// Ask the plugin at `exe` what it supports.
    ///
    /// Every wizard must be able to prompt; plugins that can't are rejected.
    pub fn describe(name: &str, exe: PathBuf) -> Result<Self, WizardError> {
        let output = duct::cmd(&exe, ["describe"])
            .stdout_capture()
            .stderr_capture()
            .unchecked()
            .run()
            .map_err(|e| WizardError::WizardLoadFailed {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        if !output.status.success() {
            return Err(WizardError::WizardLoadFailed {
                name: name.to_string(),
                reason: format!(
                    "describe exited with {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        let description: Description = decode(name, "describe", &output.stdout)?;
        if !description.can(&Capability::Prompt) {
            return Err(WizardError::MalformedWizard {
                name: name.to_string(),
                reason: "plugin does not offer the prompt capability".to_string(),
            });
        }
        tracing::debug!(name, plugin = %description.name, "described wizard plugin");

        Ok(ExternalWizard {
            name: name.to_string(),
            exe,
            validates: description.can(&Capability::Validate),
        })
    }

    fn malformed(&self, reason: String) -> WizardError {
        WizardError::MalformedWizard {
            name: self.name.clone(),
            reason,
        }
    }
}

impl Wizard for ExternalWizard {
    fn name(&self) -> &str {
        &self.name
    }

    fn supports_validation(&self) -> bool {
        self.validates
    }

    fn validate(&self, message: &str) -> Result<Verdict, WizardError> {
        let request = serde_json::to_vec(&ValidateRequest { message })
            .map_err(|e| self.malformed(e.to_string()))?;
        // Plugin stderr passes through so it can explain a rejection.
        let output = duct::cmd(&self.exe, ["validate"])
            .stdin_bytes(request)
            .stdout_capture()
            .unchecked()
            .run()
            .map_err(|e| self.malformed(format!("validate failed to run: {e}")))?;
        if !output.status.success() {
            return Err(self.malformed(format!("validate exited with {}", output.status)));
        }

        let reply: ValidateReply = decode(&self.name, "validate", &output.stdout)?;
        Ok(if reply.valid {
            Verdict::Valid
        } else {
            Verdict::Invalid(reply.reason)
        })
    }

    fn prompt(&self, _io: &mut dyn PromptIo) -> Result<Option<String>, WizardError> {
        // The plugin owns the terminal; only stdout is captured.
        let output = duct::cmd(&self.exe, ["prompt"])
            .stdout_capture()
            .unchecked()
            .run()
            .map_err(|e| self.malformed(format!("prompt failed to run: {e}")))?;
        if !output.status.success() {
            return Err(self.malformed(format!("prompt exited with {}", output.status)));
        }

        let reply: PromptReply = decode(&self.name, "prompt", &output.stdout)?;
        Ok(reply.message)
    }
}

fn decode<T: DeserializeOwned>(name: &str, request: &str, stdout: &[u8]) -> Result<T, WizardError> {
    serde_json::from_slice(stdout).map_err(|e| WizardError::MalformedWizard {
        name: name.to_string(),
        reason: format!("invalid {request} reply: {e}"),
    })
}
