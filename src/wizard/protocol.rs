//! JSON messages exchanged with external wizard plugins.
//!
//! A plugin is invoked once per request with the request kind as its only
//! argument (`describe`, `validate` or `prompt`). Requests arrive on stdin,
//! replies are read from stdout. Unknown fields are ignored.

use serde::{Deserialize, Serialize};

/// Something a plugin can do.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Validate,
    Prompt,
    #[serde(other)]
    Other,
}

/// Reply to `describe`.
#[derive(Debug, Deserialize)]
pub struct Description {
    pub name: String,
    #[serde(default)]
    pub capabilities: Vec<Capability>,
}

impl Description {
    pub fn can(&self, capability: &Capability) -> bool {
        self.capabilities.contains(capability)
    }
}

/// Request body for `validate`.
#[derive(Debug, Serialize)]
pub struct ValidateRequest<'a> {
    pub message: &'a str,
}

/// Reply to `validate`.
#[derive(Debug, Deserialize)]
pub struct ValidateReply {
    pub valid: bool,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Reply to `prompt`; `null` means the user gave no message.
#[derive(Debug, Deserialize)]
pub struct PromptReply {
    pub message: Option<String>,
}
