/// A validated hook label such as `pre-commit` or `pre-push`.
///
/// Labels are non-empty identifiers: ASCII alphanumerics, `-` and `_`,
/// starting with an alphanumeric character.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HookLabel(pub(crate) String);

/// Rejection reason for a raw label string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected a hook label such as pre-commit or pre-push, got {0:?}")]
pub struct LabelError(pub String);

impl HookLabel {
    /// Validate a raw label.
    pub fn new(raw: &str) -> Result<Self, LabelError> {
        let mut chars = raw.chars();
        let valid_start = chars.next().is_some_and(|c| c.is_ascii_alphanumeric());
        let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if valid_start && valid_rest {
            Ok(HookLabel(raw.to_string()))
        } else {
            Err(LabelError(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The flag a user passes to git to bypass this hook.
    pub fn bypass_flag(&self) -> &'static str {
        bypass_flag(&self.0)
    }
}

/// The git flag that skips the hook named `label`.
///
/// `git push` has no short form for `--no-verify`.
pub fn bypass_flag(label: &str) -> &'static str {
    if label == "pre-push" {
        "--no-verify"
    } else {
        "-n (--no-verify)"
    }
}

impl PartialEq<str> for HookLabel {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for HookLabel {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl std::fmt::Display for HookLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
