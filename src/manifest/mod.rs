mod document;
pub mod locate;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use document::{ManifestDocument, ManifestSection, ParseNode};

pub use locate::{locate, locate_from};

/// File name searched for by the manifest locator.
pub const MANIFEST_FILE: &str = "prehook.kdl";

/// Name of the namespaced configuration block.
pub const NAMESPACE: &str = "prehook";

/// Top-level node relocating the project root relative to the VCS root.
pub const RELOCATION_NODE: &str = "prehook-cwd";

/// Node naming the commit message wizard.
pub const WIZARD_NODE: &str = "wizard";

/// Label whose single-string value doubles as a wizard name.
pub const COMMIT_MSG_LABEL: &str = "commit-msg";

/// Typed view of a `prehook.kdl` project manifest.
///
/// Parsed once per invocation and never written back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    /// Absolute path of the manifest file this was loaded from.
    pub path: PathBuf,
    /// Hook labels declared at the top level.
    pub hooks: BTreeMap<String, TaskSpec>,
    /// Hook labels declared inside the `prehook { … }` block.
    pub namespaced: BTreeMap<String, TaskSpec>,
    /// `wizard` declared inside the block.
    pub namespaced_wizard: Option<String>,
    /// `wizard` declared at the top level.
    pub wizard: Option<String>,
    /// `prehook-cwd`, relative to the version-control root.
    pub relocation: Option<PathBuf>,
}

/// The declared shape of one hook label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskSpec {
    /// `pre-commit "cargo test"`
    Single(String),
    /// `pre-commit "cargo fmt --check" "cargo test"`, or no argument at all.
    List(Vec<String>),
}

/// Errors that can occur when locating, loading, or parsing a manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("could not find {MANIFEST_FILE} starting from {}", start.display())]
    NotFound { start: PathBuf },
    #[error("failed to read manifest: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("invalid KDL syntax: {0}")]
    ParseError(String),
    #[error("malformed manifest {}, line {line}: {message}", path.display())]
    Malformed {
        path: PathBuf,
        line: usize,
        message: String,
    },
}

impl Manifest {
    /// Load a manifest from disk.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let doc = ManifestDocument::load(path)?;
        Self::from_document(&doc, path)
    }

    /// Parse manifest source text. `path` is used for diagnostics and to
    /// derive the project directory.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ManifestError> {
        let doc = ManifestDocument::parse(content)?;
        Self::from_document(&doc, path)
    }

    /// Directory containing the manifest file.
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or(Path::new("/"))
    }

    /// The declared entry for `label`: top level first, then the namespaced block.
    pub fn entry(&self, label: &str) -> Option<&TaskSpec> {
        self.hooks
            .get(label)
            .or_else(|| self.namespaced.get(label))
    }

    /// The configured wizard name, if any.
    ///
    /// Precedence: `wizard` in the block, `wizard` at the top level, then a
    /// single-string `commit-msg` in the block or at the top level.
    pub fn wizard_name(&self) -> Option<&str> {
        self.namespaced_wizard
            .as_deref()
            .or(self.wizard.as_deref())
            .or_else(|| from_commit_msg(&self.namespaced))
            .or_else(|| from_commit_msg(&self.hooks))
    }

    fn from_document(doc: &ManifestDocument, path: &Path) -> Result<Self, ManifestError> {
        let mut manifest = Manifest {
            path: path.to_path_buf(),
            hooks: BTreeMap::new(),
            namespaced: BTreeMap::new(),
            namespaced_wizard: None,
            wizard: None,
            relocation: None,
        };

        let malformed = |node: &ParseNode, message: String| ManifestError::Malformed {
            path: path.to_path_buf(),
            line: node.line(),
            message,
        };

        let mut seen_namespace = false;
        for node in doc.root().nodes() {
            match node.name() {
                NAMESPACE => {
                    if seen_namespace {
                        return Err(malformed(&node, format!("duplicate `{NAMESPACE}` block")));
                    }
                    seen_namespace = true;
                    if node.entry_count() > 0 {
                        return Err(malformed(
                            &node,
                            format!("`{NAMESPACE}` takes a block, not arguments"),
                        ));
                    }
                    if let Some(block) = node.children() {
                        let (hooks, wizard) = parse_block(&block, path, false)?;
                        manifest.namespaced = hooks;
                        manifest.namespaced_wizard = wizard;
                    }
                }
                RELOCATION_NODE => {
                    let value = single_string(&node, path)?;
                    manifest.relocation = Some(PathBuf::from(value));
                }
                _ => {}
            }
        }

        let (hooks, wizard) = parse_block(&doc.root(), path, true)?;
        manifest.hooks = hooks;
        manifest.wizard = wizard;
        Ok(manifest)
    }
}

impl TaskSpec {
    /// Normalize to an ordered command list. A bare string becomes `[command]`.
    pub fn to_list(&self) -> Vec<String> {
        match self {
            TaskSpec::Single(command) => vec![command.clone()],
            TaskSpec::List(commands) => commands.clone(),
        }
    }

    fn push(&mut self, commands: Vec<String>) {
        let mut merged = self.to_list();
        merged.extend(commands);
        *self = TaskSpec::List(merged);
    }
}

/// Collect hook labels and the `wizard` node from one block.
///
/// At the top level the reserved nodes are skipped; they were handled by the
/// caller. Repeated labels merge in declaration order.
fn parse_block(
    block: &ManifestSection,
    path: &Path,
    top_level: bool,
) -> Result<(BTreeMap<String, TaskSpec>, Option<String>), ManifestError> {
    let mut hooks: BTreeMap<String, TaskSpec> = BTreeMap::new();
    let mut wizard = None;

    for node in block.nodes() {
        let name = node.name();
        if top_level && (name == NAMESPACE || name == RELOCATION_NODE) {
            continue;
        }
        if name == WIZARD_NODE {
            let value = single_string(&node, path)?;
            if value.trim().is_empty() {
                return Err(ManifestError::Malformed {
                    path: path.to_path_buf(),
                    line: node.line(),
                    message: "expected a wizard name, got an empty string".to_string(),
                });
            }
            wizard = Some(value);
            continue;
        }
        if !top_level && (name == NAMESPACE || name == RELOCATION_NODE) {
            return Err(ManifestError::Malformed {
                path: path.to_path_buf(),
                line: node.line(),
                message: format!("`{name}` is only allowed at the top level"),
            });
        }

        let spec = task_spec(&node, path)?;
        match hooks.get_mut(name) {
            Some(existing) => existing.push(spec.to_list()),
            None => {
                hooks.insert(name.to_string(), spec);
            }
        }
    }

    Ok((hooks, wizard))
}

fn from_commit_msg(table: &BTreeMap<String, TaskSpec>) -> Option<&str> {
    match table.get(COMMIT_MSG_LABEL) {
        Some(TaskSpec::Single(name)) if !name.trim().is_empty() => Some(name.as_str()),
        _ => None,
    }
}

fn task_spec(node: &ParseNode, path: &Path) -> Result<TaskSpec, ManifestError> {
    let malformed = |message: String| ManifestError::Malformed {
        path: path.to_path_buf(),
        line: node.line(),
        message,
    };
    if node.children().is_some() {
        return Err(malformed(format!(
            "hook `{}` takes command strings as arguments, not a block",
            node.name()
        )));
    }
    let commands = node.string_arguments().ok_or_else(|| {
        malformed(format!(
            "hook `{}` accepts only string commands",
            node.name()
        ))
    })?;
    Ok(match commands.as_slice() {
        [single] => TaskSpec::Single((*single).to_string()),
        many => TaskSpec::List(many.iter().map(|c| (*c).to_string()).collect()),
    })
}

fn single_string(node: &ParseNode, path: &Path) -> Result<String, ManifestError> {
    match node.string_arguments().as_deref() {
        Some([value]) if node.children().is_none() => Ok((*value).to_string()),
        _ => Err(ManifestError::Malformed {
            path: path.to_path_buf(),
            line: node.line(),
            message: format!("`{}` expects exactly one string", node.name()),
        }),
    }
}
