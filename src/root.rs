//! Project root resolution.

use std::path::{Path, PathBuf};

use crate::manifest::{self, Manifest, ManifestError};
use crate::vcs::{Vcs, VcsError};

/// Where an invocation starts looking for its project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookEnv {
    /// Working directory of the invoking process.
    pub cwd: PathBuf,
    /// Offset below `cwd` to start the manifest search from (`GIT_PREFIX`).
    pub prefix: Option<PathBuf>,
}

impl HookEnv {
    pub fn new(cwd: impl Into<PathBuf>, prefix: Option<PathBuf>) -> Self {
        HookEnv {
            cwd: cwd.into(),
            prefix: prefix.filter(|p| !p.as_os_str().is_empty()),
        }
    }

    /// The directory the manifest search starts from.
    pub fn search_start(&self) -> PathBuf {
        match &self.prefix {
            Some(prefix) => self.cwd.join(prefix),
            None => self.cwd.clone(),
        }
    }
}

/// Errors that stop root resolution.
#[derive(Debug, thiserror::Error)]
pub enum RootError {
    #[error("failed to find the git root, cannot run the hook")]
    NoVersionControlRoot(#[source] VcsError),
    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

/// The outcome of root resolution for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoot {
    /// Directory every task runs in.
    pub root: PathBuf,
    /// Top-level directory reported by the VCS.
    pub vcs_root: PathBuf,
    /// Where the manifest search started.
    pub search_start: PathBuf,
    /// The parsed manifest, when one was found.
    pub manifest: Option<Manifest>,
}

/// Resolve the project root.
///
/// With a manifest, the root is the manifest's directory, or `prehook-cwd`
/// joined onto the VCS root when declared. Without one, the VCS root is used;
/// absence is not an error here. A manifest that exists but does not parse
/// is.
pub fn resolve(vcs: &dyn Vcs, env: &HookEnv) -> Result<ResolvedRoot, RootError> {
    let vcs_root = vcs
        .toplevel(&env.cwd)
        .map_err(RootError::NoVersionControlRoot)?;
    let search_start = env.search_start();

    let manifest = match manifest::locate_from(&search_start) {
        Ok(path) => Some(Manifest::load(&path)?),
        Err(ManifestError::NotFound { start }) => {
            tracing::debug!(
                start = %start.display(),
                vcs_root = %vcs_root.display(),
                "no manifest found, falling back to the git root"
            );
            None
        }
        Err(e) => return Err(e.into()),
    };

    let root = match &manifest {
        Some(manifest) => project_root(&vcs_root, manifest),
        None => vcs_root.clone(),
    };
    tracing::debug!(root = %root.display(), "resolved project root");

    Ok(ResolvedRoot {
        root,
        vcs_root,
        search_start,
        manifest,
    })
}

fn project_root(vcs_root: &Path, manifest: &Manifest) -> PathBuf {
    match &manifest.relocation {
        Some(relocation) => normalize(&vcs_root.join(relocation)),
        None => manifest.dir().to_path_buf(),
    }
}

/// Lexically collapse `.` and `..` components.
fn normalize(path: &Path) -> PathBuf {
    use std::path::Component;

    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
