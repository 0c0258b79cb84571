use std::path::{Path, PathBuf};

use super::{ManifestError, MANIFEST_FILE};

/// Find the nearest manifest, starting from `cwd` joined with `prefix`.
///
/// `prefix` is the `GIT_PREFIX` offset git reports when a command runs from a
/// subdirectory; an empty prefix starts at `cwd` itself.
pub fn locate(cwd: &Path, prefix: Option<&Path>) -> Result<PathBuf, ManifestError> {
    let start = match prefix {
        Some(prefix) => cwd.join(prefix),
        None => cwd.to_path_buf(),
    };
    locate_from(&start)
}

/// Walk from `start` towards the filesystem root and return the path of the
/// first manifest found.
///
/// Each directory is checked before deciding whether to stop, so a manifest
/// in the root directory itself is still found. An empty or `.` component
/// left over from a relative start is checked as the working directory and
/// ends the search; so does the filesystem root. Either way the result is
/// [`ManifestError::NotFound`] when nothing matched.
pub fn locate_from(start: &Path) -> Result<PathBuf, ManifestError> {
    for dir in start.ancestors() {
        let unspecified = dir.as_os_str().is_empty() || dir == Path::new(".");
        let listed = if unspecified { Path::new(".") } else { dir };
        if contains_manifest(listed)? {
            let found = dir.join(MANIFEST_FILE);
            tracing::debug!(manifest = %found.display(), "found manifest");
            return Ok(found);
        }
        if unspecified {
            tracing::debug!(start = %start.display(), "manifest search reached an unspecified directory");
            break;
        }
    }

    Err(ManifestError::NotFound {
        start: start.to_path_buf(),
    })
}

/// Whether the directory listing of `dir` contains the manifest file.
///
/// Directories that vanished or cannot be listed are treated as not
/// containing one; the search continues upwards.
fn contains_manifest(dir: &Path) -> Result<bool, ManifestError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e)
            if matches!(
                e.kind(),
                std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied
            ) =>
        {
            tracing::debug!(dir = %dir.display(), error = %e, "skipping unreadable directory");
            return Ok(false);
        }
        Err(e) => return Err(ManifestError::ReadError(e)),
    };
    for entry in entries {
        let entry = entry?;
        if entry.file_name() == MANIFEST_FILE && entry.path().is_file() {
            return Ok(true);
        }
    }
    Ok(false)
}
