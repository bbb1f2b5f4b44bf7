//! Instance naming
//!
//! An instance is a named working directory living next to the tool's own
//! root. Users may pass a path where a name is expected, so every name is
//! normalised to its final path segment before use.

use std::path::{Component, Path, PathBuf};

use crate::error::{AmpError, Result};

/// A normalised reference to an instance directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceRef {
    /// Bare directory name, never containing a path separator
    pub name: String,
    /// Absolute path of the instance under the instances root
    pub root: PathBuf,
}

impl InstanceRef {
    /// Normalise `input` against the current working directory.
    pub fn normalise(input: &str, instances_root: &Path) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        Self::normalise_from(input, &cwd, instances_root)
    }

    /// Normalise `input`, resolving relative paths against `cwd`.
    ///
    /// Existing paths are canonicalised so symlinks resolve to their target
    /// name; other paths are cleaned lexically.
    pub fn normalise_from(input: &str, cwd: &Path, instances_root: &Path) -> Result<Self> {
        let absolute = cwd.join(input);
        let resolved = absolute
            .canonicalize()
            .unwrap_or_else(|_| clean_path(&absolute));

        let name = resolved
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| {
                AmpError::InvalidArguments(format!(
                    "ERROR: Cannot derive an instance name from '{}'",
                    input
                ))
            })?
            .to_string();

        let root = instances_root.join(&name);
        Ok(Self { name, root })
    }

    /// Whether the instance directory is present on disk.
    pub fn exists(&self) -> bool {
        self.root.exists()
    }
}

/// Derive an instance name from a Git URL.
///
/// Takes the final `/` segment and drops its last extension, so
/// `https://host/team/myrepo.git` gives `myrepo`. Returns `None` when
/// nothing is left.
pub fn derive_name_from_url(url: &str) -> Option<String> {
    let segment = url.rsplit('/').next().unwrap_or_default();
    let stem = match segment.rfind('.') {
        Some(idx) => &segment[..idx],
        None => segment,
    };
    if stem.is_empty() {
        None
    } else {
        Some(stem.to_string())
    }
}

fn clean_path(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                cleaned.pop();
            }
            other => cleaned.push(other.as_os_str()),
        }
    }
    cleaned
}
