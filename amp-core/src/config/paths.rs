//! Filesystem layout of an amp installation
//!
//! The tool lives in a root directory with its executable at `<root>/bin/amp`.
//! Instances are siblings of that root. The config file defaults to the
//! platform config directory and can be redirected with [`CONFIG_ENV`].

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "AMP_CONFIG";

/// Platform default for the config file: `<config dir>/amp/config.toml`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("/etc"))
        .join("amp")
        .join("config.toml")
}

/// Config file to read, honouring an explicit override.
///
/// An empty override is ignored.
pub fn config_path(explicit: Option<OsString>) -> PathBuf {
    explicit
        .filter(|path| !path.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path)
}

/// Tool root for an executable installed at `<root>/bin/<name>`.
pub fn root_for_executable(exe: &Path) -> Option<PathBuf> {
    exe.parent().and_then(Path::parent).map(Path::to_path_buf)
}

/// Directory holding every instance: the parent of the tool root.
///
/// A root with no parent is its own instances directory.
pub fn instances_root(root: &Path) -> PathBuf {
    root.parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.to_path_buf())
}
