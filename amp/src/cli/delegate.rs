//! External `amp-<command>` executables
//!
//! Any command `amp` does not know is looked up on the search path as
//! `<prefix>-<command>`, the way `git foo` finds `git-foo`. The executable
//! inherits the terminal and its exit status becomes ours.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use amp_core::{AmpError, Result};
use tracing::{debug, info};

use crate::config::CliConfig;

/// Joins the prefix and the command name.
pub const SEPARATOR: char = '-';

/// Locates and runs delegate executables
#[derive(Debug, Clone)]
pub struct Delegate {
    prefix: String,
    search_path: Option<OsString>,
}

impl Delegate {
    pub fn new(prefix: impl Into<String>, search_path: Option<OsString>) -> Self {
        Self {
            prefix: prefix.into(),
            search_path,
        }
    }

    pub fn from_config(config: &CliConfig) -> Self {
        Self::new(config.delegate_prefix.clone(), config.search_path.clone())
    }

    /// Executable name for `command`, e.g. `amp-foo`.
    pub fn executable_name(&self, command: &str) -> String {
        format!("{}{}{}", self.prefix, SEPARATOR, command)
    }

    /// Full path of the delegate for `command`, if one is installed.
    pub fn locate(&self, command: &str) -> Option<PathBuf> {
        // A command with a separator would escape the search directories
        if command.is_empty() || command.contains(['/', '\\']) {
            return None;
        }

        let name = self.executable_name(command);
        let search_path = self.search_path.as_ref()?;
        std::env::split_paths(search_path)
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(|dir| dir.join(&name))
            .find(|candidate| is_executable(candidate))
    }

    /// Run the delegate for `command` with `argv`, waiting for it to exit.
    pub fn run(&self, command: &str, argv: &[String]) -> Result<i32> {
        let path = self
            .locate(command)
            .ok_or_else(|| AmpError::UnknownCommand(command.to_string()))?;

        info!(command, executable = %path.display(), "delegating");
        let status = Command::new(&path).args(argv).status()?;
        let code = exit_code(status);
        debug!(command, code, "delegate exited");
        Ok(code)
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    status
        .code()
        .or_else(|| status.signal().map(|signal| 128 + signal))
        .unwrap_or(1)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}
