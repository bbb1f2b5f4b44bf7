//! Static configuration loaded once at startup

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AmpError, Result};

/// Prefix for delegate executables (`amp-<command>`)
pub const DEFAULT_DELEGATE_PREFIX: &str = "amp";

/// Version control program used by `init`
pub const DEFAULT_GIT_PROGRAM: &str = "git";

/// On-disk configuration for amp.
///
/// Located at `~/.config/amp/config.toml` by default. Every field is
/// optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticConfig {
    /// Tool root; instances live in its parent directory.
    ///
    /// Derived from the executable location when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,

    /// Prefix used to name delegate executables
    pub delegate_prefix: String,

    /// Version control program
    pub git: String,

    /// Enable verbose logging
    pub verbose: bool,
}

impl Default for StaticConfig {
    fn default() -> Self {
        Self {
            root: None,
            delegate_prefix: DEFAULT_DELEGATE_PREFIX.to_string(),
            git: DEFAULT_GIT_PROGRAM.to_string(),
            verbose: false,
        }
    }
}

impl StaticConfig {
    /// Parse StaticConfig from TOML string.
    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize StaticConfig to TOML string.
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Load from `path`, falling back to defaults when the file is absent.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
            .map_err(|e| AmpError::Config(format!("{}: {}", path.display(), e)))
    }
}
