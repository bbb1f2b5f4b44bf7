//! CLI configuration management
//!
//! Resolves the settings the dispatcher runs with: where the tool lives,
//! how delegate executables are named and found, and which version control
//! program `init` drives.

use amp_core::config::{config_path, instances_root, root_for_executable, CONFIG_ENV};
use amp_core::StaticConfig;
use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Resolved CLI configuration
#[derive(Debug, Clone, PartialEq)]
pub struct CliConfig {
    /// Tool root; instances live next to it
    pub root: PathBuf,

    /// Prefix for delegate executables (`<prefix>-<command>`)
    pub delegate_prefix: String,

    /// Version control program
    pub git: String,

    /// Enable verbose logging
    pub verbose: bool,

    /// Directories searched for delegate executables, `PATH` syntax
    pub search_path: Option<OsString>,
}

impl CliConfig {
    /// Create a new builder for constructing configuration
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Directory holding every instance: the parent of the tool root.
    pub fn instances_root(&self) -> PathBuf {
        instances_root(&self.root)
    }

    /// Directory holding role definitions for `amp build`.
    pub fn roles_dir(&self) -> PathBuf {
        self.root.join("roles")
    }
}

/// Config file path: `AMP_CONFIG` when set, else the platform default.
pub fn config_file_path() -> PathBuf {
    config_path(std::env::var_os(CONFIG_ENV))
}

/// Tool root derived from the running executable (`<root>/bin/amp`).
pub fn root_from_executable() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("Cannot locate the amp executable")?;
    let exe = exe.canonicalize().unwrap_or(exe);
    root_for_executable(&exe)
        .ok_or_else(|| anyhow::anyhow!("Cannot derive the amp root from {}", exe.display()))
}

/// Builder for CLI configuration with validation and priority chain support
///
/// The first source to set a value wins, so sources are applied from the
/// highest priority down:
/// 1. Explicit `with_*` calls
/// 2. Environment variables
/// 3. Config file
/// 4. Defaults
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    root: Option<PathBuf>,
    delegate_prefix: Option<String>,
    git: Option<String>,
    verbose: Option<bool>,
    search_path: Option<OsString>,
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tool root (with validation)
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        Self::validate_root(&root)?;
        self.root = Some(root);
        Ok(self)
    }

    /// Set the delegate prefix (with validation)
    pub fn with_delegate_prefix(mut self, prefix: impl Into<String>) -> Result<Self> {
        let prefix = prefix.into();
        Self::validate_prefix(&prefix)?;
        self.delegate_prefix = Some(prefix);
        Ok(self)
    }

    /// Set the version control program (with validation)
    pub fn with_git(mut self, git: impl Into<String>) -> Result<Self> {
        let git = git.into();
        Self::validate_git(&git)?;
        self.git = Some(git);
        Ok(self)
    }

    /// Set verbose flag
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    /// Set the delegate search path
    pub fn with_search_path(mut self, search_path: impl Into<OsString>) -> Self {
        self.search_path = Some(search_path.into());
        self
    }

    /// Apply environment variable overrides
    pub fn with_env_overrides(mut self) -> Self {
        // Invalid values are ignored so a stray variable cannot break dispatch
        if self.root.is_none() {
            if let Some(root) = std::env::var_os("AMP_ROOT").map(PathBuf::from) {
                if Self::validate_root(&root).is_ok() {
                    self.root = Some(root);
                }
            }
        }

        if self.delegate_prefix.is_none() {
            if let Ok(prefix) = std::env::var("AMP_DELEGATE_PREFIX") {
                if Self::validate_prefix(&prefix).is_ok() {
                    self.delegate_prefix = Some(prefix);
                }
            }
        }

        if self.git.is_none() {
            if let Ok(git) = std::env::var("AMP_GIT") {
                if Self::validate_git(&git).is_ok() {
                    self.git = Some(git);
                }
            }
        }

        if self.verbose.is_none() {
            if let Ok(verbose) = std::env::var("AMP_VERBOSE") {
                self.verbose = Some(verbose.to_lowercase() == "true" || verbose == "1");
            }
        }

        self
    }

    /// Fill unset values from the config file at `path`
    pub fn with_config_file(self, path: &Path) -> Result<Self> {
        let config = StaticConfig::load(path)
            .with_context(|| format!("Failed to load config file {}", path.display()))?;

        Ok(Self {
            root: self.root.or(config.root),
            delegate_prefix: self.delegate_prefix.or(Some(config.delegate_prefix)),
            git: self.git.or(Some(config.git)),
            verbose: self.verbose.or(Some(config.verbose)),
            search_path: self.search_path,
        })
    }

    /// Build the final configuration with validation
    pub fn build(self) -> Result<CliConfig> {
        let defaults = StaticConfig::default();

        let root = match self.root {
            Some(root) => root,
            None => root_from_executable()?,
        };
        let delegate_prefix = self.delegate_prefix.unwrap_or(defaults.delegate_prefix);
        let git = self.git.unwrap_or(defaults.git);

        // Validate final values
        Self::validate_root(&root)?;
        Self::validate_prefix(&delegate_prefix)?;
        Self::validate_git(&git)?;

        Ok(CliConfig {
            root,
            delegate_prefix,
            git,
            verbose: self.verbose.unwrap_or(defaults.verbose),
            search_path: self.search_path.or_else(|| std::env::var_os("PATH")),
        })
    }

    fn validate_root(root: &Path) -> Result<()> {
        if !root.is_absolute() {
            return Err(anyhow::anyhow!(
                "amp root must be an absolute path, got '{}'",
                root.display()
            ));
        }
        Ok(())
    }

    fn validate_prefix(prefix: &str) -> Result<()> {
        if prefix.is_empty() {
            return Err(anyhow::anyhow!("Delegate prefix cannot be empty"));
        }

        if prefix.contains(['/', '\\']) || prefix.chars().any(char::is_whitespace) {
            return Err(anyhow::anyhow!(
                "Invalid delegate prefix '{}'. It cannot contain path separators or whitespace",
                prefix
            ));
        }

        Ok(())
    }

    fn validate_git(git: &str) -> Result<()> {
        if git.trim().is_empty() {
            return Err(anyhow::anyhow!("Version control program cannot be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        std::env::remove_var("AMP_ROOT");
        std::env::remove_var("AMP_DELEGATE_PREFIX");
        std::env::remove_var("AMP_GIT");
        std::env::remove_var("AMP_VERBOSE");
    }

    #[test]
    fn test_builder_with_custom_values() {
        let config = ConfigBuilder::new()
            .with_root("/opt/ampify")
            .unwrap()
            .with_delegate_prefix("ampx")
            .unwrap()
            .with_git("/usr/local/bin/git")
            .unwrap()
            .with_verbose(true)
            .with_search_path("/tmp/bin")
            .build()
            .unwrap();

        assert_eq!(config.root, PathBuf::from("/opt/ampify"));
        assert_eq!(config.delegate_prefix, "ampx");
        assert_eq!(config.git, "/usr/local/bin/git");
        assert!(config.verbose);
        assert_eq!(config.search_path, Some(OsString::from("/tmp/bin")));
    }

    #[test]
    fn test_instances_root_is_parent_of_root() {
        let config = ConfigBuilder::new()
            .with_root("/opt/ampify")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(config.instances_root(), PathBuf::from("/opt"));
        assert_eq!(config.roles_dir(), PathBuf::from("/opt/ampify/roles"));
    }

    #[test]
    fn test_builder_root_validation() {
        assert!(ConfigBuilder::new().with_root("relative/root").is_err());
        assert!(ConfigBuilder::new().with_root("/absolute/root").is_ok());
    }

    #[test]
    fn test_builder_prefix_validation() {
        assert!(ConfigBuilder::new().with_delegate_prefix("").is_err());
        assert!(ConfigBuilder::new().with_delegate_prefix("bin/amp").is_err());
        assert!(ConfigBuilder::new().with_delegate_prefix("amp x").is_err());
        assert!(ConfigBuilder::new().with_delegate_prefix("amp").is_ok());
    }

    #[test]
    fn test_builder_git_validation() {
        assert!(ConfigBuilder::new().with_git("  ").is_err());
        assert!(ConfigBuilder::new().with_git("git").is_ok());
    }

    #[test]
    #[serial]
    fn test_builder_with_env_overrides() {
        clear_env();
        std::env::set_var("AMP_ROOT", "/srv/ampify");
        std::env::set_var("AMP_DELEGATE_PREFIX", "ampy");
        std::env::set_var("AMP_GIT", "hg-git");
        std::env::set_var("AMP_VERBOSE", "1");

        let config = ConfigBuilder::new().with_env_overrides().build().unwrap();

        assert_eq!(config.root, PathBuf::from("/srv/ampify"));
        assert_eq!(config.delegate_prefix, "ampy");
        assert_eq!(config.git, "hg-git");
        assert!(config.verbose);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_builder_invalid_env_values_ignored() {
        clear_env();
        std::env::set_var("AMP_ROOT", "not/absolute");
        std::env::set_var("AMP_DELEGATE_PREFIX", "");

        let config = ConfigBuilder::new()
            .with_env_overrides()
            .with_root("/opt/ampify")
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(config.root, PathBuf::from("/opt/ampify"));
        assert_eq!(config.delegate_prefix, "amp");

        clear_env();
    }

    #[test]
    #[serial]
    fn test_builder_priority_chain() {
        clear_env();
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("config.toml");
        std::fs::write(
            &file,
            "root = \"/from/file\"\ndelegate_prefix = \"file\"\ngit = \"file-git\"\n",
        )
        .unwrap();

        std::env::set_var("AMP_DELEGATE_PREFIX", "env");

        let config = ConfigBuilder::new()
            .with_git("explicit-git")
            .unwrap()
            .with_env_overrides()
            .with_config_file(&file)
            .unwrap()
            .build()
            .unwrap();

        // Explicit beats env, env beats file, file beats defaults
        assert_eq!(config.git, "explicit-git");
        assert_eq!(config.delegate_prefix, "env");
        assert_eq!(config.root, PathBuf::from("/from/file"));
        assert!(!config.verbose);

        clear_env();
    }

    #[test]
    fn test_missing_config_file_is_not_an_error() {
        let temp = tempfile::tempdir().unwrap();
        let config = ConfigBuilder::new()
            .with_config_file(&temp.path().join("missing.toml"))
            .unwrap()
            .with_root("/opt/ampify")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(config.delegate_prefix, "amp");
    }
}
