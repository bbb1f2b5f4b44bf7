//! Role loading for `amp build`
//!
//! A role names the set of dependency packages an instance needs. Roles are
//! TOML files under `<root>/roles/`:
//!
//! ```toml
//! packages = ["python", "redis"]
//! ```
//!
//! Only resolution lives here; fetching and compiling packages is left to
//! the packages themselves.

use amp_core::{AmpError, Result};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::{debug, info};

/// Name of the role used when `--role` is not given.
pub const DEFAULT_ROLE: &str = "default";

/// Loads a role and installs the packages it names.
pub trait PackageBuilder {
    /// Select `role` for the next [`PackageBuilder::install_packages`] call.
    fn load_role(&mut self, role: &str) -> Result<()>;

    /// Install the loaded role's packages, returning their names in order.
    fn install_packages(&mut self) -> Result<Vec<String>>;
}

#[derive(Debug, Default, Deserialize)]
struct RoleFile {
    #[serde(default)]
    packages: Vec<String>,
}

/// [`PackageBuilder`] reading role files from a directory.
#[derive(Debug)]
pub struct RoleBuilder {
    roles_dir: PathBuf,
    role: Option<String>,
    packages: Vec<String>,
}

impl RoleBuilder {
    pub fn new(roles_dir: impl Into<PathBuf>) -> Self {
        Self {
            roles_dir: roles_dir.into(),
            role: None,
            packages: Vec::new(),
        }
    }
}

impl PackageBuilder for RoleBuilder {
    fn load_role(&mut self, role: &str) -> Result<()> {
        if role.is_empty() || role.contains(['/', '\\']) || role.starts_with('.') {
            return Err(AmpError::Role(format!("Invalid role name '{}'", role)));
        }

        let path = self.roles_dir.join(format!("{}.toml", role));
        let file = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            toml::from_str::<RoleFile>(&content).map_err(|e| {
                AmpError::Role(format!("Couldn't parse role file {}: {}", path.display(), e))
            })?
        } else if role == DEFAULT_ROLE {
            RoleFile::default()
        } else {
            return Err(AmpError::Role(format!(
                "Couldn't find the '{}' role at {}",
                role,
                path.display()
            )));
        };

        debug!(role, packages = file.packages.len(), "loaded role");
        self.role = Some(role.to_string());
        self.packages = file.packages;
        Ok(())
    }

    fn install_packages(&mut self) -> Result<Vec<String>> {
        let role = self
            .role
            .as_deref()
            .ok_or_else(|| AmpError::Role("No role has been loaded".to_string()))?;

        let mut resolved: Vec<String> = Vec::with_capacity(self.packages.len());
        for package in &self.packages {
            if !resolved.contains(package) {
                resolved.push(package.clone());
            }
        }

        info!(role, count = resolved.len(), "resolved packages");
        Ok(resolved)
    }
}
