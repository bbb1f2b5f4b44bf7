//! Configuration types for amp
//!
//! [`StaticConfig`] is the on-disk TOML file, read once at startup. The CLI
//! crate layers environment overrides on top of it.

mod paths;
mod static_config;

pub use paths::{
    config_path, default_config_path, instances_root, root_for_executable, CONFIG_ENV,
};
pub use static_config::{StaticConfig, DEFAULT_DELEGATE_PREFIX, DEFAULT_GIT_PROGRAM};
