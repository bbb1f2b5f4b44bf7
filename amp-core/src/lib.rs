//! amp Core Library
//!
//! Shared types, instance naming and configuration for the `amp` instance
//! manager. This crate performs no process spawning; the CLI crate builds
//! on top of it.

pub mod config;
pub mod error;
pub mod instance;

// Re-export commonly used types
pub use config::{config_path, default_config_path, StaticConfig};
pub use error::*;
pub use instance::{derive_name_from_url, InstanceRef};
