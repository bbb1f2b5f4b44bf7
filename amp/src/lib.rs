//! amp CLI Library
//!
//! This library provides the command dispatcher behind the `amp` binary:
//! a fixed registry of built-in commands, delegation of unknown commands to
//! `amp-<command>` executables on the search path, and shell completion.
//!
//! ```no_run
//! use amp::cli::{builtin_registry, Dispatcher};
//! use amp::config::CliConfig;
//! use amp::session::Session;
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = CliConfig::builder().with_env_overrides().build()?;
//! let dispatcher = Dispatcher::new(builtin_registry()?, &config);
//! let mut session = Session::new(config);
//!
//! let args = vec!["version".to_string()];
//! let code = dispatcher.dispatch(&mut session, &args)?;
//! assert_eq!(code, 0);
//! # Ok(())
//! # }
//! ```

/// Command registry, dispatcher, delegation and completion.
pub mod cli;

/// Configuration types for the CLI tool.
pub mod config;

// Internal formatting functions - not part of public API
#[doc(hidden)]
pub mod format;

/// Role loading and package resolution for `amp build`.
pub mod packages;

/// Interactive confirmation prompts.
pub mod prompt;

/// Process-scoped state handed to every command.
pub mod session;

/// Version control runner.
pub mod vcs;

#[cfg(test)]
pub mod test_utils;

/// Release string reported by `amp version`.
pub const RELEASE: &str = env!("CARGO_PKG_VERSION");

/// Name of the tool as shown in usage text.
pub const TOOL_NAME: &str = "amp";
