//! CLI command resolution and execution
//!
//! This module organizes the CLI into logical submodules:
//! - [`options`] - Per-command option parsers
//! - [`registry`] - The table of built-in commands
//! - [`commands`] - Built-in command definitions
//! - [`handlers`] - Command execution handlers
//! - [`dispatch`] - Resolution of raw arguments to a command
//! - [`delegate`] - External `amp-<command>` executables
//! - [`completion`] - Shell completion

pub mod completion;
pub mod delegate;
pub mod dispatch;
pub mod options;
pub mod registry;

mod commands;
mod handlers;

pub use commands::*;
pub use completion::{Completer, CompletionSpec, CompletionTable};
pub use delegate::Delegate;
pub use dispatch::{resolve, Dispatcher, Resolution};
pub use options::{option_parser, parse_options, Parsed, ParsedInvocation};
pub use registry::{CommandSpec, Flow, Handler, Introspection, Invocation, Registry};
