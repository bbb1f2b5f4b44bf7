//! Output formatting utilities for the CLI
//!
//! User-facing messages, coloured by severity. Diagnostics for developers go
//! through `tracing` instead.

use colored::*;

/// Severity of a user-facing message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warn,
    Error,
}

/// Format a message at the given severity
pub fn format_log(message: &str, severity: Severity) -> String {
    match severity {
        Severity::Info => message.to_string(),
        Severity::Warn => message.yellow().to_string(),
        Severity::Error => message.red().to_string(),
    }
}

/// Format error message
pub fn format_error(message: &str) -> String {
    format_log(message, Severity::Error)
}

/// Format success message
pub fn format_success(message: &str) -> String {
    format!("{} {}", "✓".green().bold(), message)
}

/// Format one row of the command table in the usage text
pub fn format_command_row(name: &str, help: &str) -> String {
    format!("    {:<8} {}", name, help)
}
