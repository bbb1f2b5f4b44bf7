//! Version control runner
//!
//! `init` drives Git through the [`Vcs`] trait so the command logic can be
//! exercised without a Git installation.

use amp_core::{AmpError, Result};
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

/// Runs version control commands inside a working directory.
pub trait Vcs {
    /// Run with output passed through to the terminal.
    fn run(&mut self, cwd: &Path, args: &[&str]) -> Result<()>;

    /// Run and return captured standard output.
    fn capture(&mut self, cwd: &Path, args: &[&str]) -> Result<String>;
}

/// [`Vcs`] backed by an external `git` program.
#[derive(Debug, Clone)]
pub struct GitRunner {
    program: String,
}

impl GitRunner {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self, cwd: &Path, args: &[&str]) -> Command {
        debug!(program = %self.program, ?args, cwd = %cwd.display(), "running version control");
        let mut command = Command::new(&self.program);
        command.args(args).current_dir(cwd);
        command
    }

    fn describe(&self, args: &[&str]) -> String {
        std::iter::once(self.program.as_str())
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Vcs for GitRunner {
    fn run(&mut self, cwd: &Path, args: &[&str]) -> Result<()> {
        let status = self.command(cwd, args).status()?;
        if !status.success() {
            return Err(AmpError::Vcs {
                command: self.describe(args),
                status: status.code().unwrap_or(-1),
            });
        }
        Ok(())
    }

    fn capture(&mut self, cwd: &Path, args: &[&str]) -> Result<String> {
        let output = self
            .command(cwd, args)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()?;
        if !output.status.success() {
            return Err(AmpError::Vcs {
                command: self.describe(args),
                status: output.status.code().unwrap_or(-1),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
