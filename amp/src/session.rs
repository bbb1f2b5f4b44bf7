//! Process-scoped state handed to every command
//!
//! A [`Session`] is created once in `main` and passed by reference through
//! the dispatcher; commands never reach for globals.

use std::io::Write;

use crate::config::CliConfig;
use crate::packages::{PackageBuilder, RoleBuilder};
use crate::prompt::{Prompt, StdinPrompt};
use crate::vcs::{GitRunner, Vcs};

pub struct Session {
    pub config: CliConfig,
    pub vcs: Box<dyn Vcs>,
    pub prompt: Box<dyn Prompt>,
    pub packages: Box<dyn PackageBuilder>,
    /// Destination for command output
    pub out: Box<dyn Write>,
}

impl Session {
    /// Session wired to the real collaborators and stdout.
    pub fn new(config: CliConfig) -> Self {
        Self {
            vcs: Box::new(GitRunner::new(config.git.clone())),
            prompt: Box::new(StdinPrompt),
            packages: Box::new(RoleBuilder::new(config.roles_dir())),
            out: Box::new(std::io::stdout()),
            config,
        }
    }
}
