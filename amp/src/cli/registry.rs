//! The table of built-in commands
//!
//! A [`CommandSpec`] bundles everything the dispatcher and the completion
//! engine need to know about a command: its name, one-line help, and a
//! handler that can either execute the command or describe its parser.

use std::collections::HashMap;

use amp_core::{AmpError, Result};
use clap::Command;

use super::completion::{Completer, CompletionSpec};
use crate::session::Session;

/// Names intercepted by the dispatcher before any registry lookup.
pub const RESERVED_NAMES: &[&str] = &["help", "version"];

/// How a handler is being called
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    /// Arguments following the command name
    pub argv: &'a [String],
    /// Describe the parser instead of running the command
    pub completion: bool,
}

impl<'a> Invocation<'a> {
    pub fn execute(argv: &'a [String]) -> Self {
        Self {
            argv,
            completion: false,
        }
    }

    pub fn complete() -> Invocation<'static> {
        Invocation {
            argv: &[],
            completion: true,
        }
    }
}

/// What a handler hands back to introspection
#[derive(Debug)]
pub enum Introspection {
    /// The parser alone; its completer is the command's fixed values.
    Parser(Command),
    /// The parser together with a completer chosen by the handler.
    WithCompleter(Command, Completer),
}

/// Result of calling a handler
#[derive(Debug)]
pub enum Flow {
    /// The command ran; the value is the exit status.
    Done(i32),
    /// The command was called in completion mode.
    Completion(Introspection),
}

/// Signature shared by every command handler
pub type Handler = fn(&mut Session, Invocation<'_>) -> Result<Flow>;

/// A registered command
#[derive(Clone)]
pub struct CommandSpec {
    pub name: &'static str,
    pub help: &'static str,
    /// Fixed values offered when the handler supplies no completer
    pub values: &'static [&'static str],
    handler: Handler,
}

impl std::fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("help", &self.help)
            .field("values", &self.values)
            .finish()
    }
}

impl CommandSpec {
    pub fn new(name: &'static str, help: &'static str, handler: Handler) -> Self {
        Self {
            name,
            help,
            values: &[],
            handler,
        }
    }

    /// Offer `values` as completions for positional arguments.
    pub fn with_values(mut self, values: &'static [&'static str]) -> Self {
        self.values = values;
        self
    }

    /// Run the command with `argv`, returning its exit status.
    pub fn execute(&self, session: &mut Session, argv: &[String]) -> Result<i32> {
        match (self.handler)(session, Invocation::execute(argv))? {
            Flow::Done(code) => Ok(code),
            Flow::Completion(_) => Err(AmpError::Config(format!(
                "command '{}' returned completion data outside completion mode",
                self.name
            ))),
        }
    }

    /// Call the handler in completion mode and resolve its parser and completer.
    pub fn introspect(&self, session: &mut Session) -> Result<CompletionSpec> {
        match (self.handler)(session, Invocation::complete())? {
            Flow::Completion(Introspection::Parser(parser)) => Ok(CompletionSpec {
                parser,
                completer: Completer::List(self.values.iter().map(|v| v.to_string()).collect()),
            }),
            Flow::Completion(Introspection::WithCompleter(parser, completer)) => {
                Ok(CompletionSpec { parser, completer })
            }
            Flow::Done(_) => Err(AmpError::Config(format!(
                "command '{}' ran instead of describing its options",
                self.name
            ))),
        }
    }
}

/// Built-in commands keyed by name
#[derive(Debug, Default)]
pub struct Registry {
    commands: HashMap<&'static str, CommandSpec>,
    sorted: Vec<&'static str>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a command. Names must be unique and not reserved.
    pub fn register(&mut self, spec: CommandSpec) -> Result<()> {
        if RESERVED_NAMES.contains(&spec.name) {
            return Err(AmpError::Config(format!(
                "'{}' is handled by the dispatcher and cannot be registered",
                spec.name
            )));
        }
        if self.commands.contains_key(spec.name) {
            return Err(AmpError::DuplicateCommand(spec.name.to_string()));
        }

        let position = self
            .sorted
            .binary_search(&spec.name)
            .unwrap_or_else(|idx| idx);
        self.sorted.insert(position, spec.name);
        self.commands.insert(spec.name, spec);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&CommandSpec> {
        self.commands.get(name)
    }

    /// Command names in alphabetical order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.sorted.iter().copied()
    }

    /// Commands in alphabetical order.
    pub fn iter(&self) -> impl Iterator<Item = &CommandSpec> + '_ {
        self.sorted.iter().filter_map(|name| self.commands.get(name))
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
