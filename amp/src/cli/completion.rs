//! Shell completion
//!
//! The completion table pairs every command (plus the `help` and `version`
//! pseudo-commands) with its parser and a completer for positional values.
//! Two engines consume it:
//!
//! - a dynamic one following the bash `complete -C` protocol, enabled by
//!   `AMP_COMPLETE=1` with `COMP_LINE`/`COMP_POINT` set, which prints one
//!   candidate per line;
//! - a static one emitting a script for any shell `clap_complete` supports.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use amp_core::Result;
use clap::builder::PossibleValuesParser;
use clap::{Command, ValueHint};
use clap_complete::Shell;
use tracing::debug;

use super::options::{option_parser, ARGS};
use super::registry::Registry;
use crate::session::Session;

/// Environment variable switching `amp` into dynamic completion mode.
pub const COMPLETE_ENV: &str = "AMP_COMPLETE";

/// The line and cursor of a bash `complete -C` request.
///
/// Only `AMP_COMPLETE=1` enables completion, and `COMP_LINE` must be set.
/// A missing or malformed `COMP_POINT` puts the cursor at the end of the line.
pub fn completion_request(
    enabled: Option<&str>,
    line: Option<String>,
    point: Option<&str>,
) -> Option<(String, usize)> {
    if enabled != Some("1") {
        return None;
    }
    let line = line?;
    let point = point
        .and_then(|p| p.parse().ok())
        .unwrap_or(line.len());
    Some((line, point))
}

/// [`completion_request`] read from the process environment.
pub fn completion_request_from_env() -> Option<(String, usize)> {
    let enabled = std::env::var(COMPLETE_ENV).ok();
    let point = std::env::var("COMP_POINT").ok();
    completion_request(
        enabled.as_deref(),
        std::env::var("COMP_LINE").ok(),
        point.as_deref(),
    )
}

/// Source of positional completions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completer {
    /// A fixed list of words
    List(Vec<String>),
    /// Names of the directories under a root
    Dirs(PathBuf),
}

impl Completer {
    /// Candidates starting with `prefix`, sorted.
    pub fn candidates(&self, prefix: &str) -> Vec<String> {
        let mut words: Vec<String> = match self {
            Completer::List(words) => words
                .iter()
                .filter(|w| w.starts_with(prefix))
                .cloned()
                .collect(),
            Completer::Dirs(root) => list_dirs(root)
                .into_iter()
                .filter(|name| name.starts_with(prefix))
                .collect(),
        };
        words.sort();
        words.dedup();
        words
    }
}

fn list_dirs(root: &Path) -> Vec<String> {
    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(root = %root.display(), error = %e, "cannot list completion directory");
            return Vec::new();
        }
    };

    entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| !name.starts_with('.'))
        .collect()
}

/// A command's parser and completer
#[derive(Debug, Clone)]
pub struct CompletionSpec {
    pub parser: Command,
    pub completer: Completer,
}

impl CompletionSpec {
    /// Long and short flags the parser accepts, e.g. `--role`, `-d`.
    pub fn flags(&self) -> Vec<String> {
        let mut flags = Vec::new();
        for arg in self.parser.get_arguments() {
            if arg.is_positional() || arg.is_hide_set() {
                continue;
            }
            if let Some(long) = arg.get_long() {
                flags.push(format!("--{}", long));
            }
            if let Some(short) = arg.get_short() {
                flags.push(format!("-{}", short));
            }
        }
        flags
    }
}

/// Completion data for every command name `amp` accepts
#[derive(Debug)]
pub struct CompletionTable {
    entries: BTreeMap<String, CompletionSpec>,
}

impl CompletionTable {
    /// Introspect every registered command and add the pseudo-commands.
    pub fn build(registry: &Registry, session: &mut Session) -> Result<Self> {
        let mut entries = BTreeMap::new();
        for spec in registry.iter() {
            entries.insert(spec.name.to_string(), spec.introspect(session)?);
        }

        entries.insert(
            "help".to_string(),
            CompletionSpec {
                parser: option_parser("help", "amp help <command>"),
                completer: Completer::List(registry.names().map(String::from).collect()),
            },
        );
        entries.insert(
            "version".to_string(),
            CompletionSpec {
                parser: option_parser("version", "amp version"),
                completer: Completer::Dirs(session.config.instances_root()),
            },
        );

        Ok(Self { entries })
    }

    pub fn get(&self, name: &str) -> Option<&CompletionSpec> {
        self.entries.get(name)
    }

    /// Every completable command name, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Candidates for `current`, given the words typed after `amp` before it.
    pub fn complete(&self, preceding: &[String], current: &str) -> Vec<String> {
        let Some(command) = preceding.first() else {
            return self
                .names()
                .filter(|name| name.starts_with(current))
                .map(String::from)
                .collect();
        };

        let Some(spec) = self.get(command) else {
            return Vec::new();
        };

        if current.starts_with('-') {
            let mut flags: Vec<String> = spec
                .flags()
                .into_iter()
                .filter(|flag| flag.starts_with(current))
                .collect();
            flags.sort();
            return flags;
        }

        spec.completer.candidates(current)
    }

    /// Candidates for a bash `COMP_LINE` with the cursor at `point`.
    pub fn complete_line(&self, line: &str, point: usize) -> Vec<String> {
        let mut end = point.min(line.len());
        while !line.is_char_boundary(end) {
            end -= 1;
        }
        let typed = &line[..end];

        let mut words: Vec<String> = typed.split_whitespace().map(String::from).collect();
        let current = if typed.ends_with(char::is_whitespace) || words.is_empty() {
            String::new()
        } else {
            words.pop().unwrap_or_default()
        };

        // Drop the program name
        let preceding = if words.is_empty() { &[][..] } else { &words[1..] };
        self.complete(preceding, &current)
    }

    /// Assemble a `clap` command tree mirroring the table.
    pub fn command_tree(&self, bin_name: &str) -> Command {
        let mut root = Command::new(bin_name.to_string())
            .disable_help_subcommand(true)
            .disable_help_flag(true)
            .disable_version_flag(true);

        for (name, spec) in &self.entries {
            let parser = spec.parser.clone().name(name.clone());
            let parser = match &spec.completer {
                Completer::List(words) if !words.is_empty() => parser.mut_arg(ARGS, |arg| {
                    arg.hide(false)
                        .value_parser(PossibleValuesParser::new(words.clone()))
                }),
                Completer::List(_) => parser,
                Completer::Dirs(_) => {
                    parser.mut_arg(ARGS, |arg| arg.hide(false).value_hint(ValueHint::DirPath))
                }
            };
            root = root.subcommand(parser.no_binary_name(false));
        }

        root
    }

    /// Write a completion script for `shell`.
    pub fn write_script(&self, shell: Shell, bin_name: &str, out: &mut dyn Write) {
        let mut tree = self.command_tree(bin_name);
        clap_complete::generate(shell, &mut tree, bin_name, out);
    }
}
