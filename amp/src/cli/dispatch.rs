//! Resolution of raw arguments to a command
//!
//! The first argument decides everything, checked in this order:
//!
//! 1. nothing, `-h`, `--help`, a bare `help` or `help help` shows the usage listing;
//! 2. `help <command>` becomes `<command> --help`;
//! 3. `-v`, `--version` or `version` prints the release;
//! 4. a registered command runs its handler;
//! 5. anything else is delegated to `<prefix>-<command>`.
//!
//! Version and help are intercepted before the registry is consulted, and
//! registered commands always win over delegates of the same name.

use std::io::Write;

use amp_core::{AmpError, Result};
use clap_complete::Shell;
use tracing::debug;

use super::completion::CompletionTable;
use super::delegate::Delegate;
use super::registry::Registry;
use crate::config::CliConfig;
use crate::format::format_command_row;
use crate::session::Session;
use crate::{RELEASE, TOOL_NAME};

const HELP_FLAGS: &[&str] = &["-h", "--help"];
const VERSION_WORDS: &[&str] = &["-v", "--version", "version"];

/// Hidden flag printing a static completion script.
pub const COMPLETION_SCRIPT_FLAG: &str = "--completion-script";

/// Where a set of raw arguments leads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    ShowHelp,
    Version,
    CompletionScript(Vec<String>),
    Command { name: String, argv: Vec<String> },
}

/// Decide what `args` asks for without running anything.
pub fn resolve(args: &[String]) -> Resolution {
    let Some((first, rest)) = args.split_first() else {
        return Resolution::ShowHelp;
    };

    let (command, argv) = if first == "help" {
        match rest.first() {
            Some(target) if target != "help" => (target.as_str(), vec!["--help".to_string()]),
            _ => return Resolution::ShowHelp,
        }
    } else {
        (first.as_str(), rest.to_vec())
    };

    if HELP_FLAGS.contains(&command) {
        return Resolution::ShowHelp;
    }
    if VERSION_WORDS.contains(&command) {
        return Resolution::Version;
    }
    if command == COMPLETION_SCRIPT_FLAG {
        return Resolution::CompletionScript(argv);
    }

    Resolution::Command {
        name: command.to_string(),
        argv,
    }
}

/// Routes arguments to built-in commands or delegates
#[derive(Debug)]
pub struct Dispatcher {
    registry: Registry,
    delegate: Delegate,
}

impl Dispatcher {
    pub fn new(registry: Registry, config: &CliConfig) -> Self {
        Self {
            registry,
            delegate: Delegate::from_config(config),
        }
    }

    pub fn with_delegate(registry: Registry, delegate: Delegate) -> Self {
        Self { registry, delegate }
    }

    /// Top-level usage text listing every command.
    pub fn usage(&self) -> String {
        let rows: Vec<String> = self
            .registry
            .iter()
            .map(|spec| format_command_row(spec.name, spec.help))
            .chain(std::iter::once(format_command_row(
                "version",
                "show the version number and exit",
            )))
            .collect();

        format!(
            "Usage: {tool} <command> [options]\n\n\
             Commands:\n\n\
             {rows}\n\n\
             See `{tool} help <command>` for more info on a specific command.",
            tool = TOOL_NAME,
            rows = rows.join("\n"),
        )
    }

    /// Run whatever `args` resolves to, returning the exit status.
    ///
    /// Usage listings come back as [`AmpError::Usage`] so the caller prints
    /// them and exits with status 1.
    pub fn dispatch(&self, session: &mut Session, args: &[String]) -> Result<i32> {
        let resolution = resolve(args);
        debug!(?resolution, "resolved arguments");

        match resolution {
            Resolution::ShowHelp => Err(AmpError::Usage(self.usage())),
            Resolution::Version => {
                writeln!(session.out, "{} version {}", TOOL_NAME, RELEASE)?;
                Ok(0)
            }
            Resolution::CompletionScript(argv) => self.completion_script(session, &argv),
            Resolution::Command { name, argv } => match self.registry.lookup(&name) {
                Some(spec) => spec.execute(session, &argv),
                None => self.delegate.run(&name, &argv),
            },
        }
    }

    /// Build the completion table for this dispatcher's commands.
    pub fn completion_table(&self, session: &mut Session) -> Result<CompletionTable> {
        CompletionTable::build(&self.registry, session)
    }

    /// Answer a bash `complete -C` request, one candidate per line.
    pub fn complete(&self, session: &mut Session, line: &str, point: usize) -> Result<i32> {
        let table = self.completion_table(session)?;
        for candidate in table.complete_line(line, point) {
            writeln!(session.out, "{}", candidate)?;
        }
        Ok(0)
    }

    fn completion_script(&self, session: &mut Session, argv: &[String]) -> Result<i32> {
        let shell = match argv {
            [shell] => shell.parse::<Shell>().map_err(|_| {
                AmpError::InvalidArguments(format!("ERROR: Unsupported shell '{}'", shell))
            })?,
            _ => {
                return Err(AmpError::InvalidArguments(format!(
                    "Usage: {} {} <shell>",
                    TOOL_NAME, COMPLETION_SCRIPT_FLAG
                )))
            }
        };

        let table = self.completion_table(session)?;
        table.write_script(shell, TOOL_NAME, &mut session.out);
        Ok(0)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::cli::builtin_registry;
    use crate::test_utils::{test_session, write_script};

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn dispatcher(search_dir: &std::path::Path) -> Dispatcher {
        Dispatcher::with_delegate(
            builtin_registry().unwrap(),
            Delegate::new("amp", Some(search_dir.as_os_str().to_owned())),
        )
    }

    #[test]
    fn test_resolve_help_forms_are_equivalent() {
        assert_eq!(resolve(&args(&[])), Resolution::ShowHelp);
        assert_eq!(resolve(&args(&["-h"])), Resolution::ShowHelp);
        assert_eq!(resolve(&args(&["--help"])), Resolution::ShowHelp);
        assert_eq!(resolve(&args(&["help"])), Resolution::ShowHelp);
        assert_eq!(resolve(&args(&["help", "help"])), Resolution::ShowHelp);
    }

    #[test]
    fn test_resolve_help_for_command() {
        assert_eq!(
            resolve(&args(&["help", "build", "ignored"])),
            Resolution::Command {
                name: "build".to_string(),
                argv: args(&["--help"]),
            }
        );
    }

    #[test]
    fn test_resolve_version_forms() {
        for word in ["-v", "--version", "version"] {
            assert_eq!(resolve(&args(&[word])), Resolution::Version);
        }
        assert_eq!(resolve(&args(&["help", "version"])), Resolution::Version);
    }

    #[test]
    fn test_resolve_command_keeps_arguments() {
        assert_eq!(
            resolve(&args(&["init", "demo", "--clobber"])),
            Resolution::Command {
                name: "init".to_string(),
                argv: args(&["demo", "--clobber"]),
            }
        );
    }

    #[test]
    fn test_usage_lists_sorted_commands() {
        let dir = tempfile::tempdir().unwrap();
        let usage = dispatcher(dir.path()).usage();
        let expected = "Usage: amp <command> [options]\n\
            \n\
            Commands:\n\
            \n    build    download and build the ampify zero dependencies\
            \n    deploy   deploy an instance to remote host(s)\
            \n    hub      interact with amphub\
            \n    init     initialise a new amp instance\
            \n    run      run the components for an amp instance\
            \n    test     run the ampify zero test suite\
            \n    version  show the version number and exit\n\
            \n\
            See `amp help <command>` for more info on a specific command.";
        assert_eq!(usage, expected);
    }

    #[test]
    fn test_dispatch_help_is_usage_error() {
        let dir = tempfile::tempdir().unwrap();
        let dispatcher = dispatcher(dir.path());
        let (mut session, _out) = test_session();

        for argv in [args(&[]), args(&["-h"]), args(&["help"]), args(&["help", "help"])] {
            let err = dispatcher.dispatch(&mut session, &argv).unwrap_err();
            assert_eq!(err.exit_code(), 1);
            assert_eq!(err.to_string(), dispatcher.usage());
        }
    }

    #[test]
    fn test_dispatch_help_command_matches_command_help() {
        let dir = tempfile::tempdir().unwrap();
        let dispatcher = dispatcher(dir.path());
        let (mut session, _out) = test_session();

        let via_help = dispatcher
            .dispatch(&mut session, &args(&["help", "build"]))
            .unwrap_err();
        let via_flag = dispatcher
            .dispatch(&mut session, &args(&["build", "--help"]))
            .unwrap_err();

        assert!(matches!(via_help, AmpError::Usage(_)));
        assert_eq!(via_help.to_string(), via_flag.to_string());
        assert!(via_help.to_string().contains("Usage: amp build [options]"));
    }

    #[test]
    fn test_dispatch_version() {
        let dir = tempfile::tempdir().unwrap();
        let dispatcher = dispatcher(dir.path());

        for word in ["version", "-v", "--version"] {
            let (mut session, out) = test_session();
            assert_eq!(dispatcher.dispatch(&mut session, &args(&[word])).unwrap(), 0);
            assert_eq!(out.contents(), format!("amp version {}\n", RELEASE));
        }
    }

    #[test]
    fn test_registered_command_wins_over_delegate() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("delegated");
        write_script(
            dir.path(),
            "amp-test",
            &format!("touch '{}'", marker.display()),
        );

        let dispatcher = dispatcher(dir.path());
        let (mut session, out) = test_session();
        assert_eq!(dispatcher.dispatch(&mut session, &args(&["test"])).unwrap(), 0);
        assert!(out.contents().contains("Running tests..."));
        assert!(!marker.exists());
    }

    #[test]
    fn test_unknown_command_delegates() {
        let dir = tempfile::tempdir().unwrap();
        write_script(dir.path(), "amp-status", "exit 4");

        let dispatcher = dispatcher(dir.path());
        let (mut session, _out) = test_session();
        assert_eq!(
            dispatcher
                .dispatch(&mut session, &args(&["status", "--all"]))
                .unwrap(),
            4
        );
    }

    #[test]
    fn test_unknown_command_without_delegate_fails() {
        let dir = tempfile::tempdir().unwrap();
        let dispatcher = dispatcher(dir.path());
        let (mut session, out) = test_session();

        let err = dispatcher
            .dispatch(&mut session, &args(&["frobnicate"]))
            .unwrap_err();
        assert_eq!(err.to_string(), "ERROR: Unknown command 'frobnicate'");
        assert_ne!(err.exit_code(), 0);
        assert!(out.contents().is_empty());
    }

    #[test]
    fn test_completion_script() {
        let dir = tempfile::tempdir().unwrap();
        let dispatcher = dispatcher(dir.path());
        let (mut session, out) = test_session();

        assert_eq!(
            dispatcher
                .dispatch(&mut session, &args(&["--completion-script", "zsh"]))
                .unwrap(),
            0
        );
        assert!(out.contents().contains("#compdef amp"));

        let err = dispatcher
            .dispatch(&mut session, &args(&["--completion-script", "tcsh"]))
            .unwrap_err();
        assert!(matches!(err, AmpError::InvalidArguments(_)));
    }

    #[test]
    fn test_dynamic_completion_writes_candidates() {
        let dir = tempfile::tempdir().unwrap();
        let dispatcher = dispatcher(dir.path());
        let (mut session, out) = test_session();

        dispatcher.complete(&mut session, "amp in", 6).unwrap();
        assert_eq!(out.contents(), "init\n");
    }
}
