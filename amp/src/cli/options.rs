//! Per-command option parsers
//!
//! Every command builds its own `clap` parser with a fixed usage line and no
//! automatic help flag. Help is only shown when `-h` or `--help` is the sole
//! argument, so a command that forwards arguments is never surprised by it.

use amp_core::{AmpError, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};

use super::registry::Invocation;

/// Id of the hidden positional collecting non-option arguments.
pub const ARGS: &str = "ARGS";

/// Build the base parser for a command.
///
/// `usage` is shown verbatim after `Usage: ` in the command's help.
pub fn option_parser(name: &'static str, usage: &'static str) -> Command {
    Command::new(name)
        .no_binary_name(true)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .override_usage(usage)
        .arg(
            Arg::new(ARGS)
                .action(ArgAction::Append)
                .num_args(1..)
                .hide(true),
        )
}

/// Outcome of [`parse_options`]
#[derive(Debug)]
pub enum Parsed {
    /// Arguments were parsed; run the command.
    Options(ParsedInvocation),
    /// Completion mode: hand the parser back for introspection.
    Completion(Command),
}

/// Options and positional arguments of one invocation
#[derive(Debug)]
pub struct ParsedInvocation {
    matches: ArgMatches,
    /// Positional arguments in the order given
    pub args: Vec<String>,
}

impl ParsedInvocation {
    /// Value of a boolean flag; `false` when the flag is not defined.
    pub fn flag(&self, id: &str) -> bool {
        self.matches
            .try_get_one::<bool>(id)
            .ok()
            .flatten()
            .copied()
            .unwrap_or(false)
    }

    /// Value of an option taking a value, including its default.
    pub fn value(&self, id: &str) -> Option<&str> {
        self.matches
            .try_get_one::<String>(id)
            .ok()
            .flatten()
            .map(String::as_str)
    }
}

/// Render a parser's help text.
pub fn render_help(parser: &mut Command) -> String {
    parser.render_help().to_string()
}

/// Parse `invocation.argv` with `parser`.
///
/// Help requests and, when `exit_if_no_args` is set, a missing positional
/// argument come back as errors carrying the rendered help text.
pub fn parse_options(
    mut parser: Command,
    invocation: Invocation<'_>,
    exit_if_no_args: bool,
) -> Result<Parsed> {
    if invocation.completion {
        return Ok(Parsed::Completion(parser));
    }

    let argv = invocation.argv;
    if argv.len() == 1 && (argv[0] == "-h" || argv[0] == "--help") {
        return Err(AmpError::Usage(render_help(&mut parser)));
    }

    let matches = parser
        .try_get_matches_from_mut(argv)
        .map_err(|e| AmpError::InvalidArguments(e.render().to_string()))?;

    let args: Vec<String> = matches
        .get_many::<String>(ARGS)
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    if exit_if_no_args && args.is_empty() {
        return Err(AmpError::MissingArgument(render_help(&mut parser)));
    }

    Ok(Parsed::Options(ParsedInvocation { matches, args }))
}
