//! Built-in command definitions

use amp_core::Result;
use clap::{Arg, ArgAction, Command};

use super::handlers;
use super::options::option_parser;
use super::registry::{CommandSpec, Registry};
use crate::packages::DEFAULT_ROLE;

/// Actions accepted by `amp hub`
pub const HUB_ACTIONS: &[&str] = &["register", "update"];

/// Actions accepted by `amp run` after the instance name
pub const RUN_ACTIONS: &[&str] = &["stop", "quit", "restart"];

/// The registry of every built-in command.
pub fn builtin_registry() -> Result<Registry> {
    let mut registry = Registry::new();
    registry.register(CommandSpec::new(
        "build",
        "download and build the ampify zero dependencies",
        handlers::handle_build,
    ))?;
    registry.register(CommandSpec::new(
        "deploy",
        "deploy an instance to remote host(s)",
        handlers::handle_deploy,
    ))?;
    registry.register(
        CommandSpec::new("hub", "interact with amphub", handlers::handle_hub)
            .with_values(HUB_ACTIONS),
    )?;
    registry.register(CommandSpec::new(
        "init",
        "initialise a new amp instance",
        handlers::handle_init,
    ))?;
    registry.register(CommandSpec::new(
        "run",
        "run the components for an amp instance",
        handlers::handle_run,
    ))?;
    registry.register(CommandSpec::new(
        "test",
        "run the ampify zero test suite",
        handlers::handle_test,
    ))?;
    Ok(registry)
}

pub fn build_parser() -> Command {
    option_parser("build", "amp build [options]").arg(
        Arg::new("role")
            .long("role")
            .value_name("NAME")
            .default_value(DEFAULT_ROLE)
            .help("specify a non-default role to build"),
    )
}

pub fn deploy_parser() -> Command {
    option_parser("deploy", "amp deploy <instance-name> [options]").arg(
        Arg::new("test")
            .long("test")
            .action(ArgAction::SetTrue)
            .help("run tests before completing the switch"),
    )
}

pub fn hub_parser() -> Command {
    option_parser("hub", "amp hub [register|update] [options]")
}

pub fn init_parser() -> Command {
    option_parser("init", "amp init <instance-name> [options]")
        .arg(
            Arg::new("clobber")
                .long("clobber")
                .action(ArgAction::SetTrue)
                .help("clobber any existing files/directories if they exist"),
        )
        .arg(
            Arg::new("from")
                .long("from")
                .value_name("GIT_URL")
                .help("initialise by cloning the given git repository"),
        )
}

pub fn run_parser() -> Command {
    option_parser(
        "run",
        "amp run <instance-name> [options] [stop|quit|restart]",
    )
    .arg(
        Arg::new("debug")
            .short('d')
            .long("debug")
            .action(ArgAction::SetTrue)
            .help("enable debug mode"),
    )
    .arg(
        Arg::new("file")
            .long("file")
            .value_name("PATH")
            .help("Input file to read data from"),
    )
}

pub fn test_parser() -> Command {
    option_parser("test", "amp test [options]").arg(
        Arg::new("all")
            .short('a')
            .long("all")
            .action(ArgAction::SetTrue)
            .help("run the comprehensive test suite"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_contents() {
        let registry = builtin_registry().unwrap();
        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            vec!["build", "deploy", "hub", "init", "run", "test"]
        );
        assert_eq!(registry.lookup("hub").map(|c| c.values), Some(HUB_ACTIONS));
    }

    #[test]
    fn test_parsers_are_well_formed() {
        for mut parser in [
            build_parser(),
            deploy_parser(),
            hub_parser(),
            init_parser(),
            run_parser(),
            test_parser(),
        ] {
            parser.build();
            let help = parser.render_help().to_string();
            assert!(help.contains("Usage: amp "), "{}", help);
        }
    }
}
