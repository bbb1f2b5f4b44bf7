//! Command execution handlers
//!
//! Every handler has the [`Handler`](super::registry::Handler) signature.
//! Called in completion mode it hands back its parser instead of running.

use std::io::Write;
use std::path::Path;

use amp_core::{derive_name_from_url, AmpError, InstanceRef, Result};
use tracing::{debug, info};

use super::commands::*;
use super::completion::Completer;
use super::options::{parse_options, render_help, Parsed};
use super::registry::{Flow, Introspection, Invocation};
use crate::format::{format_log, format_success, Severity};
use crate::packages::DEFAULT_ROLE;
use crate::session::Session;

const INITIAL_COMMIT: &str = "Initialised the instance [amp].";
const UPDATE_COMMIT: &str = "Updated instance [amp].";

/// Handle build command
pub fn handle_build(session: &mut Session, invocation: Invocation<'_>) -> Result<Flow> {
    let options = match parse_options(build_parser(), invocation, false)? {
        Parsed::Options(options) => options,
        Parsed::Completion(parser) => return Ok(Flow::Completion(Introspection::Parser(parser))),
    };

    let role = options.value("role").unwrap_or(DEFAULT_ROLE);
    info!(role, "building role");

    session.packages.load_role(role)?;
    let packages = session.packages.install_packages()?;

    writeln!(
        session.out,
        "{}",
        format_success(&format!(
            "Role '{}': {} package(s) resolved",
            role,
            packages.len()
        ))
    )?;
    for package in &packages {
        writeln!(session.out, "    {}", package)?;
    }

    Ok(Flow::Done(0))
}

/// Handle deploy command
pub fn handle_deploy(session: &mut Session, invocation: Invocation<'_>) -> Result<Flow> {
    let options = match parse_options(deploy_parser(), invocation, true)? {
        Parsed::Options(options) => options,
        Parsed::Completion(parser) => return Ok(Flow::Completion(Introspection::Parser(parser))),
    };

    let instance = existing_instance(session, &options.args[0])?;
    debug!(
        instance = %instance.name,
        run_tests = options.flag("test"),
        "deploy requested"
    );

    Err(AmpError::NotImplemented("deploy".to_string()))
}

/// Handle hub command
pub fn handle_hub(_session: &mut Session, invocation: Invocation<'_>) -> Result<Flow> {
    let options = match parse_options(hub_parser(), invocation, true)? {
        Parsed::Options(options) => options,
        Parsed::Completion(parser) => return Ok(Flow::Completion(Introspection::Parser(parser))),
    };

    let action = options.args[0].as_str();
    if !HUB_ACTIONS.contains(&action) {
        return Err(AmpError::InvalidAction(action.to_string()));
    }
    debug!(action, "hub requested");

    Err(AmpError::NotImplemented("hub".to_string()))
}

/// Handle init command
pub fn handle_init(session: &mut Session, invocation: Invocation<'_>) -> Result<Flow> {
    let options = match parse_options(init_parser(), invocation, false)? {
        Parsed::Options(options) => options,
        Parsed::Completion(parser) => return Ok(Flow::Completion(Introspection::Parser(parser))),
    };

    let git_url = options.value("from").filter(|url| !url.is_empty());
    let name = match (options.args.first(), git_url) {
        (Some(name), _) => name.clone(),
        (None, Some(url)) => derive_name_from_url(url).ok_or(AmpError::GitNameDetection)?,
        (None, None) => {
            return Err(AmpError::MissingArgument(render_help(&mut init_parser())));
        }
    };

    let instance = InstanceRef::normalise(&name, &session.config.instances_root())?;
    let root = instance.root.as_path();

    if instance.exists() {
        if !options.flag("clobber") {
            return Err(AmpError::InstanceExists(instance.root.clone()));
        }
        if is_repository(root) {
            // Staged changes would be swept into our commit below
            let files = staged_files(session, root)?;
            if !files.is_empty() {
                return Err(AmpError::DirtyWorkingTree {
                    root: instance.root.clone(),
                    files,
                });
            }
        } else {
            init_repository(session, root)?;
        }
        writeln!(
            session.out,
            "{}",
            format_log(
                &format!("Reusing the existing directory at {}", root.display()),
                Severity::Warn
            )
        )?;
    } else {
        create_instance(session, root)?;
    }

    if let Some(url) = git_url {
        info!(url, root = %root.display(), "merging remote repository");
        writeln!(session.out, "Merging {} into {}", url, root.display())?;
        session.vcs.run(
            root,
            &[
                "pull",
                "--no-rebase",
                "--no-edit",
                "--allow-unrelated-histories",
                url,
            ],
        )?;
    }

    if !staged_files(session, root)?.is_empty() {
        session.vcs.run(root, &["commit", "-m", UPDATE_COMMIT])?;
    }

    writeln!(
        session.out,
        "{}",
        format_success(&format!(
            "Initialised instance '{}' at {}",
            instance.name,
            root.display()
        ))
    )?;
    Ok(Flow::Done(0))
}

/// Handle run command
pub fn handle_run(session: &mut Session, invocation: Invocation<'_>) -> Result<Flow> {
    if invocation.completion {
        return Ok(Flow::Completion(Introspection::WithCompleter(
            run_parser(),
            Completer::Dirs(session.config.instances_root()),
        )));
    }

    let options = match parse_options(run_parser(), invocation, true)? {
        Parsed::Options(options) => options,
        Parsed::Completion(parser) => return Ok(Flow::Completion(Introspection::Parser(parser))),
    };

    let instance = existing_instance(session, &options.args[0])?;

    let action = match options.args.get(1).map(String::as_str) {
        None => "start",
        Some(action) if RUN_ACTIONS.contains(&action) => action,
        Some(other) => return Err(AmpError::InvalidAction(other.to_string())),
    };

    if let Some(file) = options.value("file") {
        if !Path::new(file).is_file() {
            return Err(AmpError::InvalidArguments(format!(
                "ERROR: Couldn't find the input file {}",
                file
            )));
        }
    }

    let debug_mode = options.flag("debug");
    debug!(
        instance = %instance.name,
        action,
        debug_mode,
        file = ?options.value("file"),
        "run requested"
    );

    writeln!(
        session.out,
        "{}",
        format_success(&format!(
            "{} '{}' at {}{}",
            action,
            instance.name,
            instance.root.display(),
            if debug_mode { " (debug mode)" } else { "" }
        ))
    )?;
    Ok(Flow::Done(0))
}

/// Handle test command
pub fn handle_test(session: &mut Session, invocation: Invocation<'_>) -> Result<Flow> {
    let options = match parse_options(test_parser(), invocation, false)? {
        Parsed::Options(options) => options,
        Parsed::Completion(parser) => return Ok(Flow::Completion(Introspection::Parser(parser))),
    };

    writeln!(session.out, "Running tests...")?;
    if options.flag("all") {
        writeln!(
            session.out,
            "{}",
            format_log("Including the comprehensive test suite.", Severity::Info)
        )?;
    }

    Ok(Flow::Done(0))
}

fn existing_instance(session: &Session, input: &str) -> Result<InstanceRef> {
    let instance = InstanceRef::normalise(input, &session.config.instances_root())?;
    if !instance.exists() {
        return Err(AmpError::InstanceNotFound(instance.root));
    }
    Ok(instance)
}

fn staged_files(session: &mut Session, root: &Path) -> Result<Vec<String>> {
    let diff = session
        .vcs
        .capture(root, &["diff", "--cached", "--name-only"])?;
    Ok(diff
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}

fn create_instance(session: &mut Session, root: &Path) -> Result<()> {
    let question = format!("Create an instance at {}", root.display());
    if !session.prompt.confirm(&question)? {
        return Err(AmpError::Declined);
    }

    std::fs::create_dir_all(root)?;
    writeln!(session.out, "Created {}", root.display())?;
    init_repository(session, root)
}

/// Whether `root` is itself a repository; an enclosing one does not count.
fn is_repository(root: &Path) -> bool {
    root.join(".git").exists()
}

fn init_repository(session: &mut Session, root: &Path) -> Result<()> {
    session.vcs.run(root, &["init"])?;
    let readme = root.join("README.md");
    if !readme.exists() {
        std::fs::File::create(&readme)?;
    }
    session.vcs.run(root, &["add", "README.md"])?;
    session.vcs.run(root, &["commit", "-m", INITIAL_COMMIT])?;
    Ok(())
}
