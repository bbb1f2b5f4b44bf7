//! amp
//!
//! Command-line dispatcher for managing local amp instances.

use amp::cli::completion::completion_request_from_env;
use amp::cli::{builtin_registry, Dispatcher};
use amp::config::{config_file_path, CliConfig};
use amp::format::format_error;
use amp::session::Session;
use anyhow::{Context, Result};
use std::io::Write;

/// Exit status for configuration failures, matching `AmpError::Config`.
const CONFIG_ERROR_EXIT: i32 = 101;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    // Build configuration using priority chain: env → file → defaults
    let config_path = config_file_path();
    let config = match CliConfig::builder()
        .with_env_overrides()
        .with_config_file(&config_path)
        .and_then(|builder| builder.build())
    {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", format_error(&format!("Configuration error: {:#}", e)));
            std::process::exit(CONFIG_ERROR_EXIT);
        }
    };

    init_tracing(config.verbose);
    tracing::debug!(root = %config.root.display(), "configuration loaded");

    let registry = builtin_registry().context("Failed to register built-in commands")?;
    let dispatcher = Dispatcher::new(registry, &config);
    let mut session = Session::new(config);

    let result = match completion_request_from_env() {
        Some((line, point)) => dispatcher.complete(&mut session, &line, point),
        None => dispatcher.dispatch(&mut session, &args),
    };
    session.out.flush().context("Failed to flush output")?;

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            if e.is_help() {
                println!("{}", e);
            } else {
                eprintln!("{}", format_error(&e.to_string()));
            }
            std::process::exit(e.exit_code());
        }
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("AMP_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
