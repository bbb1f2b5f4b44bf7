//! Error types for amp

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for amp operations
///
/// Every variant maps to a process exit status through
/// [`AmpError::exit_code`]. Messages are rendered once by the binary.
#[derive(Error, Debug)]
pub enum AmpError {
    /// Help text requested by the user (`-h`, `--help`, `help`)
    #[error("{0}")]
    Usage(String),

    /// A required positional argument was not supplied; carries the help text
    #[error("{0}")]
    MissingArgument(String),

    /// The option parser rejected the arguments
    #[error("{0}")]
    InvalidArguments(String),

    /// No built-in command and no delegate executable
    #[error("ERROR: Unknown command '{0}'")]
    UnknownCommand(String),

    /// Two registry entries share a name
    #[error("Configuration error: duplicate command '{0}'")]
    DuplicateCommand(String),

    /// The user answered no to a confirmation prompt
    #[error("Aborted.")]
    Declined,

    /// `init` target exists and `--clobber` was not given
    #[error(
        "ERROR: A directory already exists at {}\n          \
         Use the --clobber parameter to overwrite the directory",
        .0.display()
    )]
    InstanceExists(PathBuf),

    /// Staged but uncommitted changes in an existing instance
    #[error(
        "ERROR: You have a dirty working tree at {}\n          \
         Please either commit your changes or move your files.\n\n  \
         These are the problematic files:\n{}",
        .root.display(),
        indent_files(.files)
    )]
    DirtyWorkingTree { root: PathBuf, files: Vec<String> },

    /// No instance name given and none derivable from the Git URL
    #[error(
        "ERROR: Couldn't detect the instance name from the Git URL.\n          \
         Please provide an instance name parameter. Thanks!"
    )]
    GitNameDetection,

    /// The named instance has no directory under the instances root
    #[error("ERROR: No instance found at {}", .0.display())]
    InstanceNotFound(PathBuf),

    /// A positional action word outside the accepted set
    #[error("ERROR: Unknown action '{0}'")]
    InvalidAction(String),

    /// The command is recognised but has no implementation yet
    #[error("ERROR: The '{0}' command is not implemented yet")]
    NotImplemented(String),

    /// Role loading failed
    #[error("ERROR: {0}")]
    Role(String),

    /// A version control invocation exited unsuccessfully
    #[error("ERROR: `{command}` failed with status {status}")]
    Vcs { command: String, status: i32 },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AmpError {
    /// Process exit status for this error.
    ///
    /// `1` for help and user-fixable failures, `2` for parser rejections and
    /// declined confirmations, `101` for configuration and I/O failures.
    pub fn exit_code(&self) -> i32 {
        match self {
            AmpError::InvalidArguments(_) | AmpError::Declined => 2,
            AmpError::DuplicateCommand(_) | AmpError::Config(_) | AmpError::Io(_) => 101,
            _ => 1,
        }
    }

    /// Whether the message belongs on stdout rather than stderr.
    pub fn is_help(&self) -> bool {
        matches!(self, AmpError::Usage(_) | AmpError::MissingArgument(_))
    }
}

fn indent_files(files: &[String]) -> String {
    files
        .iter()
        .map(|f| format!("    {}", f))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Result type alias for amp operations
pub type Result<T> = std::result::Result<T, AmpError>;
