//! Error types for brokkr-core

use thiserror::Error;

/// Result type alias using brokkr-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for Brokkr
///
/// The first four variants are the user-visible failure kinds the
/// dispatcher reports; the rest are internal conditions surfaced through
/// them or directly fatal.
#[derive(Error, Debug)]
pub enum Error {
    /// The leading token of a normalized vector matched no registered command
    #[error("No such command: {name}")]
    NoSuchCommand { name: String },

    /// A recognized command whose flags failed schema validation
    #[error("{command}: {message}")]
    MalformedArguments { command: String, message: String },

    /// Extension loading could not produce a resolution context
    #[error("Extension loading failed: {message}")]
    ExtensionLoad { message: String },

    /// A command's execute() returned an error
    #[error("Command '{command}' failed")]
    CommandFailed {
        command: String,
        #[source]
        source: anyhow::Error,
    },

    /// Settings file could not be read or parsed
    #[error("Invalid settings: {message}")]
    Settings { message: String },

    /// Home directory could not be determined
    #[error("Could not determine home directory")]
    NoHomeDir,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an extension load error
    pub fn extension_load(message: impl Into<String>) -> Self {
        Self::ExtensionLoad {
            message: message.into(),
        }
    }

    /// Create a settings error
    pub fn settings(message: impl Into<String>) -> Self {
        Self::Settings {
            message: message.into(),
        }
    }

    /// Process exit code for this error kind
    ///
    /// Every kind is non-zero; the dispatcher maps a successful run to 0.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::CommandFailed { .. } => 1,
            Error::MalformedArguments { .. } => 2,
            Error::NoSuchCommand { .. } => 3,
            Error::ExtensionLoad { .. } => 4,
            Error::Settings { .. } | Error::NoHomeDir | Error::Io(_) => 5,
        }
    }
}
