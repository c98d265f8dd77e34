//! Unified error type hierarchy for the FImage bootstrap runner.
//!
//! Provides structured error handling with `BootstrapError` for the step
//! sequence and `ConfigError` for configuration loading and validation.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration file parsing and validation errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid JSON in config: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Invalid TOML in config: {0}")]
    InvalidToml(#[from] toml::de::Error),

    #[error("Could not serialize config as TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("IO error during config operations: {0}")]
    IoError(#[from] io::Error),
}

/// Errors that terminate a bootstrap run.
///
/// Every variant is fatal: the runner never recovers from one locally.
#[derive(Error, Debug)]
pub enum BootstrapError {
    /// The toolchain's version output did not contain the required marker.
    #[error("Toolchain version check failed: required '{required}', found '{found}'")]
    VersionMismatch { required: String, found: String },

    /// A subprocess exited non-zero, or was killed by a signal (`code` is `None`).
    #[error("Command '{command}' failed with {}", describe_code(.code))]
    CommandFailed { command: String, code: Option<i32> },

    /// A subprocess could not be started at all.
    #[error("Failed to execute '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    /// The working directory for a step could not be entered.
    #[error("Cannot enter directory '{}': {source}", .path.display())]
    Workdir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The runner was driven out of order, e.g. run twice.
    #[error("Invalid phase transition: {0}")]
    InvalidTransition(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl BootstrapError {
    /// Process exit code for this failure.
    ///
    /// A failed subprocess propagates its own exit status; everything else
    /// (including signal termination) maps to 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            BootstrapError::CommandFailed {
                code: Some(code), ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit status {}", code),
        None => "termination by signal".to_string(),
    }
}

/// Top-level result type for bootstrap operations.
pub type Result<T> = std::result::Result<T, BootstrapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_mismatch_display() {
        let err = BootstrapError::VersionMismatch {
            required: "3.12".to_string(),
            found: "4.02.0".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Toolchain version check failed: required '3.12', found '4.02.0'"
        );
    }

    #[test]
    fn test_command_failed_display() {
        let err = BootstrapError::CommandFailed {
            command: "make -j12".to_string(),
            code: Some(2),
        };
        assert_eq!(err.to_string(), "Command 'make -j12' failed with exit status 2");

        let err = BootstrapError::CommandFailed {
            command: "make -j12".to_string(),
            code: None,
        };
        assert_eq!(
            err.to_string(),
            "Command 'make -j12' failed with termination by signal"
        );
    }

    #[test]
    fn test_exit_code_propagates_subprocess_status() {
        let err = BootstrapError::CommandFailed {
            command: "git submodule update --init --recursive".to_string(),
            code: Some(128),
        };
        assert_eq!(err.exit_code(), 128);
    }

    #[test]
    fn test_exit_code_defaults_to_one() {
        let mismatch = BootstrapError::VersionMismatch {
            required: "3.12".to_string(),
            found: "4.0.0".to_string(),
        };
        assert_eq!(mismatch.exit_code(), 1);

        let signalled = BootstrapError::CommandFailed {
            command: "ocamlbuild fimage.top".to_string(),
            code: None,
        };
        assert_eq!(signalled.exit_code(), 1);

        let config: BootstrapError =
            ConfigError::ValidationFailed("empty target".to_string()).into();
        assert_eq!(config.exit_code(), 1);
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::FileNotFound("/etc/bootstrap.toml".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration file not found: /etc/bootstrap.toml"
        );
    }
}
