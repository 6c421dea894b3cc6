//! # CLI Error Types
//!
//! Failures of the front end itself. Engine refusals are not errors here;
//! they are reported to the user and mapped to an exit code.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Reading or writing a file failed.
    #[error("Cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A bill or session file is not valid JSON for its type.
    #[error("Cannot parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Config file is not valid TOML.
    #[error("Cannot parse config: {0}")]
    Toml(#[from] toml::de::Error),

    /// Serialising output failed.
    #[error("Cannot serialise output: {0}")]
    Serialize(#[from] serde_json::Error),
}
