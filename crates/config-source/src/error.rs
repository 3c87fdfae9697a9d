//! Error types for source registration, dispatch, and loading.
//!
//! Responsibilities:
//! - Define the typed error taxonomy shared by the registry and all loaders.
//!
//! Invariants:
//! - Registration collisions surface at registration time, not load time.
//! - A missing file is its own variant so callers can opt into `silent`
//!   handling; all other loader errors propagate unchanged.
//! - Error messages never include loaded values, only argument names and
//!   value kinds, to prevent secret leakage.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type SourceResult<T> = Result<T, ConfigSourceError>;

/// Errors that can occur during source registration and loading.
#[derive(Error, Debug)]
pub enum ConfigSourceError {
    /// Requested config type has no registered sources.
    #[error("Unknown config type: {0}")]
    UnknownConfigType(String),

    /// Requested source is not registered for the given config type.
    #[error("Unknown source: {source_name} (config type: {config_type})")]
    UnknownSource {
        source_name: String,
        config_type: String,
    },

    /// A source with this name is already registered for the config type.
    #[error("Already registered: {source_name} (config type: {config_type})")]
    DuplicateSource {
        source_name: String,
        config_type: String,
    },

    /// A loader's required argument was not supplied.
    #[error("Missing required argument: {name}")]
    MissingArgument { name: String },

    /// A loader argument was supplied with the wrong type or shape.
    #[error("Invalid value for argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    /// A file-based source pointed at a path that does not exist.
    #[error("Config file not found: {path}")]
    NotFound { path: PathBuf },

    /// Reading a config file failed for a reason other than a missing file.
    #[error("Failed to read config file at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A config file (or inline text) could not be parsed.
    #[error("Failed to parse config source {name}: {message}")]
    Parse { name: String, message: String },

    /// Serializing an in-process object into config values failed.
    #[error("Failed to serialize config object: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The `.env` file exists but has a syntax error.
    #[error("Failed to parse .env file at line {error_index}")]
    DotenvParse { error_index: usize },

    /// The `.env` file exists but could not be read.
    #[error("Failed to read .env file: {kind}")]
    DotenvIo { kind: std::io::ErrorKind },

    /// An unexpected dotenv failure.
    #[error("Unexpected error while loading .env file")]
    DotenvUnknown,
}
