//! Core error types for homeboard-core.
//!
//! Projection, merging and notification scheduling never fail: malformed input
//! degrades to "feature absent". Errors only surface at the I/O edges, when
//! configuration or source files are read and written.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for homeboard-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Source file errors (person rules, calendar dumps)
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// The data directory could not be created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Errors raised while reading the person rules or calendar event files.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The source file does not exist
    #[error("Source file not found: {0}")]
    NotFound(PathBuf),

    /// The file exists but could not be read
    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not JSON, or has an unexpected top-level shape
    #[error("Malformed source {path}: {message}")]
    Malformed { path: PathBuf, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
