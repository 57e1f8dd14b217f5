//! Core error types for taskping-core.
//!
//! Only genuinely unexpected failures surface as errors. A task that does not
//! qualify for a reminder, a denied permission, or a cancellation for an id
//! with no pending timer are ordinary outcomes and are reported through
//! return values, never through this hierarchy.

use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// Core error type for taskping-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Task store (remote API) errors
    #[error("Task store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Errors from the remote task store client.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Transport-level failure (connection, timeout, malformed body)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The API reported that the task does not exist
    #[error("Task {0} not found")]
    NotFound(Uuid),

    /// The configured base URL could not be parsed or joined
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),
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

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
