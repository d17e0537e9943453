//! Error types for build file operations.

use thiserror::Error;

/// Errors that abort a whole build step (as opposed to per-handler
/// failures, which are reported and skipped).
#[derive(Debug, Error)]
pub enum BuildError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Schema or package validation failure.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Invalid or missing input (e.g. non-existent path, wrong extension).
    #[error("{0}")]
    InvalidInput(String),
}
