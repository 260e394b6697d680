// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Error types for Triage

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Triage operations
pub type Result<T> = std::result::Result<T, TriageError>;

/// Triage error types
#[derive(Error, Debug)]
pub enum TriageError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to save configuration: {0}")]
    ConfigPersist(String),

    #[error("No destination folder set for bucket {bucket}")]
    DestinationUnset { bucket: usize },

    #[error("At least 2 destination folders are required ({configured} configured)")]
    InsufficientDestinations { configured: usize },

    #[error("Invalid bucket: {0} (expected 1-{max})", max = crate::config::BUCKET_COUNT)]
    InvalidBucket(usize),

    #[error("Cannot create destination {path:?}: {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Operation failed: {from:?} -> {to:?}: {source}")]
    CopyMove {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Undo failed for {path:?}: {message}")]
    Undo { path: PathBuf, message: String },

    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TriageError {
    /// Whether the operator has to acknowledge this error before continuing
    pub fn is_actionable(&self) -> bool {
        !matches!(self, TriageError::ConfigPersist(_))
    }
}
