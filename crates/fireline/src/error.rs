//! Error types for fireline.
//!
//! This module defines all error types used throughout the fireline crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for fireline operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the record store database.
    #[error("failed to open record store at {path}: {source}")]
    StoreOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("record store query failed: {0}")]
    StoreQuery(#[from] rusqlite::Error),

    /// Failed to run record store migrations.
    #[error("record store migration failed: {message}")]
    StoreMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Intake Errors ===
    /// Submitted form entries failed validation.
    #[error("invalid form entry: {message}")]
    Validation {
        /// Description of the validation failure.
        message: String,
    },

    /// The mandatory group selector for a nature form was not chosen.
    #[error("required selector '{field}' was not chosen")]
    MissingSelector {
        /// Dotted path of the selector field.
        field: String,
    },

    /// A dotted field path collides with an existing value.
    #[error("field path '{path}' collides with an existing value")]
    PathConflict {
        /// The colliding dotted path.
        path: String,
    },

    /// No incident intake is currently in progress.
    #[error("no incident intake is in progress; start one with basic intake")]
    NoDraft,

    /// The draft points at a record that does not exist.
    #[error("no record at draft index {index} (store holds {len}); restart basic intake")]
    MissingAnchor {
        /// The stale draft index.
        index: usize,
        /// Number of records actually in the store.
        len: usize,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for fireline operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a path conflict error.
    #[must_use]
    pub fn path_conflict(path: impl Into<String>) -> Self {
        Self::PathConflict { path: path.into() }
    }

    /// Check if this error means the draft anchor is missing or stale.
    #[must_use]
    pub fn is_missing_anchor(&self) -> bool {
        matches!(self, Self::MissingAnchor { .. } | Self::NoDraft)
    }

    /// Check if this error is a form validation failure.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::MissingSelector { .. } | Self::PathConflict { .. }
        )
    }
}
