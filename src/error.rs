//! Unified error types for the order desk.

use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for the order desk.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration validation error.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Order store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// JSON serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Order store and store locator errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No `order_<id>.json` file exists for the requested id.
    #[error("order {id} not found")]
    NotFound {
        /// The requested order id.
        id: String,
    },

    /// The record exists but could not be read or parsed.
    #[error("failed to read order {id}: {reason}")]
    Read {
        /// The requested order id.
        id: String,
        /// Underlying read or parse failure.
        reason: String,
    },

    /// The store directory exists but cannot be enumerated.
    #[error("failed to read orders directory {}: {source}", .path.display())]
    Directory {
        /// The store directory.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The store directory could not be resolved or created at startup.
    #[error("failed to prepare orders directory {}: {source}", .path.display())]
    Startup {
        /// The directory that could not be created.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// None of the candidate locations could be resolved to a path.
    #[error("no orders directory candidate could be resolved")]
    NoCandidate,
}

impl StoreError {
    /// Whether this error means the requested record does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;
