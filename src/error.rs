//! Error types for the explorer.
//!
//! Defines the main error enum used throughout the pipeline.

use thiserror::Error;

/// Main error type for explorer operations.
#[derive(Error, Debug)]
pub enum ExplorerError {
    /// Remote execution errors (bad SQL, connectivity, remote-side faults).
    #[error("Query error: {0}")]
    Execution(String),

    /// Configuration errors (invalid config file, missing endpoint, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal application errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ExplorerError {
    /// Creates an execution error with the given message.
    pub fn execution(msg: impl Into<String>) -> Self {
        Self::Execution(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Execution(_) => "Query Error",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }

    /// Returns the bare message without the category prefix.
    ///
    /// Outcomes and notices carry the remote-supplied message verbatim.
    pub fn message(&self) -> &str {
        match self {
            Self::Execution(msg) | Self::Config(msg) | Self::Internal(msg) => msg,
        }
    }
}

/// Result type alias using ExplorerError.
pub type Result<T> = std::result::Result<T, ExplorerError>;
