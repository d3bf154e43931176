//! Error types and handling infrastructure for querywatch.
//!
//! This module provides a centralized error type using `thiserror`. The binary uses
//! `anyhow` on top of it for context at the command-line boundary.
//!
//! ## Design Principles
//!
//! - **Terminal by default**: an error flowing through a query sequence ends it
//! - **Cloneable**: a single source failure is fanned out to every attached listener
//! - **Consistency**: Standardized Result type across all modules

use thiserror::Error;

/// The main error type for querywatch operations.
///
/// Covers failures reported by an element's event source, transform failures while
/// normalizing raw text, and configuration or argument problems at the edges.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The observed element's event source failed
    #[error("Event source failed: {message}")]
    SourceFailure { message: String },

    /// The transform function rejected the raw input text
    #[error("Transform failed for input {input:?}: {message}")]
    TransformError { input: String, message: String },

    /// Configuration file could not be read or parsed
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Invalid command line arguments or script lines
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Generic error for cases not covered by specific variants
    #[error("Operation failed: {message}")]
    Other { message: String },
}

/// Standard Result type for querywatch operations.
pub type Result<T> = std::result::Result<T, QueryError>;

impl QueryError {
    /// Create a SourceFailure with a descriptive message
    pub fn source_failure(message: impl Into<String>) -> Self {
        Self::SourceFailure {
            message: message.into(),
        }
    }

    /// Create a TransformError for the raw text that could not be normalized
    pub fn transform(input: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TransformError {
            input: input.into(),
            message: message.into(),
        }
    }

    /// Create a ConfigError with a descriptive message
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create an InvalidArgument error with a descriptive message
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a generic Other error with a descriptive message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for QueryError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::ConfigError {
                message: format!("file not found: {}", err),
            },
            std::io::ErrorKind::PermissionDenied => Self::ConfigError {
                message: format!("permission denied: {}", err),
            },
            _ => Self::Other {
                message: format!("IO operation failed: {}", err),
            },
        }
    }
}
