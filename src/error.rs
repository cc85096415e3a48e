//! Error types for queryline
//!
//! Provides a unified error type for all operations.
//!
//! Note that command-level failures (a terminator line with a nonzero
//! `id`) are not errors in this sense: they are delivered through the
//! per-command callback as part of [`CommandOutcome`], never as a
//! `QueryError`. See the crate docs for the full taxonomy.
//!
//! [`CommandOutcome`]: crate::client::CommandOutcome

use thiserror::Error;

/// Result type alias using QueryError
pub type Result<T> = std::result::Result<T, QueryError>;

/// Unified error type for queryline operations
#[derive(Debug, Error)]
pub enum QueryError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Connection Lifecycle Errors
    // -------------------------------------------------------------------------
    #[error("connection error: {0}")]
    Connection(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("configuration error: {0}")]
    Config(String),
}
