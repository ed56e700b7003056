//! Common error types for Conclave

use thiserror::Error;

/// Common result type for Conclave operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors shared by the library and the API service. Variants exist only
/// for failures the library itself produces; request-level errors live in
/// the service's own taxonomy.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An opaque entity key token failed to decode or validate
    #[error("Invalid key token: {0}")]
    InvalidKey(String),
}
