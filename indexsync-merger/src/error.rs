//! Error types for the merger binary.

use std::error::Error;

use indexsync::error::SyncError;

/// Result type for merger operations.
pub type MergerResult<T> = Result<T, MergerError>;

/// Error type for the merger process.
///
/// Wraps [`SyncError`] for pipeline failures and provides variants for
/// infrastructure errors around it.
#[derive(Debug, thiserror::Error)]
pub enum MergerError {
    /// Pipeline or search-service error.
    #[error("synchronization error: {0}")]
    Sync(#[from] SyncError),

    /// Configuration loading or validation error.
    #[error("configuration error: {0}")]
    Config(#[source] Box<dyn Error + Send + Sync>),

    /// I/O error, typically from runtime construction.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl MergerError {
    /// Creates a configuration error from any concrete source.
    pub fn config<E>(err: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        MergerError::Config(Box::new(err))
    }
}
