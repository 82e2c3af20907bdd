//! Unified error types for urlinfo.
//!
//! Lookup failures never surface here as a distinct outcome; they are folded
//! into an unsafe verdict by [`crate::LookupService`]. These variants cover the
//! store adapter and the setup path (migrations, truncate, bulk load).

use tokio_rusqlite::rusqlite;

/// Unified error types for the urlinfo services.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., malformed table name).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Database operation failed.
    #[error("STORE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("STORE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// Clearing the verdict table before a reseed failed.
    #[error("TRUNCATE_FAILED: {0}")]
    TruncateFailed(#[source] Box<Error>),

    /// A grouped write during bulk load failed; the load is aborted.
    #[error("BATCH_FAILED: batch {batch}: {source}")]
    BatchFailed {
        batch: u64,
        #[source]
        source: Box<Error>,
    },
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}
