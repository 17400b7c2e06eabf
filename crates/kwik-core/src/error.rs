//! Error types shared by every kwik store and engine operation.

use thiserror::Error;

/// Boxed source error carried by [`Error::Storage`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum Error {
    /// The persistent store is unreachable, the schema does not match, or a
    /// constraint was violated.
    #[error("storage error: {0}")]
    Storage(#[source] BoxError),

    /// Input that cannot be tracked or searched (empty command text,
    /// empty search keywords).
    #[error("cannot parse input: {0}")]
    Parse(String),
}

impl Error {
    /// Wrap any backend error as [`Error::Storage`].
    pub fn storage<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        Error::Storage(err.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
