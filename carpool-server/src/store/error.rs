//! Trip store error types.

use std::path::PathBuf;

use crate::domain::DomainError;

/// Errors that can occur when reading or writing trips.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing store could not serve the request
    #[error("trip store unavailable: {0}")]
    Unavailable(String),

    /// Seed file could not be read
    #[error("failed to read seed file {path:?}: {source}")]
    SeedIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Seed file is not valid JSON for the seed schema
    #[error("failed to parse seed file {path:?}: {source}")]
    SeedParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A modification was refused by a trip rule
    #[error(transparent)]
    Rejected(#[from] DomainError),
}
