//! Trip management error types.

use crate::domain::DomainError;
use crate::store::StoreError;

/// Errors from trip management operations.
#[derive(Debug, thiserror::Error)]
pub enum TripError {
    /// Trip or vehicle does not exist
    #[error("{0}")]
    NotFound(String),

    /// Request breaks a trip rule
    #[error("{0}")]
    BadRequest(String),

    /// Request conflicts with the trip's current state
    #[error("{0}")]
    Conflict(String),

    /// Storage failed
    #[error(transparent)]
    Store(StoreError),
}

impl From<DomainError> for TripError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InsufficientSeats { .. }
            | DomainError::TripClosed(_)
            | DomainError::SeatOverflow => TripError::Conflict(err.to_string()),
            _ => TripError::BadRequest(err.to_string()),
        }
    }
}

impl From<StoreError> for TripError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Rejected(domain) => domain.into(),
            other => TripError::Store(other),
        }
    }
}
