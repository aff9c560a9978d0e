//! Domain error types.
//!
//! These errors represent validation failures and rule violations
//! in the domain layer. They are distinct from storage and HTTP errors.

use super::TripStatus;

/// Domain-level errors for validation and trip rules.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// Latitude outside [-90, 90] or not finite
    #[error("invalid latitude: {0}")]
    InvalidLatitude(f64),

    /// Longitude outside [-180, 180] or not finite
    #[error("invalid longitude: {0}")]
    InvalidLongitude(f64),

    /// Time of day not in HH:MM form
    #[error("invalid time of day {0:?} (expected HH:MM)")]
    InvalidTimeOfDay(String),

    /// A completed trip is frozen
    #[error("trip is completed and can no longer change")]
    TripCompleted,

    /// A cancelled trip may only be restarted
    #[error("a cancelled trip can only move to STARTED, not {0}")]
    CancelledTripMustRestart(TripStatus),

    /// Seat counts in reservations must be positive
    #[error("seat count must be at least 1")]
    InvalidSeatCount,

    /// Not enough seats left to reserve
    #[error("requested {requested} seats but only {available} available")]
    InsufficientSeats { requested: u32, available: u32 },

    /// Seats cannot be reserved on a closed trip
    #[error("cannot reserve seats on a {0} trip")]
    TripClosed(TripStatus),

    /// Releasing seats would overflow the seat counter
    #[error("seat count overflow")]
    SeatOverflow,
}
