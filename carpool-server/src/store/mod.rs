//! Trip storage.
//!
//! [`TripStore`] is the seam between trip logic and persistence. The
//! in-memory implementation backs the server and the tests; it can be
//! seeded from a JSON fixture at startup.

mod error;
mod filter;
mod memory;

use std::future::Future;

use serde::Serialize;
use uuid::Uuid;

use crate::domain::{DomainError, Driver, Trip, Vehicle};

pub use error::StoreError;
pub use filter::{TimeFilters, TripFilter};
pub use memory::{MemoryTripStore, Seed};

/// A trip joined with its driver and vehicle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRecord {
    #[serde(flatten)]
    pub trip: Trip,

    pub driver: Option<Driver>,

    pub vehicle: Option<Vehicle>,
}

/// Access to trip records and the vehicles they run on.
///
/// Each call is a point-in-time read or a single atomic write; no call
/// spans another.
pub trait TripStore: Send + Sync {
    /// All trips matching `filter`, oldest first.
    fn find_trips(
        &self,
        filter: &TripFilter,
    ) -> impl Future<Output = Result<Vec<TripRecord>, StoreError>> + Send;

    /// A single trip by id.
    fn get_trip(
        &self,
        id: Uuid,
    ) -> impl Future<Output = Result<Option<TripRecord>, StoreError>> + Send;

    /// A vehicle by id.
    fn get_vehicle(
        &self,
        id: Uuid,
    ) -> impl Future<Output = Result<Option<Vehicle>, StoreError>> + Send;

    /// Insert a new trip.
    fn insert_trip(&self, trip: Trip) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Apply `change` to a trip atomically.
    ///
    /// The change runs on a copy; the stored trip is only replaced if it
    /// returns `Ok`, in which case `updated_at` is refreshed. Returns
    /// `Ok(None)` if the trip does not exist.
    fn modify_trip<F>(
        &self,
        id: Uuid,
        change: F,
    ) -> impl Future<Output = Result<Option<Trip>, StoreError>> + Send
    where
        F: FnOnce(&mut Trip) -> Result<(), DomainError> + Send;

    /// Delete a trip and its stop points. Returns whether it existed.
    fn delete_trip(&self, id: Uuid) -> impl Future<Output = Result<bool, StoreError>> + Send;
}
