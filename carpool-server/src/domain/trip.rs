//! Trips, their stop points, and the people and vehicles behind them.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{DomainError, GeoPoint, TimeOfDay};

/// Lifecycle status of a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TripStatus {
    #[default]
    Pending,
    Validated,
    Started,
    Completed,
    Cancelled,
}

impl TripStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Pending => "PENDING",
            TripStatus::Validated => "VALIDATED",
            TripStatus::Started => "STARTED",
            TripStatus::Completed => "COMPLETED",
            TripStatus::Cancelled => "CANCELLED",
        }
    }

    /// Check whether a trip in this status may move to `next`.
    ///
    /// Completed trips are frozen. Cancelled trips can only be restarted.
    /// Every other transition is accepted.
    pub fn transition_to(self, next: TripStatus) -> Result<TripStatus, DomainError> {
        match self {
            TripStatus::Completed => Err(DomainError::TripCompleted),
            TripStatus::Cancelled if next != TripStatus::Started => {
                Err(DomainError::CancelledTripMustRestart(next))
            }
            _ => Ok(next),
        }
    }

    /// Whether seats can still be booked.
    pub fn accepts_bookings(&self) -> bool {
        !matches!(self, TripStatus::Completed | TripStatus::Cancelled)
    }
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An intermediate waypoint on a trip's route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopPoint {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    #[serde(default)]
    pub label: Option<String>,

    pub latitude: f64,

    pub longitude: f64,

    /// Position along the route; stop points are kept sorted by it.
    pub order: i32,
}

impl StopPoint {
    pub fn point(&self) -> GeoPoint {
        GeoPoint {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    /// Exact coordinate equality, no tolerance.
    pub fn is_at(&self, point: &GeoPoint) -> bool {
        self.latitude == point.latitude && self.longitude == point.longitude
    }
}

/// A scheduled ride offering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    pub driver_id: Uuid,

    pub vehicle_id: Uuid,

    /// Departure place label, e.g. "Paris"
    pub departure: String,

    pub departure_latitude: Option<f64>,

    pub departure_longitude: Option<f64>,

    /// Arrival place label, e.g. "Lyon"
    pub arrival: String,

    pub arrival_latitude: Option<f64>,

    pub arrival_longitude: Option<f64>,

    pub departure_date: NaiveDate,

    #[serde(default)]
    pub departure_time: Option<TimeOfDay>,

    pub estimated_arrival_date: NaiveDate,

    #[serde(default)]
    pub arrival_time: Option<TimeOfDay>,

    pub available_seats: u32,

    /// Price per seat in minor currency units
    pub price: u64,

    /// Route length in kilometres
    #[serde(default, rename = "distance")]
    pub distance_km: Option<f64>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub instructions: Option<String>,

    #[serde(default)]
    pub status: TripStatus,

    #[serde(default)]
    pub stop_points: Vec<StopPoint>,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Trip {
    /// Departure coordinates, if both are present.
    pub fn departure_point(&self) -> Option<GeoPoint> {
        Some(GeoPoint {
            latitude: self.departure_latitude?,
            longitude: self.departure_longitude?,
        })
    }

    /// Arrival coordinates, if both are present.
    pub fn arrival_point(&self) -> Option<GeoPoint> {
        Some(GeoPoint {
            latitude: self.arrival_latitude?,
            longitude: self.arrival_longitude?,
        })
    }

    /// True if any stop point sits exactly on `point`.
    pub fn has_stop_at(&self, point: &GeoPoint) -> bool {
        self.stop_points.iter().any(|stop| stop.is_at(point))
    }

    /// Replace the stop points, keeping them sorted by order.
    pub fn set_stop_points(&mut self, mut stops: Vec<StopPoint>) {
        stops.sort_by_key(|s| s.order);
        self.stop_points = stops;
    }

    /// Apply a status change according to [`TripStatus::transition_to`].
    pub fn change_status(&mut self, next: TripStatus) -> Result<(), DomainError> {
        self.status = self.status.transition_to(next)?;
        Ok(())
    }

    /// Take `seats` out of the available pool.
    pub fn reserve_seats(&mut self, seats: u32) -> Result<(), DomainError> {
        if seats == 0 {
            return Err(DomainError::InvalidSeatCount);
        }
        if !self.status.accepts_bookings() {
            return Err(DomainError::TripClosed(self.status));
        }
        self.available_seats =
            self.available_seats
                .checked_sub(seats)
                .ok_or(DomainError::InsufficientSeats {
                    requested: seats,
                    available: self.available_seats,
                })?;
        Ok(())
    }

    /// Give `seats` back to the available pool.
    pub fn release_seats(&mut self, seats: u32) -> Result<(), DomainError> {
        if seats == 0 {
            return Err(DomainError::InvalidSeatCount);
        }
        self.available_seats = self
            .available_seats
            .checked_add(seats)
            .ok_or(DomainError::SeatOverflow)?;
        Ok(())
    }
}

/// A driver who can be assigned to vehicles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub id: Uuid,
    pub name: String,
}

/// A vehicle and the drivers allowed to operate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: Uuid,
    pub name: String,
    pub plate_number: String,
    #[serde(default)]
    pub driver_ids: Vec<Uuid>,
}

impl Vehicle {
    pub fn has_drivers(&self) -> bool {
        !self.driver_ids.is_empty()
    }
}
