//! Trip query filters.
//!
//! A filter is a conjunction of optional predicates. Unset predicates act as
//! wildcards, so `TripFilter::default()` matches every trip.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{GeoPoint, TimeOfDay, Trip};

/// Exact-match schedule filters. `None` fields are not applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeFilters {
    pub departure_date: Option<NaiveDate>,
    pub departure_time: Option<TimeOfDay>,
    pub arrival_date: Option<NaiveDate>,
    pub arrival_time: Option<TimeOfDay>,
}

impl TimeFilters {
    pub fn is_empty(&self) -> bool {
        self.departure_date.is_none()
            && self.departure_time.is_none()
            && self.arrival_date.is_none()
            && self.arrival_time.is_none()
    }

    /// Check every supplied field for equality with the trip's schedule.
    ///
    /// A filter on a time the trip does not carry never matches.
    pub fn matches(&self, trip: &Trip) -> bool {
        self.departure_date.is_none_or(|d| trip.departure_date == d)
            && self
                .departure_time
                .is_none_or(|t| trip.departure_time == Some(t))
            && self
                .arrival_date
                .is_none_or(|d| trip.estimated_arrival_date == d)
            && self.arrival_time.is_none_or(|t| trip.arrival_time == Some(t))
    }
}

/// Predicates a store applies when listing trips.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripFilter {
    /// Minimum `available_seats`.
    pub min_seats: u32,

    pub times: TimeFilters,

    /// Departure and arrival must equal these points exactly.
    pub endpoints: Option<(GeoPoint, GeoPoint)>,

    /// At least one stop point must equal one of these points exactly.
    /// Empty means no stop-point requirement.
    pub stop_at_any: Vec<GeoPoint>,

    pub vehicle_id: Option<Uuid>,

    pub driver_id: Option<Uuid>,
}

impl TripFilter {
    /// Filter on seat availability only.
    pub fn with_min_seats(min_seats: u32) -> Self {
        Self {
            min_seats,
            ..Self::default()
        }
    }

    pub fn times(mut self, times: TimeFilters) -> Self {
        self.times = times;
        self
    }

    pub fn endpoints(mut self, departure: GeoPoint, arrival: GeoPoint) -> Self {
        self.endpoints = Some((departure, arrival));
        self
    }

    pub fn stop_at_any(mut self, points: impl IntoIterator<Item = GeoPoint>) -> Self {
        self.stop_at_any = points.into_iter().collect();
        self
    }

    pub fn vehicle(mut self, vehicle_id: Uuid) -> Self {
        self.vehicle_id = Some(vehicle_id);
        self
    }

    pub fn driver(mut self, driver_id: Uuid) -> Self {
        self.driver_id = Some(driver_id);
        self
    }

    /// Evaluate the filter against a trip.
    pub fn matches(&self, trip: &Trip) -> bool {
        if trip.available_seats < self.min_seats {
            return false;
        }
        if !self.times.matches(trip) {
            return false;
        }
        if self.vehicle_id.is_some_and(|id| trip.vehicle_id != id) {
            return false;
        }
        if self.driver_id.is_some_and(|id| trip.driver_id != id) {
            return false;
        }
        if let Some((departure, arrival)) = &self.endpoints {
            if trip.departure_point().as_ref() != Some(departure)
                || trip.arrival_point().as_ref() != Some(arrival)
            {
                return false;
            }
        }
        if !self.stop_at_any.is_empty()
            && !self.stop_at_any.iter().any(|p| trip.has_stop_at(p))
        {
            return false;
        }
        true
    }
}
