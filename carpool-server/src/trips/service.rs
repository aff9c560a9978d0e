//! Trip management: create, read, update, delete, status and seats.

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{GeoPoint, StopPoint, TimeOfDay, Trip, TripStatus};
use crate::paginate::{Page, paginate};
use crate::store::{TripFilter, TripRecord, TripStore};

use super::error::TripError;

/// A stop point supplied by a client.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStopPoint {
    pub label: Option<String>,
    pub point: GeoPoint,
    pub order: i32,
}

impl NewStopPoint {
    fn into_stop_point(self) -> StopPoint {
        StopPoint {
            id: Uuid::new_v4(),
            label: self.label,
            latitude: self.point.latitude,
            longitude: self.point.longitude,
            order: self.order,
        }
    }
}

/// A validated trip creation request.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTrip {
    pub driver_id: Uuid,
    pub vehicle_id: Uuid,
    pub departure: String,
    pub departure_point: GeoPoint,
    pub arrival: String,
    pub arrival_point: GeoPoint,
    pub departure_date: NaiveDate,
    pub departure_time: Option<TimeOfDay>,
    pub estimated_arrival_date: NaiveDate,
    pub arrival_time: Option<TimeOfDay>,
    pub available_seats: u32,
    pub price: u64,
    pub distance_km: Option<f64>,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub stop_points: Vec<NewStopPoint>,
}

/// A partial trip update. `None` fields are left unchanged.
///
/// Stop points are replaced only when a non-empty list is supplied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripPatch {
    pub driver_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub departure: Option<String>,
    pub departure_latitude: Option<f64>,
    pub departure_longitude: Option<f64>,
    pub arrival: Option<String>,
    pub arrival_latitude: Option<f64>,
    pub arrival_longitude: Option<f64>,
    pub departure_date: Option<NaiveDate>,
    pub departure_time: Option<TimeOfDay>,
    pub estimated_arrival_date: Option<NaiveDate>,
    pub arrival_time: Option<TimeOfDay>,
    pub available_seats: Option<u32>,
    pub price: Option<u64>,
    pub distance_km: Option<f64>,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub stop_points: Option<Vec<NewStopPoint>>,
}

impl TripPatch {
    fn apply(self, trip: &mut Trip) {
        if let Some(driver_id) = self.driver_id {
            trip.driver_id = driver_id;
        }
        if let Some(vehicle_id) = self.vehicle_id {
            trip.vehicle_id = vehicle_id;
        }
        if let Some(departure) = self.departure {
            trip.departure = departure;
        }
        if let Some(arrival) = self.arrival {
            trip.arrival = arrival;
        }
        if let Some(date) = self.departure_date {
            trip.departure_date = date;
        }
        if let Some(date) = self.estimated_arrival_date {
            trip.estimated_arrival_date = date;
        }
        if let Some(seats) = self.available_seats {
            trip.available_seats = seats;
        }
        if let Some(price) = self.price {
            trip.price = price;
        }

        trip.departure_latitude = self.departure_latitude.or(trip.departure_latitude);
        trip.departure_longitude = self.departure_longitude.or(trip.departure_longitude);
        trip.arrival_latitude = self.arrival_latitude.or(trip.arrival_latitude);
        trip.arrival_longitude = self.arrival_longitude.or(trip.arrival_longitude);
        trip.departure_time = self.departure_time.or(trip.departure_time);
        trip.arrival_time = self.arrival_time.or(trip.arrival_time);
        trip.distance_km = self.distance_km.or(trip.distance_km);
        if self.description.is_some() {
            trip.description = self.description;
        }
        if self.instructions.is_some() {
            trip.instructions = self.instructions;
        }

        if let Some(stops) = self.stop_points.filter(|s| !s.is_empty()) {
            trip.set_stop_points(stops.into_iter().map(NewStopPoint::into_stop_point).collect());
        }
    }
}

/// Trip management operations over a store.
pub struct TripService<'a, S: TripStore> {
    store: &'a S,
}

impl<'a, S: TripStore> TripService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Create a trip in PENDING status.
    ///
    /// The vehicle must exist and have at least one assigned driver.
    pub async fn create_trip(&self, new: NewTrip) -> Result<Uuid, TripError> {
        self.check_vehicle(new.vehicle_id).await?;

        let now = Utc::now();
        let mut trip = Trip {
            id: Uuid::new_v4(),
            driver_id: new.driver_id,
            vehicle_id: new.vehicle_id,
            departure: new.departure,
            departure_latitude: Some(new.departure_point.latitude),
            departure_longitude: Some(new.departure_point.longitude),
            arrival: new.arrival,
            arrival_latitude: Some(new.arrival_point.latitude),
            arrival_longitude: Some(new.arrival_point.longitude),
            departure_date: new.departure_date,
            departure_time: new.departure_time,
            estimated_arrival_date: new.estimated_arrival_date,
            arrival_time: new.arrival_time,
            available_seats: new.available_seats,
            price: new.price,
            distance_km: new.distance_km,
            description: new.description,
            instructions: new.instructions,
            status: TripStatus::Pending,
            stop_points: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        trip.set_stop_points(
            new.stop_points
                .into_iter()
                .map(NewStopPoint::into_stop_point)
                .collect(),
        );

        let id = trip.id;
        self.store.insert_trip(trip).await?;
        info!(%id, "trip created");
        Ok(id)
    }

    /// Fetch a trip with its driver and vehicle.
    pub async fn get_trip(&self, id: Uuid) -> Result<TripRecord, TripError> {
        self.store
            .get_trip(id)
            .await?
            .ok_or_else(|| trip_not_found(id))
    }

    /// Apply a partial update.
    pub async fn update_trip(&self, id: Uuid, patch: TripPatch) -> Result<Trip, TripError> {
        if let Some(vehicle_id) = patch.vehicle_id {
            self.check_vehicle(vehicle_id).await?;
        }

        let trip = self
            .store
            .modify_trip(id, |trip| {
                patch.apply(trip);
                Ok(())
            })
            .await?
            .ok_or_else(|| trip_not_found(id))?;

        info!(%id, "trip updated");
        Ok(trip)
    }

    /// Delete a trip and its stop points.
    pub async fn delete_trip(&self, id: Uuid) -> Result<(), TripError> {
        if !self.store.delete_trip(id).await? {
            return Err(trip_not_found(id));
        }
        info!(%id, "trip deleted");
        Ok(())
    }

    /// Move a trip to a new status.
    pub async fn update_status(&self, id: Uuid, status: TripStatus) -> Result<Trip, TripError> {
        let result = self
            .store
            .modify_trip(id, |trip| trip.change_status(status))
            .await;

        match result {
            Ok(Some(trip)) => {
                info!(%id, %status, "trip status changed");
                Ok(trip)
            }
            Ok(None) => Err(trip_not_found(id)),
            Err(e) => {
                warn!(%id, %status, error = %e, "trip status change refused");
                Err(e.into())
            }
        }
    }

    /// All trips, newest first.
    pub async fn list_trips(&self, page: u32, limit: u32) -> Result<Page<TripRecord>, TripError> {
        self.list(&TripFilter::default(), page, limit).await
    }

    /// Trips run with a vehicle, newest first.
    pub async fn trips_by_vehicle(
        &self,
        vehicle_id: Uuid,
        page: u32,
        limit: u32,
    ) -> Result<Page<TripRecord>, TripError> {
        self.list(&TripFilter::default().vehicle(vehicle_id), page, limit)
            .await
    }

    /// Trips driven by a driver, newest first.
    pub async fn trips_by_driver(
        &self,
        driver_id: Uuid,
        page: u32,
        limit: u32,
    ) -> Result<Page<TripRecord>, TripError> {
        self.list(&TripFilter::default().driver(driver_id), page, limit)
            .await
    }

    /// Take seats out of a trip's availability.
    pub async fn reserve_seats(&self, id: Uuid, seats: u32) -> Result<Trip, TripError> {
        let trip = self
            .store
            .modify_trip(id, |trip| trip.reserve_seats(seats))
            .await?
            .ok_or_else(|| trip_not_found(id))?;

        info!(%id, seats, remaining = trip.available_seats, "seats reserved");
        Ok(trip)
    }

    /// Return seats to a trip's availability.
    pub async fn release_seats(&self, id: Uuid, seats: u32) -> Result<Trip, TripError> {
        let trip = self
            .store
            .modify_trip(id, |trip| trip.release_seats(seats))
            .await?
            .ok_or_else(|| trip_not_found(id))?;

        info!(%id, seats, remaining = trip.available_seats, "seats released");
        Ok(trip)
    }

    async fn list(
        &self,
        filter: &TripFilter,
        page: u32,
        limit: u32,
    ) -> Result<Page<TripRecord>, TripError> {
        let mut records = self.store.find_trips(filter).await?;
        // Stores return oldest first; ties keep newest-inserted first.
        records.reverse();
        records.sort_by(|a, b| b.trip.created_at.cmp(&a.trip.created_at));
        Ok(paginate(records, page, limit))
    }

    async fn check_vehicle(&self, vehicle_id: Uuid) -> Result<(), TripError> {
        let vehicle = self
            .store
            .get_vehicle(vehicle_id)
            .await?
            .ok_or_else(|| TripError::NotFound(format!("vehicle {vehicle_id} not found")))?;

        if !vehicle.has_drivers() {
            return Err(TripError::BadRequest(format!(
                "vehicle {vehicle_id} has no assigned driver"
            )));
        }
        Ok(())
    }
}

fn trip_not_found(id: Uuid) -> TripError {
    TripError::NotFound(format!("trip {id} not found"))
}
