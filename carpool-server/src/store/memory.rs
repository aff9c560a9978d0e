//! In-memory trip store.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{DomainError, Driver, Trip, Vehicle};

use super::{StoreError, TripFilter, TripRecord, TripStore};

/// Fixture data for [`MemoryTripStore::from_seed_file`].
///
/// ```json
/// { "drivers": [...], "vehicles": [...], "trips": [...] }
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Seed {
    pub drivers: Vec<Driver>,
    pub vehicles: Vec<Vehicle>,
    pub trips: Vec<Trip>,
}

#[derive(Default)]
struct Tables {
    /// Trips in insertion order.
    trips: Vec<Trip>,
    vehicles: HashMap<Uuid, Vehicle>,
    drivers: HashMap<Uuid, Driver>,
}

impl Tables {
    fn record(&self, trip: &Trip) -> TripRecord {
        TripRecord {
            trip: trip.clone(),
            driver: self.drivers.get(&trip.driver_id).cloned(),
            vehicle: self.vehicles.get(&trip.vehicle_id).cloned(),
        }
    }

    fn position(&self, id: Uuid) -> Option<usize> {
        self.trips.iter().position(|t| t.id == id)
    }
}

/// Thread-safe trip store held entirely in memory.
///
/// Cloning is cheap and clones share the same tables.
#[derive(Clone, Default)]
pub struct MemoryTripStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryTripStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given fixture data.
    pub fn from_seed(seed: Seed) -> Self {
        let mut tables = Tables::default();
        for driver in seed.drivers {
            tables.drivers.insert(driver.id, driver);
        }
        for vehicle in seed.vehicles {
            tables.vehicles.insert(vehicle.id, vehicle);
        }
        for mut trip in seed.trips {
            trip.stop_points.sort_by_key(|s| s.order);
            tables.trips.push(trip);
        }

        Self {
            tables: Arc::new(RwLock::new(tables)),
        }
    }

    /// Load fixture data from a JSON file.
    pub fn from_seed_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| StoreError::SeedIo {
            path: path.to_path_buf(),
            source,
        })?;
        let seed: Seed = serde_json::from_str(&json).map_err(|source| StoreError::SeedParse {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self::from_seed(seed))
    }

    pub async fn insert_driver(&self, driver: Driver) {
        self.tables.write().await.drivers.insert(driver.id, driver);
    }

    pub async fn insert_vehicle(&self, vehicle: Vehicle) {
        self.tables.write().await.vehicles.insert(vehicle.id, vehicle);
    }

    /// Number of stored trips.
    pub async fn trip_count(&self) -> usize {
        self.tables.read().await.trips.len()
    }
}

impl TripStore for MemoryTripStore {
    async fn find_trips(&self, filter: &TripFilter) -> Result<Vec<TripRecord>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .trips
            .iter()
            .filter(|t| filter.matches(t))
            .map(|t| tables.record(t))
            .collect())
    }

    async fn get_trip(&self, id: Uuid) -> Result<Option<TripRecord>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .trips
            .iter()
            .find(|t| t.id == id)
            .map(|t| tables.record(t)))
    }

    async fn get_vehicle(&self, id: Uuid) -> Result<Option<Vehicle>, StoreError> {
        Ok(self.tables.read().await.vehicles.get(&id).cloned())
    }

    async fn insert_trip(&self, trip: Trip) -> Result<(), StoreError> {
        self.tables.write().await.trips.push(trip);
        Ok(())
    }

    async fn modify_trip<F>(&self, id: Uuid, change: F) -> Result<Option<Trip>, StoreError>
    where
        F: FnOnce(&mut Trip) -> Result<(), DomainError> + Send,
    {
        let mut tables = self.tables.write().await;
        let Some(idx) = tables.position(id) else {
            return Ok(None);
        };

        let mut updated = tables.trips[idx].clone();
        change(&mut updated)?;
        updated.updated_at = Utc::now();
        tables.trips[idx] = updated.clone();

        Ok(Some(updated))
    }

    async fn delete_trip(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        match tables.position(id) {
            Some(idx) => {
                tables.trips.remove(idx);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TripStatus;
    use std::io::Write;

    const SEED: &str = r#"{
        "drivers": [
            { "id": "7f6c9a0e-1b2c-4d3e-8f9a-0b1c2d3e4f50", "name": "Camille" }
        ],
        "vehicles": [
            {
                "id": "1a2b3c4d-5e6f-4a8b-9c0d-1e2f3a4b5c6d",
                "name": "Peugeot 308",
                "plateNumber": "AB-123-CD",
                "driverIds": ["7f6c9a0e-1b2c-4d3e-8f9a-0b1c2d3e4f50"]
            }
        ],
        "trips": [
            {
                "id": "0b9e3c1a-2d4f-4e6a-8b0c-1d2e3f4a5b6c",
                "driverId": "7f6c9a0e-1b2c-4d3e-8f9a-0b1c2d3e4f50",
                "vehicleId": "1a2b3c4d-5e6f-4a8b-9c0d-1e2f3a4b5c6d",
                "departure": "Paris",
                "departureLatitude": 48.8566,
                "departureLongitude": 2.3522,
                "arrival": "Lyon",
                "arrivalLatitude": 45.7640,
                "arrivalLongitude": 4.8357,
                "departureDate": "2025-06-07",
                "departureTime": "08:30",
                "estimatedArrivalDate": "2025-06-07",
                "arrivalTime": "13:30",
                "availableSeats": 3,
                "price": 4500,
                "stopPoints": [
                    { "latitude": 46.7, "longitude": 4.4, "order": 2 },
                    { "latitude": 47.8, "longitude": 3.6, "order": 1, "label": "Auxerre" }
                ]
            }
        ]
    }"#;

    fn trip_id() -> Uuid {
        Uuid::parse_str("0b9e3c1a-2d4f-4e6a-8b0c-1d2e3f4a5b6c").unwrap()
    }

    fn seeded() -> MemoryTripStore {
        MemoryTripStore::from_seed(serde_json::from_str(SEED).unwrap())
    }

    #[tokio::test]
    async fn seed_joins_driver_and_vehicle() {
        let store = seeded();
        let record = store.get_trip(trip_id()).await.unwrap().unwrap();

        assert_eq!(record.driver.unwrap().name, "Camille");
        assert_eq!(record.vehicle.unwrap().plate_number, "AB-123-CD");
        assert_eq!(record.trip.status, TripStatus::Pending);

        let orders: Vec<i32> = record.trip.stop_points.iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![1, 2]);
    }

    #[tokio::test]
    async fn seed_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SEED.as_bytes()).unwrap();

        let store = MemoryTripStore::from_seed_file(file.path()).unwrap();
        assert_eq!(store.trip_count().await, 1);
    }

    #[test]
    fn seed_file_errors() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("missing.json");
        assert!(matches!(
            MemoryTripStore::from_seed_file(&missing),
            Err(StoreError::SeedIo { .. })
        ));

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{ not json").unwrap();
        assert!(matches!(
            MemoryTripStore::from_seed_file(&broken),
            Err(StoreError::SeedParse { .. })
        ));
    }

    #[tokio::test]
    async fn find_preserves_insertion_order() {
        let store = seeded();
        let mut second = store.get_trip(trip_id()).await.unwrap().unwrap().trip;
        second.id = Uuid::new_v4();
        second.available_seats = 1;
        store.insert_trip(second.clone()).await.unwrap();

        let all = store.find_trips(&TripFilter::default()).await.unwrap();
        let ids: Vec<Uuid> = all.iter().map(|r| r.trip.id).collect();
        assert_eq!(ids, vec![trip_id(), second.id]);

        let roomy = store
            .find_trips(&TripFilter::with_min_seats(2))
            .await
            .unwrap();
        assert_eq!(roomy.len(), 1);
    }

    #[tokio::test]
    async fn modify_commits_only_on_success() {
        let store = seeded();

        let updated = store
            .modify_trip(trip_id(), |t| t.reserve_seats(2))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.available_seats, 1);

        let result = store.modify_trip(trip_id(), |t| t.reserve_seats(5)).await;
        assert!(matches!(
            result,
            Err(StoreError::Rejected(DomainError::InsufficientSeats { .. }))
        ));

        let stored = store.get_trip(trip_id()).await.unwrap().unwrap();
        assert_eq!(stored.trip.available_seats, 1);
    }

    #[tokio::test]
    async fn modify_missing_trip() {
        let store = seeded();
        let result = store
            .modify_trip(Uuid::new_v4(), |t| t.reserve_seats(1))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn delete_trip() {
        let store = seeded();
        assert!(store.delete_trip(trip_id()).await.unwrap());
        assert!(!store.delete_trip(trip_id()).await.unwrap());
        assert_eq!(store.trip_count().await, 0);
    }
}
