//! Domain types for the carpool trip service.
//!
//! Coordinates, times of day and trip rules live here. Types that come
//! from clients are validated at construction, so code receiving them
//! can trust their contents.

mod error;
mod geo;
mod time;
mod trip;

pub use error::DomainError;
pub use geo::{EARTH_RADIUS_KM, GeoPoint, check_latitude, check_longitude, haversine_km};
pub use time::TimeOfDay;
pub use trip::{Driver, StopPoint, Trip, TripStatus, Vehicle};
