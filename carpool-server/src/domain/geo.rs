//! Geographic points and great-circle distance.

use serde::{Deserialize, Serialize};

use super::DomainError;

/// Mean Earth radius used for all distance calculations, in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in decimal degrees.
///
/// Fields are public because stored trips may carry coordinates that
/// predate validation; use [`GeoPoint::new`] for anything coming from a client.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a validated point.
    ///
    /// # Examples
    ///
    /// ```
    /// use carpool_server::domain::GeoPoint;
    ///
    /// let paris = GeoPoint::new(48.8566, 2.3522).unwrap();
    /// assert_eq!(paris.latitude, 48.8566);
    ///
    /// assert!(GeoPoint::new(91.0, 0.0).is_err());
    /// assert!(GeoPoint::new(0.0, f64::NAN).is_err());
    /// ```
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, DomainError> {
        Ok(Self {
            latitude: check_latitude(latitude)?,
            longitude: check_longitude(longitude)?,
        })
    }

    /// Great-circle distance to `other` in kilometres.
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        haversine_km(self, other)
    }
}

/// Reject latitudes that are not finite or fall outside [-90, 90].
pub fn check_latitude(latitude: f64) -> Result<f64, DomainError> {
    if latitude.is_finite() && (-90.0..=90.0).contains(&latitude) {
        Ok(latitude)
    } else {
        Err(DomainError::InvalidLatitude(latitude))
    }
}

/// Reject longitudes that are not finite or fall outside [-180, 180].
pub fn check_longitude(longitude: f64) -> Result<f64, DomainError> {
    if longitude.is_finite() && (-180.0..=180.0).contains(&longitude) {
        Ok(longitude)
    } else {
        Err(DomainError::InvalidLongitude(longitude))
    }
}

/// Haversine distance between two points, in kilometres.
///
/// ```text
/// a = sin²(Δlat/2) + cos(lat1)·cos(lat2)·sin²(Δlon/2)
/// c = 2·atan2(√a, √(1−a))
/// d = R·c
/// ```
pub fn haversine_km(from: &GeoPoint, to: &GeoPoint) -> f64 {
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + from.latitude.to_radians().cos()
            * to.latitude.to_radians().cos()
            * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    #[test]
    fn paris_to_lyon() {
        let paris = point(48.8566, 2.3522);
        let lyon = point(45.7640, 4.8357);

        let d = haversine_km(&paris, &lyon);
        assert!((d - 391.5).abs() < 1.0, "got {d}");
    }

    #[test]
    fn one_degree_of_latitude() {
        let d = haversine_km(&point(0.0, 0.0), &point(1.0, 0.0));
        let expected = EARTH_RADIUS_KM * 1f64.to_radians();
        assert!((d - expected).abs() < 1e-9);
    }

    #[test]
    fn same_point_is_zero() {
        let p = point(45.7640, 4.8357);
        assert_eq!(p.distance_km(&p), 0.0);
    }

    #[test]
    fn antipodes() {
        let d = haversine_km(&point(0.0, 0.0), &point(0.0, 180.0));
        let half_circumference = EARTH_RADIUS_KM * std::f64::consts::PI;
        assert!((d - half_circumference).abs() < 1e-6);
    }

    #[test]
    fn reject_out_of_range() {
        assert_eq!(
            GeoPoint::new(-90.5, 0.0),
            Err(DomainError::InvalidLatitude(-90.5))
        );
        assert_eq!(
            GeoPoint::new(0.0, 180.5),
            Err(DomainError::InvalidLongitude(180.5))
        );
        assert!(GeoPoint::new(f64::INFINITY, 0.0).is_err());
    }

    #[test]
    fn accept_bounds() {
        assert!(GeoPoint::new(90.0, 180.0).is_ok());
        assert!(GeoPoint::new(-90.0, -180.0).is_ok());
    }
}
