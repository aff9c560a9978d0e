//! Data transfer objects for web requests and responses.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{DomainError, GeoPoint, TimeOfDay, TripStatus, check_latitude, check_longitude};
use crate::matcher::{MatcherConfig, SearchCriteria, SearchOutcome};
use crate::paginate::Page;
use crate::store::{TimeFilters, TripRecord};
use crate::trips::{NewStopPoint, NewTrip, TripPatch};

/// A request body that parsed but does not describe a valid request.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RequestError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("{field} must be at least 1")]
    NotPositive { field: &'static str },
}

fn positive(field: &'static str, value: u32) -> Result<u32, RequestError> {
    if value == 0 {
        Err(RequestError::NotPositive { field })
    } else {
        Ok(value)
    }
}

/// Response envelope shared by every trip endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    /// Outcome code; mirrors the HTTP status except for search
    pub status_code: u16,

    pub message: String,

    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(status_code: u16, message: impl Into<String>, data: T) -> Self {
        Self {
            status_code,
            message: message.into(),
            data,
        }
    }
}

/// Search results as carried in the envelope's `data`.
#[derive(Debug, Serialize)]
pub struct SearchPayload {
    /// Whether any tier matched
    pub status: bool,

    #[serde(flatten)]
    pub page: Page<TripRecord>,
}

impl From<SearchOutcome> for ApiResponse<SearchPayload> {
    fn from(outcome: SearchOutcome) -> Self {
        let status_code = match outcome {
            SearchOutcome::Failed { .. } => 500,
            _ => 200,
        };
        let status = outcome.is_found();
        let message = outcome.message();
        let page = outcome.into_page();

        ApiResponse::new(status_code, message, SearchPayload { status, page })
    }
}

/// Pagination query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// 1-indexed page (defaults to 1)
    pub page: Option<u32>,

    /// Page size (defaults to 10)
    pub limit: Option<u32>,
}

impl PageQuery {
    /// Page and limit, with defaults applied. Zero is rejected.
    pub fn resolve(&self, config: &MatcherConfig) -> Result<(u32, u32), RequestError> {
        let page = positive("page", self.page.unwrap_or(config.default_page))?;
        let limit = positive("limit", self.limit.unwrap_or(config.default_limit))?;
        Ok((page, limit))
    }
}

/// Request to search for trips.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchTripRequest {
    pub departure_latitude: f64,

    pub departure_longitude: f64,

    pub arrival_latitude: f64,

    pub arrival_longitude: f64,

    /// Departure date (YYYY-MM-DD)
    pub departure_date: Option<NaiveDate>,

    /// Departure time (HH:MM)
    pub departure_time: Option<TimeOfDay>,

    /// Estimated arrival date (YYYY-MM-DD)
    pub arrival_date: Option<NaiveDate>,

    /// Estimated arrival time (HH:MM)
    pub arrival_time: Option<TimeOfDay>,

    /// Minimum seats required (defaults to 1)
    pub available_seats: Option<u32>,
}

impl SearchTripRequest {
    pub fn into_criteria(
        self,
        page: u32,
        limit: u32,
        config: &MatcherConfig,
    ) -> Result<SearchCriteria, RequestError> {
        let origin = GeoPoint::new(self.departure_latitude, self.departure_longitude)?;
        let destination = GeoPoint::new(self.arrival_latitude, self.arrival_longitude)?;
        let min_seats = positive(
            "availableSeats",
            self.available_seats.unwrap_or(config.default_min_seats),
        )?;

        let times = TimeFilters {
            departure_date: self.departure_date,
            departure_time: self.departure_time,
            arrival_date: self.arrival_date,
            arrival_time: self.arrival_time,
        };

        Ok(SearchCriteria::new(origin, destination)
            .with_times(times)
            .with_min_seats(min_seats)
            .with_page(page, limit))
    }
}

/// A stop point in a create or update request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopPointRequest {
    pub label: Option<String>,

    pub latitude: f64,

    pub longitude: f64,

    /// Position along the route
    pub order: i32,
}

impl StopPointRequest {
    fn into_new(self) -> Result<NewStopPoint, RequestError> {
        Ok(NewStopPoint {
            label: self.label,
            point: GeoPoint::new(self.latitude, self.longitude)?,
            order: self.order,
        })
    }
}

fn stop_points(stops: Vec<StopPointRequest>) -> Result<Vec<NewStopPoint>, RequestError> {
    stops.into_iter().map(StopPointRequest::into_new).collect()
}

/// Request to publish a trip.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTripRequest {
    pub driver_id: Uuid,

    pub vehicle_id: Uuid,

    /// Departure place label, e.g. "Paris"
    pub departure: String,

    pub departure_latitude: f64,

    pub departure_longitude: f64,

    /// Arrival place label, e.g. "Lyon"
    pub arrival: String,

    pub arrival_latitude: f64,

    pub arrival_longitude: f64,

    pub departure_date: NaiveDate,

    pub departure_time: Option<TimeOfDay>,

    pub estimated_arrival_date: NaiveDate,

    pub arrival_time: Option<TimeOfDay>,

    pub available_seats: u32,

    /// Price per seat in minor currency units
    pub price: u64,

    /// Route length in kilometres
    pub distance: Option<f64>,

    pub description: Option<String>,

    pub instructions: Option<String>,

    #[serde(default)]
    pub stop_points: Vec<StopPointRequest>,
}

impl TryFrom<CreateTripRequest> for NewTrip {
    type Error = RequestError;

    fn try_from(req: CreateTripRequest) -> Result<Self, Self::Error> {
        Ok(NewTrip {
            driver_id: req.driver_id,
            vehicle_id: req.vehicle_id,
            departure: req.departure,
            departure_point: GeoPoint::new(req.departure_latitude, req.departure_longitude)?,
            arrival: req.arrival,
            arrival_point: GeoPoint::new(req.arrival_latitude, req.arrival_longitude)?,
            departure_date: req.departure_date,
            departure_time: req.departure_time,
            estimated_arrival_date: req.estimated_arrival_date,
            arrival_time: req.arrival_time,
            available_seats: positive("availableSeats", req.available_seats)?,
            price: req.price,
            distance_km: req.distance,
            description: req.description,
            instructions: req.instructions,
            stop_points: stop_points(req.stop_points)?,
        })
    }
}

/// Partial trip update. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTripRequest {
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
    pub distance: Option<f64>,
    pub description: Option<String>,
    pub instructions: Option<String>,

    /// Replaces every stop point when non-empty
    pub stop_points: Option<Vec<StopPointRequest>>,
}

impl TryFrom<UpdateTripRequest> for TripPatch {
    type Error = RequestError;

    fn try_from(req: UpdateTripRequest) -> Result<Self, Self::Error> {
        Ok(TripPatch {
            driver_id: req.driver_id,
            vehicle_id: req.vehicle_id,
            departure: req.departure,
            departure_latitude: req.departure_latitude.map(check_latitude).transpose()?,
            departure_longitude: req.departure_longitude.map(check_longitude).transpose()?,
            arrival: req.arrival,
            arrival_latitude: req.arrival_latitude.map(check_latitude).transpose()?,
            arrival_longitude: req.arrival_longitude.map(check_longitude).transpose()?,
            departure_date: req.departure_date,
            departure_time: req.departure_time,
            estimated_arrival_date: req.estimated_arrival_date,
            arrival_time: req.arrival_time,
            available_seats: req
                .available_seats
                .map(|n| positive("availableSeats", n))
                .transpose()?,
            price: req.price,
            distance_km: req.distance,
            description: req.description,
            instructions: req.instructions,
            stop_points: req.stop_points.map(stop_points).transpose()?,
        })
    }
}

/// Request to move a trip to another status.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: TripStatus,
}

/// Request to reserve or release seats.
#[derive(Debug, Deserialize)]
pub struct SeatsRequest {
    pub seats: u32,
}

/// Body of a created trip response.
#[derive(Debug, Serialize)]
pub struct CreatedTrip {
    pub id: Uuid,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::MatchTier;

    fn search_body() -> serde_json::Value {
        serde_json::json!({
            "departureLatitude": 48.8566,
            "departureLongitude": 2.3522,
            "arrivalLatitude": 45.764,
            "arrivalLongitude": 4.8357,
        })
    }

    #[test]
    fn search_request_defaults() {
        let req: SearchTripRequest = serde_json::from_value(search_body()).unwrap();
        let criteria = req
            .into_criteria(1, 10, &MatcherConfig::default())
            .unwrap();

        assert_eq!(criteria.min_seats, 1);
        assert!(criteria.times.is_empty());
        assert_eq!(criteria.origin.latitude, 48.8566);
        assert_eq!(criteria.destination.longitude, 4.8357);
    }

    #[test]
    fn search_request_with_schedule() {
        let mut body = search_body();
        body["departureDate"] = "2025-06-15".into();
        body["departureTime"] = "08:30".into();
        body["availableSeats"] = 2.into();

        let req: SearchTripRequest = serde_json::from_value(body).unwrap();
        let criteria = req
            .into_criteria(2, 5, &MatcherConfig::default())
            .unwrap();

        assert_eq!(
            criteria.times.departure_date,
            NaiveDate::from_ymd_opt(2025, 6, 15)
        );
        assert_eq!(criteria.times.departure_time, TimeOfDay::from_hm(8, 30));
        assert_eq!(criteria.min_seats, 2);
        assert_eq!((criteria.page, criteria.limit), (2, 5));
    }

    #[test]
    fn search_request_rejects_bad_input() {
        let mut body = search_body();
        body["departureTime"] = "8:30".into();
        assert!(serde_json::from_value::<SearchTripRequest>(body).is_err());

        let mut body = search_body();
        body["departureDate"] = "15/06/2025".into();
        assert!(serde_json::from_value::<SearchTripRequest>(body).is_err());

        let mut body = search_body();
        body["departureLatitude"] = 91.0.into();
        let req: SearchTripRequest = serde_json::from_value(body).unwrap();
        assert_eq!(
            req.into_criteria(1, 10, &MatcherConfig::default()),
            Err(RequestError::Domain(DomainError::InvalidLatitude(91.0)))
        );

        let mut body = search_body();
        body["availableSeats"] = 0.into();
        let req: SearchTripRequest = serde_json::from_value(body).unwrap();
        assert_eq!(
            req.into_criteria(1, 10, &MatcherConfig::default()),
            Err(RequestError::NotPositive {
                field: "availableSeats"
            })
        );
    }

    #[test]
    fn page_query_defaults_and_rejects_zero() {
        let config = MatcherConfig::default();
        assert_eq!(PageQuery::default().resolve(&config), Ok((1, 10)));

        let query = PageQuery {
            page: Some(3),
            limit: Some(25),
        };
        assert_eq!(query.resolve(&config), Ok((3, 25)));

        let query = PageQuery {
            page: Some(0),
            limit: None,
        };
        assert!(query.resolve(&config).is_err());
    }

    #[test]
    fn search_envelope_shapes() {
        let empty: ApiResponse<SearchPayload> = SearchOutcome::Empty { page: 1, limit: 10 }.into();
        let json = serde_json::to_value(&empty).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "statusCode": 200,
                "message": "no trip found",
                "data": { "status": false, "total": 0, "page": 1, "limit": 10, "data": [] }
            })
        );

        let failed: ApiResponse<SearchPayload> = SearchOutcome::Failed {
            reason: "trip store unavailable: timeout".into(),
            page: 2,
            limit: 5,
        }
        .into();
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["statusCode"], 500);
        assert_eq!(json["message"], "trip store unavailable: timeout");
        assert_eq!(json["data"]["status"], false);
        assert_eq!(json["data"]["page"], 2);

        let found: ApiResponse<SearchPayload> = SearchOutcome::Found {
            tier: MatchTier::Nearby,
            page: Page::empty(1, 10),
        }
        .into();
        let json = serde_json::to_value(&found).unwrap();
        assert_eq!(json["statusCode"], 200);
        assert_eq!(json["message"], "nearby trips found");
        assert_eq!(json["data"]["status"], true);
    }

    #[test]
    fn update_request_validates_coordinates() {
        let req = UpdateTripRequest {
            arrival_longitude: Some(200.0),
            ..UpdateTripRequest::default()
        };
        assert!(TripPatch::try_from(req).is_err());

        let req: UpdateTripRequest =
            serde_json::from_value(serde_json::json!({ "availableSeats": 2, "stopPoints": [] }))
                .unwrap();
        let patch = TripPatch::try_from(req).unwrap();
        assert_eq!(patch.available_seats, Some(2));
        assert_eq!(patch.stop_points, Some(Vec::new()));
    }
}
