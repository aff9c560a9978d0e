//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use serde::de::DeserializeOwned;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};
use uuid::Uuid;

use crate::domain::Trip;
use crate::matcher::TripMatcher;
use crate::paginate::Page;
use crate::store::TripRecord;
use crate::trips::{NewTrip, TripError, TripPatch, TripService};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/trips", get(list_trips).post(create_trip))
        .route("/trips/search", post(search_trips))
        .route("/trips/by-vehicle/:vehicle_id", get(trips_by_vehicle))
        .route("/trips/by-driver/:driver_id", get(trips_by_driver))
        .route(
            "/trips/:id",
            get(get_trip).patch(update_trip).delete(delete_trip),
        )
        .route("/trips/:id/status", patch(update_status))
        .route("/trips/:id/seats/reserve", post(reserve_seats))
        .route("/trips/:id/seats/release", post(release_seats))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Parse a JSON body, logging it on failure.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, body = %String::from_utf8_lossy(body), "invalid JSON body");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })
}

fn parse_id(raw: &str, what: &str) -> Result<Uuid, AppError> {
    raw.parse().map_err(|_| AppError::BadRequest {
        message: format!("Invalid {what} id: {raw}"),
    })
}

type Envelope<T> = Json<ApiResponse<T>>;

fn ok<T>(message: &str, data: T) -> Envelope<T> {
    Json(ApiResponse::new(StatusCode::OK.as_u16(), message, data))
}

/// Search trips with tiered fallback.
///
/// Always answers 200; store failures are reported inside the envelope.
async fn search_trips(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
    body: Bytes,
) -> Result<Envelope<SearchPayload>, AppError> {
    let req: SearchTripRequest = parse_body(&body)?;
    let (page, limit) = query.resolve(&state.matcher)?;
    let criteria = req.into_criteria(page, limit, &state.matcher)?;

    let matcher = TripMatcher::new(state.store.as_ref(), &state.matcher);
    let outcome = matcher.search(&criteria).await;

    Ok(Json(outcome.into()))
}

/// Publish a new trip.
async fn create_trip(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Envelope<CreatedTrip>), AppError> {
    let req: CreateTripRequest = parse_body(&body)?;
    let new_trip = NewTrip::try_from(req)?;

    let id = TripService::new(state.store.as_ref())
        .create_trip(new_trip)
        .await?;

    let status = StatusCode::CREATED;
    Ok((
        status,
        Json(ApiResponse::new(
            status.as_u16(),
            "trip created",
            CreatedTrip { id },
        )),
    ))
}

async fn get_trip(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Envelope<TripRecord>, AppError> {
    let id = parse_id(&id, "trip")?;
    let record = TripService::new(state.store.as_ref()).get_trip(id).await?;
    Ok(ok("trip found", record))
}

async fn update_trip(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Envelope<Trip>, AppError> {
    let id = parse_id(&id, "trip")?;
    let req: UpdateTripRequest = parse_body(&body)?;
    let patch = TripPatch::try_from(req)?;

    let trip = TripService::new(state.store.as_ref())
        .update_trip(id, patch)
        .await?;
    Ok(ok("trip updated", trip))
}

async fn delete_trip(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Envelope<()>, AppError> {
    let id = parse_id(&id, "trip")?;
    TripService::new(state.store.as_ref())
        .delete_trip(id)
        .await?;
    Ok(ok("trip deleted", ()))
}

async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Envelope<Trip>, AppError> {
    let id = parse_id(&id, "trip")?;
    let req: UpdateStatusRequest = parse_body(&body)?;

    let trip = TripService::new(state.store.as_ref())
        .update_status(id, req.status)
        .await?;
    Ok(ok("trip status updated", trip))
}

async fn list_trips(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Envelope<Page<TripRecord>>, AppError> {
    let (page, limit) = query.resolve(&state.matcher)?;
    let trips = TripService::new(state.store.as_ref())
        .list_trips(page, limit)
        .await?;
    Ok(ok("trips found", trips))
}

async fn trips_by_vehicle(
    State(state): State<AppState>,
    Path(vehicle_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Envelope<Page<TripRecord>>, AppError> {
    let vehicle_id = parse_id(&vehicle_id, "vehicle")?;
    let (page, limit) = query.resolve(&state.matcher)?;
    let trips = TripService::new(state.store.as_ref())
        .trips_by_vehicle(vehicle_id, page, limit)
        .await?;
    Ok(ok("trips found", trips))
}

async fn trips_by_driver(
    State(state): State<AppState>,
    Path(driver_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Envelope<Page<TripRecord>>, AppError> {
    let driver_id = parse_id(&driver_id, "driver")?;
    let (page, limit) = query.resolve(&state.matcher)?;
    let trips = TripService::new(state.store.as_ref())
        .trips_by_driver(driver_id, page, limit)
        .await?;
    Ok(ok("trips found", trips))
}

async fn reserve_seats(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Envelope<Trip>, AppError> {
    let id = parse_id(&id, "trip")?;
    let req: SeatsRequest = parse_body(&body)?;
    let trip = TripService::new(state.store.as_ref())
        .reserve_seats(id, req.seats)
        .await?;
    Ok(ok("seats reserved", trip))
}

async fn release_seats(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Envelope<Trip>, AppError> {
    let id = parse_id(&id, "trip")?;
    let req: SeatsRequest = parse_body(&body)?;
    let trip = TripService::new(state.store.as_ref())
        .release_seats(id, req.seats)
        .await?;
    Ok(ok("seats released", trip))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Conflict { message: String },
    Internal { message: String },
}

impl From<TripError> for AppError {
    fn from(e: TripError) -> Self {
        match e {
            TripError::NotFound(message) => AppError::NotFound { message },
            TripError::BadRequest(message) => AppError::BadRequest { message },
            TripError::Conflict(message) => AppError::Conflict { message },
            TripError::Store(e) => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl From<RequestError> for AppError {
    fn from(e: RequestError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Conflict { message } => (StatusCode::CONFLICT, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
