//! Web layer for the carpool server.
//!
//! Provides HTTP endpoints for searching and managing trips.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
