//! Trip management.
//!
//! Drivers publish trips on one of their vehicles, adjust them, move them
//! through their lifecycle and hand out seats. Search lives in
//! [`crate::matcher`].

mod error;
mod service;

pub use error::TripError;
pub use service::{NewStopPoint, NewTrip, TripPatch, TripService};
