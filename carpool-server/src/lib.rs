//! Carpool trip server.
//!
//! A web application that answers: "which trips can take me from here to
//! there?", falling back from exact routes to stop points to nearby trips,
//! and lets drivers publish and manage the trips it searches.

pub mod config;
pub mod domain;
pub mod matcher;
pub mod paginate;
pub mod store;
pub mod trips;
pub mod web;
