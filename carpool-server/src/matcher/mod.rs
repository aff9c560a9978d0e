//! Trip search using a three-tier fallback.
//!
//! This module answers: "which trips can take me from here to there?"
//!
//! Tiers are tried in order and the first non-empty one is returned:
//! trips with exactly the requested endpoints, trips with a stop point on
//! either endpoint, then trips whose endpoints lie within a fixed radius.

mod config;
mod search;

pub use config::MatcherConfig;
pub use search::{MatchTier, NO_TRIP_FOUND, SearchCriteria, SearchOutcome, TripMatcher};
