//! Tiered trip search.
//!
//! Tries progressively looser matching until a tier returns something:
//! exact endpoints, then stop points, then proximity. The first non-empty
//! tier wins and later tiers are never evaluated.

use std::fmt;

use tracing::{debug, error, info};

use crate::domain::{GeoPoint, Trip};
use crate::paginate::{Page, paginate};
use crate::store::{StoreError, TimeFilters, TripFilter, TripRecord, TripStore};

use super::config::MatcherConfig;

/// A rider's search request.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCriteria {
    pub origin: GeoPoint,
    pub destination: GeoPoint,
    pub times: TimeFilters,
    /// Minimum available seats a trip must offer.
    pub min_seats: u32,
    /// 1-indexed page number.
    pub page: u32,
    pub limit: u32,
}

impl SearchCriteria {
    /// Create criteria with no time filters, one seat, first page of 10.
    pub fn new(origin: GeoPoint, destination: GeoPoint) -> Self {
        let defaults = MatcherConfig::default();
        Self {
            origin,
            destination,
            times: TimeFilters::default(),
            min_seats: defaults.default_min_seats,
            page: defaults.default_page,
            limit: defaults.default_limit,
        }
    }

    pub fn with_times(mut self, times: TimeFilters) -> Self {
        self.times = times;
        self
    }

    pub fn with_min_seats(mut self, min_seats: u32) -> Self {
        self.min_seats = min_seats;
        self
    }

    pub fn with_page(mut self, page: u32, limit: u32) -> Self {
        self.page = page;
        self.limit = limit;
        self
    }
}

/// Which matching stage produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    /// Departure and arrival equal the requested points.
    Direct,
    /// A stop point equals the origin or the destination.
    StopPoint,
    /// Both endpoints lie within the configured radius.
    Nearby,
}

impl MatchTier {
    /// Evaluation order.
    pub const ALL: [MatchTier; 3] = [MatchTier::Direct, MatchTier::StopPoint, MatchTier::Nearby];

    pub fn label(&self) -> &'static str {
        match self {
            MatchTier::Direct => "direct trips found",
            MatchTier::StopPoint => "trips found via stop points",
            MatchTier::Nearby => "nearby trips found",
        }
    }
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MatchTier::Direct => "direct",
            MatchTier::StopPoint => "stop-point",
            MatchTier::Nearby => "nearby",
        };
        f.write_str(name)
    }
}

/// Message used when no tier matched.
pub const NO_TRIP_FOUND: &str = "no trip found";

/// Result of a search.
///
/// Search never fails past this type: store errors become [`SearchOutcome::Failed`].
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// A tier matched; `page` is the requested slice of its trips.
    Found {
        tier: MatchTier,
        page: Page<TripRecord>,
    },

    /// No tier matched.
    Empty { page: u32, limit: u32 },

    /// The store failed during one of the tiers.
    Failed {
        reason: String,
        page: u32,
        limit: u32,
    },
}

impl SearchOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found { .. })
    }

    pub fn tier(&self) -> Option<MatchTier> {
        match self {
            SearchOutcome::Found { tier, .. } => Some(*tier),
            _ => None,
        }
    }

    /// Human-readable summary: the tier label, [`NO_TRIP_FOUND`], or the failure reason.
    pub fn message(&self) -> String {
        match self {
            SearchOutcome::Found { tier, .. } => tier.label().to_string(),
            SearchOutcome::Empty { .. } => NO_TRIP_FOUND.to_string(),
            SearchOutcome::Failed { reason, .. } => reason.clone(),
        }
    }

    /// The page of results; empty unless a tier matched.
    pub fn into_page(self) -> Page<TripRecord> {
        match self {
            SearchOutcome::Found { page, .. } => page,
            SearchOutcome::Empty { page, limit } | SearchOutcome::Failed { page, limit, .. } => {
                Page::empty(page, limit)
            }
        }
    }
}

/// Tiered trip matcher.
pub struct TripMatcher<'a, S: TripStore> {
    store: &'a S,
    config: &'a MatcherConfig,
}

impl<'a, S: TripStore> TripMatcher<'a, S> {
    /// Create a new matcher.
    pub fn new(store: &'a S, config: &'a MatcherConfig) -> Self {
        Self { store, config }
    }

    /// Run the search and paginate whichever tier matched.
    pub async fn search(&self, criteria: &SearchCriteria) -> SearchOutcome {
        match self.first_matching_tier(criteria).await {
            Ok(Some((tier, trips))) => {
                info!(%tier, matches = trips.len(), "trip search matched");
                SearchOutcome::Found {
                    tier,
                    page: paginate(trips, criteria.page, criteria.limit),
                }
            }
            Ok(None) => {
                info!("trip search found nothing");
                SearchOutcome::Empty {
                    page: criteria.page,
                    limit: criteria.limit,
                }
            }
            Err(e) => {
                error!(error = %e, "trip search failed");
                SearchOutcome::Failed {
                    reason: e.to_string(),
                    page: criteria.page,
                    limit: criteria.limit,
                }
            }
        }
    }

    /// Evaluate tiers in order, stopping at the first non-empty one.
    async fn first_matching_tier(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<Option<(MatchTier, Vec<TripRecord>)>, StoreError> {
        for tier in MatchTier::ALL {
            let trips = self.run_tier(tier, criteria).await?;
            debug!(%tier, candidates = trips.len(), "evaluated tier");
            if !trips.is_empty() {
                return Ok(Some((tier, trips)));
            }
        }
        Ok(None)
    }

    async fn run_tier(
        &self,
        tier: MatchTier,
        criteria: &SearchCriteria,
    ) -> Result<Vec<TripRecord>, StoreError> {
        let seats = TripFilter::with_min_seats(criteria.min_seats);

        match tier {
            MatchTier::Direct => {
                let filter = seats
                    .times(criteria.times.clone())
                    .endpoints(criteria.origin, criteria.destination);
                self.store.find_trips(&filter).await
            }
            MatchTier::StopPoint => {
                let filter = seats
                    .times(criteria.times.clone())
                    .stop_at_any([criteria.origin, criteria.destination]);
                self.store.find_trips(&filter).await
            }
            MatchTier::Nearby => {
                // Time filters are deliberately dropped for this tier.
                let pool = self.store.find_trips(&seats).await?;
                Ok(pool
                    .into_iter()
                    .filter(|record| self.is_nearby(&record.trip, criteria))
                    .collect())
            }
        }
    }

    /// Both endpoints within the radius, checked independently.
    ///
    /// Trips missing any endpoint coordinate never qualify.
    pub fn is_nearby(&self, trip: &Trip, criteria: &SearchCriteria) -> bool {
        let (Some(departure), Some(arrival)) = (trip.departure_point(), trip.arrival_point())
        else {
            return false;
        };

        criteria.origin.distance_km(&departure) <= self.config.radius_km
            && criteria.destination.distance_km(&arrival) <= self.config.radius_km
    }
}
