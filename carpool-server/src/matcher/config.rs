//! Search configuration for the trip matcher.

/// Configuration parameters for trip search.
#[derive(Debug, Clone, PartialEq)]
pub struct MatcherConfig {
    /// Maximum distance (km) between the requested origin and a trip's
    /// departure, and separately between the destination and its arrival,
    /// for the proximity tier.
    pub radius_km: f64,

    /// Seats required when the request does not say.
    pub default_min_seats: u32,

    /// Page used when the request does not say.
    pub default_page: u32,

    /// Page size used when the request does not say.
    pub default_limit: u32,
}

impl MatcherConfig {
    /// Create a new configuration with the given proximity radius and
    /// default request values for everything else.
    pub fn with_radius_km(radius_km: f64) -> Self {
        Self {
            radius_km,
            ..Self::default()
        }
    }
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            radius_km: 30.0,
            default_min_seats: 1,
            default_page: 1,
            default_limit: 10,
        }
    }
}
