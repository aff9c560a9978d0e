//! Server configuration from environment variables.
//!
//! A `.env` file in the working directory is loaded first, if present.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::matcher::MatcherConfig;

/// Errors reading configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Runtime configuration for the server binary.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Address to listen on (`HOST`, default 0.0.0.0)
    pub host: IpAddr,

    /// Port to listen on (`PORT`, default 3000)
    pub port: u16,

    /// JSON fixture to seed the trip store with (`TRIP_SEED_FILE`)
    pub seed_file: Option<PathBuf>,

    /// Proximity radius for trip search (`SEARCH_RADIUS_KM`, default 30)
    pub search_radius_km: f64,
}

impl AppConfig {
    /// Load from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Load using `var` to look up each variable.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = MatcherConfig::default();

        let host = parse_or(&var, "HOST", IpAddr::from([0, 0, 0, 0]))?;
        let port = parse_or(&var, "PORT", 3000)?;
        let seed_file = var("TRIP_SEED_FILE")
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);
        let search_radius_km: f64 = parse_or(&var, "SEARCH_RADIUS_KM", defaults.radius_km)?;

        if !search_radius_km.is_finite() || search_radius_km < 0.0 {
            return Err(ConfigError::Invalid {
                var: "SEARCH_RADIUS_KM",
                value: search_radius_km.to_string(),
            });
        }

        Ok(Self {
            host,
            port,
            seed_file,
            search_radius_km,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn matcher(&self) -> MatcherConfig {
        MatcherConfig::with_radius_km(self.search_radius_km)
    }
}

fn parse_or<T: std::str::FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match var(name) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            var: name,
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from_map(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_vars(|name| map.get(name).cloned())
    }

    #[test]
    fn defaults() {
        let config = from_map(&[]).unwrap();

        assert_eq!(config.addr(), "0.0.0.0:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.seed_file, None);
        assert_eq!(config.search_radius_km, 30.0);
        assert_eq!(config.matcher(), MatcherConfig::default());
    }

    #[test]
    fn overrides() {
        let config = from_map(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("TRIP_SEED_FILE", "fixtures/trips.json"),
            ("SEARCH_RADIUS_KM", "12.5"),
        ])
        .unwrap();

        assert_eq!(config.addr(), "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.seed_file, Some(PathBuf::from("fixtures/trips.json")));
        assert_eq!(config.matcher().radius_km, 12.5);
    }

    #[test]
    fn invalid_values() {
        assert_eq!(
            from_map(&[("PORT", "eighty")]),
            Err(ConfigError::Invalid {
                var: "PORT",
                value: "eighty".into()
            })
        );
        assert!(from_map(&[("SEARCH_RADIUS_KM", "-1")]).is_err());
        assert!(from_map(&[("HOST", "localhost:80")]).is_err());
    }

    #[test]
    fn error_display() {
        let err = ConfigError::Invalid {
            var: "PORT",
            value: "x".into(),
        };
        assert_eq!(err.to_string(), "invalid value for PORT: \"x\"");
    }
}
