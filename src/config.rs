use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::models::Coordinate;
use crate::search::DEFAULT_ENDPOINT;

/// Environment variable consulted for the search access token
pub const TOKEN_ENV: &str = "MAPBOX_TOKEN";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub map: MapConfig,
    pub search: SearchConfig,
    pub geolocation: GeolocationConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MapConfig {
    /// Style URL handed to the rendering engine
    pub style: String,
    /// Center used until the user's location is known: [lng, lat]
    pub default_center: [f64; 2],
    pub zoom: f64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    pub endpoint: String,
    /// The fixed query term searched once the user is located
    pub query: String,
    pub access_token: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct GeolocationConfig {
    /// Deadline for the location request; none waits indefinitely
    pub timeout_secs: Option<u64>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            style: "mapbox://styles/mapbox/streets-v11".to_string(),
            default_center: [77.209, 28.6139],
            zoom: 12.0,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            query: "plastic".to_string(),
            access_token: None,
            timeout_secs: 10,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.default_center()?;
        if self.search.query.trim().is_empty() {
            anyhow::bail!("search.query must not be empty");
        }
        if self.search.timeout_secs == 0 {
            anyhow::bail!("search.timeout_secs must be greater than 0");
        }
        if self.map.style.trim().is_empty() {
            anyhow::bail!("map.style must not be empty");
        }
        if !(self.map.zoom.is_finite() && (0.0..=22.0).contains(&self.map.zoom)) {
            anyhow::bail!("map.zoom must be between 0 and 22, got {}", self.map.zoom);
        }
        Ok(())
    }

    pub fn default_center(&self) -> Result<Coordinate> {
        Coordinate::try_from(self.map.default_center).context("Invalid map.default_center")
    }

    /// Fill in the access token from the environment if the file has none
    pub fn with_env_token(mut self) -> Self {
        if self.search.access_token.is_none() {
            self.search.access_token = std::env::var(TOKEN_ENV).ok().filter(|t| !t.is_empty());
        }
        self
    }

    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search.timeout_secs)
    }

    pub fn geolocation_timeout(&self) -> Option<Duration> {
        self.geolocation.timeout_secs.map(Duration::from_secs)
    }
}
