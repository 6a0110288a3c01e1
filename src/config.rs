//! Planner configuration: depot, disposal-site catalogue and road network
//! source.
//!
//! Loaded from a JSON file; any missing field takes its default. Two
//! environment variables override the network source:
//! `PICKUP_PLANNER_ROAD_NETWORK` (artifact path) and
//! `PICKUP_PLANNER_OSRM_URL` (OSRM base URL).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::model::DisposalSite;
use crate::osrm::OsrmConfig;

pub const ROAD_NETWORK_ENV: &str = "PICKUP_PLANNER_ROAD_NETWORK";
pub const OSRM_URL_ENV: &str = "PICKUP_PLANNER_OSRM_URL";

/// Operator depot (lat, lon).
const DEFAULT_DEPOT: (f64, f64) = (40.88662985769151, 16.852016478389977);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("disposal site `{0}` is listed twice")]
    DuplicateDisposalSite(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DepotConfig {
    pub lat: f64,
    pub lon: f64,
}

impl DepotConfig {
    pub fn location(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub depot: DepotConfig,
    pub disposal_sites: Vec<DisposalSite>,
    pub include_depot_waypoint: bool,
    /// Pre-built road network artifact, see [`crate::road_graph`].
    pub road_network_path: Option<PathBuf>,
    pub osrm: Option<OsrmConfig>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        let (lat, lon) = DEFAULT_DEPOT;
        Self {
            depot: DepotConfig { lat, lon },
            disposal_sites: default_disposal_sites(),
            include_depot_waypoint: true,
            road_network_path: None,
            osrm: None,
        }
    }
}

impl PlannerConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loading planner config");
        Self::from_json_str(&json)
    }

    /// Applies the environment overrides.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    pub(crate) fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(path) = lookup(ROAD_NETWORK_ENV).filter(|value| !value.is_empty()) {
            self.road_network_path = Some(PathBuf::from(path));
        }
        if let Some(base_url) = lookup(OSRM_URL_ENV).filter(|value| !value.is_empty()) {
            let mut osrm = self.osrm.unwrap_or_default();
            osrm.base_url = base_url;
            self.osrm = Some(osrm);
        }
        self
    }

    pub fn disposal_site(&self, id: &str) -> Option<&DisposalSite> {
        self.disposal_sites.iter().find(|site| site.label == id)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (position, site) in self.disposal_sites.iter().enumerate() {
            if self.disposal_sites[..position].iter().any(|other| other.label == site.label) {
                return Err(ConfigError::DuplicateDisposalSite(site.label.clone()));
            }
        }
        Ok(())
    }
}

/// The operator's fixed disposal sites.
pub fn default_disposal_sites() -> Vec<DisposalSite> {
    vec![
        DisposalSite::new("AMB", 41.09647057134329, 16.738474937175116),
        DisposalSite::new("NET", 41.089966857437396, 16.806883067859623),
        DisposalSite::new("DIM", 41.097295471343244, 16.91459969669557),
        DisposalSite::new("APU", 40.99342696525014, 16.783615667855507),
        DisposalSite::new("MTL", 41.04061857135102, 16.863863967857515),
    ]
}
