//! OSRM HTTP adapter for node resolution and road distances.
//!
//! Uses the `nearest` service to snap coordinates onto the road network and
//! the `route` service for shortest-path distances and geometries.

use serde::Deserialize;
use tracing::warn;

use crate::error::ProviderError;
use crate::polyline::{OSRM_PRECISION, Polyline};
use crate::traits::{GraphDistanceProvider, PathProvider};

/// Scale between degrees and the integer micro-degrees of [`OsrmNode`].
const MICRO_DEGREES: f64 = 1_000_000.0;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
        }
    }
}

/// A coordinate snapped onto the OSRM road network, in micro-degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OsrmNode {
    lat_e6: i64,
    lon_e6: i64,
}

impl OsrmNode {
    fn from_degrees(lat: f64, lon: f64) -> Self {
        Self {
            lat_e6: (lat * MICRO_DEGREES).round() as i64,
            lon_e6: (lon * MICRO_DEGREES).round() as i64,
        }
    }

    /// (lat, lon) in degrees.
    pub fn location(&self) -> (f64, f64) {
        (self.lat_e6 as f64 / MICRO_DEGREES, self.lon_e6 as f64 / MICRO_DEGREES)
    }

    fn path_segment(&self) -> String {
        let (lat, lon) = self.location();
        format!("{:.6},{:.6}", lon, lat)
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &OsrmConfig {
        &self.config
    }

    fn service_url(&self, service: &str, coordinates: &str, query: &str) -> String {
        format!(
            "{}/{}/v1/{}/{}?{}",
            self.config.base_url.trim_end_matches('/'),
            service,
            self.config.profile,
            coordinates,
            query
        )
    }

    fn get<T: for<'de> Deserialize<'de>>(&self, url: String) -> Result<T, ProviderError> {
        let body = self
            .client
            .get(url)
            .send()
            .and_then(|resp| resp.json::<T>())?;
        Ok(body)
    }

    /// Queries the route service; `None` when OSRM reports `NoRoute`.
    fn route(&self, from: &OsrmNode, to: &OsrmNode, query: &str) -> Result<Option<RouteLeg>, ProviderError> {
        let coordinates = format!("{};{}", from.path_segment(), to.path_segment());
        let response: RouteResponse = self.get(self.service_url("route", &coordinates, query))?;

        match response.code.as_str() {
            "Ok" => response
                .routes
                .into_iter()
                .next()
                .map(Some)
                .ok_or_else(|| ProviderError::Malformed("route response without routes".to_string())),
            "NoRoute" => Ok(None),
            _ => Err(service_error(response.code, response.message)),
        }
    }
}

impl GraphDistanceProvider for OsrmClient {
    type Node = OsrmNode;

    fn nearest_node(&self, lat: f64, lon: f64) -> Result<Self::Node, ProviderError> {
        let coordinates = format!("{:.6},{:.6}", lon, lat);
        let response: NearestResponse = self.get(self.service_url("nearest", &coordinates, "number=1"))?;
        if response.code != "Ok" {
            return Err(service_error(response.code, response.message));
        }

        let waypoint = response
            .waypoints
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::Malformed("nearest response without waypoints".to_string()))?;
        let [snapped_lon, snapped_lat] = waypoint.location;
        Ok(OsrmNode::from_degrees(snapped_lat, snapped_lon))
    }

    fn shortest_distance(&self, from: &Self::Node, to: &Self::Node) -> Result<Option<f64>, ProviderError> {
        if from == to {
            return Ok(Some(0.0));
        }
        Ok(self
            .route(from, to, "overview=false")?
            .map(|leg| leg.distance))
    }

    fn node_location(&self, node: &Self::Node) -> Result<(f64, f64), ProviderError> {
        Ok(node.location())
    }
}

impl PathProvider for OsrmClient {
    fn shortest_path(&self, from: &Self::Node, to: &Self::Node) -> Result<Option<Polyline>, ProviderError> {
        if from == to {
            return Ok(Some(Polyline::new(vec![from.location()])));
        }
        let Some(leg) = self.route(from, to, "overview=full&geometries=polyline")? else {
            return Ok(None);
        };
        let geometry = leg
            .geometry
            .ok_or_else(|| ProviderError::Malformed("route without geometry".to_string()))?;
        Polyline::decode(&geometry, OSRM_PRECISION)
            .map(Some)
            .map_err(|err| ProviderError::Malformed(err.to_string()))
    }
}

fn service_error(code: String, message: Option<String>) -> ProviderError {
    let message = message.unwrap_or_default();
    warn!(%code, %message, "OSRM service error");
    ProviderError::Service { code, message }
}

#[derive(Debug, Deserialize)]
struct NearestResponse {
    code: String,
    message: Option<String>,
    #[serde(default)]
    waypoints: Vec<NearestWaypoint>,
}

#[derive(Debug, Deserialize)]
struct NearestWaypoint {
    /// `[lon, lat]` of the snapped position.
    location: [f64; 2],
}

#[derive(Debug, Deserialize)]
struct RouteResponse {
    code: String,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<RouteLeg>,
}

#[derive(Debug, Deserialize)]
struct RouteLeg {
    /// Meters.
    distance: f64,
    geometry: Option<String>,
}
