//! One planning run end to end: stop list in, itinerary and report out.

use thiserror::Error;

use crate::cache::CachedDistances;
use crate::config::PlannerConfig;
use crate::error::PlanError;
use crate::model::Itinerary;
use crate::osrm::OsrmClient;
use crate::report::{RouteReport, assemble};
use crate::road_graph::{RoadGraph, RoadGraphError};
use crate::solver::{PlanOptions, RouteRequest, plan_route};
use crate::traits::{GraphDistanceProvider, StopRepository};

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("no road network artifact configured")]
    MissingRoadNetwork,
    #[error("no OSRM service configured")]
    MissingOsrm,
    #[error("cannot build OSRM client: {0}")]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    RoadGraph(#[from] RoadGraphError),
}

/// Per-run choices made by the operator.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanRequest<'a> {
    /// Disposal site id from the configured catalogue.
    pub disposal_site: Option<&'a str>,
    pub forced_first_stop: Option<&'a str>,
}

#[derive(Debug, Clone)]
pub struct PlannedRoute<N> {
    pub itinerary: Itinerary<N>,
    pub report: RouteReport,
}

pub struct Planner<P> {
    config: PlannerConfig,
    provider: P,
}

impl Planner<CachedDistances<RoadGraph>> {
    /// Loads the configured road network artifact behind a distance cache.
    pub fn with_road_network(config: PlannerConfig) -> Result<Self, SetupError> {
        let path = config
            .road_network_path
            .as_ref()
            .ok_or(SetupError::MissingRoadNetwork)?;
        let graph = RoadGraph::load(path)?;
        Ok(Self::new(config, CachedDistances::new(graph)))
    }
}

impl Planner<CachedDistances<OsrmClient>> {
    /// Routes over the configured OSRM service behind a distance cache.
    pub fn with_osrm(config: PlannerConfig) -> Result<Self, SetupError> {
        let osrm = config.osrm.clone().ok_or(SetupError::MissingOsrm)?;
        let client = OsrmClient::new(osrm)?;
        Ok(Self::new(config, CachedDistances::new(client)))
    }
}

impl<P: GraphDistanceProvider> Planner<P> {
    pub fn new(config: PlannerConfig, provider: P) -> Self {
        Self { config, provider }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn plan<R>(&self, stops: &R, request: &PlanRequest<'_>) -> Result<PlannedRoute<P::Node>, PlanError>
    where
        R: StopRepository + ?Sized,
    {
        let disposal = request
            .disposal_site
            .map(|id| {
                self.config
                    .disposal_site(id)
                    .ok_or_else(|| PlanError::UnknownDisposalSite { id: id.to_string() })
            })
            .transpose()?;

        let route_request = RouteRequest {
            depot: self.config.depot.location(),
            stops: stops.stops(),
            disposal,
        };
        let options = PlanOptions {
            include_depot_waypoint: self.config.include_depot_waypoint,
            forced_first_stop: request.forced_first_stop.map(str::to_string),
        };

        let itinerary = plan_route(&self.provider, &route_request, &options)?;
        let report = assemble(&self.provider, &itinerary)?;
        Ok(PlannedRoute { itinerary, report })
    }
}
