//! Presentation rows, the downloadable text report, and route geometry.
//!
//! The text format is persisted by operators and must stay stable:
//!
//! ```text
//! STOP 1: MAGAZZINO (40.886630, 16.852016)
//! STOP 2: C-01 (41.040500, 16.747000)
//! Totale km: 12.34
//! ```

use std::fmt;

use serde::Serialize;

use crate::error::PlanError;
use crate::model::{Itinerary, WaypointKind};
use crate::polyline::Polyline;
use crate::traits::{GraphDistanceProvider, PathProvider};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    /// 1-based position in visiting order.
    pub index: usize,
    pub kind: WaypointKind,
    pub role: &'static str,
    pub label: String,
    pub lat: f64,
    pub lon: f64,
    /// Kilometers driven from the previous row.
    pub leg_km: f64,
    /// Kilometers driven since leaving the depot, this row included.
    pub running_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteReport {
    pub rows: Vec<ReportRow>,
    pub total_km: f64,
}

/// Builds report rows, one node-location lookup per waypoint.
pub fn assemble<P>(provider: &P, itinerary: &Itinerary<P::Node>) -> Result<RouteReport, PlanError>
where
    P: GraphDistanceProvider,
{
    let mut running_meters = 0.0;
    let rows = itinerary
        .waypoints
        .iter()
        .enumerate()
        .map(|(position, waypoint)| {
            let (lat, lon) = provider
                .node_location(&waypoint.node)
                .map_err(|source| PlanError::NodeLookup {
                    label: waypoint.label.clone(),
                    source,
                })?;
            running_meters += waypoint.leg_meters;
            Ok(ReportRow {
                index: position + 1,
                kind: waypoint.kind,
                role: waypoint.kind.role_tag(),
                label: waypoint.label.clone(),
                lat,
                lon,
                leg_km: waypoint.leg_meters / 1000.0,
                running_km: running_meters / 1000.0,
            })
        })
        .collect::<Result<Vec<_>, PlanError>>()?;

    Ok(RouteReport {
        rows,
        total_km: itinerary.total_km(),
    })
}

impl RouteReport {
    /// Renders the downloadable text report.
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RouteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            writeln!(f, "STOP {}: {} ({:.6}, {:.6})", row.index, row.label, row.lat, row.lon)?;
        }
        writeln!(f, "Totale km: {:.2}", self.total_km)
    }
}

/// Stitches the shortest paths between consecutive waypoints into one
/// polyline.
pub fn route_geometry<P>(provider: &P, itinerary: &Itinerary<P::Node>) -> Result<Polyline, PlanError>
where
    P: PathProvider,
{
    let mut geometry = Polyline::default();
    for pair in itinerary.waypoints.windows(2) {
        let [from, to] = pair else {
            continue;
        };
        let leg = provider
            .shortest_path(&from.node, &to.node)
            .map_err(|source| PlanError::DistanceQuery {
                from: from.label.clone(),
                to: to.label.clone(),
                source,
            })?
            .ok_or_else(|| PlanError::DistanceUnreachable {
                from: from.label.clone(),
                to: to.label.clone(),
            })?;
        geometry.extend_leg(leg);
    }
    Ok(geometry)
}
