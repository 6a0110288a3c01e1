//! Priority-greedy route sequencer.
//!
//! Urgent stops are visited first, then standard stops, each class by
//! nearest-unvisited-neighbor over shortest-path distances. An optional
//! disposal site closes the route.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::error::PlanError;
use crate::model::{DEPOT_LABEL, DisposalSite, Itinerary, Stop, Waypoint, WaypointKind};
use crate::resolver::{NodeResolver, ResolvedStop};
use crate::traits::GraphDistanceProvider;

#[derive(Debug, Clone)]
pub struct PlanOptions {
    /// Emit the depot as waypoint 0.
    pub include_depot_waypoint: bool,
    /// Id of an urgent stop to visit first regardless of distance.
    pub forced_first_stop: Option<String>,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            include_depot_waypoint: true,
            forced_first_stop: None,
        }
    }
}

/// Snapshot of one planning run's inputs.
#[derive(Debug, Clone, Copy)]
pub struct RouteRequest<'a> {
    /// Depot (lat, lon).
    pub depot: (f64, f64),
    pub stops: &'a [Stop],
    pub disposal: Option<&'a DisposalSite>,
}

/// Where the vehicle currently is while the itinerary is built.
struct Cursor<N> {
    node: N,
    label: String,
    total: f64,
}

pub fn plan_route<P>(
    provider: &P,
    request: &RouteRequest<'_>,
    options: &PlanOptions,
) -> Result<Itinerary<P::Node>, PlanError>
where
    P: GraphDistanceProvider,
{
    if request.stops.is_empty() {
        return Err(PlanError::EmptyInput);
    }
    ensure_unique_ids(request.stops)?;
    if let Some(id) = &options.forced_first_stop {
        if !request.stops.iter().any(|stop| &stop.id == id && stop.is_urgent()) {
            return Err(PlanError::InvalidForcedStop { id: id.clone() });
        }
    }

    info!(
        stops = request.stops.len(),
        urgent = request.stops.iter().filter(|stop| stop.is_urgent()).count(),
        disposal = request.disposal.map(|site| site.label.as_str()),
        "sequencing route"
    );

    let mut resolver = NodeResolver::new(provider);
    let depot_node = resolver.resolve(DEPOT_LABEL, request.depot)?;
    let resolved = resolver.resolve_stops(request.stops)?;
    let disposal = request
        .disposal
        .map(|site| resolver.resolve(&site.label, site.location()).map(|node| (site, node)))
        .transpose()?;

    let (mut urgent, standard): (Vec<_>, Vec<_>) =
        resolved.into_iter().partition(|candidate| candidate.stop.is_urgent());

    let mut waypoints = Vec::with_capacity(request.stops.len() + 2);
    if options.include_depot_waypoint {
        waypoints.push(Waypoint {
            label: DEPOT_LABEL.to_string(),
            kind: WaypointKind::Depot,
            node: depot_node.clone(),
            leg_meters: 0.0,
        });
    }

    let mut cursor = Cursor {
        node: depot_node,
        label: DEPOT_LABEL.to_string(),
        total: 0.0,
    };

    if let Some(id) = &options.forced_first_stop {
        if let Some(index) = urgent.iter().position(|candidate| &candidate.stop.id == id) {
            let forced = urgent.remove(index);
            let distance = leg_distance(provider, &cursor, &forced.node, &forced.stop.id)?;
            debug!(stop = %forced.stop.id, distance, "visiting forced first stop");
            advance(&mut cursor, &mut waypoints, forced, distance, WaypointKind::PickupUrgent);
        }
    }

    sweep(provider, &mut cursor, &mut waypoints, urgent, WaypointKind::PickupUrgent)?;
    sweep(provider, &mut cursor, &mut waypoints, standard, WaypointKind::Pickup)?;

    if let Some((site, node)) = disposal {
        let distance = leg_distance(provider, &cursor, &node, &site.label)?;
        cursor.total += distance;
        waypoints.push(Waypoint {
            label: site.label.clone(),
            kind: WaypointKind::Disposal,
            node,
            leg_meters: distance,
        });
    }

    info!(
        waypoints = waypoints.len(),
        total_km = cursor.total / 1000.0,
        resolver_lookups = resolver.lookups(),
        "route sequenced"
    );

    Ok(Itinerary {
        waypoints,
        total_distance_meters: cursor.total,
    })
}

/// Nearest-neighbor loop over one priority class.
///
/// `remaining` keeps input order, so the strict `<` comparison resolves
/// ties in favour of the earliest stop.
fn sweep<P>(
    provider: &P,
    cursor: &mut Cursor<P::Node>,
    waypoints: &mut Vec<Waypoint<P::Node>>,
    mut remaining: Vec<ResolvedStop<'_, P::Node>>,
    kind: WaypointKind,
) -> Result<(), PlanError>
where
    P: GraphDistanceProvider,
{
    while !remaining.is_empty() {
        let mut best: Option<(usize, f64)> = None;
        for (index, candidate) in remaining.iter().enumerate() {
            let distance = leg_distance(provider, cursor, &candidate.node, &candidate.stop.id)?;
            if best.is_none_or(|(_, best_distance)| distance < best_distance) {
                best = Some((index, distance));
            }
        }

        let Some((index, distance)) = best else {
            break;
        };
        let next = remaining.remove(index);
        debug!(
            from = %cursor.label,
            stop = %next.stop.id,
            distance,
            candidates = remaining.len() + 1,
            "selected nearest stop"
        );
        advance(cursor, waypoints, next, distance, kind);
    }

    Ok(())
}

fn advance<N: Clone>(
    cursor: &mut Cursor<N>,
    waypoints: &mut Vec<Waypoint<N>>,
    next: ResolvedStop<'_, N>,
    distance: f64,
    kind: WaypointKind,
) {
    cursor.total += distance;
    cursor.node = next.node.clone();
    cursor.label = next.stop.id.clone();
    waypoints.push(Waypoint {
        label: next.stop.id.clone(),
        kind,
        node: next.node,
        leg_meters: distance,
    });
}

fn leg_distance<P>(provider: &P, cursor: &Cursor<P::Node>, to: &P::Node, to_label: &str) -> Result<f64, PlanError>
where
    P: GraphDistanceProvider,
{
    let distance = provider
        .shortest_distance(&cursor.node, to)
        .map_err(|source| PlanError::DistanceQuery {
            from: cursor.label.clone(),
            to: to_label.to_string(),
            source,
        })?;

    match distance {
        Some(meters) if meters.is_finite() => Ok(meters),
        _ => {
            warn!(from = %cursor.label, to = to_label, "no road path");
            Err(PlanError::DistanceUnreachable {
                from: cursor.label.clone(),
                to: to_label.to_string(),
            })
        }
    }
}

fn ensure_unique_ids(stops: &[Stop]) -> Result<(), PlanError> {
    let mut seen = HashSet::with_capacity(stops.len());
    for stop in stops {
        if !seen.insert(stop.id.as_str()) {
            return Err(PlanError::DuplicateStopId { id: stop.id.clone() });
        }
    }
    Ok(())
}
