//! Per-run coordinate to node resolution.

use std::collections::HashMap;

use tracing::debug;

use crate::error::PlanError;
use crate::model::Stop;
use crate::traits::GraphDistanceProvider;

/// A stop bound to its road node for the duration of one run.
#[derive(Debug, Clone)]
pub struct ResolvedStop<'a, N> {
    pub stop: &'a Stop,
    pub node: N,
    /// Position of the stop in the input snapshot.
    pub position: usize,
}

/// Resolves coordinates through a provider, memoizing within a single run.
///
/// Coordinates are keyed on their exact bit patterns, so only a coordinate
/// that is literally repeated reuses an earlier answer.
pub struct NodeResolver<'p, P: GraphDistanceProvider> {
    provider: &'p P,
    resolved: HashMap<(u64, u64), P::Node>,
    lookups: usize,
}

impl<'p, P: GraphDistanceProvider> NodeResolver<'p, P> {
    pub fn new(provider: &'p P) -> Self {
        Self {
            provider,
            resolved: HashMap::new(),
            lookups: 0,
        }
    }

    /// Resolves `location` (lat, lon); `label` names it in errors.
    pub fn resolve(&mut self, label: &str, location: (f64, f64)) -> Result<P::Node, PlanError> {
        let key = location_key(location);
        if let Some(node) = self.resolved.get(&key) {
            debug!(label, "reusing resolved node");
            return Ok(node.clone());
        }

        let (lat, lon) = location;
        self.lookups += 1;
        let node = self
            .provider
            .nearest_node(lat, lon)
            .map_err(|source| PlanError::NodeResolution {
                label: label.to_string(),
                lat,
                lon,
                source,
            })?;
        debug!(label, lat, lon, node = ?node, "resolved node");
        self.resolved.insert(key, node.clone());
        Ok(node)
    }

    /// Resolves every stop in input order.
    pub fn resolve_stops<'a>(&mut self, stops: &'a [Stop]) -> Result<Vec<ResolvedStop<'a, P::Node>>, PlanError> {
        stops
            .iter()
            .enumerate()
            .map(|(position, stop)| {
                let node = self.resolve(&stop.id, stop.location())?;
                Ok(ResolvedStop { stop, node, position })
            })
            .collect()
    }

    /// Number of provider lookups issued so far.
    pub fn lookups(&self) -> usize {
        self.lookups
    }
}

fn location_key(location: (f64, f64)) -> (u64, u64) {
    (location.0.to_bits(), location.1.to_bits())
}
