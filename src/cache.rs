//! Memoizing wrapper around a graph distance provider.
//!
//! Every answer is remembered, including "unreachable"; failed queries are
//! not.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use tracing::trace;

use crate::error::ProviderError;
use crate::polyline::Polyline;
use crate::traits::{GraphDistanceProvider, PathProvider};

type NodePair<N> = (N, N);

pub struct CachedDistances<P: GraphDistanceProvider> {
    inner: P,
    nearest: Mutex<HashMap<(u64, u64), P::Node>>,
    distances: Mutex<HashMap<NodePair<P::Node>, Option<f64>>>,
}

impl<P: GraphDistanceProvider> CachedDistances<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            nearest: Mutex::new(HashMap::new()),
            distances: Mutex::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Number of memoized distance answers.
    pub fn cached_distances(&self) -> usize {
        self.distances.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn clear(&self) {
        self.nearest.lock().unwrap_or_else(PoisonError::into_inner).clear();
        self.distances.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl<P: GraphDistanceProvider> GraphDistanceProvider for CachedDistances<P> {
    type Node = P::Node;

    fn nearest_node(&self, lat: f64, lon: f64) -> Result<Self::Node, ProviderError> {
        let key = (lat.to_bits(), lon.to_bits());
        if let Some(node) = self.nearest.lock().unwrap_or_else(PoisonError::into_inner).get(&key) {
            trace!(lat, lon, "nearest node cache hit");
            return Ok(node.clone());
        }

        // The lock is not held across the provider call.
        let node = self.inner.nearest_node(lat, lon)?;
        self.nearest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, node.clone());
        Ok(node)
    }

    fn shortest_distance(&self, from: &Self::Node, to: &Self::Node) -> Result<Option<f64>, ProviderError> {
        let key = (from.clone(), to.clone());
        if let Some(distance) = self.distances.lock().unwrap_or_else(PoisonError::into_inner).get(&key) {
            trace!(?from, ?to, "distance cache hit");
            return Ok(*distance);
        }

        let distance = self.inner.shortest_distance(from, to)?;
        self.distances
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, distance);
        Ok(distance)
    }

    fn node_location(&self, node: &Self::Node) -> Result<(f64, f64), ProviderError> {
        self.inner.node_location(node)
    }
}

impl<P: PathProvider> PathProvider for CachedDistances<P> {
    fn shortest_path(&self, from: &Self::Node, to: &Self::Node) -> Result<Option<Polyline>, ProviderError> {
        self.inner.shortest_path(from, to)
    }
}
