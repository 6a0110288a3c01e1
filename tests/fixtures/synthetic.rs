//! Synthetic distance providers with fixed, known distances.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

use pickup_planner::error::ProviderError;
use pickup_planner::traits::GraphDistanceProvider;

/// Named nodes at exact coordinates with hand-picked pairwise distances.
///
/// Distances are symmetric; a pair without a distance is unreachable.
#[derive(Debug, Default)]
pub struct SyntheticProvider {
    locations: Vec<(String, (f64, f64))>,
    distances: HashMap<(String, String), f64>,
    failing: HashSet<String>,
    nearest_queries: Cell<usize>,
    distance_queries: RefCell<Vec<(String, String)>>,
}

impl SyntheticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(mut self, name: &str, lat: f64, lon: f64) -> Self {
        self.locations.push((name.to_string(), (lat, lon)));
        self
    }

    pub fn distance(mut self, a: &str, b: &str, meters: f64) -> Self {
        self.distances.insert((a.to_string(), b.to_string()), meters);
        self.distances.insert((b.to_string(), a.to_string()), meters);
        self
    }

    /// Any distance query touching `name` fails inside the provider.
    pub fn failing(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }

    pub fn location_of(&self, name: &str) -> (f64, f64) {
        self.locations
            .iter()
            .find(|(node, _)| node == name)
            .map(|(_, location)| *location)
            .expect("known node")
    }

    pub fn nearest_queries(&self) -> usize {
        self.nearest_queries.get()
    }

    pub fn distance_queries(&self) -> usize {
        self.distance_queries.borrow().len()
    }

    pub fn queried_pairs(&self) -> Vec<(String, String)> {
        self.distance_queries.borrow().clone()
    }
}

impl GraphDistanceProvider for SyntheticProvider {
    type Node = String;

    fn nearest_node(&self, lat: f64, lon: f64) -> Result<Self::Node, ProviderError> {
        self.nearest_queries.set(self.nearest_queries.get() + 1);
        self.locations
            .iter()
            .find(|(_, location)| *location == (lat, lon))
            .map(|(name, _)| name.clone())
            .ok_or_else(|| ProviderError::UnknownNode(format!("{},{}", lat, lon)))
    }

    fn shortest_distance(&self, from: &String, to: &String) -> Result<Option<f64>, ProviderError> {
        self.distance_queries.borrow_mut().push((from.clone(), to.clone()));
        if self.failing.contains(from) || self.failing.contains(to) {
            return Err(ProviderError::Service {
                code: "InvalidQuery".to_string(),
                message: format!("cannot route {} -> {}", from, to),
            });
        }
        if from == to {
            return Ok(Some(0.0));
        }
        Ok(self.distances.get(&(from.clone(), to.clone())).copied())
    }

    fn node_location(&self, node: &String) -> Result<(f64, f64), ProviderError> {
        self.locations
            .iter()
            .find(|(name, _)| name == node)
            .map(|(_, location)| *location)
            .ok_or_else(|| ProviderError::UnknownNode(node.clone()))
    }
}

/// Complete graph over nodes `0..n`, node `i` sitting at `(i, 0.0)`.
///
/// `matrix[i][j]` is the distance from `i` to `j` in whole meters, which
/// keeps every sum exact.
#[derive(Debug)]
pub struct MatrixProvider {
    matrix: Vec<Vec<u32>>,
    distance_queries: Cell<usize>,
}

impl MatrixProvider {
    pub fn new(matrix: Vec<Vec<u32>>) -> Self {
        Self {
            matrix,
            distance_queries: Cell::new(0),
        }
    }

    pub fn location(node: usize) -> (f64, f64) {
        (node as f64, 0.0)
    }

    pub fn distance_between(&self, from: usize, to: usize) -> f64 {
        if from == to {
            0.0
        } else {
            f64::from(self.matrix[from][to])
        }
    }

    pub fn distance_queries(&self) -> usize {
        self.distance_queries.get()
    }

    pub fn reset_queries(&self) {
        self.distance_queries.set(0);
    }
}

impl GraphDistanceProvider for MatrixProvider {
    type Node = usize;

    fn nearest_node(&self, lat: f64, _lon: f64) -> Result<usize, ProviderError> {
        let node = lat.round() as usize;
        if node < self.matrix.len() {
            Ok(node)
        } else {
            Err(ProviderError::UnknownNode(node.to_string()))
        }
    }

    fn shortest_distance(&self, from: &usize, to: &usize) -> Result<Option<f64>, ProviderError> {
        self.distance_queries.set(self.distance_queries.get() + 1);
        Ok(Some(self.distance_between(*from, *to)))
    }

    fn node_location(&self, node: &usize) -> Result<(f64, f64), ProviderError> {
        Ok(Self::location(*node))
    }
}
