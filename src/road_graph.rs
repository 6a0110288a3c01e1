//! In-memory road network loaded from a pre-built JSON artifact.
//!
//! The artifact lists nodes with coordinates and edges between them:
//!
//! ```json
//! {
//!   "nodes": [{ "id": 1, "lat": 40.8866, "lon": 16.8520 }, { "id": 2, "lat": 40.8900, "lon": 16.8600 }],
//!   "edges": [{ "from": 1, "to": 2, "length_m": 780.5 }]
//! }
//! ```
//!
//! Edges are two-way unless `oneway` is set. A missing `length_m` defaults
//! to the great-circle length between the endpoints.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use petgraph::algo::astar;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::error::ProviderError;
use crate::haversine::haversine_meters;
use crate::polyline::Polyline;
use crate::traits::{GraphDistanceProvider, PathProvider};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadNetwork {
    pub nodes: Vec<RoadNode>,
    #[serde(default)]
    pub edges: Vec<RoadEdge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadNode {
    pub id: i64,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadEdge {
    pub from: i64,
    pub to: i64,
    /// Length in meters.
    #[serde(default)]
    pub length_m: Option<f64>,
    #[serde(default)]
    pub oneway: bool,
}

#[derive(Debug, Error)]
pub enum RoadGraphError {
    #[error("cannot read road network: {0}")]
    Io(#[from] io::Error),
    #[error("cannot parse road network: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("road network has no nodes")]
    Empty,
    #[error("node {0} is listed twice")]
    DuplicateNode(i64),
    #[error("edge {from} -> {to} references unknown node {missing}")]
    UnknownEndpoint { from: i64, to: i64, missing: i64 },
    #[error("edge {from} -> {to} has invalid length {length}")]
    InvalidLength { from: i64, to: i64, length: f64 },
}

/// Handle of a road network node, wrapping the artifact's node id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoadNodeId(i64);

impl RoadNodeId {
    pub fn raw(self) -> i64 {
        self.0
    }
}

/// Weighted directed road graph; edge weights are lengths in meters.
///
/// Read-only after construction, so one instance can serve concurrent runs.
#[derive(Debug, Clone)]
pub struct RoadGraph {
    graph: DiGraph<RoadNode, f64>,
    index: HashMap<i64, NodeIndex>,
}

impl RoadGraph {
    pub fn from_network(network: RoadNetwork) -> Result<Self, RoadGraphError> {
        if network.nodes.is_empty() {
            return Err(RoadGraphError::Empty);
        }

        let mut graph = DiGraph::with_capacity(network.nodes.len(), network.edges.len() * 2);
        let mut index = HashMap::with_capacity(network.nodes.len());
        for node in network.nodes {
            let id = node.id;
            if index.contains_key(&id) {
                return Err(RoadGraphError::DuplicateNode(id));
            }
            index.insert(id, graph.add_node(node));
        }

        for edge in &network.edges {
            let endpoint = |id: i64| {
                index.get(&id).copied().ok_or(RoadGraphError::UnknownEndpoint {
                    from: edge.from,
                    to: edge.to,
                    missing: id,
                })
            };
            let from = endpoint(edge.from)?;
            let to = endpoint(edge.to)?;

            let length = match edge.length_m {
                Some(length) => length,
                None => {
                    let (a, b) = (&graph[from], &graph[to]);
                    haversine_meters((a.lat, a.lon), (b.lat, b.lon))
                }
            };
            if !length.is_finite() || length < 0.0 {
                return Err(RoadGraphError::InvalidLength {
                    from: edge.from,
                    to: edge.to,
                    length,
                });
            }

            graph.add_edge(from, to, length);
            if !edge.oneway {
                graph.add_edge(to, from, length);
            }
        }

        Ok(Self { graph, index })
    }

    /// Loads a JSON road network artifact from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RoadGraphError> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let network: RoadNetwork = serde_json::from_reader(reader)?;
        let graph = Self::from_network(network)?;
        info!(
            path = %path.display(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "loaded road network"
        );
        Ok(graph)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of directed edges after two-way expansion.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Looks up a node by artifact id.
    pub fn node(&self, id: i64) -> Option<RoadNodeId> {
        self.index.contains_key(&id).then_some(RoadNodeId(id))
    }

    fn position(&self, node: &RoadNodeId) -> Result<NodeIndex, ProviderError> {
        self.index
            .get(&node.0)
            .copied()
            .ok_or_else(|| ProviderError::UnknownNode(node.0.to_string()))
    }

    /// A* with a zero heuristic, i.e. Dijkstra that also returns the path.
    fn search(&self, from: &RoadNodeId, to: &RoadNodeId) -> Result<Option<(f64, Vec<NodeIndex>)>, ProviderError> {
        let source = self.position(from)?;
        let target = self.position(to)?;
        Ok(astar(&self.graph, source, |n| n == target, |e| *e.weight(), |_| 0.0))
    }
}

impl GraphDistanceProvider for RoadGraph {
    type Node = RoadNodeId;

    /// Linear great-circle scan; ties go to the node listed first.
    fn nearest_node(&self, lat: f64, lon: f64) -> Result<Self::Node, ProviderError> {
        let mut best: Option<(&RoadNode, f64)> = None;
        for node in self.graph.node_weights() {
            let distance = haversine_meters((lat, lon), (node.lat, node.lon));
            if best.is_none_or(|(_, best_distance)| distance < best_distance) {
                best = Some((node, distance));
            }
        }
        best.map(|(node, _)| RoadNodeId(node.id))
            .ok_or(ProviderError::EmptyNetwork)
    }

    fn shortest_distance(&self, from: &Self::Node, to: &Self::Node) -> Result<Option<f64>, ProviderError> {
        Ok(self.search(from, to)?.map(|(distance, _)| distance))
    }

    fn node_location(&self, node: &Self::Node) -> Result<(f64, f64), ProviderError> {
        let node = &self.graph[self.position(node)?];
        Ok((node.lat, node.lon))
    }
}

impl PathProvider for RoadGraph {
    fn shortest_path(&self, from: &Self::Node, to: &Self::Node) -> Result<Option<Polyline>, ProviderError> {
        let Some((_, path)) = self.search(from, to)? else {
            return Ok(None);
        };
        let points = path
            .into_iter()
            .map(|position| (self.graph[position].lat, self.graph[position].lon))
            .collect();
        Ok(Some(Polyline::new(points)))
    }
}
