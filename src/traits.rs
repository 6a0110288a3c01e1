//! Core seams between the sequencer and its collaborators.
//!
//! The sequencer only ever talks to the road network and the stop list
//! through these traits. Concrete providers live in [`crate::road_graph`]
//! and [`crate::osrm`].

use std::fmt::Debug;
use std::hash::Hash;

use crate::error::ProviderError;
use crate::model::Stop;
use crate::polyline::Polyline;

/// Opaque handle for a graph vertex.
///
/// Only providers construct handles; the sequencer compares and hashes them
/// but never looks inside.
pub trait NodeHandle: Clone + Eq + Hash + Debug {}

impl<T> NodeHandle for T where T: Clone + Eq + Hash + Debug {}

/// Answers nearest-node and shortest-distance queries over a road network.
///
/// Implementations must be deterministic: the same query against the same
/// network always yields the same answer.
pub trait GraphDistanceProvider {
    type Node: NodeHandle;

    /// Nearest graph node to a (lat, lon) coordinate.
    fn nearest_node(&self, lat: f64, lon: f64) -> Result<Self::Node, ProviderError>;

    /// Shortest-path length in meters, or `None` when `to` cannot be reached
    /// from `from`.
    fn shortest_distance(&self, from: &Self::Node, to: &Self::Node) -> Result<Option<f64>, ProviderError>;

    /// Location (lat, lon) of a node.
    fn node_location(&self, node: &Self::Node) -> Result<(f64, f64), ProviderError>;
}

/// Providers that can also return the geometry of a shortest path.
pub trait PathProvider: GraphDistanceProvider {
    /// Shortest path between two nodes as a polyline, or `None` when
    /// unreachable.
    fn shortest_path(&self, from: &Self::Node, to: &Self::Node) -> Result<Option<Polyline>, ProviderError>;
}

/// Source of the stops for one planning run.
///
/// Order matters: it is the tie-break order used by the sequencer.
pub trait StopRepository {
    fn stops(&self) -> &[Stop];
}

impl StopRepository for [Stop] {
    fn stops(&self) -> &[Stop] {
        self
    }
}

impl StopRepository for Vec<Stop> {
    fn stops(&self) -> &[Stop] {
        self
    }
}
