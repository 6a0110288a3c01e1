//! Planning-run data: stops, disposal sites, waypoints and itineraries.

use serde::{Deserialize, Serialize};

/// Label used for the depot waypoint.
pub const DEPOT_LABEL: &str = "MAGAZZINO";

/// Pickup priority class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Standard,
    Urgent,
}

/// A client location requiring pickup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    /// Operator-entered identifier, unique within a run.
    pub id: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub priority: Priority,
}

impl Stop {
    pub fn new(id: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            id: id.into(),
            lat,
            lon,
            priority: Priority::Standard,
        }
    }

    /// Marks the stop as urgent.
    pub fn urgent(mut self) -> Self {
        self.priority = Priority::Urgent;
        self
    }

    pub fn is_urgent(&self) -> bool {
        self.priority == Priority::Urgent
    }

    /// Location coordinates (lat, lon).
    pub fn location(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }
}

/// A fixed terminal site where the collected waste is unloaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisposalSite {
    pub label: String,
    pub lat: f64,
    pub lon: f64,
}

impl DisposalSite {
    pub fn new(label: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            label: label.into(),
            lat,
            lon,
        }
    }

    pub fn location(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }
}

/// Role of a waypoint in the itinerary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaypointKind {
    Depot,
    Pickup,
    PickupUrgent,
    Disposal,
}

impl WaypointKind {
    /// Operator-facing role tag.
    pub fn role_tag(self) -> &'static str {
        match self {
            WaypointKind::Depot => "MAGAZZINO",
            WaypointKind::Pickup => "RITIRO",
            WaypointKind::PickupUrgent => "RITIRO URGENTE",
            WaypointKind::Disposal => "SCARICO FINALE",
        }
    }

    pub fn is_pickup(self) -> bool {
        matches!(self, WaypointKind::Pickup | WaypointKind::PickupUrgent)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint<N> {
    pub label: String,
    pub kind: WaypointKind,
    pub node: N,
    /// Road distance from the previous position; 0 for the depot.
    pub leg_meters: f64,
}

/// Ordered visiting plan with its total road distance.
#[derive(Debug, Clone, PartialEq)]
pub struct Itinerary<N> {
    pub waypoints: Vec<Waypoint<N>>,
    pub total_distance_meters: f64,
}

impl<N> Itinerary<N> {
    pub fn total_km(&self) -> f64 {
        self.total_distance_meters / 1000.0
    }

    /// Sum of the per-waypoint legs. Equals `total_distance_meters`.
    pub fn leg_sum_meters(&self) -> f64 {
        self.waypoints.iter().map(|waypoint| waypoint.leg_meters).sum()
    }

    /// Labels of the pickup waypoints in visiting order.
    pub fn pickup_labels(&self) -> Vec<&str> {
        self.waypoints
            .iter()
            .filter(|waypoint| waypoint.kind.is_pickup())
            .map(|waypoint| waypoint.label.as_str())
            .collect()
    }
}
