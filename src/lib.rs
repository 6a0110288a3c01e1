//! pickup-planner core
//!
//! Sequences daily waste-collection pickups over a road network: urgent
//! stops first, then standard stops, then an optional disposal site.

pub mod cache;
pub mod config;
pub mod error;
pub mod haversine;
pub mod input;
pub mod model;
pub mod osrm;
pub mod planner;
pub mod polyline;
pub mod report;
pub mod repository;
pub mod resolver;
pub mod road_graph;
pub mod solver;
pub mod traits;
