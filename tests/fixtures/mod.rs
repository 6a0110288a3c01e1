//! Test fixtures for pickup-planner.
//!
//! Provides:
//! - Puglia depot, disposal site and client locations
//! - A synthetic distance provider with fixed, known distances and query
//!   counting

#![allow(dead_code)]

pub mod puglia_locations;
pub mod synthetic;

pub use puglia_locations::*;
pub use synthetic::*;
