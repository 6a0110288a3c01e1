//! Polyline representation for route geometries.
//!
//! Points are kept decoded as (lat, lon) pairs. The encoded polyline format
//! only appears at the OSRM boundary, where [`Polyline::decode`] turns a
//! route geometry into points.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coordinate precision used by OSRM's default `polyline` geometries.
pub const OSRM_PRECISION: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolylineError {
    #[error("invalid polyline character {0:?} at offset {1}")]
    InvalidCharacter(char, usize),
    #[error("polyline ends in the middle of a value")]
    Truncated,
    #[error("polyline value at offset {0} is too long")]
    Overflow(usize),
}

/// A polyline representing a route geometry as decoded coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<(f64, f64)>,
}

impl Polyline {
    /// Creates a new Polyline from decoded (latitude, longitude) points.
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self { points }
    }

    /// Decodes an encoded polyline string with the given decimal precision.
    pub fn decode(encoded: &str, precision: u32) -> Result<Self, PolylineError> {
        let factor = 10_f64.powi(precision as i32);
        let mut values = encoded.char_indices().peekable();
        let mut points = Vec::new();
        let (mut lat, mut lon) = (0_i64, 0_i64);

        while values.peek().is_some() {
            lat += next_delta(&mut values)?;
            lon += next_delta(&mut values)?;
            points.push((lat as f64 / factor, lon as f64 / factor));
        }

        Ok(Self { points })
    }

    /// Returns a reference to the coordinate points.
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Consumes the polyline and returns the owned coordinate points.
    pub fn into_points(self) -> Vec<(f64, f64)> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Appends the next leg of a route.
    ///
    /// The leg's first point is dropped when it repeats this polyline's last
    /// point, so consecutive legs share their junction once.
    pub fn extend_leg(&mut self, leg: Polyline) {
        let mut points = leg.points.into_iter().peekable();
        if let (Some(last), Some(first)) = (self.points.last(), points.peek()) {
            if last == first {
                points.next();
            }
        }
        self.points.extend(points);
    }
}

fn next_delta<I>(values: &mut std::iter::Peekable<I>) -> Result<i64, PolylineError>
where
    I: Iterator<Item = (usize, char)>,
{
    let mut result = 0_i64;
    let mut shift = 0_u32;

    loop {
        let (offset, ch) = values.next().ok_or(PolylineError::Truncated)?;
        let code = ch as u32;
        if !(63..=126).contains(&code) {
            return Err(PolylineError::InvalidCharacter(ch, offset));
        }
        if shift > 60 {
            return Err(PolylineError::Overflow(offset));
        }
        let chunk = i64::from(code - 63);
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        if chunk < 0x20 {
            break;
        }
    }

    Ok(if result & 1 == 1 { !(result >> 1) } else { result >> 1 })
}
