//! The operator's stop list for the current day.

use std::collections::HashSet;

use thiserror::Error;
use tracing::debug;

use crate::input::{CoordinateError, parse_coordinates};
use crate::model::{Priority, Stop};
use crate::traits::StopRepository;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RepositoryError {
    #[error("stop id is empty")]
    EmptyId,
    #[error("stop `{0}` is already in the list")]
    DuplicateId(String),
    #[error("invalid coordinates for stop `{id}`")]
    InvalidCoordinates {
        id: String,
        #[source]
        source: CoordinateError,
    },
}

/// Ordered, editable stop list. Insertion order is kept.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStops {
    stops: Vec<Stop>,
}

impl InMemoryStops {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, stop: Stop) -> Result<(), RepositoryError> {
        if stop.id.trim().is_empty() {
            return Err(RepositoryError::EmptyId);
        }
        if self.contains(&stop.id) {
            return Err(RepositoryError::DuplicateId(stop.id));
        }
        debug!(id = %stop.id, urgent = stop.is_urgent(), "stop added");
        self.stops.push(stop);
        Ok(())
    }

    /// Adds a standard stop from operator-entered `"lat, lon"` text.
    pub fn add_from_text(&mut self, id: &str, coordinates: &str) -> Result<(), RepositoryError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(RepositoryError::EmptyId);
        }
        let (lat, lon) = parse_coordinates(coordinates).map_err(|source| RepositoryError::InvalidCoordinates {
            id: id.to_string(),
            source,
        })?;
        self.add(Stop::new(id, lat, lon))
    }

    pub fn remove(&mut self, id: &str) -> Option<Stop> {
        let index = self.stops.iter().position(|stop| stop.id == id)?;
        Some(self.stops.remove(index))
    }

    pub fn clear(&mut self) {
        self.stops.clear();
    }

    /// Marks exactly the listed ids as urgent; every other stop becomes
    /// standard. Unknown ids are ignored.
    pub fn set_urgent<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        let urgent: HashSet<&str> = ids.into_iter().collect();
        for stop in &mut self.stops {
            stop.priority = if urgent.contains(stop.id.as_str()) {
                Priority::Urgent
            } else {
                Priority::Standard
            };
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.stops.iter().any(|stop| stop.id == id)
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}

impl StopRepository for InMemoryStops {
    fn stops(&self) -> &[Stop] {
        &self.stops
    }
}
