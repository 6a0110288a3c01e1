//! Error types for providers and planning runs.

use thiserror::Error;

/// Failure inside a graph distance provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("routing service request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The routing service answered with a non-`Ok` status code.
    #[error("routing service returned `{code}`: {message}")]
    Service { code: String, message: String },
    #[error("node {0} is not part of the road network")]
    UnknownNode(String),
    #[error("road network has no nodes")]
    EmptyNetwork,
    #[error("malformed routing response: {0}")]
    Malformed(String),
}

/// Failure of a planning run. No partial itinerary is ever returned.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("no stops to sequence")]
    EmptyInput,
    #[error("stop id `{id}` appears more than once")]
    DuplicateStopId { id: String },
    #[error("forced first stop `{id}` is not an urgent stop of this run")]
    InvalidForcedStop { id: String },
    #[error("unknown disposal site `{id}`")]
    UnknownDisposalSite { id: String },
    #[error("cannot resolve `{label}` at ({lat}, {lon}) to a road node")]
    NodeResolution {
        label: String,
        lat: f64,
        lon: f64,
        #[source]
        source: ProviderError,
    },
    #[error("no road path from `{from}` to `{to}`")]
    DistanceUnreachable { from: String, to: String },
    #[error("distance query from `{from}` to `{to}` failed")]
    DistanceQuery {
        from: String,
        to: String,
        #[source]
        source: ProviderError,
    },
    #[error("cannot look up the location of `{label}`")]
    NodeLookup {
        label: String,
        #[source]
        source: ProviderError,
    },
}
