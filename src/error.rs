//! Error types.

use thiserror::Error;

/// A route that cannot be evaluated at all.
///
/// Missing distances are not errors: they yield unreachable metrics
/// (see [`RouteMetrics::unreachable`](crate::models::RouteMetrics::unreachable)).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    #[error("route has {len} nodes, at least 3 are required")]
    DegenerateRoute { len: usize },

    #[error("route {route:?} does not start and end at the depot")]
    DepotMisplaced { route: Vec<usize> },

    #[error("depot appears inside the route at position {position}")]
    DepotInInterior { position: usize },

    #[error("no volume recorded for stop {stop}")]
    MissingVolume { stop: usize },
}

/// Invalid configuration parameters.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("{field} must be non-negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("invalid configuration document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure of a whole day or week solve.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("depot code {code} is not present in the distance matrix")]
    DepotNotInMatrix { code: usize },

    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),

    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}

/// Failure while reading or writing tabular data.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{file} is missing required column `{column}`")]
    MissingColumn {
        file: &'static str,
        column: &'static str,
    },

    #[error("distance matrix has no rows or no columns")]
    EmptyMatrix,

    #[error("distance matrix label `{label}` is not a location code")]
    BadMatrixLabel { label: String },
}
