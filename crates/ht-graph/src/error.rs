//! Graph-subsystem error type.

use thiserror::Error;

/// Errors produced by `ht-graph`.
///
/// Note that an absent path between two reachable queries is **not** an
/// error: [`shortest_path`][crate::shortest_path] returns `Option` and
/// callers treat `None` as a planning-failure value.  `GraphError` covers
/// construction problems only.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("department {0:?} not found")]
    UnknownDepartment(String),

    #[error("corridor {from:?} \u{2194} {to:?} has non-positive weight {weight}")]
    NonPositiveWeight { from: String, to: String, weight: f64 },

    #[error("graph is not connected: {0:?} is unreachable from {1:?}")]
    Disconnected(String, String),
}

pub type GraphResult<T> = Result<T, GraphError>;
