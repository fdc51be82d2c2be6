//! The command-API error value.
//!
//! Errors never cross the API boundary as panics or opaque exceptions: every
//! operation returns `Result<T, ApiError>` and the error serializes to the
//! wire shape `{"ok": false, "kind": ..., "message": ...}`.

use serde::Serialize;
use thiserror::Error;

use ht_graph::GraphError;
use ht_plan::PlanError;

/// Failure classes reported across the command API.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiErrorKind {
    /// Rejected at the API boundary; no state was mutated.
    Validation,
    /// No plan could be produced; current assignment left unchanged.
    Planning,
    /// A movement task aborted (inactive worker, unreachable destination).
    Movement,
    /// Event delivery failed (dropped, never propagated).
    Sink,
    /// An internal invariant was violated.
    Internal,
}

#[derive(Debug, Error)]
#[error("{kind:?}: {message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self { kind: ApiErrorKind::Validation, message: message.into() }
    }

    pub fn planning(message: impl Into<String>) -> Self {
        Self { kind: ApiErrorKind::Planning, message: message.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self { kind: ApiErrorKind::Internal, message: message.into() }
    }

    /// Wire shape for transport layers.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "ok": false,
            "kind": self.kind,
            "message": self.message,
        })
    }
}

impl From<GraphError> for ApiError {
    fn from(e: GraphError) -> Self {
        ApiError::validation(e.to_string())
    }
}

impl From<PlanError> for ApiError {
    fn from(e: PlanError) -> Self {
        ApiError::planning(e.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
