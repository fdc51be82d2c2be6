//! Model-subsystem error type.

use thiserror::Error;

use ht_core::RequestId;

use crate::RequestStatus;

/// Errors produced by `ht-model`.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("request {id}: invalid transition {from:?} -> {to:?}")]
    InvalidTransition { id: RequestId, from: RequestStatus, to: RequestStatus },
}

pub type ModelResult<T> = Result<T, ModelError>;
