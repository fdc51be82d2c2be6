//! Core error type.
//!
//! Sub-crates define their own error enums and either convert them into
//! `CoreError` via `From` impls or keep them separate.  Both patterns are
//! acceptable; prefer whichever keeps error sites clean.

use thiserror::Error;

use crate::RequestId;

/// The top-level error type for `ht-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("department {0:?} not found")]
    DepartmentNotFound(String),

    #[error("request {0} not found")]
    RequestNotFound(RequestId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Shorthand result type for `ht-core`.
pub type CoreResult<T> = Result<T, CoreError>;
