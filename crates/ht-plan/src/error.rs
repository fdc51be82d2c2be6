//! Planning error type.
//!
//! `PlanError` *is* the spec'd "no-plan" value: planning failure is data,
//! not an exception.  The engine reacts by leaving the current assignment
//! untouched and logging.

use thiserror::Error;

use ht_core::RequestId;

/// Why a strategy produced no plan.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("no active workers to plan for")]
    NoWorkers,

    #[error("request {0} is unreachable by every worker")]
    Unreachable(RequestId),

    #[error("assignment model is infeasible")]
    Infeasible,

    #[error("solver failure: {0}")]
    Solver(String),
}

pub type PlanResult<T> = Result<T, PlanError>;
