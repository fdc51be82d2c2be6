//! Transport request lifecycle.
//!
//! # State machine
//!
//! ```text
//! pending ──> ongoing ──> completed
//!    │           │
//!    └───────────┴──────> cancelled
//! ```
//!
//! Status is monotone along pending → ongoing → completed; `cancelled` is
//! absorbing and `completed`/`cancelled` never regress.  Transition methods
//! return [`ModelError::InvalidTransition`] on any other move, so a buggy
//! caller cannot silently resurrect a finished request.

use ht_core::{NodeId, RequestId, TransportKind};

use crate::{ModelError, ModelResult};

/// Lifecycle status of a [`Request`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RequestStatus {
    Pending,
    Ongoing,
    Completed,
    Cancelled,
}

impl RequestStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, RequestStatus::Completed | RequestStatus::Cancelled)
    }
}

/// A job to move a patient or item between two departments.
#[derive(Clone, Debug)]
pub struct Request {
    pub id: RequestId,
    pub origin: NodeId,
    pub destination: NodeId,
    pub kind: TransportKind,
    pub urgent: bool,
    /// Simulated-clock seconds at creation.
    pub created_at: f64,

    status: RequestStatus,
    assignee: Option<String>,
}

impl Request {
    pub fn new(
        id: RequestId,
        origin: NodeId,
        destination: NodeId,
        kind: TransportKind,
        urgent: bool,
        created_at: f64,
    ) -> Self {
        Self {
            id,
            origin,
            destination,
            kind,
            urgent,
            created_at,
            status: RequestStatus::Pending,
            assignee: None,
        }
    }

    #[inline]
    pub fn status(&self) -> RequestStatus {
        self.status
    }

    /// The worker currently (or last) responsible for this request.
    pub fn assignee(&self) -> Option<&str> {
        self.assignee.as_deref()
    }

    /// A request may be moved between workers or reordered only while it is
    /// still pending.  The engine marks a request ongoing at the instant its
    /// worker starts the pickup leg, so an ongoing request is by definition
    /// pinned to its assignee.
    #[inline]
    pub fn is_reassignable(&self) -> bool {
        self.status == RequestStatus::Pending
    }

    // ── Transitions ───────────────────────────────────────────────────────

    /// Pending → ongoing, recording the worker taking it.
    pub fn mark_ongoing(&mut self, assignee: &str) -> ModelResult<()> {
        match self.status {
            RequestStatus::Pending => {
                self.status = RequestStatus::Ongoing;
                self.assignee = Some(assignee.to_string());
                Ok(())
            }
            from => Err(self.invalid(from, RequestStatus::Ongoing)),
        }
    }

    /// Ongoing → completed.  The assignee is kept for audit.
    pub fn mark_completed(&mut self) -> ModelResult<()> {
        match self.status {
            RequestStatus::Ongoing => {
                self.status = RequestStatus::Completed;
                Ok(())
            }
            from => Err(self.invalid(from, RequestStatus::Completed)),
        }
    }

    /// Pending/ongoing → cancelled.  Cancelling twice is a no-op; cancelling
    /// a completed request is refused.
    pub fn mark_cancelled(&mut self) -> ModelResult<()> {
        match self.status {
            RequestStatus::Pending | RequestStatus::Ongoing => {
                self.status = RequestStatus::Cancelled;
                Ok(())
            }
            RequestStatus::Cancelled => Ok(()),
            from => Err(self.invalid(from, RequestStatus::Cancelled)),
        }
    }

    fn invalid(&self, from: RequestStatus, to: RequestStatus) -> ModelError {
        ModelError::InvalidTransition { id: self.id, from, to }
    }
}
