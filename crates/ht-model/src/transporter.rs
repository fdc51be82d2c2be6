//! Transporter (worker) state.

use std::collections::VecDeque;

use ht_core::{NodeId, RequestId};

use crate::ShiftManager;

/// Availability of a transporter.
///
/// Distinct from the shift substate: a resting worker is still `Active`
/// (it holds its queue and resumes when rest ends), while an `Inactive`
/// worker is excluded from new plans and does not move at all.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TransporterStatus {
    Active,
    Inactive,
}

/// A worker that moves requests through the hospital graph.
///
/// # Mutation discipline
///
/// All fields are `pub`; the engine mutates them only under its dispatcher
/// lock (plan application, intake) or from the worker's own movement task.
/// The `is_busy ⇔ current_task.is_some()` invariant is maintained through
/// [`begin_task`](Self::begin_task) and [`clear_task`](Self::clear_task);
/// direct field writes should preserve it.
#[derive(Clone, Debug)]
pub struct Transporter {
    /// Unique worker name (registry key).
    pub name: String,

    /// The node the worker is currently at (updated per traversed edge).
    pub current_node: NodeId,

    pub status: TransporterStatus,

    /// `true` exactly while `current_task` is `Some`.
    pub is_busy: bool,

    /// The request this worker is currently driving, if any.
    pub current_task: Option<RequestId>,

    /// Upcoming requests in execution order.  Entries are always pending;
    /// the head is promoted to `current_task` when the previous task ends.
    pub task_queue: VecDeque<RequestId>,

    /// Cumulative workload in path-weight units; decays while idle.
    pub workload: f64,

    pub shift: ShiftManager,
}

impl Transporter {
    pub fn new(name: &str, start: NodeId, shift: ShiftManager) -> Self {
        Self {
            name: name.to_string(),
            current_node: start,
            status: TransporterStatus::Active,
            is_busy: false,
            current_task: None,
            task_queue: VecDeque::new(),
            workload: 0.0,
            shift,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == TransporterStatus::Active
    }

    /// Eligible to appear in a new plan: active, whatever the shift substate.
    #[inline]
    pub fn is_plannable(&self) -> bool {
        self.is_active()
    }

    /// Promote `request` to the current task.
    pub fn begin_task(&mut self, request: RequestId) {
        self.current_task = Some(request);
        self.is_busy = true;
    }

    /// Drop the current task (completed, failed, or aborted) and go idle.
    pub fn clear_task(&mut self) {
        self.current_task = None;
        self.is_busy = false;
    }

    /// Pop the queue head into the current task.  Returns the promoted id.
    pub fn take_next_task(&mut self) -> Option<RequestId> {
        let next = self.task_queue.pop_front()?;
        self.begin_task(next);
        Some(next)
    }

    /// `true` if `request` is this worker's current task or queued.
    pub fn holds(&self, request: RequestId) -> bool {
        self.current_task == Some(request) || self.task_queue.contains(&request)
    }

    /// Remove `request` from the queue if present.  Returns `true` if removed.
    pub fn unqueue(&mut self, request: RequestId) -> bool {
        let before = self.task_queue.len();
        self.task_queue.retain(|&r| r != request);
        self.task_queue.len() != before
    }

    // ── Workload ──────────────────────────────────────────────────────────

    pub fn add_workload(&mut self, amount: f64) {
        self.workload += amount.max(0.0);
    }

    /// One decay step: reduce workload by one unit, floored at zero.
    /// Returns the new value.
    pub fn decay_workload(&mut self) -> f64 {
        self.workload = (self.workload - 1.0).max(0.0);
        self.workload
    }
}
