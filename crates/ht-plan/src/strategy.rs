//! The `AssignmentStrategy` trait — the dispatcher's planning seam.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use ht_core::{CoreError, NodeId, RequestId};
use ht_graph::{shortest_path, HospitalGraph};
use ht_model::Request;

use crate::{IlpMode, IlpStrategy, PlanResult, RandomStrategy};

// ── Plan ──────────────────────────────────────────────────────────────────────

/// Worker name → ordered task list.
///
/// A valid plan has one entry per planned worker (possibly empty) and the
/// union of all lists is a partition of the assignable request set: every
/// request exactly once, no request on two workers.
pub type Plan = BTreeMap<String, Vec<RequestId>>;

/// The planning-relevant slice of a worker, snapshotted under the
/// dispatcher lock.  Strategies never see live `Transporter`s.
#[derive(Clone, Debug)]
pub struct WorkerView {
    pub name: String,
    /// The worker's position when the snapshot was taken (mid-route workers
    /// report the last node they reached).
    pub node: NodeId,
}

// ── AssignmentStrategy ────────────────────────────────────────────────────────

/// Pluggable fleet planner.
///
/// `plan` receives an immutable snapshot and must not retain state between
/// invocations — re-planning may run at any cadence and strategies are
/// swapped at runtime.  (The random baseline carries a seeded RNG as its
/// only interior state; draw order affects which valid plan is returned,
/// never validity.)
///
/// # Thread safety
///
/// The solve runs on a blocking thread outside the dispatcher lock, so
/// implementations must be `Send + Sync`.
pub trait AssignmentStrategy: Send + Sync {
    /// Produce a whole-fleet plan, or a [`PlanError`](crate::PlanError)
    /// explaining why none exists.  An empty request set is a success: every
    /// worker gets an empty list.
    fn plan(
        &self,
        workers: &[WorkerView],
        requests: &[Request],
        graph: &HospitalGraph,
    ) -> PlanResult<Plan>;

    /// The scheduler's currency: approach leg plus carry leg, in simulated
    /// seconds.  Deliberately ignores queue predecessors — queueing costs
    /// are the ILP's job, through its decision variables.
    ///
    /// Returns `None` when either leg has no path (a planning failure for
    /// this pair, not an error).
    fn estimate_travel_time(
        &self,
        worker: &WorkerView,
        request: &Request,
        graph: &HospitalGraph,
    ) -> Option<f64> {
        let approach = shortest_path(graph, worker.node, request.origin)?;
        let carry = shortest_path(graph, request.origin, request.destination)?;
        Some(approach.total_secs + carry.total_secs)
    }
}

// ── StrategyKind ──────────────────────────────────────────────────────────────

/// Runtime-selectable strategy, as named on the command API.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum StrategyKind {
    Random,
    Ilp(IlpMode),
}

impl StrategyKind {
    /// Instantiate the strategy.  `seed` only affects [`RandomStrategy`].
    pub fn into_strategy(self, seed: u64) -> Arc<dyn AssignmentStrategy> {
        match self {
            StrategyKind::Random => Arc::new(RandomStrategy::new(seed)),
            StrategyKind::Ilp(mode) => Arc::new(IlpStrategy::new(mode)),
        }
    }
}

impl FromStr for StrategyKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random" => Ok(StrategyKind::Random),
            "ilp:makespan" => Ok(StrategyKind::Ilp(IlpMode::Makespan)),
            "ilp:equal" => Ok(StrategyKind::Ilp(IlpMode::EqualWorkload)),
            "ilp:urgency" => Ok(StrategyKind::Ilp(IlpMode::UrgencyFirst)),
            other => Err(CoreError::Parse(format!("unknown strategy: {other:?}"))),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Random => f.write_str("random"),
            StrategyKind::Ilp(IlpMode::Makespan) => f.write_str("ilp:makespan"),
            StrategyKind::Ilp(IlpMode::EqualWorkload) => f.write_str("ilp:equal"),
            StrategyKind::Ilp(IlpMode::UrgencyFirst) => f.write_str("ilp:urgency"),
        }
    }
}
