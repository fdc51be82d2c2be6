//! Plan application.
//!
//! Translates a strategy's [`Plan`] onto the live fleet without disturbing
//! in-flight work.  Runs entirely under the dispatcher lock; the re-plan
//! pipeline serializes calls, so plan application is never concurrent with
//! itself.
//!
//! Per worker:
//!
//! 1. resting → the queue is replaced wholesale; the worker keeps holding
//!    (not consuming) it until rest ends;
//! 2. busy → the current task is preserved and any planned entry with the
//!    same (origin, destination) is dropped to avoid double execution;
//! 3. idle with work → the head is promoted to the current task, marked
//!    ongoing, and a movement task is spawned;
//! 4. idle without work → cleared, idle log.

use ht_events::Event;
use ht_model::RequestStatus;
use ht_plan::Plan;

use std::sync::Arc;

use crate::engine::{DispatchState, Shared};
use crate::movement;

/// Why a plan was refused wholesale.
///
/// Refusal leaves all state untouched; the caller sets the dirty flag so a
/// fresh solve runs against the current world.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum PlanRejected {
    /// The plan names a request the registry does not know.
    UnknownRequest,
    /// The plan names a request that is no longer assignable.
    NotAssignable,
    /// The plan lists one request on two workers.
    Duplicated,
}

/// Validate and apply `plan`.  Caller holds the dispatcher lock and has
/// already confirmed the plan's snapshot version is current.
pub(crate) fn apply_plan(
    shared: &Arc<Shared>,
    state: &mut DispatchState,
    plan: &Plan,
) -> Result<(), PlanRejected> {
    validate(state, plan)?;

    // Collect spawns and perform them after the per-worker loop so the
    // registry borrow is released first.
    let mut to_spawn: Vec<String> = Vec::new();

    let worker_names: Vec<String> = state.workers.keys().cloned().collect();
    for name in worker_names {
        let assigned = plan.get(&name).cloned().unwrap_or_default();

        let worker = state
            .workers
            .get_mut(&name)
            .expect("worker set is stable under the dispatcher lock");

        if !worker.is_active() {
            // Inactive workers are excluded from snapshots; any stale
            // entries for them stay pending and re-plan later.
            continue;
        }

        if worker.shift.is_resting() {
            worker.task_queue = assigned.into();
            shared.log(format!(
                "{name} is resting and will pick up the new queue afterwards."
            ));
            continue;
        }

        if let Some(current) = worker.current_task {
            // Preserve in-flight work; drop planned duplicates of it.
            let (cur_origin, cur_destination) = match state.requests.get(&current) {
                Some(request) => (request.origin, request.destination),
                None => (ht_core::NodeId::INVALID, ht_core::NodeId::INVALID),
            };
            let filtered: Vec<_> = assigned
                .into_iter()
                .filter(|id| {
                    state
                        .requests
                        .get(id)
                        .map(|r| r.origin != cur_origin || r.destination != cur_destination)
                        .unwrap_or(false)
                })
                .collect();
            worker.task_queue = filtered.into();
            shared.log(format!("Preserving current task for {name}."));
            continue;
        }

        if let Some((&head, tail)) = assigned.split_first() {
            worker.task_queue = tail.iter().copied().collect();
            worker.begin_task(head);

            if let Some(request) = state.requests.get_mut(&head) {
                if request.mark_ongoing(&name).is_ok() {
                    let summary = shared.request_summary(request);
                    shared.emit(Event::TransportStatusUpdate {
                        request: summary,
                        status: RequestStatus::Ongoing,
                    });
                    shared.log(format!(
                        "Assigned {name} to transport from {} to {}.",
                        shared.node_name(request.origin),
                        shared.node_name(request.destination),
                    ));
                }
            }
            to_spawn.push(name);
            continue;
        }

        worker.clear_task();
        worker.task_queue.clear();
        shared.log(format!("{name} is idle."));
    }

    for name in &to_spawn {
        movement::spawn_drive(shared, name);
    }
    Ok(())
}

/// Plans are rejected whole: applying half a plan would break the
/// "assignable requests form a partition" invariant.
fn validate(state: &DispatchState, plan: &Plan) -> Result<(), PlanRejected> {
    let mut seen = std::collections::HashSet::new();
    for list in plan.values() {
        for id in list {
            let Some(request) = state.requests.get(id) else {
                return Err(PlanRejected::UnknownRequest);
            };
            if request.status() != RequestStatus::Pending {
                return Err(PlanRejected::NotAssignable);
            }
            if !seen.insert(*id) {
                return Err(PlanRejected::Duplicated);
            }
        }
    }
    Ok(())
}
