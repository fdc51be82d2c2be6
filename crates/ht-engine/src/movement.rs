//! Per-worker movement: edge-by-edge traversal, the task loop, rest cycles,
//! and workload decay.
//!
//! # Task model
//!
//! Each busy worker is driven by exactly one [`drive`] task, spawned by the
//! executor when an idle worker receives work.  The task loops through the
//! worker's queue: approach leg, carry leg, completion, rest check, next
//! task.  Every edge traversal is a scaled sleep and every sleep is followed
//! by a short locked section, so worker removal and deactivation take
//! effect at the next edge boundary.
//!
//! # Failure policy
//!
//! A movement failure (worker inactive mid-route, unreachable target)
//! aborts the current task: the request is cancelled, the worker is
//! cleared, a failure log is emitted, and nothing is retried.  The rest of
//! the queue is handed back to the next re-plan.

use std::sync::Arc;

use ht_core::NodeId;
use ht_events::Event;
use ht_model::RequestStatus;

use crate::engine::{cancel_request, worker_state, Shared};
use crate::replan;

/// Spawn the movement loop for `name`.  Caller must have set the worker's
/// `current_task` (and busy flag) under the lock first.
pub(crate) fn spawn_drive(shared: &Arc<Shared>, name: &str) {
    let shared = Arc::clone(shared);
    let name = name.to_string();
    tokio::spawn(async move { drive(shared, name).await });
}

/// The movement loop: one task end to end, then the follow-up decision.
async fn drive(shared: Arc<Shared>, name: String) {
    loop {
        // ── Fetch the current task ────────────────────────────────────────
        let (task, origin, destination, origin_name, destination_name) = {
            let state = shared.lock();
            let Some(worker) = state.workers.get(&name) else { return };
            let Some(task) = worker.current_task else { return };
            let Some(request) = state.requests.get(&task) else { return };
            (
                task,
                request.origin,
                request.destination,
                shared.node_name(request.origin),
                shared.node_name(request.destination),
            )
        };

        shared.log(format!(
            "{name} started transport from {origin_name} to {destination_name}."
        ));

        // ── Leg 1: approach the origin ────────────────────────────────────
        if !move_to(&shared, &name, origin).await {
            abort_task(&shared, &name, task, &origin_name);
            return;
        }

        // ── Leg 2: carry to the destination ───────────────────────────────
        if !move_to(&shared, &name, destination).await {
            abort_task(&shared, &name, task, &destination_name);
            return;
        }

        // ── Completion and the follow-up decision ─────────────────────────
        //
        // One critical section: completing the request, the rest check, and
        // promoting the next queue entry must be atomic, otherwise a re-plan
        // could observe a half-transitioned worker (busy flag out of sync,
        // or idle-looking right before its rest begins).
        let after = {
            let mut guard = shared.lock();
            let state = &mut *guard;

            if let Some(request) = state.requests.get_mut(&task) {
                if request.mark_completed().is_ok() {
                    let summary = shared.request_summary(request);
                    shared.emit(Event::TransportStatusUpdate {
                        request: summary,
                        status: RequestStatus::Completed,
                    });
                }
            }
            shared.emit(Event::TransportCompleted {
                transporter: name.clone(),
                origin: origin_name.clone(),
                destination: destination_name.clone(),
            });
            shared.log(format!(
                "{name} completed transport from {origin_name} to {destination_name}."
            ));
            state.bump_version();

            let Some(worker) = state.workers.get_mut(&name) else { return };
            if worker.shift.should_rest(worker.workload) {
                // Flip to resting inside this section so a concurrent plan
                // application takes the queue-holding branch.
                worker.clear_task();
                worker.shift.begin_rest();
                let status = worker_state(worker);
                shared.emit(Event::TransporterStatusUpdate { name: name.clone(), status });
                shared.log(format!(
                    "{name} has reached their workload limit and is heading to the lounge to rest."
                ));
                AfterTask::Rest
            } else if let Some(next) = worker.task_queue.pop_front() {
                worker.begin_task(next);
                if let Some(request) = state.requests.get_mut(&next) {
                    if request.mark_ongoing(&name).is_ok() {
                        let summary = shared.request_summary(request);
                        shared.emit(Event::TransportStatusUpdate {
                            request: summary,
                            status: RequestStatus::Ongoing,
                        });
                    }
                }
                AfterTask::Next
            } else {
                worker.clear_task();
                AfterTask::Idle
            }
        };

        match after {
            AfterTask::Next => continue,
            AfterTask::Idle => {
                spawn_decay(&shared, &name);
                return;
            }
            AfterTask::Rest => {
                spawn_decay(&shared, &name);
                rest_cycle(&shared, &name).await;
                // Freshly rested capacity may change the optimal assignment.
                replan::schedule(&shared);
                return;
            }
        }
    }
}

/// What the movement loop does after completing a task.
enum AfterTask {
    Rest,
    Next,
    Idle,
}

/// Move a worker along the shortest path to `destination`.
///
/// Emits the full path with per-leg durations up front (for animation),
/// then per edge: sleep `weight / speed_factor`, take the lock, verify the
/// worker is still present and active, advance `current_node`, and emit the
/// reached hop.  On success the path's total weight is added to the
/// worker's workload.
pub(crate) async fn move_to(shared: &Arc<Shared>, name: &str, destination: NodeId) -> bool {
    let route = {
        let state = shared.lock();
        let Some(worker) = state.workers.get(name) else { return false };
        if !worker.is_active() {
            shared.log(format!("{name} is inactive and cannot move."));
            return false;
        }
        if worker.current_node == destination {
            return true;
        }
        match ht_graph::shortest_path(&shared.graph, worker.current_node, destination) {
            Some(route) => route,
            None => {
                shared.log(format!(
                    "{name} cannot reach {} from {}.",
                    shared.node_name(destination),
                    shared.node_name(worker.current_node)
                ));
                return false;
            }
        }
    };

    shared.emit(Event::TransporterUpdate {
        name: name.to_string(),
        path: route.nodes.iter().map(|&n| shared.node_name(n)).collect(),
        durations: route.leg_secs.clone(),
    });

    for (_, next, secs) in route.legs() {
        tokio::time::sleep(shared.clock.real_duration(secs)).await;

        let stepped = {
            let mut state = shared.lock();
            let Some(worker) = state.workers.get_mut(name) else { return false };
            if !worker.is_active() {
                shared.log(format!("{name} went inactive mid-route."));
                false
            } else {
                worker.current_node = next;
                shared.emit(Event::TransporterUpdate {
                    name: name.to_string(),
                    path: vec![shared.node_name(next)],
                    durations: vec![secs],
                });
                true
            }
        };
        if !stepped {
            return false;
        }
    }

    {
        let mut state = shared.lock();
        let Some(worker) = state.workers.get_mut(name) else { return false };
        worker.add_workload(route.total_secs);
        shared.emit(Event::WorkloadUpdate { name: name.to_string(), workload: worker.workload });
    }
    true
}

/// Movement-failure cleanup: cancel the request, clear the worker, log, and
/// hand the remaining queue to the next re-plan.
fn abort_task(shared: &Arc<Shared>, name: &str, task: ht_core::RequestId, target: &str) {
    {
        let mut state = shared.lock();
        cancel_request(shared, &mut state, task);
        state.bump_version();
        if let Some(worker) = state.workers.get_mut(name) {
            worker.clear_task();
        }
        shared.log(format!("{name} failed to reach {target}; transport abandoned."));
    }
    replan::schedule(shared);
}

/// The rest cycle: walk to the lounge, sleep out the rest duration, mark
/// working again.  The queue is held, not consumed; the caller has already
/// flipped the shift substate to resting.
async fn rest_cycle(shared: &Arc<Shared>, name: &str) {
    let rest_secs = {
        let state = shared.lock();
        let Some(worker) = state.workers.get(name) else { return };
        worker.shift.rest_duration_secs
    };

    // Walking to the lounge is best-effort; the rest happens regardless.
    move_to(shared, name, shared.lounge).await;

    tokio::time::sleep(shared.clock.real_duration(rest_secs)).await;

    {
        let mut state = shared.lock();
        let Some(worker) = state.workers.get_mut(name) else { return };
        worker.shift.end_rest();
        let status = worker_state(worker);
        state.bump_version();
        shared.emit(Event::TransporterStatusUpdate { name: name.to_string(), status });
        shared.log(format!("{name} is rested and ready for new assignments."));
    }
}

/// Best-effort workload cooldown: one unit per simulated second while the
/// worker stays idle, floored at zero.  Ends as soon as the worker picks up
/// new work or disappears.
fn spawn_decay(shared: &Arc<Shared>, name: &str) {
    let shared = Arc::clone(shared);
    let name = name.to_string();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(shared.clock.real_duration(1.0)).await;
            let mut state = shared.lock();
            let Some(worker) = state.workers.get_mut(&name) else { return };
            if worker.is_busy || worker.workload <= 0.0 {
                return;
            }
            let workload = worker.decay_workload();
            shared.emit(Event::WorkloadUpdate { name: name.clone(), workload });
        }
    });
}
