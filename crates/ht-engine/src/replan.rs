//! Re-plan scheduling: coalescing gate, snapshot, solve, apply.
//!
//! # Coalescing
//!
//! Triggers set a dirty flag; a single solver slot drains it.  Any number
//! of triggers arriving while a solve is in flight collapse into exactly
//! one follow-up run.  Solves therefore never run concurrently with each
//! other, and plan application is serialized behind the dispatcher lock.
//!
//! # Snapshot / version protocol
//!
//! The solve runs on a blocking thread against an immutable snapshot
//! (plannable workers, assignable requests, strategy handle) taken under
//! the lock together with the state version.  The resulting plan is applied
//! under the lock only if the version still matches; otherwise the plan is
//! stale, the dirty flag is re-set, and the loop solves again against fresh
//! state.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use ht_plan::WorkerView;

use crate::engine::Shared;
use crate::executor;

/// Request a re-plan.  Cheap and non-blocking; safe to call under bursts.
pub(crate) fn schedule(shared: &Arc<Shared>) {
    shared.replan_dirty.store(true, Ordering::SeqCst);
    if !shared.replan_active.swap(true, Ordering::SeqCst) {
        let shared = Arc::clone(shared);
        tokio::spawn(run_loop(shared));
    }
}

/// Drains the dirty flag until no trigger remains, then releases the slot.
async fn run_loop(shared: Arc<Shared>) {
    loop {
        if !shared.replan_dirty.swap(false, Ordering::SeqCst) {
            shared.replan_active.store(false, Ordering::SeqCst);
            // A trigger may have slipped in between the swap and the store;
            // reclaim the slot if so, otherwise we are done.
            if shared.replan_dirty.load(Ordering::SeqCst)
                && !shared.replan_active.swap(true, Ordering::SeqCst)
            {
                continue;
            }
            return;
        }

        if !shared.config.replan_settle.is_zero() {
            tokio::time::sleep(shared.config.replan_settle).await;
        }

        replan_once(&shared).await;
    }
}

async fn replan_once(shared: &Arc<Shared>) {
    // ── Snapshot under the lock ───────────────────────────────────────────
    let (workers, requests, strategy, version, fleet_line) = {
        let state = shared.lock();

        let workers: Vec<WorkerView> = state
            .workers
            .values()
            .filter(|w| w.is_plannable())
            .map(|w| WorkerView { name: w.name.clone(), node: w.current_node })
            .collect();

        let resting = state.workers.values().filter(|w| w.shift.is_resting()).count();
        let busy = state.workers.values().filter(|w| w.is_busy).count();
        let idle = state.workers.len().saturating_sub(resting + busy);
        let fleet_line =
            format!("Transporter status: resting {resting}, busy {busy}, idle {idle}.");

        (
            workers,
            state.assignable_requests(),
            Arc::clone(&state.strategy),
            state.version,
            fleet_line,
        )
    };

    shared.log(format!("Found {} assignable requests.", requests.len()));
    shared.log(fleet_line);

    // ── Solve outside the lock ────────────────────────────────────────────
    let solver_shared = Arc::clone(shared);
    let handle = tokio::task::spawn_blocking(move || {
        strategy.plan(&workers, &requests, &solver_shared.graph)
    });

    let joined = match shared.config.solver_timeout {
        Some(limit) => match tokio::time::timeout(limit, handle).await {
            Ok(joined) => joined,
            Err(_) => {
                // The blocking solve keeps running but its result is
                // discarded; with no incumbent available this is a no-plan.
                tracing::warn!(?limit, "solver exceeded its time budget");
                shared.log("Optimization timed out; keeping the current assignment.");
                return;
            }
        },
        None => handle.await,
    };

    let outcome = match joined {
        Ok(outcome) => outcome,
        Err(join_error) => {
            tracing::warn!(error = %join_error, "solver task failed");
            return;
        }
    };

    // ── Apply under the lock, or report no-plan ───────────────────────────
    match outcome {
        Ok(plan) => {
            let mut state = shared.lock();
            if state.version != version {
                // The world moved while we were solving; solve again.
                tracing::debug!(
                    snapshot = version,
                    current = state.version,
                    "stale plan discarded"
                );
                shared.replan_dirty.store(true, Ordering::SeqCst);
                return;
            }
            if let Err(reason) = executor::apply_plan(shared, &mut state, &plan) {
                tracing::warn!(?reason, "plan refused by the executor");
                shared.log("Plan refused; re-optimizing against fresh state.");
                shared.replan_dirty.store(true, Ordering::SeqCst);
            }
        }
        Err(no_plan) => {
            tracing::warn!(error = %no_plan, "planning produced no assignment");
            shared.log(format!("Optimization failed or no assignments available: {no_plan}."));
        }
    }
}
