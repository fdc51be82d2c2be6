//! Synthetic-load simulator.
//!
//! While running, creates a random transport request (two distinct
//! departments, random kind and urgency) at a fixed real-time interval.
//! Each synthetic request goes through the normal intake path, so it
//! triggers re-planning exactly like an operator-created one.

use std::sync::atomic::Ordering;
use std::sync::{Arc, Weak};

use ht_core::{NodeId, TransportKind};
use ht_events::Event;

use crate::engine::{self, Shared};

/// Flip the simulator on or off.  Idempotent; the generator task exits on
/// its own when the flag goes false or the engine is dropped.
pub(crate) fn set_running(shared: &Arc<Shared>, running: bool) {
    shared.sim_running.store(running, Ordering::SeqCst);
    shared.log(if running { "Simulation started." } else { "Simulation stopped." });

    if running && !shared.sim_loop_active.swap(true, Ordering::SeqCst) {
        tokio::spawn(run_loop(Arc::downgrade(shared)));
    }
}

async fn run_loop(weak: Weak<Shared>) {
    loop {
        let interval = {
            let Some(shared) = weak.upgrade() else { return };

            if !shared.sim_running.load(Ordering::SeqCst) {
                shared.sim_loop_active.store(false, Ordering::SeqCst);
                // Re-check: a restart may have raced the shutdown.
                if shared.sim_running.load(Ordering::SeqCst)
                    && !shared.sim_loop_active.swap(true, Ordering::SeqCst)
                {
                    continue;
                }
                return;
            }

            tick(&shared);
            shared.config.sim_interval
        };

        tokio::time::sleep(interval).await;
    }
}

/// One synthetic request.
fn tick(shared: &Arc<Shared>) {
    let Some((origin, destination, kind, urgent)) = draw(shared) else { return };

    shared.emit(Event::SimulationEvent {
        kind: "new_request".to_string(),
        origin: shared.node_name(origin),
        destination: shared.node_name(destination),
        transport_type: kind,
        urgent,
    });

    engine::create_request_internal(shared, origin, destination, kind, urgent);
}

fn draw(shared: &Arc<Shared>) -> Option<(NodeId, NodeId, TransportKind, bool)> {
    let mut state = shared.lock();
    let (a, b) = state.sim_rng.pick_two_distinct(shared.graph.node_count())?;
    let kind = *state.sim_rng.choose(&TransportKind::ALL)?;
    let urgent = state.sim_rng.gen_bool(0.5);
    Some((NodeId(a as u32), NodeId(b as u32), kind, urgent))
}
