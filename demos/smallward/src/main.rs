//! smallward — smallest runnable example of the hospital transport engine.
//!
//! Spins up the standard 15-department hospital with two transporters and
//! the classic four seed requests, lets the ILP makespan strategy dispatch
//! them at 10× speed, prints the event stream, and finishes with a fleet
//! summary table.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use ht_core::TransportKind;
use ht_engine::{Engine, EngineConfig, RequestSpec};
use ht_events::{ChannelSink, Event};
use ht_plan::{IlpMode, StrategyKind};

// ── Constants ─────────────────────────────────────────────────────────────────

const SPEED_FACTOR: f64 = 10.0;
const RUN_SECS: u64 = 20;

fn seed_requests() -> Vec<RequestSpec> {
    [
        ("Pediatrics", "Cafeteria", false),
        ("Cafeteria", "Radiology", false),
        ("Emergency", "ICU", true),
        ("ICU", "Pediatrics", false),
    ]
    .into_iter()
    .map(|(origin, destination, urgent)| RequestSpec {
        origin: origin.to_string(),
        destination: destination.to_string(),
        kind: TransportKind::Stretcher,
        urgent,
    })
    .collect()
}

// ── main ──────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    println!("=== smallward — hospital transport dispatch ===");
    println!("Speed: {SPEED_FACTOR}x  |  Run: {RUN_SECS} s wall");
    println!();

    // 1. Configure: default hospital, two workers, four seed requests.
    let mut config = EngineConfig::default_hospital()
        .with_speed_factor(SPEED_FACTOR)
        .with_strategy(StrategyKind::Ilp(IlpMode::Makespan));
    config.initial_transporters = vec!["Anna".to_string(), "Ben".to_string()];
    config.initial_requests = seed_requests();

    // 2. Event stream: print everything except the clock heartbeat.
    let (sink, mut events) = ChannelSink::channel();
    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match &event {
                Event::ClockTick { .. } => {}
                Event::TransportLog { message } => println!("  [log] {message}"),
                other => println!("  [event] {}", other.to_json()),
            }
        }
    });

    // 3. Build and start the engine.
    let engine = Engine::new(config, Arc::new(sink)).map_err(|e| anyhow::anyhow!("{e}"))?;
    engine.start().map_err(|e| anyhow::anyhow!("{e}"))?;

    let graph = engine.get_graph();
    println!(
        "Hospital graph: {} departments, {} corridors",
        graph.departments.len(),
        graph.corridors.len()
    );
    println!();

    // 4. Let the dispatcher run.
    tokio::time::sleep(Duration::from_secs(RUN_SECS)).await;

    // 5. Summary.
    let requests = engine.get_requests();
    println!();
    println!(
        "Requests — pending: {}, ongoing: {}, completed: {}, cancelled: {}",
        requests.pending.len(),
        requests.ongoing.len(),
        requests.completed.len(),
        requests.cancelled.len()
    );

    println!();
    println!("{:<10} {:<20} {:<10} {:<10}", "Worker", "Location", "Status", "Workload");
    println!("{}", "-".repeat(52));
    for worker in engine.get_transporters() {
        println!(
            "{:<10} {:<20} {:<10?} {:<10.1}",
            worker.name, worker.current_location, worker.status, worker.workload
        );
    }

    engine.check_invariants().map_err(|e| anyhow::anyhow!(e))?;
    println!();
    println!("Invariants held. Sim time elapsed: {:.1} s", engine.sim_time());

    drop(engine);
    printer.abort();
    Ok(())
}
