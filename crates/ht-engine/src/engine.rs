//! The `Engine`: dispatcher state, intake commands, and snapshots.

use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use rustc_hash::FxHashMap;
use serde::Serialize;

use ht_core::{NodeId, RequestId, SimClock, SimRng, TransportKind};
use ht_events::{Event, EventSink, RequestSummary, WorkerState};
use ht_graph::{shortest_path, GraphBuilder, HospitalGraph};
use ht_model::{Request, RequestStatus, ShiftManager, Transporter, TransporterStatus};
use ht_plan::{AssignmentStrategy, StrategyKind};

use crate::{movement, replan, simulator, ApiError, ApiResult, EngineConfig};

// ── Shared engine internals ───────────────────────────────────────────────────

/// Everything movement tasks, the re-plan pipeline, and the simulator share.
/// Held behind an `Arc`; background loops hold `Weak` references so they end
/// when the engine is dropped.
pub(crate) struct Shared {
    pub(crate) graph: HospitalGraph,
    pub(crate) clock: SimClock,
    pub(crate) config: EngineConfig,
    /// Interned id of `config.rest_node`.
    pub(crate) lounge: NodeId,
    pub(crate) sink: Arc<dyn EventSink>,

    /// The dispatcher lock.  Critical sections are short and never span an
    /// `.await`.
    pub(crate) state: Mutex<DispatchState>,

    // Re-plan coalescing gate (see `replan`).
    pub(crate) replan_dirty: AtomicBool,
    pub(crate) replan_active: AtomicBool,

    // Simulator gate (see `simulator`).
    pub(crate) sim_running: AtomicBool,
    pub(crate) sim_loop_active: AtomicBool,
}

impl Shared {
    pub(crate) fn lock(&self) -> MutexGuard<'_, DispatchState> {
        self.state.lock().expect("dispatcher lock poisoned")
    }

    pub(crate) fn emit(&self, event: Event) {
        self.sink.emit(event);
    }

    pub(crate) fn log(&self, message: impl Into<String>) {
        self.sink.emit(Event::log(message));
    }

    pub(crate) fn node_name(&self, node: NodeId) -> String {
        self.graph.node_name(node).to_string()
    }

    pub(crate) fn request_summary(&self, request: &Request) -> RequestSummary {
        RequestSummary {
            id: request.id,
            origin: self.node_name(request.origin),
            destination: self.node_name(request.destination),
            transport_type: request.kind,
            urgent: request.urgent,
        }
    }
}

/// Worker state as reported on the event stream: the shift substate folded
/// into the availability status.
pub(crate) fn worker_state(worker: &Transporter) -> WorkerState {
    if !worker.is_active() {
        WorkerState::Inactive
    } else if worker.shift.is_resting() {
        WorkerState::Resting
    } else {
        WorkerState::Active
    }
}

// ── Dispatcher state ──────────────────────────────────────────────────────────

/// All mutable engine state, guarded by the dispatcher lock.
pub(crate) struct DispatchState {
    /// Worker registry, keyed by unique name.  `BTreeMap` so iteration (and
    /// therefore plan application and snapshots) is deterministic.
    pub(crate) workers: BTreeMap<String, Transporter>,

    /// The single authoritative request set for this engine instance.
    pub(crate) requests: FxHashMap<RequestId, Request>,

    pub(crate) next_request_id: u64,

    pub(crate) strategy: Arc<dyn AssignmentStrategy>,
    pub(crate) strategy_kind: StrategyKind,

    /// Bumped on every planning-relevant mutation; a solve whose snapshot
    /// version no longer matches is discarded as stale.
    pub(crate) version: u64,

    /// RNG stream for the synthetic-load simulator.
    pub(crate) sim_rng: SimRng,
}

impl DispatchState {
    pub(crate) fn bump_version(&mut self) {
        self.version += 1;
    }

    /// Assignable requests (status pending, whether or not currently queued),
    /// sorted by id so strategy input order is deterministic.
    pub(crate) fn assignable_requests(&self) -> Vec<Request> {
        let mut pending: Vec<Request> = self
            .requests
            .values()
            .filter(|r| r.status() == RequestStatus::Pending)
            .cloned()
            .collect();
        pending.sort_by_key(|r| r.id);
        pending
    }
}

// ── Engine ────────────────────────────────────────────────────────────────────

/// One hospital's dispatch engine.
///
/// Cheap to clone (all state is behind an `Arc`); multiple engines in one
/// process are fully independent.
#[derive(Clone)]
pub struct Engine {
    pub(crate) shared: Arc<Shared>,
}

impl Engine {
    /// Build the graph, validate the configuration, and create an idle
    /// engine.  Nothing is spawned until [`start`](Self::start) or the first
    /// command.
    pub fn new(config: EngineConfig, sink: Arc<dyn EventSink>) -> ApiResult<Self> {
        let mut builder = GraphBuilder::new();
        for department in &config.departments {
            builder.add_department(department);
        }
        for (from, to, weight) in &config.corridors {
            builder.add_corridor(from, to, *weight)?;
        }
        let graph = builder.build()?;
        let lounge = graph.require_node(&config.rest_node)?;

        let mut root_rng = SimRng::new(config.seed);
        let sim_rng = root_rng.child(1);
        let strategy = config.strategy.into_strategy(config.seed);

        let shared = Arc::new(Shared {
            clock: SimClock::new(config.speed_factor),
            lounge,
            sink,
            state: Mutex::new(DispatchState {
                workers: BTreeMap::new(),
                requests: FxHashMap::default(),
                next_request_id: 1,
                strategy,
                strategy_kind: config.strategy,
                version: 0,
                sim_rng,
            }),
            replan_dirty: AtomicBool::new(false),
            replan_active: AtomicBool::new(false),
            sim_running: AtomicBool::new(false),
            sim_loop_active: AtomicBool::new(false),
            graph,
            config,
        });

        Ok(Self { shared })
    }

    /// Start the clock emitter and apply the configured initial fleet and
    /// requests.  Must be called from within a tokio runtime.
    pub fn start(&self) -> ApiResult<()> {
        let weak = Arc::downgrade(&self.shared);
        tokio::spawn(clock_loop(weak));

        for name in self.shared.config.initial_transporters.clone() {
            self.add_transporter(&name)?;
        }
        for spec in self.shared.config.initial_requests.clone() {
            self.create_request(&spec.origin, &spec.destination, spec.kind, spec.urgent)?;
        }
        Ok(())
    }

    /// Simulated seconds since the engine started.
    pub fn sim_time(&self) -> f64 {
        self.shared.clock.now()
    }

    /// The strategy currently installed.
    pub fn strategy_kind(&self) -> StrategyKind {
        self.shared.lock().strategy_kind
    }

    // ── Intake commands ───────────────────────────────────────────────────

    /// Register a worker at the lounge.  Fails on duplicate names.
    pub fn add_transporter(&self, name: &str) -> ApiResult<TransporterInfo> {
        let info = {
            let mut state = self.shared.lock();
            if state.workers.contains_key(name) {
                return Err(ApiError::validation(format!(
                    "a transporter named {name:?} already exists"
                )));
            }

            let shift = ShiftManager::new(
                self.shared.config.rest_threshold,
                self.shared.config.rest_duration_secs,
            );
            let worker = Transporter::new(name, self.shared.lounge, shift);
            let info = self.transporter_info(&worker);

            self.shared.emit(Event::NewTransporter {
                name: name.to_string(),
                location: self.shared.config.rest_node.clone(),
            });
            self.shared.log(format!(
                "{name} added at {} and is ready for assignments.",
                self.shared.config.rest_node
            ));

            state.workers.insert(name.to_string(), worker);
            state.bump_version();
            info
        };

        replan::schedule(&self.shared);
        Ok(info)
    }

    /// Remove a worker entirely.  Its in-flight request (if any) is
    /// cancelled; queued requests return to the pending pool and are covered
    /// by the re-plan this triggers.
    pub fn remove_transporter(&self, name: &str) -> ApiResult<()> {
        {
            let mut state = self.shared.lock();
            let Some(worker) = state.workers.remove(name) else {
                return Err(ApiError::validation(format!("transporter {name:?} not found")));
            };

            if let Some(task) = worker.current_task {
                cancel_request(&self.shared, &mut state, task);
            }

            state.bump_version();
            self.shared.emit(Event::TransporterStatusUpdate {
                name: name.to_string(),
                status: WorkerState::Inactive,
            });
            self.shared.log(format!("{name} removed from the fleet."));
        }

        replan::schedule(&self.shared);
        Ok(())
    }

    /// Activate or deactivate a worker.  Deactivation releases the worker's
    /// queue back to the pending pool; its in-flight movement aborts at the
    /// next edge boundary.
    pub fn set_transporter_status(&self, name: &str, active: bool) -> ApiResult<()> {
        {
            let mut state = self.shared.lock();
            let Some(worker) = state.workers.get_mut(name) else {
                return Err(ApiError::validation(format!("transporter {name:?} not found")));
            };

            if active {
                worker.status = TransporterStatus::Active;
            } else {
                worker.status = TransporterStatus::Inactive;
                worker.task_queue.clear();
            }
            let status = worker_state(worker);
            state.bump_version();

            self.shared
                .emit(Event::TransporterStatusUpdate { name: name.to_string(), status });
            self.shared.log(format!(
                "{name} is now {}.",
                if active { "active" } else { "inactive" }
            ));
        }

        replan::schedule(&self.shared);
        Ok(())
    }

    /// Create a pending transport request and trigger a re-plan.
    pub fn create_request(
        &self,
        origin: &str,
        destination: &str,
        kind: TransportKind,
        urgent: bool,
    ) -> ApiResult<RequestId> {
        let origin_id = self.shared.graph.require_node(origin)?;
        let destination_id = self.shared.graph.require_node(destination)?;
        Ok(create_request_internal(&self.shared, origin_id, destination_id, kind, urgent))
    }

    /// Remove a request.  Pending requests are cancelled and unqueued;
    /// completed/cancelled ones are dropped from the registry.  An in-flight
    /// request cannot be removed.
    pub fn remove_request(&self, id: RequestId) -> ApiResult<()> {
        let mut state = self.shared.lock();
        let Some(status) = state.requests.get(&id).map(Request::status) else {
            return Err(ApiError::validation(format!("request {id} not found")));
        };

        match status {
            RequestStatus::Pending => {
                for worker in state.workers.values_mut() {
                    worker.unqueue(id);
                }
                cancel_request(&self.shared, &mut state, id);
                state.bump_version();
            }
            RequestStatus::Ongoing => {
                return Err(ApiError::validation(format!("request {id} is in progress")));
            }
            RequestStatus::Completed | RequestStatus::Cancelled => {
                state.requests.remove(&id);
            }
        }
        Ok(())
    }

    /// Send an idle worker back to the lounge.
    pub fn return_home(&self, name: &str) -> ApiResult<()> {
        {
            let state = self.shared.lock();
            let Some(worker) = state.workers.get(name) else {
                return Err(ApiError::validation(format!("transporter {name:?} not found")));
            };
            if worker.is_busy || worker.shift.is_resting() {
                return Err(ApiError::validation(format!(
                    "{name} is working and cannot return home right now"
                )));
            }
            if worker.current_node == self.shared.lounge {
                self.shared.log(format!("{name} is already in the lounge."));
                return Ok(());
            }
            if shortest_path(&self.shared.graph, worker.current_node, self.shared.lounge)
                .is_none()
            {
                return Err(ApiError {
                    kind: crate::ApiErrorKind::Movement,
                    message: format!("no valid path to the lounge for {name}"),
                });
            }
        }

        let shared = Arc::clone(&self.shared);
        let name = name.to_string();
        tokio::spawn(async move {
            if movement::move_to(&shared, &name, shared.lounge).await {
                shared.log(format!("{name} has returned to the lounge."));
            }
        });
        Ok(())
    }

    /// Install a different assignment strategy and re-plan under it.
    pub fn set_strategy(&self, kind: StrategyKind) -> ApiResult<()> {
        {
            let mut state = self.shared.lock();
            state.strategy = kind.into_strategy(self.shared.config.seed);
            state.strategy_kind = kind;
            state.bump_version();
            self.shared.log(format!("Assignment strategy switched to: {kind}"));
        }
        replan::schedule(&self.shared);
        Ok(())
    }

    /// Explicitly trigger a re-plan of the whole fleet.
    pub fn deploy_plan(&self) -> ApiResult<()> {
        self.shared.log("Re-optimizing all transport assignments...");
        replan::schedule(&self.shared);
        Ok(())
    }

    /// Start or stop the synthetic-load simulator.
    pub fn toggle_simulation(&self, running: bool) -> ApiResult<()> {
        simulator::set_running(&self.shared, running);
        Ok(())
    }

    // ── Snapshots ─────────────────────────────────────────────────────────

    pub fn get_graph(&self) -> GraphSnapshot {
        GraphSnapshot {
            departments: self.shared.graph.departments().map(str::to_string).collect(),
            corridors: self
                .shared
                .graph
                .corridors()
                .into_iter()
                .map(|(from, to, weight)| CorridorInfo { from, to, weight })
                .collect(),
        }
    }

    pub fn get_transporters(&self) -> Vec<TransporterInfo> {
        let state = self.shared.lock();
        state.workers.values().map(|w| self.transporter_info(w)).collect()
    }

    pub fn get_requests(&self) -> RequestsSnapshot {
        let state = self.shared.lock();
        let mut snapshot = RequestsSnapshot::default();
        let mut all: Vec<&Request> = state.requests.values().collect();
        all.sort_by_key(|r| r.id);
        for request in all {
            let info = self.request_info(request);
            match request.status() {
                RequestStatus::Pending => snapshot.pending.push(info),
                RequestStatus::Ongoing => snapshot.ongoing.push(info),
                RequestStatus::Completed => snapshot.completed.push(info),
                RequestStatus::Cancelled => snapshot.cancelled.push(info),
            }
        }
        snapshot
    }

    /// Current status of one request, if it exists.
    pub fn request_status(&self, id: RequestId) -> Option<RequestStatus> {
        self.shared.lock().requests.get(&id).map(Request::status)
    }

    fn transporter_info(&self, worker: &Transporter) -> TransporterInfo {
        TransporterInfo {
            name: worker.name.clone(),
            current_location: self.shared.node_name(worker.current_node),
            status: worker_state(worker),
            workload: worker.workload,
        }
    }

    fn request_info(&self, request: &Request) -> RequestInfo {
        RequestInfo {
            id: request.id,
            origin: self.shared.node_name(request.origin),
            destination: self.shared.node_name(request.destination),
            transport_type: request.kind,
            urgent: request.urgent,
            status: request.status(),
            assignee: request.assignee().map(str::to_string),
        }
    }

    // ── Invariant audit (test support) ────────────────────────────────────

    /// Verify the request-placement and busy-flag invariants.  Returns a
    /// description of the first violation found.
    #[doc(hidden)]
    pub fn check_invariants(&self) -> Result<(), String> {
        let state = self.shared.lock();

        for worker in state.workers.values() {
            if worker.is_busy != worker.current_task.is_some() {
                return Err(format!("{}: is_busy out of sync with current_task", worker.name));
            }
        }

        for request in state.requests.values() {
            let id = request.id;
            let holders = state
                .workers
                .values()
                .filter(|w| w.current_task == Some(id))
                .count();
            let queued: usize = state
                .workers
                .values()
                .map(|w| w.task_queue.iter().filter(|&&q| q == id).count())
                .sum();

            match request.status() {
                RequestStatus::Pending => {
                    if holders != 0 || queued > 1 {
                        return Err(format!(
                            "pending {id}: current on {holders} workers, queued {queued} times"
                        ));
                    }
                }
                RequestStatus::Ongoing => {
                    if holders != 1 || queued != 0 {
                        return Err(format!(
                            "ongoing {id}: current on {holders} workers, queued {queued} times"
                        ));
                    }
                }
                RequestStatus::Completed | RequestStatus::Cancelled => {
                    if holders != 0 || queued != 0 {
                        return Err(format!("terminal {id} still held by a worker"));
                    }
                }
            }
        }
        Ok(())
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Intake shared by the command API and the simulator: mint an id, register
/// the pending request, emit its creation events, and trigger a re-plan.
pub(crate) fn create_request_internal(
    shared: &Arc<Shared>,
    origin: NodeId,
    destination: NodeId,
    kind: TransportKind,
    urgent: bool,
) -> RequestId {
    let id = {
        let mut state = shared.lock();
        let id = RequestId(state.next_request_id);
        state.next_request_id += 1;

        let request = Request::new(id, origin, destination, kind, urgent, shared.clock.now());
        shared.emit(Event::TransportStatusUpdate {
            request: shared.request_summary(&request),
            status: RequestStatus::Pending,
        });
        shared.log(format!(
            "New transport request from {} to {} (type: {kind}, urgent: {urgent}).",
            shared.node_name(origin),
            shared.node_name(destination),
        ));

        state.requests.insert(id, request);
        state.bump_version();
        id
    };

    replan::schedule(shared);
    id
}

/// Cancel `request` (pending or ongoing) and emit the status event.
/// No-op when the request is already terminal.
pub(crate) fn cancel_request(shared: &Shared, state: &mut DispatchState, id: RequestId) {
    if let Some(request) = state.requests.get_mut(&id) {
        if request.status().is_terminal() {
            return;
        }
        if request.mark_cancelled().is_ok() {
            let summary = shared.request_summary(request);
            shared.emit(Event::TransportStatusUpdate {
                request: summary,
                status: RequestStatus::Cancelled,
            });
        }
    }
}

/// Emits `clock_tick` at the configured cadence until the engine is dropped.
async fn clock_loop(weak: Weak<Shared>) {
    loop {
        let interval = match weak.upgrade() {
            Some(shared) => {
                shared.emit(Event::ClockTick { sim_time: shared.clock.now() });
                shared.config.clock_tick_interval
            }
            None => return,
        };
        tokio::time::sleep(interval).await;
    }
}

// ── Snapshot types ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Serialize)]
pub struct TransporterInfo {
    pub name: String,
    pub current_location: String,
    pub status: WorkerState,
    pub workload: f64,
}

#[derive(Clone, Debug, Serialize)]
pub struct CorridorInfo {
    pub from: String,
    pub to: String,
    pub weight: f64,
}

#[derive(Clone, Debug, Serialize)]
pub struct GraphSnapshot {
    pub departments: Vec<String>,
    pub corridors: Vec<CorridorInfo>,
}

#[derive(Clone, Debug, Serialize)]
pub struct RequestInfo {
    pub id: RequestId,
    pub origin: String,
    pub destination: String,
    pub transport_type: TransportKind,
    pub urgent: bool,
    pub status: RequestStatus,
    pub assignee: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct RequestsSnapshot {
    pub pending: Vec<RequestInfo>,
    pub ongoing: Vec<RequestInfo>,
    pub completed: Vec<RequestInfo>,
    pub cancelled: Vec<RequestInfo>,
}
