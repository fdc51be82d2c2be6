//! Engine configuration.

use std::time::Duration;

use ht_core::TransportKind;
use ht_plan::{IlpMode, StrategyKind};

/// One pre-seeded transport request.
#[derive(Clone, Debug)]
pub struct RequestSpec {
    pub origin: String,
    pub destination: String,
    pub kind: TransportKind,
    pub urgent: bool,
}

/// Startup configuration for an [`Engine`][crate::Engine].
///
/// All fields are plain data; [`Engine::new`][crate::Engine::new] validates
/// them (graph connectivity, rest node existence) and freezes the graph.
/// `Default` yields the standard hospital layout with no initial fleet.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Simulated seconds per real second.  Fixed for the engine's lifetime.
    pub speed_factor: f64,

    /// Real-time cadence of `clock_tick` events.
    pub clock_tick_interval: Duration,

    /// Settle time before each re-plan solve, letting bursts of triggers
    /// coalesce into one run.  Zero disables settling.
    pub replan_settle: Duration,

    /// Wall-clock budget for one ILP solve.  `None` = unbounded.
    pub solver_timeout: Option<Duration>,

    /// Default rest threshold (cumulative workload) for new workers.
    pub rest_threshold: f64,

    /// Default rest length in simulated seconds for new workers.
    pub rest_duration_secs: f64,

    /// Where workers start, return home to, and rest.
    pub rest_node: String,

    /// Department list.  Must contain `rest_node`.
    pub departments: Vec<String>,

    /// Corridors as `(from, to, weight_secs)`; weights are positive seconds.
    pub corridors: Vec<(String, String, f64)>,

    /// Real-time interval between synthetic requests while the simulator runs.
    pub sim_interval: Duration,

    /// Master RNG seed (random strategy and simulator derive children).
    pub seed: u64,

    /// The strategy installed at startup.
    pub strategy: StrategyKind,

    /// Workers registered during [`Engine::start`][crate::Engine::start].
    pub initial_transporters: Vec<String>,

    /// Requests created during [`Engine::start`][crate::Engine::start].
    pub initial_requests: Vec<RequestSpec>,
}

impl EngineConfig {
    pub const DEFAULT_REST_NODE: &'static str = "Transporter Lounge";

    /// The hand-authored hospital layout: 15 departments, 17 corridors,
    /// connected, with the lounge two seconds off Reception.
    pub fn default_hospital() -> Self {
        let departments = [
            "Emergency",
            "ICU",
            "Surgery",
            "Radiology",
            "Reception",
            "Pediatrics",
            "Orthopedics",
            "Cardiology",
            "Neurology",
            "Pharmacy",
            "Laboratory",
            "General Ward",
            "Cafeteria",
            "Admin Office",
            Self::DEFAULT_REST_NODE,
        ]
        .into_iter()
        .map(str::to_string)
        .collect();

        let corridors = [
            ("Emergency", "ICU", 5.0),
            ("ICU", "Surgery", 10.0),
            ("Surgery", "Radiology", 7.0),
            ("Emergency", "Reception", 3.0),
            ("Reception", "Pediatrics", 4.0),
            ("Pediatrics", "Orthopedics", 6.0),
            ("Orthopedics", "Cardiology", 8.0),
            ("Cardiology", "Neurology", 9.0),
            ("Neurology", "Pharmacy", 5.0),
            ("Pharmacy", "Laboratory", 4.0),
            ("Laboratory", "General Ward", 6.0),
            ("General Ward", "Cafeteria", 7.0),
            ("Cafeteria", "Admin Office", 5.0),
            ("Admin Office", "Reception", 6.0),
            ("Surgery", "General Ward", 8.0),
            ("Radiology", "Neurology", 7.0),
            (Self::DEFAULT_REST_NODE, "Reception", 2.0),
        ]
        .into_iter()
        .map(|(a, b, w)| (a.to_string(), b.to_string(), w))
        .collect();

        Self {
            speed_factor: 10.0,
            clock_tick_interval: Duration::from_millis(100),
            replan_settle: Duration::ZERO,
            solver_timeout: None,
            rest_threshold: 40.0,
            rest_duration_secs: 30.0,
            rest_node: Self::DEFAULT_REST_NODE.to_string(),
            departments,
            corridors,
            sim_interval: Duration::from_secs(10),
            seed: 42,
            strategy: StrategyKind::Ilp(IlpMode::Makespan),
            initial_transporters: Vec::new(),
            initial_requests: Vec::new(),
        }
    }

    /// Replace the layout with a custom department/corridor set.
    ///
    /// `rest_node` must name one of the departments.
    pub fn with_layout(
        mut self,
        departments: Vec<String>,
        corridors: Vec<(String, String, f64)>,
        rest_node: &str,
    ) -> Self {
        self.departments = departments;
        self.corridors = corridors;
        self.rest_node = rest_node.to_string();
        self
    }

    pub fn with_speed_factor(mut self, speed_factor: f64) -> Self {
        self.speed_factor = speed_factor;
        self
    }

    pub fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_rest_rules(mut self, threshold: f64, duration_secs: f64) -> Self {
        self.rest_threshold = threshold;
        self.rest_duration_secs = duration_secs;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::default_hospital()
    }
}
