//! The outbound event vocabulary.
//!
//! Events serialize to JSON maps with a `type` tag, e.g.
//!
//! ```json
//! {"type":"workload_update","name":"Anna","workload":15.0}
//! ```
//!
//! Department references are carried as names (not `NodeId`s) so consumers
//! need no access to the graph's interning table.

use serde::Serialize;

use ht_core::{RequestId, TransportKind};
use ht_model::RequestStatus;

/// Worker state as shown to consumers.  Folds the shift substate into the
/// status dimension: a resting worker reports `resting` even though it is
/// still `active` for planning purposes.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerState {
    Active,
    Inactive,
    Resting,
}

/// Request fields echoed inside transport events.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RequestSummary {
    pub id: RequestId,
    pub origin: String,
    pub destination: String,
    pub transport_type: TransportKind,
    pub urgent: bool,
}

/// Everything the engine pushes outward.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A worker is moving.  Emitted once per `move_to` with the full
    /// remaining path and per-leg durations (so a UI can animate ahead),
    /// then once per traversed edge with the single reached node.
    TransporterUpdate {
        name: String,
        path: Vec<String>,
        durations: Vec<f64>,
    },

    TransporterStatusUpdate {
        name: String,
        status: WorkerState,
    },

    WorkloadUpdate {
        name: String,
        workload: f64,
    },

    TransportStatusUpdate {
        request: RequestSummary,
        status: RequestStatus,
    },

    TransportCompleted {
        transporter: String,
        origin: String,
        destination: String,
    },

    TransportLog {
        message: String,
    },

    NewTransporter {
        name: String,
        location: String,
    },

    ClockTick {
        sim_time: f64,
    },

    SimulationEvent {
        kind: String,
        origin: String,
        destination: String,
        transport_type: TransportKind,
        urgent: bool,
    },
}

impl Event {
    /// Convenience constructor for the most common event.
    pub fn log(message: impl Into<String>) -> Self {
        Event::TransportLog { message: message.into() }
    }

    /// Serialize to a JSON string.  Infallible in practice; any serializer
    /// error degrades to a log-shaped fallback rather than propagating.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!("{{\"type\":\"transport_log\",\"message\":\"unserializable event: {e}\"}}")
        })
    }
}
