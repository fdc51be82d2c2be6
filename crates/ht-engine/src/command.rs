//! Transport-agnostic command surface.
//!
//! Front ends (HTTP routes, websocket handlers, CLIs) deserialize a
//! [`Command`] and hand it to [`Engine::execute`], which returns a
//! JSON-shaped reply: `{"ok": true, ...}` on success, the
//! [`ApiError`][crate::ApiError] wire shape on failure.  Typed callers use
//! the `Engine` methods directly; this layer only adapts.

use serde::Deserialize;
use serde_json::{json, Value};

use ht_core::{CoreError, RequestId, TransportKind};
use ht_plan::StrategyKind;

use crate::{ApiError, ApiResult, Engine};

/// Every inbound control operation.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    AddTransporter {
        name: String,
    },
    RemoveTransporter {
        name: String,
    },
    SetTransporterStatus {
        name: String,
        active: bool,
    },
    CreateRequest {
        origin: String,
        destination: String,
        #[serde(default)]
        transport_type: TransportKind,
        #[serde(default)]
        urgent: bool,
    },
    RemoveRequest {
        request: RequestId,
    },
    ReturnHome {
        name: String,
    },
    /// `random`, `ilp:makespan`, `ilp:equal`, or `ilp:urgency`.
    SetStrategy {
        strategy: String,
    },
    DeployPlan,
    ToggleSimulation {
        running: bool,
    },
    GetGraph,
    GetTransporters,
    GetRequests,
}

impl Engine {
    /// Execute a command, folding any error into the wire error shape.
    pub fn execute(&self, command: Command) -> Value {
        match self.dispatch(command) {
            Ok(reply) => reply,
            Err(error) => error.to_json(),
        }
    }

    fn dispatch(&self, command: Command) -> ApiResult<Value> {
        Ok(match command {
            Command::AddTransporter { name } => {
                let info = self.add_transporter(&name)?;
                json!({"ok": true, "name": info.name, "location": info.current_location})
            }
            Command::RemoveTransporter { name } => {
                self.remove_transporter(&name)?;
                ok_reply()
            }
            Command::SetTransporterStatus { name, active } => {
                self.set_transporter_status(&name, active)?;
                ok_reply()
            }
            Command::CreateRequest { origin, destination, transport_type, urgent } => {
                let id = self.create_request(&origin, &destination, transport_type, urgent)?;
                json!({"ok": true, "request": id})
            }
            Command::RemoveRequest { request } => {
                self.remove_request(request)?;
                ok_reply()
            }
            Command::ReturnHome { name } => {
                self.return_home(&name)?;
                ok_reply()
            }
            Command::SetStrategy { strategy } => {
                let kind: StrategyKind = strategy
                    .parse()
                    .map_err(|e: CoreError| ApiError::validation(e.to_string()))?;
                self.set_strategy(kind)?;
                ok_reply()
            }
            Command::DeployPlan => {
                self.deploy_plan()?;
                ok_reply()
            }
            Command::ToggleSimulation { running } => {
                self.toggle_simulation(running)?;
                ok_reply()
            }
            Command::GetGraph => snapshot_reply(self.get_graph())?,
            Command::GetTransporters => snapshot_reply(self.get_transporters())?,
            Command::GetRequests => snapshot_reply(self.get_requests())?,
        })
    }
}

fn ok_reply() -> Value {
    json!({"ok": true})
}

fn snapshot_reply<T: serde::Serialize>(snapshot: T) -> ApiResult<Value> {
    let data = serde_json::to_value(snapshot)
        .map_err(|e| ApiError::internal(format!("snapshot serialization failed: {e}")))?;
    Ok(json!({"ok": true, "data": data}))
}
