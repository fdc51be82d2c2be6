//! `ht-engine` — the online assignment and execution engine.
//!
//! An [`Engine`] owns one hospital's worth of state: the frozen department
//! graph, the worker registry, the request registry, and the active
//! assignment strategy.  External callers issue commands (add a worker,
//! create a request, switch strategy, toggle the simulator); any mutation
//! that could change the optimal plan schedules a re-plan, whose result the
//! executor applies to the live fleet without disturbing in-flight work.
//!
//! # Crate layout
//!
//! | Module        | Contents                                            |
//! |---------------|-----------------------------------------------------|
//! | [`config`]    | `EngineConfig`, `RequestSpec`, default hospital     |
//! | [`engine`]    | `Engine`, intake commands, snapshots                |
//! | [`executor`]  | Plan application (preserves in-flight tasks)        |
//! | [`movement`]  | Per-worker movement loop, rest cycle, decay         |
//! | [`replan`]    | Re-plan coalescing gate, snapshot/solve/apply       |
//! | [`simulator`] | Synthetic request generator                         |
//! | [`command`]   | Serde `Command` surface over the typed API          |
//! | [`error`]     | `ApiError` (`{ok:false, kind, message}` shape)      |
//!
//! # Concurrency model
//!
//! One `std::sync::Mutex` (the *dispatcher lock*) guards all mutable state;
//! critical sections are short and never span an `.await`.  Each worker's
//! movement loop is an independent tokio task that sleeps per edge and
//! re-acquires the lock at every edge boundary, so deactivating or removing
//! a worker takes effect at the next boundary.  ILP solves run on blocking
//! threads against immutable snapshots; a version counter rejects plans
//! whose snapshot predates a committed mutation.

pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod executor;
pub mod movement;
pub mod replan;
pub mod simulator;


pub use command::Command;
pub use config::{EngineConfig, RequestSpec};
pub use engine::{
    CorridorInfo, Engine, GraphSnapshot, RequestInfo, RequestsSnapshot, TransporterInfo,
};
pub use error::{ApiError, ApiErrorKind, ApiResult};
