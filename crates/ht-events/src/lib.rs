//! `ht-events` — typed outbound events and sinks.
//!
//! The engine never talks to a transport (websocket, log file, test buffer)
//! directly; it emits [`Event`]s into an [`EventSink`].  Sinks are
//! fire-and-forget: delivery failure is logged via `tracing` and never
//! propagates back into the dispatcher.
//!
//! # Crate layout
//!
//! | Module    | Contents                                               |
//! |-----------|--------------------------------------------------------|
//! | [`event`] | `Event` (serde-tagged), `RequestSummary`, `WorkerState`|
//! | [`sink`]  | `EventSink` trait, `NoopSink`, `ChannelSink`, `CollectSink` |

pub mod event;
pub mod sink;


pub use event::{Event, RequestSummary, WorkerState};
pub use sink::{ChannelSink, CollectSink, EventSink, NoopSink};
