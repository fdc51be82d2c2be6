//! `ht-model` — transport requests and transporter state.
//!
//! # Crate layout
//!
//! | Module          | Contents                                           |
//! |-----------------|----------------------------------------------------|
//! | [`request`]     | `Request`, `RequestStatus` lifecycle state machine |
//! | [`transporter`] | `Transporter`, `TransporterStatus`                 |
//! | [`shift`]       | `ShiftManager` rest threshold/duration tracking    |
//! | [`error`]       | `ModelError`, `ModelResult<T>`                     |
//!
//! # Ownership
//!
//! Request state lives in exactly one place: the engine's request registry.
//! Transporter queues hold `RequestId`s, never request copies, so a status
//! transition is visible everywhere at once and the "each non-terminal
//! request is held in at most one place" invariant can be checked by a
//! single scan.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                    |
//! |---------|-----------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.        |

pub mod error;
pub mod request;
pub mod shift;
pub mod transporter;

#[cfg(test)]
mod tests;

pub use error::{ModelError, ModelResult};
pub use request::{Request, RequestStatus};
pub use shift::ShiftManager;
pub use transporter::{Transporter, TransporterStatus};
