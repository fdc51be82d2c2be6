//! `ht-core` — foundational types for the hospital transport dispatcher.
//!
//! This crate is a dependency of every other `ht-*` crate.  It intentionally
//! has no `ht-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module        | Contents                                            |
//! |---------------|-----------------------------------------------------|
//! | [`ids`]       | `NodeId`, `RequestId`                               |
//! | [`clock`]     | `SimClock` — speed-factored monotonic sim time      |
//! | [`rng`]       | `SimRng` — seeded deterministic RNG                 |
//! | [`transport`] | `TransportKind` enum                                |
//! | [`error`]     | `CoreError`, `CoreResult`                           |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                    |
//! |---------|-----------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.       |
//!           | Required by `ht-events`.                                  |

pub mod clock;
pub mod error;
pub mod ids;
pub mod rng;
pub mod transport;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use clock::SimClock;
pub use error::{CoreError, CoreResult};
pub use ids::{NodeId, RequestId};
pub use rng::SimRng;
pub use transport::TransportKind;
