//! `ht-graph` — hospital department graph and shortest-path routing.
//!
//! # Crate layout
//!
//! | Module         | Contents                                             |
//! |----------------|------------------------------------------------------|
//! | [`graph`]      | `HospitalGraph` (interned names + CSR), `GraphBuilder` |
//! | [`pathfinder`] | `shortest_path` (Dijkstra), `Route`                  |
//! | [`error`]      | `GraphError`, `GraphResult<T>`                       |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                      |
//! |---------|-------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.          |

pub mod error;
pub mod graph;
pub mod pathfinder;

#[cfg(test)]
mod tests;

pub use error::{GraphError, GraphResult};
pub use graph::{GraphBuilder, HospitalGraph};
pub use pathfinder::{shortest_path, Route};
