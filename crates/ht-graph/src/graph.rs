//! Hospital graph representation and builder.
//!
//! # Data layout
//!
//! Department names are interned to dense `NodeId`s at build time; all hot
//! paths index by id and the name table maps back for display and API
//! responses.  Adjacency uses **Compressed Sparse Row (CSR)** format: given
//! a `NodeId n`, its outgoing edges occupy the slice
//!
//! ```text
//! edge_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! so iteration over a node's neighbors is a contiguous memory scan — ideal
//! for Dijkstra's inner loop.  Corridors are undirected: the builder stores
//! one directed edge per direction.
//!
//! # Cost units
//!
//! Corridor weights are positive seconds (`f64`) at the API boundary and
//! integer **milliseconds** (`u64`) internally, so shortest-path costs are
//! totally ordered and deterministic.
//!
//! # Mutability
//!
//! The graph is mutated only by [`GraphBuilder`] before engine startup and
//! is read-only thereafter.  [`GraphBuilder::build`] validates the
//! connectivity invariant: every department reachable from every other.

use std::collections::HashMap;

use ht_core::NodeId;

use crate::{GraphError, GraphResult};

// ── HospitalGraph ─────────────────────────────────────────────────────────────

/// Frozen undirected department graph in CSR format.
///
/// Do not construct directly; use [`GraphBuilder`].
#[derive(Debug)]
pub struct HospitalGraph {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Department name of each node.  Indexed by `NodeId`.
    names: Vec<String>,

    /// Name → id lookup for API calls that arrive with department names.
    name_index: HashMap<String, NodeId>,

    /// Rank of each node's name in lexicographic order.  Dijkstra's heap
    /// breaks distance ties toward the lower rank.
    lex_rank: Vec<u32>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// CSR row pointer.  Outgoing edges of node `n` are at positions
    /// `node_out_start[n] .. node_out_start[n+1]`.  Length = node count + 1.
    node_out_start: Vec<u32>,

    /// Destination node of each directed edge.
    edge_to: Vec<NodeId>,

    /// Traversal time of each directed edge in milliseconds.
    edge_weight_ms: Vec<u64>,
}

impl HospitalGraph {
    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.names.len()
    }

    /// Number of *directed* edges (two per corridor).
    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    // ── Name interning ────────────────────────────────────────────────────

    /// Resolve a department name to its `NodeId`.
    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.name_index.get(name).copied()
    }

    /// Like [`node_id`](Self::node_id) but with a typed error for API paths.
    pub fn require_node(&self, name: &str) -> GraphResult<NodeId> {
        self.node_id(name)
            .ok_or_else(|| GraphError::UnknownDepartment(name.to_string()))
    }

    /// Department name of `node`.
    ///
    /// # Panics
    /// Panics if `node` was not produced by this graph's builder.
    #[inline]
    pub fn node_name(&self, node: NodeId) -> &str {
        &self.names[node.index()]
    }

    /// All department names in insertion order.
    pub fn departments(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// All `NodeId`s in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> {
        (0..self.names.len()).map(|i| NodeId(i as u32))
    }

    #[inline]
    pub(crate) fn lex_rank(&self, node: NodeId) -> u32 {
        self.lex_rank[node.index()]
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over `(neighbor, weight_secs)` for all corridors out of `node`.
    #[inline]
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = (NodeId, f64)> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| (self.edge_to[i], self.edge_weight_ms[i] as f64 / 1000.0))
    }

    /// Millisecond-cost neighbor iterator for the pathfinder's inner loop.
    #[inline]
    pub(crate) fn neighbors_ms(&self, node: NodeId) -> impl Iterator<Item = (NodeId, u64)> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| (self.edge_to[i], self.edge_weight_ms[i]))
    }

    /// Weight in seconds of the corridor `u ↔ v`, or `None` if absent.
    pub fn edge_weight(&self, u: NodeId, v: NodeId) -> Option<f64> {
        self.neighbors(u).find(|&(n, _)| n == v).map(|(_, w)| w)
    }

    /// All corridors as `(from, to, weight_secs)` name triples, each
    /// undirected corridor reported once (lower id first).  Used by graph
    /// snapshots served to front ends.
    pub fn corridors(&self) -> Vec<(String, String, f64)> {
        let mut out = Vec::with_capacity(self.edge_count() / 2);
        for u in self.nodes() {
            for (v, w) in self.neighbors(u) {
                if u < v {
                    out.push((self.node_name(u).to_string(), self.node_name(v).to_string(), w));
                }
            }
        }
        out
    }
}

// ── GraphBuilder ──────────────────────────────────────────────────────────────

/// Construct a [`HospitalGraph`] incrementally, then call [`build`](Self::build).
///
/// The builder accepts departments and corridors in any order; corridors may
/// only reference departments added earlier.  `build()` sorts edges by
/// source node, constructs the CSR arrays, and verifies connectivity.
///
/// # Example
///
/// ```
/// use ht_graph::GraphBuilder;
///
/// let mut b = GraphBuilder::new();
/// b.add_department("Emergency");
/// b.add_department("ICU");
/// b.add_corridor("Emergency", "ICU", 5.0).unwrap();
/// let graph = b.build().unwrap();
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 2); // bidirectional
/// ```
#[derive(Default)]
pub struct GraphBuilder {
    names: Vec<String>,
    name_index: HashMap<String, NodeId>,
    raw_edges: Vec<RawEdge>,
}

struct RawEdge {
    from: NodeId,
    to: NodeId,
    weight_ms: u64,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a department and return its `NodeId` (sequential from 0).
    ///
    /// Adding a name twice is idempotent and returns the existing id.
    pub fn add_department(&mut self, name: &str) -> NodeId {
        if let Some(&id) = self.name_index.get(name) {
            return id;
        }
        let id = NodeId(self.names.len() as u32);
        self.names.push(name.to_string());
        self.name_index.insert(name.to_string(), id);
        id
    }

    /// Add an undirected corridor between two existing departments.
    ///
    /// `weight_secs` is the traversal time in seconds and must be positive.
    pub fn add_corridor(&mut self, from: &str, to: &str, weight_secs: f64) -> GraphResult<()> {
        let u = *self
            .name_index
            .get(from)
            .ok_or_else(|| GraphError::UnknownDepartment(from.to_string()))?;
        let v = *self
            .name_index
            .get(to)
            .ok_or_else(|| GraphError::UnknownDepartment(to.to_string()))?;
        if !(weight_secs.is_finite() && weight_secs > 0.0) {
            return Err(GraphError::NonPositiveWeight {
                from: from.to_string(),
                to: to.to_string(),
                weight: weight_secs,
            });
        }
        let weight_ms = (weight_secs * 1000.0).round() as u64;
        self.raw_edges.push(RawEdge { from: u, to: v, weight_ms });
        self.raw_edges.push(RawEdge { from: v, to: u, weight_ms });
        Ok(())
    }

    pub fn node_count(&self) -> usize {
        self.names.len()
    }

    /// Consume the builder and produce a validated [`HospitalGraph`].
    ///
    /// Returns [`GraphError::Disconnected`] if any department is unreachable
    /// from the first one added.  Graphs with fewer than two departments are
    /// trivially connected.
    pub fn build(self) -> GraphResult<HospitalGraph> {
        let node_count = self.names.len();
        let edge_count = self.raw_edges.len();

        // Sort edges by source node for CSR construction.
        let mut raw = self.raw_edges;
        raw.sort_unstable_by_key(|e| e.from.0);

        let edge_to: Vec<NodeId> = raw.iter().map(|e| e.to).collect();
        let edge_weight_ms: Vec<u64> = raw.iter().map(|e| e.weight_ms).collect();

        // Build CSR row pointer (node_out_start).
        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        // Lexicographic rank of each name, for deterministic Dijkstra ties.
        let mut by_name: Vec<usize> = (0..node_count).collect();
        by_name.sort_unstable_by(|&a, &b| self.names[a].cmp(&self.names[b]));
        let mut lex_rank = vec![0u32; node_count];
        for (rank, &node) in by_name.iter().enumerate() {
            lex_rank[node] = rank as u32;
        }

        let graph = HospitalGraph {
            names: self.names,
            name_index: self.name_index,
            lex_rank,
            node_out_start,
            edge_to,
            edge_weight_ms,
        };

        // Connectivity invariant: BFS from node 0 must reach every node.
        if node_count > 1 {
            let mut seen = vec![false; node_count];
            let mut stack = vec![NodeId(0)];
            seen[0] = true;
            while let Some(u) = stack.pop() {
                for (v, _) in graph.neighbors(u) {
                    if !seen[v.index()] {
                        seen[v.index()] = true;
                        stack.push(v);
                    }
                }
            }
            if let Some(unreached) = seen.iter().position(|&s| !s) {
                return Err(GraphError::Disconnected(
                    graph.names[unreached].clone(),
                    graph.names[0].clone(),
                ));
            }
        }

        Ok(graph)
    }
}
