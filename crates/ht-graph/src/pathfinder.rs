//! Shortest-path queries over the hospital graph.
//!
//! # Algorithm
//!
//! Standard Dijkstra with a binary min-heap keyed on
//! `(distance_ms, lexicographic name rank, node)`.  The rank component makes
//! tie-breaking deterministic: among equal-distance frontier nodes, the one
//! whose department name sorts first is settled first, so repeated queries
//! on the same graph always return the same path.
//!
//! # No-path is not an error
//!
//! [`shortest_path`] returns `Option<Route>`.  `None` means the destination
//! is unreachable, which callers treat as a planning failure for that pair
//! rather than a fault.  (The builder guarantees a connected graph, so
//! `None` only occurs for ids from a different graph or after future
//! directed extensions.)

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ht_core::NodeId;

use crate::HospitalGraph;

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of a routing query: the node sequence from source to
/// destination inclusive, per-leg traversal times, and the total.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Nodes visited in order.  Always non-empty; `nodes[0]` is the source.
    pub nodes: Vec<NodeId>,
    /// Traversal time in seconds of each consecutive edge.
    /// `leg_secs.len() == nodes.len() - 1`.
    pub leg_secs: Vec<f64>,
    /// Sum of `leg_secs`.
    pub total_secs: f64,
}

impl Route {
    /// `true` if the source and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Consecutive `(from, to, secs)` legs of the route.
    pub fn legs(&self) -> impl Iterator<Item = (NodeId, NodeId, f64)> + '_ {
        self.nodes
            .windows(2)
            .zip(self.leg_secs.iter())
            .map(|(pair, &secs)| (pair[0], pair[1], secs))
    }
}

// ── Dijkstra ──────────────────────────────────────────────────────────────────

/// Compute the shortest route from `from` to `to`.
///
/// `from == to` returns the single-node route with weight 0.  Returns
/// `None` when no path exists.
pub fn shortest_path(graph: &HospitalGraph, from: NodeId, to: NodeId) -> Option<Route> {
    if from.index() >= graph.node_count() || to.index() >= graph.node_count() {
        return None;
    }
    if from == to {
        return Some(Route { nodes: vec![from], leg_secs: vec![], total_secs: 0.0 });
    }

    let n = graph.node_count();
    // dist[v] = best known cost (ms) to reach v.
    let mut dist = vec![u64::MAX; n];
    // prev[v] = node that reached v; INVALID for unreached nodes.
    let mut prev = vec![NodeId::INVALID; n];

    dist[from.index()] = 0;

    // Min-heap: (cost, lex rank, node). Reverse makes BinaryHeap behave as a
    // min-heap; the rank key settles equal-cost nodes in name order.
    let mut heap: BinaryHeap<Reverse<(u64, u32, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((0, graph.lex_rank(from), from)));

    while let Some(Reverse((cost, _, node))) = heap.pop() {
        if node == to {
            return Some(reconstruct(graph, &prev, from, to, cost));
        }

        // Skip stale heap entries.
        if cost > dist[node.index()] {
            continue;
        }

        for (neighbor, weight_ms) in graph.neighbors_ms(node) {
            let new_cost = cost.saturating_add(weight_ms);
            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev[neighbor.index()] = node;
                heap.push(Reverse((new_cost, graph.lex_rank(neighbor), neighbor)));
            }
        }
    }

    None
}

fn reconstruct(
    graph: &HospitalGraph,
    prev: &[NodeId],
    from: NodeId,
    to: NodeId,
    total_ms: u64,
) -> Route {
    let mut nodes = vec![to];
    let mut cur = to;
    while cur != from {
        cur = prev[cur.index()];
        nodes.push(cur);
    }
    nodes.reverse();

    let leg_secs: Vec<f64> = nodes
        .windows(2)
        .map(|pair| {
            // Edge must exist: it was just relaxed.
            graph.edge_weight(pair[0], pair[1]).unwrap_or(0.0)
        })
        .collect();

    Route {
        nodes,
        leg_secs,
        total_secs: total_ms as f64 / 1000.0,
    }
}
