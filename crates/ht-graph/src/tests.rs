//! Unit tests for ht-graph.
//!
//! All tests use small hand-crafted layouts so shortest paths can be
//! asserted exactly.

#[cfg(test)]
mod helpers {
    use crate::{GraphBuilder, HospitalGraph};

    /// The three-node line from the dispatch scenarios: A ─5─ B ─10─ C.
    pub fn line_graph() -> HospitalGraph {
        let mut b = GraphBuilder::new();
        b.add_department("A");
        b.add_department("B");
        b.add_department("C");
        b.add_corridor("A", "B", 5.0).unwrap();
        b.add_corridor("B", "C", 10.0).unwrap();
        b.build().unwrap()
    }

    /// A diamond with two equal-cost paths Source → Target:
    ///
    ///   Source ─1─ Alpha ─1─ Target
    ///   Source ─1─ Beta  ─1─ Target
    ///
    /// Lexicographic tie-breaking must pick the Alpha branch.
    pub fn diamond_graph() -> HospitalGraph {
        let mut b = GraphBuilder::new();
        for name in ["Source", "Beta", "Alpha", "Target"] {
            b.add_department(name);
        }
        b.add_corridor("Source", "Alpha", 1.0).unwrap();
        b.add_corridor("Source", "Beta", 1.0).unwrap();
        b.add_corridor("Alpha", "Target", 1.0).unwrap();
        b.add_corridor("Beta", "Target", 1.0).unwrap();
        b.build().unwrap()
    }
}

// ── Builder & graph structure ─────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use crate::{GraphBuilder, GraphError};

    #[test]
    fn empty_build() {
        let graph = GraphBuilder::new().build().unwrap();
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.is_empty());
    }

    #[test]
    fn add_department_is_idempotent() {
        let mut b = GraphBuilder::new();
        let first = b.add_department("ICU");
        let second = b.add_department("ICU");
        assert_eq!(first, second);
        assert_eq!(b.node_count(), 1);
    }

    #[test]
    fn corridors_are_bidirectional() {
        let graph = super::helpers::line_graph();
        let a = graph.node_id("A").unwrap();
        let b = graph.node_id("B").unwrap();
        assert_eq!(graph.edge_weight(a, b), Some(5.0));
        assert_eq!(graph.edge_weight(b, a), Some(5.0));
        assert_eq!(graph.edge_count(), 4);
    }

    #[test]
    fn corridor_to_unknown_department_fails() {
        let mut b = GraphBuilder::new();
        b.add_department("A");
        let err = b.add_corridor("A", "Nowhere", 3.0).unwrap_err();
        assert!(matches!(err, GraphError::UnknownDepartment(name) if name == "Nowhere"));
    }

    #[test]
    fn non_positive_weight_rejected() {
        let mut b = GraphBuilder::new();
        b.add_department("A");
        b.add_department("B");
        assert!(matches!(
            b.add_corridor("A", "B", 0.0),
            Err(GraphError::NonPositiveWeight { .. })
        ));
        assert!(matches!(
            b.add_corridor("A", "B", -2.0),
            Err(GraphError::NonPositiveWeight { .. })
        ));
    }

    #[test]
    fn disconnected_graph_rejected() {
        let mut b = GraphBuilder::new();
        b.add_department("A");
        b.add_department("B");
        b.add_department("Island");
        b.add_corridor("A", "B", 1.0).unwrap();
        let err = b.build().unwrap_err();
        assert!(matches!(err, GraphError::Disconnected(name, _) if name == "Island"));
    }

    #[test]
    fn missing_edge_weight_is_none() {
        let graph = super::helpers::line_graph();
        let a = graph.node_id("A").unwrap();
        let c = graph.node_id("C").unwrap();
        assert_eq!(graph.edge_weight(a, c), None);
    }

    #[test]
    fn corridors_snapshot_lists_each_once() {
        let graph = super::helpers::line_graph();
        let corridors = graph.corridors();
        assert_eq!(corridors.len(), 2);
        assert!(corridors.contains(&("A".to_string(), "B".to_string(), 5.0)));
        assert!(corridors.contains(&("B".to_string(), "C".to_string(), 10.0)));
    }
}

// ── Dijkstra routing ──────────────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use crate::shortest_path;

    #[test]
    fn trivial_same_node() {
        let graph = super::helpers::line_graph();
        let a = graph.node_id("A").unwrap();
        let route = shortest_path(&graph, a, a).unwrap();
        assert!(route.is_trivial());
        assert_eq!(route.total_secs, 0.0);
        assert_eq!(route.nodes, vec![a]);
    }

    #[test]
    fn line_path_and_weights() {
        let graph = super::helpers::line_graph();
        let a = graph.node_id("A").unwrap();
        let b = graph.node_id("B").unwrap();
        let c = graph.node_id("C").unwrap();

        let route = shortest_path(&graph, a, c).unwrap();
        assert_eq!(route.nodes, vec![a, b, c]);
        assert_eq!(route.leg_secs, vec![5.0, 10.0]);
        assert_eq!(route.total_secs, 15.0);
    }

    #[test]
    fn total_equals_leg_sum() {
        let graph = super::helpers::diamond_graph();
        let src = graph.node_id("Source").unwrap();
        let dst = graph.node_id("Target").unwrap();
        let route = shortest_path(&graph, src, dst).unwrap();
        let sum: f64 = route.leg_secs.iter().sum();
        assert!((sum - route.total_secs).abs() < 1e-9);
    }

    #[test]
    fn equal_cost_tie_breaks_lexicographically() {
        let graph = super::helpers::diamond_graph();
        let src = graph.node_id("Source").unwrap();
        let dst = graph.node_id("Target").unwrap();
        let alpha = graph.node_id("Alpha").unwrap();

        let route = shortest_path(&graph, src, dst).unwrap();
        assert_eq!(route.nodes, vec![src, alpha, dst], "Alpha sorts before Beta");
    }

    #[test]
    fn optimality_against_exhaustive_search() {
        // Small dense-ish graph; compare Dijkstra's total against the best
        // of all simple paths found by DFS.
        let mut b = crate::GraphBuilder::new();
        for name in ["P", "Q", "R", "S", "T"] {
            b.add_department(name);
        }
        b.add_corridor("P", "Q", 2.0).unwrap();
        b.add_corridor("Q", "R", 2.0).unwrap();
        b.add_corridor("R", "S", 2.0).unwrap();
        b.add_corridor("S", "T", 2.0).unwrap();
        b.add_corridor("P", "R", 5.0).unwrap();
        b.add_corridor("Q", "T", 9.0).unwrap();
        let graph = b.build().unwrap();

        fn dfs_best(
            graph: &crate::HospitalGraph,
            cur: ht_core::NodeId,
            dst: ht_core::NodeId,
            visited: &mut Vec<ht_core::NodeId>,
            cost: f64,
            best: &mut f64,
        ) {
            if cur == dst {
                *best = best.min(cost);
                return;
            }
            for (next, w) in graph.neighbors(cur) {
                if !visited.contains(&next) {
                    visited.push(next);
                    dfs_best(graph, next, dst, visited, cost + w, best);
                    visited.pop();
                }
            }
        }

        for src in graph.nodes() {
            for dst in graph.nodes() {
                let route = shortest_path(&graph, src, dst).unwrap();
                let mut best = f64::INFINITY;
                let mut visited = vec![src];
                dfs_best(&graph, src, dst, &mut visited, 0.0, &mut best);
                if src == dst {
                    assert_eq!(route.total_secs, 0.0);
                } else {
                    assert!(
                        (route.total_secs - best).abs() < 1e-9,
                        "suboptimal {src} -> {dst}: got {}, best {best}",
                        route.total_secs
                    );
                }
            }
        }
    }

    #[test]
    fn legs_iterator_matches_nodes() {
        let graph = super::helpers::line_graph();
        let a = graph.node_id("A").unwrap();
        let c = graph.node_id("C").unwrap();
        let route = shortest_path(&graph, a, c).unwrap();
        let legs: Vec<_> = route.legs().collect();
        assert_eq!(legs.len(), 2);
        assert_eq!(legs[0].2, 5.0);
        assert_eq!(legs[1].2, 10.0);
    }
}
