//! Unit tests for ht-plan.

#[cfg(test)]
mod helpers {
    use ht_core::{RequestId, TransportKind};
    use ht_graph::{GraphBuilder, HospitalGraph};
    use ht_model::Request;

    use crate::WorkerView;

    /// A ─5─ B ─10─ C.
    pub fn line_graph() -> HospitalGraph {
        let mut b = GraphBuilder::new();
        b.add_department("A");
        b.add_department("B");
        b.add_department("C");
        b.add_corridor("A", "B", 5.0).unwrap();
        b.add_corridor("B", "C", 10.0).unwrap();
        b.build().unwrap()
    }

    pub fn worker(graph: &HospitalGraph, name: &str, at: &str) -> WorkerView {
        WorkerView { name: name.to_string(), node: graph.node_id(at).unwrap() }
    }

    pub fn request(graph: &HospitalGraph, id: u64, from: &str, to: &str, urgent: bool) -> Request {
        Request::new(
            RequestId(id),
            graph.node_id(from).unwrap(),
            graph.node_id(to).unwrap(),
            TransportKind::Stretcher,
            urgent,
            0.0,
        )
    }

    /// Every request appears in exactly one worker's list.
    pub fn assert_partition(plan: &crate::Plan, requests: &[Request]) {
        let mut seen = std::collections::HashSet::new();
        for list in plan.values() {
            for &id in list {
                assert!(seen.insert(id), "request {id} assigned twice");
            }
        }
        assert_eq!(seen.len(), requests.len(), "every request assigned exactly once");
        for r in requests {
            assert!(seen.contains(&r.id), "request {} missing from plan", r.id);
        }
    }
}

// ── Travel estimates ──────────────────────────────────────────────────────────

#[cfg(test)]
mod estimates {
    use crate::{AssignmentStrategy, IlpMode, IlpStrategy};

    #[test]
    fn estimate_is_approach_plus_carry() {
        let graph = super::helpers::line_graph();
        let strategy = IlpStrategy::new(IlpMode::Makespan);
        let worker = super::helpers::worker(&graph, "Anna", "A");

        // Approach A→B = 5, carry B→C = 10.
        let r = super::helpers::request(&graph, 1, "B", "C", false);
        assert_eq!(strategy.estimate_travel_time(&worker, &r, &graph), Some(15.0));

        // Worker already at the origin: approach 0, carry 15.
        let r2 = super::helpers::request(&graph, 2, "A", "C", false);
        assert_eq!(strategy.estimate_travel_time(&worker, &r2, &graph), Some(15.0));
    }
}

// ── Random strategy ───────────────────────────────────────────────────────────

#[cfg(test)]
mod random {
    use crate::{AssignmentStrategy, PlanError, RandomStrategy};

    #[test]
    fn seeded_runs_are_reproducible() {
        let graph = super::helpers::line_graph();
        let workers = vec![
            super::helpers::worker(&graph, "Anna", "A"),
            super::helpers::worker(&graph, "Ben", "B"),
            super::helpers::worker(&graph, "Cleo", "C"),
        ];
        let requests: Vec<_> = (0..12)
            .map(|i| super::helpers::request(&graph, i, "A", "C", i % 3 == 0))
            .collect();

        let plan_a = RandomStrategy::new(7).plan(&workers, &requests, &graph).unwrap();
        let plan_b = RandomStrategy::new(7).plan(&workers, &requests, &graph).unwrap();
        assert_eq!(plan_a, plan_b, "same seed, same stream, same plan");

        let plan_c = RandomStrategy::new(8).plan(&workers, &requests, &graph).unwrap();
        // Overwhelmingly likely to differ with 12 requests over 3 workers.
        assert_ne!(plan_a, plan_c, "different seed diverges");
    }

    #[test]
    fn assignment_is_a_partition() {
        let graph = super::helpers::line_graph();
        let workers = vec![
            super::helpers::worker(&graph, "Anna", "A"),
            super::helpers::worker(&graph, "Ben", "B"),
        ];
        let requests: Vec<_> = (0..9)
            .map(|i| super::helpers::request(&graph, i, "A", "B", false))
            .collect();

        let plan = RandomStrategy::new(1).plan(&workers, &requests, &graph).unwrap();
        super::helpers::assert_partition(&plan, &requests);
    }

    #[test]
    fn empty_requests_is_a_valid_empty_plan() {
        let graph = super::helpers::line_graph();
        let workers = vec![super::helpers::worker(&graph, "Anna", "A")];
        let plan = RandomStrategy::new(1).plan(&workers, &[], &graph).unwrap();
        assert_eq!(plan.len(), 1);
        assert!(plan["Anna"].is_empty());
    }

    #[test]
    fn no_workers_is_no_plan() {
        let graph = super::helpers::line_graph();
        let requests = vec![super::helpers::request(&graph, 1, "A", "B", false)];
        let err = RandomStrategy::new(1).plan(&[], &requests, &graph).unwrap_err();
        assert!(matches!(err, PlanError::NoWorkers));
    }
}

// ── ILP strategy ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod ilp {
    use crate::{AssignmentStrategy, IlpMode, IlpStrategy, PlanError};

    #[test]
    fn makespan_splits_work_across_two_workers() {
        // Two workers at A; requests A→C (est 15) and A→B (est 5).  Stacking
        // both on one worker gives makespan 20; splitting gives 15.
        let graph = super::helpers::line_graph();
        let workers = vec![
            super::helpers::worker(&graph, "Anna", "A"),
            super::helpers::worker(&graph, "Ben", "A"),
        ];
        let requests = vec![
            super::helpers::request(&graph, 1, "A", "C", false),
            super::helpers::request(&graph, 2, "A", "B", false),
        ];

        let plan = IlpStrategy::new(IlpMode::Makespan)
            .plan(&workers, &requests, &graph)
            .unwrap();

        super::helpers::assert_partition(&plan, &requests);
        assert_eq!(plan["Anna"].len(), 1, "one request per worker");
        assert_eq!(plan["Ben"].len(), 1, "one request per worker");
    }

    #[test]
    fn equal_workload_balances_identical_requests() {
        let graph = super::helpers::line_graph();
        let workers = vec![
            super::helpers::worker(&graph, "Anna", "A"),
            super::helpers::worker(&graph, "Ben", "A"),
        ];
        let requests = vec![
            super::helpers::request(&graph, 1, "A", "B", false),
            super::helpers::request(&graph, 2, "A", "B", false),
        ];

        let plan = IlpStrategy::new(IlpMode::EqualWorkload)
            .plan(&workers, &requests, &graph)
            .unwrap();

        super::helpers::assert_partition(&plan, &requests);
        assert_eq!(plan["Anna"].len(), 1);
        assert_eq!(plan["Ben"].len(), 1);
    }

    #[test]
    fn urgency_first_puts_the_urgent_request_at_the_head() {
        // Single worker, three requests, only the middle one urgent.  The
        // estimate ignores queue predecessors, so promoting the urgent
        // request cannot inflate its own estimate; it must lead the queue.
        let graph = super::helpers::line_graph();
        let workers = vec![super::helpers::worker(&graph, "Anna", "A")];
        let requests = vec![
            super::helpers::request(&graph, 1, "A", "B", false),
            super::helpers::request(&graph, 2, "B", "C", true),
            super::helpers::request(&graph, 3, "A", "C", false),
        ];

        let plan = IlpStrategy::new(IlpMode::UrgencyFirst)
            .plan(&workers, &requests, &graph)
            .unwrap();

        super::helpers::assert_partition(&plan, &requests);
        let queue = &plan["Anna"];
        assert_eq!(queue.len(), 3);
        assert_eq!(queue[0].0, 2, "urgent request leads the queue");
    }

    #[test]
    fn non_urgent_queues_order_by_estimate_then_id() {
        let graph = super::helpers::line_graph();
        let workers = vec![super::helpers::worker(&graph, "Anna", "A")];
        // est(A→C) = 15, est(A→B) = 5: the cheaper request sorts first.
        let requests = vec![
            super::helpers::request(&graph, 1, "A", "C", false),
            super::helpers::request(&graph, 2, "A", "B", false),
        ];

        let plan = IlpStrategy::new(IlpMode::Makespan)
            .plan(&workers, &requests, &graph)
            .unwrap();
        let queue = &plan["Anna"];
        assert_eq!(queue[0].0, 2, "estimate 5 before estimate 15");
        assert_eq!(queue[1].0, 1);
    }

    #[test]
    fn empty_requests_is_a_valid_empty_plan() {
        let graph = super::helpers::line_graph();
        let workers = vec![super::helpers::worker(&graph, "Anna", "A")];
        let plan = IlpStrategy::new(IlpMode::Makespan).plan(&workers, &[], &graph).unwrap();
        assert!(plan["Anna"].is_empty());
    }

    #[test]
    fn no_workers_is_no_plan() {
        let graph = super::helpers::line_graph();
        let requests = vec![super::helpers::request(&graph, 1, "A", "B", false)];
        let err = IlpStrategy::new(IlpMode::Makespan)
            .plan(&[], &requests, &graph)
            .unwrap_err();
        assert!(matches!(err, PlanError::NoWorkers));
    }

    #[test]
    fn urgency_mode_never_slows_urgent_service_versus_makespan() {
        // Stochastic-flavored check on a fixed input: the urgent request's
        // queue position under urgency-first is no later than under makespan.
        let graph = super::helpers::line_graph();
        let workers = vec![super::helpers::worker(&graph, "Anna", "A")];
        let requests = vec![
            super::helpers::request(&graph, 1, "A", "B", false),
            super::helpers::request(&graph, 2, "A", "C", true),
            super::helpers::request(&graph, 3, "B", "C", false),
        ];

        let position = |plan: &crate::Plan| {
            plan["Anna"].iter().position(|&id| id.0 == 2).unwrap()
        };

        let makespan_plan = IlpStrategy::new(IlpMode::Makespan)
            .plan(&workers, &requests, &graph)
            .unwrap();
        let urgency_plan = IlpStrategy::new(IlpMode::UrgencyFirst)
            .plan(&workers, &requests, &graph)
            .unwrap();

        assert!(position(&urgency_plan) <= position(&makespan_plan));
    }
}

// ── Strategy selection ────────────────────────────────────────────────────────

#[cfg(test)]
mod kind {
    use crate::{IlpMode, StrategyKind};

    #[test]
    fn parse_all_names() {
        assert_eq!("random".parse::<StrategyKind>().unwrap(), StrategyKind::Random);
        assert_eq!(
            "ilp:makespan".parse::<StrategyKind>().unwrap(),
            StrategyKind::Ilp(IlpMode::Makespan)
        );
        assert_eq!(
            "ilp:equal".parse::<StrategyKind>().unwrap(),
            StrategyKind::Ilp(IlpMode::EqualWorkload)
        );
        assert_eq!(
            "ilp:urgency".parse::<StrategyKind>().unwrap(),
            StrategyKind::Ilp(IlpMode::UrgencyFirst)
        );
    }

    #[test]
    fn display_roundtrips() {
        for kind in [
            StrategyKind::Random,
            StrategyKind::Ilp(IlpMode::Makespan),
            StrategyKind::Ilp(IlpMode::EqualWorkload),
            StrategyKind::Ilp(IlpMode::UrgencyFirst),
        ] {
            assert_eq!(kind.to_string().parse::<StrategyKind>().unwrap(), kind);
        }
    }

    #[test]
    fn parse_rejects_unknown() {
        assert!("ilp:fastest".parse::<StrategyKind>().is_err());
    }
}
