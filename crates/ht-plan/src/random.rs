//! Randomized baseline strategy.

use std::sync::Mutex;

use ht_core::SimRng;
use ht_graph::HospitalGraph;
use ht_model::Request;

use crate::{AssignmentStrategy, Plan, PlanError, PlanResult, WorkerView};

/// Uniform random assignment: each request, in input order, goes to a
/// uniformly chosen worker and is appended to that worker's list.
///
/// Used as the comparison baseline and for stress/perturbation runs.  The
/// RNG is seeded, so a fixed seed and a fixed request stream reproduce the
/// exact same assignment.
pub struct RandomStrategy {
    rng: Mutex<SimRng>,
}

impl RandomStrategy {
    pub fn new(seed: u64) -> Self {
        Self { rng: Mutex::new(SimRng::new(seed)) }
    }
}

impl AssignmentStrategy for RandomStrategy {
    fn plan(
        &self,
        workers: &[WorkerView],
        requests: &[Request],
        _graph: &HospitalGraph,
    ) -> PlanResult<Plan> {
        let mut plan: Plan = workers.iter().map(|w| (w.name.clone(), Vec::new())).collect();

        if requests.is_empty() {
            return Ok(plan);
        }
        if workers.is_empty() {
            return Err(PlanError::NoWorkers);
        }

        let mut rng = self.rng.lock().expect("random strategy rng poisoned");
        for request in requests {
            let pick = rng.gen_range(0..workers.len());
            plan.get_mut(&workers[pick].name)
                .expect("plan pre-seeded with every worker")
                .push(request.id);
        }
        Ok(plan)
    }
}
