//! ILP assignment optimizer.
//!
//! # Model
//!
//! Binary decision variables per (worker `t`, request `r`):
//!
//! - `x[t][r]` — worker `t` serves request `r`.
//! - `o[t][r1][r2]` for `r1 ≠ r2` — `r1` precedes `r2` in `t`'s queue.
//!
//! Constraints:
//!
//! - assignment: `Σ_t x[t][r] = 1` for every `r`;
//! - order activation: `o[t][r1][r2] ≤ x[t][r1]`, `o[t][r1][r2] ≤ x[t][r2]`;
//! - pairwise acyclicity: `o[t][r1][r2] + o[t][r2][r1] ≤ 1`.
//!
//! The per-worker workload is `W[t] = Σ_r x[t][r] · estimate(t, r)` with
//! the two-leg travel estimate from
//! [`AssignmentStrategy::estimate_travel_time`].
//!
//! # Objectives
//!
//! | Mode            | Objective                                          |
//! |-----------------|----------------------------------------------------|
//! | `Makespan`      | minimize `M` s.t. `W[t] ≤ M`                       |
//! | `EqualWorkload` | minimize `Wmax − Wmin` s.t. `Wmin ≤ W[t] ≤ Wmax`   |
//! | `UrgencyFirst`  | minimize `Σ x·estimate·(0.5 if urgent else 1.0)`   |
//!
//! `EqualWorkload` is the linear max-min-spread surrogate for the quadratic
//! deviation objective; the solver stack is kept purely linear.
//!
//! # Queue order extraction
//!
//! Assigned requests are topologically sorted by the `o` values (Kahn's
//! algorithm).  Where the solver leaves orderings free — common, since no
//! objective references `o` — ties break deterministically: urgent requests
//! first under `UrgencyFirst`, then estimate ascending, then request id.

use std::collections::HashMap;

use good_lp::{
    constraint, microlp, variable, variables, Constraint, Expression, ResolutionError, Solution,
    SolverModel, Variable,
};

use ht_graph::HospitalGraph;
use ht_model::Request;

use crate::{AssignmentStrategy, Plan, PlanError, PlanResult, WorkerView};

/// Which objective the optimizer minimizes.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum IlpMode {
    Makespan,
    EqualWorkload,
    UrgencyFirst,
}

/// The ILP-backed strategy.  Stateless: a fresh model is built per solve.
pub struct IlpStrategy {
    mode: IlpMode,
}

impl IlpStrategy {
    pub fn new(mode: IlpMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> IlpMode {
        self.mode
    }

    /// Cost coefficient of (worker, request) under the active objective.
    fn weighted_estimate(&self, estimate: f64, urgent: bool) -> f64 {
        match self.mode {
            IlpMode::UrgencyFirst if urgent => estimate * 0.5,
            _ => estimate,
        }
    }

    /// Deterministic queue-position sort key for a request assigned to one
    /// worker: urgency class (urgency mode only), then estimate, then id.
    fn order_key(&self, request: &Request, estimate: f64) -> (u8, f64, u64) {
        let urgency_rank = match self.mode {
            IlpMode::UrgencyFirst if request.urgent => 0,
            IlpMode::UrgencyFirst => 1,
            _ => 0,
        };
        (urgency_rank, estimate, request.id.0)
    }
}

impl AssignmentStrategy for IlpStrategy {
    fn plan(
        &self,
        workers: &[WorkerView],
        requests: &[Request],
        graph: &HospitalGraph,
    ) -> PlanResult<Plan> {
        let mut plan: Plan = workers.iter().map(|w| (w.name.clone(), Vec::new())).collect();

        if requests.is_empty() {
            return Ok(plan);
        }
        if workers.is_empty() {
            return Err(PlanError::NoWorkers);
        }

        let n_workers = workers.len();
        let n_requests = requests.len();

        // ── Travel estimates ──────────────────────────────────────────────
        //
        // est[t][r] = None marks an unreachable pair; no x variable is
        // created for it, so the solver cannot pick it.
        let est: Vec<Vec<Option<f64>>> = workers
            .iter()
            .map(|w| {
                requests
                    .iter()
                    .map(|r| self.estimate_travel_time(w, r, graph))
                    .collect()
            })
            .collect();

        // A request nobody can reach makes the assignment constraint
        // unsatisfiable; report it by id instead of a bare "infeasible".
        for (ri, request) in requests.iter().enumerate() {
            if (0..n_workers).all(|ti| est[ti][ri].is_none()) {
                return Err(PlanError::Unreachable(request.id));
            }
        }

        // ── Variables ─────────────────────────────────────────────────────
        let mut vars = variables!();

        let x: Vec<Vec<Option<Variable>>> = (0..n_workers)
            .map(|ti| {
                (0..n_requests)
                    .map(|ri| est[ti][ri].map(|_| vars.add(variable().binary())))
                    .collect()
            })
            .collect();

        // o[(t, r1, r2)] exists when worker t could serve both requests.
        let mut order: HashMap<(usize, usize, usize), Variable> = HashMap::new();
        for ti in 0..n_workers {
            for r1 in 0..n_requests {
                for r2 in 0..n_requests {
                    if r1 != r2 && x[ti][r1].is_some() && x[ti][r2].is_some() {
                        order.insert((ti, r1, r2), vars.add(variable().binary()));
                    }
                }
            }
        }

        // ── Constraints ───────────────────────────────────────────────────
        let mut constraints: Vec<Constraint> = Vec::new();

        // Each request is served by exactly one worker.
        for ri in 0..n_requests {
            let mut served = Expression::default();
            for xt in x.iter() {
                if let Some(var) = xt[ri] {
                    served += var;
                }
            }
            constraints.push(constraint!(served == 1));
        }

        // Ordering only between requests on the same worker; no 2-cycles.
        for (&(ti, r1, r2), &fwd) in &order {
            let x1 = x[ti][r1].expect("order var implies x var");
            let x2 = x[ti][r2].expect("order var implies x var");
            constraints.push(constraint!(fwd <= x1));
            constraints.push(constraint!(fwd <= x2));
            if r1 < r2 {
                let rev = order[&(ti, r2, r1)];
                constraints.push(constraint!(fwd + rev <= 1));
            }
        }

        // Per-worker workload expression: W[t] = Σ_r x[t][r] · est(t, r).
        let workload_of = |ti: usize| -> Expression {
            let mut w = Expression::default();
            for ri in 0..n_requests {
                if let Some(var) = x[ti][ri] {
                    w += est[ti][ri].expect("x var implies estimate") * var;
                }
            }
            w
        };

        // ── Objective ─────────────────────────────────────────────────────
        let objective: Expression = match self.mode {
            IlpMode::Makespan => {
                let makespan = vars.add(variable().min(0.0));
                for ti in 0..n_workers {
                    constraints.push(constraint!(workload_of(ti) <= makespan));
                }
                makespan.into()
            }
            IlpMode::EqualWorkload => {
                let wmax = vars.add(variable().min(0.0));
                let wmin = vars.add(variable().min(0.0));
                for ti in 0..n_workers {
                    constraints.push(constraint!(workload_of(ti) <= wmax));
                    constraints.push(constraint!(workload_of(ti) >= wmin));
                }
                Expression::from(wmax) - wmin
            }
            IlpMode::UrgencyFirst => {
                let mut obj = Expression::default();
                for ti in 0..n_workers {
                    for ri in 0..n_requests {
                        if let Some(var) = x[ti][ri] {
                            let cost = self.weighted_estimate(
                                est[ti][ri].expect("x var implies estimate"),
                                requests[ri].urgent,
                            );
                            obj += cost * var;
                        }
                    }
                }
                obj
            }
        };

        // ── Solve ─────────────────────────────────────────────────────────
        tracing::debug!(
            workers = n_workers,
            requests = n_requests,
            order_vars = order.len(),
            mode = ?self.mode,
            "solving assignment model"
        );

        let mut model = vars.minimise(objective).using(microlp);
        for c in constraints {
            model = model.with(c);
        }

        let solution = match model.solve() {
            Ok(s) => s,
            Err(ResolutionError::Infeasible) => return Err(PlanError::Infeasible),
            Err(e) => return Err(PlanError::Solver(e.to_string())),
        };

        // ── Extract per-worker ordered queues ─────────────────────────────
        for (ti, worker) in workers.iter().enumerate() {
            let mut remaining: Vec<usize> = (0..n_requests)
                .filter(|&ri| {
                    x[ti][ri].map(|var| solution.value(var) > 0.5).unwrap_or(false)
                })
                .collect();

            let precedes = |a: usize, b: usize| -> bool {
                order
                    .get(&(ti, a, b))
                    .map(|&var| solution.value(var) > 0.5)
                    .unwrap_or(false)
            };

            let key = |ri: usize| {
                self.order_key(&requests[ri], est[ti][ri].unwrap_or(f64::INFINITY))
            };
            let by_key = |a: &usize, b: &usize| {
                let (ka, kb) = (key(*a), key(*b));
                ka.0.cmp(&kb.0).then(ka.1.total_cmp(&kb.1)).then(ka.2.cmp(&kb.2))
            };

            // Kahn's algorithm over the (pairwise-acyclic) order relation,
            // breaking free choices with the deterministic key.  If the
            // relation ever failed to admit a source, fall back to the key
            // over all remaining so extraction always terminates.
            let mut ordered = Vec::with_capacity(remaining.len());
            while !remaining.is_empty() {
                let source = remaining
                    .iter()
                    .copied()
                    .filter(|&ri| {
                        remaining.iter().all(|&other| other == ri || !precedes(other, ri))
                    })
                    .min_by(|a, b| by_key(a, b))
                    .or_else(|| remaining.iter().copied().min_by(|a, b| by_key(a, b)))
                    .expect("remaining is non-empty");
                ordered.push(requests[source].id);
                remaining.retain(|&ri| ri != source);
            }

            plan.insert(worker.name.clone(), ordered);
        }

        Ok(plan)
    }
}
