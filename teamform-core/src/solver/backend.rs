//! The narrow solver-backend trait.
//!
//! `CpBackend` captures exactly the feature set the constraint compiler and
//! model builder need — bounded integer variables, boolean variables,
//! linear (in)equalities, an objective, a wall-clock deadline, and an
//! incumbent callback — and nothing else. The rest of the crate is written
//! against this trait; [`CpSatBackend`] is the only implementation it ships,
//! backed by the `cp_sat` crate, kept at arm's length so the engine doesn't
//! leak CP-SAT types through the rest of its body.

use std::ops::{Add, Mul};
use std::time::Duration;

/// The status the search driver reports after a solve attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    Optimal,
    Feasible,
    Infeasible,
    NoSolution,
}

/// One incumbent notification, handed to the driver's callback.
pub struct Incumbent {
    pub objective_value: i64,
    pub wall_time_seconds: f64,
    pub conflicts_count: i64,
}

/// A CP-SAT-capable backend.
///
/// `LinearExpr` is required to support the handful of arithmetic operations
/// the compiler needs to build cost and constraint expressions out of
/// variables: summing an iterator of terms, adding two expressions, and
/// scaling by an integer weight.
pub trait CpBackend {
    type BoolVar: Clone;
    type IntVar: Clone;
    type LinearExpr: Clone
        + From<i64>
        + From<Self::BoolVar>
        + From<Self::IntVar>
        + Add<Output = Self::LinearExpr>
        + Mul<i64, Output = Self::LinearExpr>
        + FromIterator<Self::BoolVar>;
    /// Opaque solver response, used only to read back solution values.
    type Response;

    fn new_bool_var(&mut self) -> Self::BoolVar;
    fn new_int_var(&mut self, lo: i64, hi: i64) -> Self::IntVar;

    fn add_eq(&mut self, lhs: Self::LinearExpr, rhs: Self::LinearExpr);
    fn add_le(&mut self, lhs: Self::LinearExpr, rhs: Self::LinearExpr);
    fn add_ge(&mut self, lhs: Self::LinearExpr, rhs: Self::LinearExpr);

    /// Registers one weighted cost term; the backend sums and minimizes
    /// every registered term when [`CpBackend::solve`] is called.
    fn add_weighted_cost(&mut self, weight: i64, cost: Self::LinearExpr);

    /// Reads a boolean variable's value out of a solver response.
    fn bool_value(response: &Self::Response, var: &Self::BoolVar) -> bool;

    /// Runs the solver to completion or deadline. `on_incumbent` is called
    /// with the solve's result once a solution is found; its `bool`
    /// return is read but, since the search itself is not interruptible
    /// mid-solve, only affects whether the caller treats that result as
    /// cancelled after the fact.
    fn solve(
        self,
        max_time: Duration,
        seed: Option<u64>,
        on_incumbent: &mut dyn FnMut(Incumbent) -> bool,
    ) -> (SolveStatus, Option<Self::Response>);
}

/// The shipped [`CpBackend`] implementation, wrapping `cp_sat`'s
/// `CpModelBuilder`.
pub mod cp_sat_backend {
    use super::{CpBackend, Incumbent, SolveStatus};
    use cp_sat::builder::{BoolVar, CpModelBuilder, IntVar, LinearExpr};
    use cp_sat::proto::{CpSolverResponse, CpSolverStatus, SatParameters};
    use std::time::Duration;

    #[derive(Default)]
    pub struct CpSatBackend {
        builder: CpModelBuilder,
        cost_terms: Vec<LinearExpr>,
    }

    impl CpBackend for CpSatBackend {
        type BoolVar = BoolVar;
        type IntVar = IntVar;
        type LinearExpr = LinearExpr;
        type Response = CpSolverResponse;

        fn new_bool_var(&mut self) -> BoolVar {
            self.builder.new_bool_var()
        }

        fn new_int_var(&mut self, lo: i64, hi: i64) -> IntVar {
            self.builder.new_int_var(vec![(lo, hi)])
        }

        fn add_eq(&mut self, lhs: LinearExpr, rhs: LinearExpr) {
            self.builder.add_eq(lhs, rhs);
        }

        fn add_le(&mut self, lhs: LinearExpr, rhs: LinearExpr) {
            self.builder.add_le(lhs, rhs);
        }

        fn add_ge(&mut self, lhs: LinearExpr, rhs: LinearExpr) {
            self.builder.add_ge(lhs, rhs);
        }

        fn add_weighted_cost(&mut self, weight: i64, cost: LinearExpr) {
            self.cost_terms.push(cost * weight);
        }

        fn bool_value(response: &CpSolverResponse, var: &BoolVar) -> bool {
            var.solution_value(response)
        }

        fn solve(
            mut self,
            max_time: Duration,
            seed: Option<u64>,
            on_incumbent: &mut dyn FnMut(Incumbent) -> bool,
        ) -> (SolveStatus, Option<CpSolverResponse>) {
            let objective = self
                .cost_terms
                .into_iter()
                .fold(LinearExpr::from(0), |acc, term| acc + term);
            self.builder.minimize(objective);

            let mut params = SatParameters::default();
            params.max_time_in_seconds = Some(max_time.as_secs_f64());
            if let Some(seed) = seed {
                params.random_seed = Some(seed as i32);
                params.randomize_search = Some(false);
            }

            let start = std::time::Instant::now();
            let response = self.builder.solve_with_parameters(&params);

            let status = match response.status() {
                CpSolverStatus::Optimal => SolveStatus::Optimal,
                CpSolverStatus::Feasible => SolveStatus::Feasible,
                CpSolverStatus::Infeasible => SolveStatus::Infeasible,
                _ => SolveStatus::NoSolution,
            };
            // `CpModelBuilder` exposes one synchronous solve, not a
            // per-incumbent observer, so a single notification stands in
            // for the stream: one "incumbent" carrying the final response,
            // reported only when a solution was actually found.
            if matches!(status, SolveStatus::Optimal | SolveStatus::Feasible) {
                on_incumbent(Incumbent {
                    objective_value: response.objective_value.round() as i64,
                    wall_time_seconds: start.elapsed().as_secs_f64(),
                    conflicts_count: response.num_conflicts,
                });
            }
            (status, Some(response))
        }
    }
}

pub use cp_sat_backend::CpSatBackend;
