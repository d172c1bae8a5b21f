//! Model Builder: the master decision variables every constraint encoder
//! in [`super::constraints`] shares.

use super::backend::{CpBackend, Incumbent, SolveStatus};
use std::time::Duration;

/// The master model: team-assignment booleans plus whatever auxiliary
/// variables and cost terms the constraint compiler has added, generic
/// over the backend that realizes them.
pub struct TeamModel<B: CpBackend> {
    backend: B,
    num_participants: usize,
    num_teams: usize,
    /// `on[i][t]`, `on[i,t] = 1 <=> participant i is on team t`.
    on: Vec<Vec<B::BoolVar>>,
}

impl<B: CpBackend> TeamModel<B> {
    /// Creates the master model: `on[i][t]` booleans for every participant
    /// and team, with `sum_t on[i,t] = 1` for every `i`.
    pub fn new(mut backend: B, num_participants: usize, num_teams: usize) -> Self {
        let on: Vec<Vec<B::BoolVar>> = (0..num_participants)
            .map(|_| (0..num_teams).map(|_| backend.new_bool_var()).collect())
            .collect();
        for row in &on {
            let sum: B::LinearExpr = row.iter().cloned().collect();
            backend.add_eq(sum, B::LinearExpr::from(1));
        }
        TeamModel {
            backend,
            num_participants,
            num_teams,
            on,
        }
    }

    pub fn num_participants(&self) -> usize {
        self.num_participants
    }

    pub fn num_teams(&self) -> usize {
        self.num_teams
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// The shared `on[i,t]` reified boolean, created at most once per pair —
    /// every encoder goes through this accessor rather than minting its own.
    pub fn on(&self, participant: usize, team: usize) -> B::BoolVar {
        self.on[participant][team].clone()
    }

    /// Imposes the team-size cardinality constraint for one team: its
    /// member count must equal `size`. The engine's size plan (see
    /// [`crate::team_sizes`]) already fixes every team's exact size, so
    /// this is a direct equality rather than the two-boolean
    /// size-selection machinery a solver-chosen size set would need.
    pub fn fix_team_size(&mut self, team: usize, size: u32) {
        let sum: B::LinearExpr = (0..self.num_participants)
            .map(|i| self.on[i][team].clone())
            .collect();
        self.backend.add_eq(sum, B::LinearExpr::from(size as i64));
    }

    /// Imposes first-fit symmetry breaking: participant 0 is always on
    /// team 0, and team `t` cannot hold any participant unless team
    /// `t-1` already holds some participant with a lower index. This is a
    /// direct per-participant bound over `on[i][t]` rather than a separate
    /// `x[i]` integer variable, which is equivalent and needs no extra
    /// decision variables.
    pub fn add_symmetry_breaking(&mut self) {
        if self.num_participants == 0 {
            return;
        }
        self.backend
            .add_eq(self.on[0][0].clone().into(), B::LinearExpr::from(1));
        for t in 1..self.num_teams {
            for i in 1..self.num_participants {
                let predecessors: B::LinearExpr = (0..i)
                    .flat_map(|j| (0..t).map(move |tt| (j, tt)))
                    .map(|(j, tt)| self.on[j][tt].clone())
                    .collect();
                self.backend
                    .add_le(self.on[i][t].clone().into(), predecessors);
            }
        }
    }

    /// Composes the weighted-sum objective from every cost term registered
    /// through the backend, runs the solve, and reads back the final team
    /// assignment from whatever response the backend returns.
    pub fn solve(
        self,
        max_time: Duration,
        seed: Option<u64>,
        on_incumbent: &mut dyn FnMut(Incumbent) -> bool,
    ) -> (SolveStatus, Option<Vec<usize>>) {
        let TeamModel {
            backend,
            num_participants,
            num_teams,
            on,
        } = self;
        let (status, response) = backend.solve(max_time, seed, on_incumbent);
        let assignment = response.map(|resp| {
            (0..num_participants)
                .map(|i| {
                    (0..num_teams)
                        .find(|&t| B::bool_value(&resp, &on[i][t]))
                        .expect("on[i,:] sums to exactly 1 by construction")
                })
                .collect()
        });
        (status, assignment)
    }
}
