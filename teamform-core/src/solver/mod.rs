//! Orchestration: wires the Attribute Normalizer, Constraint Compiler,
//! Model Builder, Search Driver, and Solution Publisher together into one
//! `solve` entry point.

pub mod backend;
pub mod constraints;
pub mod model_builder;
pub mod publisher;
pub mod team_evaluator;
pub mod validation;

#[cfg(test)]
mod tests;

pub use backend::{CpBackend, CpSatBackend, SolveStatus};
pub use model_builder::TeamModel;
pub use publisher::{channel, Publisher, Subscriber};
pub use team_evaluator::ConstraintAttribute;

use crate::error::TeamFormationError;
use crate::models::{
    ApiInput, CompleteRecord, ConstraintKind, ErrorRecord, EvaluateInput, MissRow, OutputRecord,
    Participant, ParticipantResult, ProgressRecord, SolveConfig, SolveStats,
};
use crate::normalizer::{normalize_discrete, normalize_numeric};
use crate::team_sizes::derive_team_sizes;
use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// The fixed-point scale applied to constraint weights before they enter
/// the (integer) objective: non-integer weights are scaled to integers,
/// and the factor cancels out in relative comparisons.
const WEIGHT_SCALE: f64 = 1_000.0;

/// Runs one solve to completion on a dedicated worker thread, distinct
/// from the caller's thread. Returns a [`Subscriber`] the caller polls for
/// progress and blocks on for the terminal record, and a
/// [`std::thread::JoinHandle`] for the
/// worker, should the caller want to join it.
pub fn solve(
    input: ApiInput,
    cancel: Arc<AtomicBool>,
) -> (Subscriber, std::thread::JoinHandle<()>) {
    let (publisher, subscriber) = channel();
    let handle = std::thread::spawn(move || run(input, publisher, cancel));
    (subscriber, handle)
}

fn run(input: ApiInput, publisher: Publisher, cancel: Arc<AtomicBool>) {
    match run_inner(&input, &publisher, &cancel) {
        Ok(()) => {}
        Err(err) => {
            log::warn!("solve terminated with error: {err}");
            publisher.publish_terminal(OutputRecord::Error(ErrorRecord {
                kind: err.kind().to_string(),
                message: err.to_string(),
            }));
        }
    }
}

/// Builds and solves the model; also returns the per-constraint normalized
/// attribute data the `evaluate` path reuses, so a caller who wants the
/// Team Evaluator's miss table doesn't re-normalize anything.
pub struct SolveOutcome {
    pub assignment: Vec<usize>,
    pub team_sizes: Vec<u32>,
    pub objective_value: i64,
    pub solution_count: u64,
    pub wall_time: f64,
    pub evaluator_inputs: Vec<(crate::models::ConstraintSpec, ConstraintAttribute)>,
}

pub fn compile_and_solve(
    input: &ApiInput,
    cancel: &Arc<AtomicBool>,
    mut on_progress: impl FnMut(ProgressRecord),
) -> Result<SolveOutcome, TeamFormationError> {
    validation::validate_input(input)?;
    let config = SolveConfig::from(input);
    log::info!(
        "starting solve: {} participants, target size {}, {} constraints",
        input.participants.len(),
        input.target_team_size,
        input.constraints.len()
    );

    let plan = derive_team_sizes(
        input.participants.len(),
        input.target_team_size,
        input.less_than_target,
    )?;
    let team_sizes = plan.sizes();
    let num_participants = input.participants.len();
    let num_teams = plan.num_teams as usize;

    let mut model = TeamModel::new(CpSatBackend::default(), num_participants, num_teams);
    for (t, &size) in team_sizes.iter().enumerate() {
        model.fix_team_size(t, size);
    }
    model.add_symmetry_breaking();

    let mut evaluator_inputs = Vec::with_capacity(input.constraints.len());
    for spec in &input.constraints {
        let weight_i64 = (spec.weight * WEIGHT_SCALE).round() as i64;
        match spec.kind {
            ConstraintKind::Cluster => {
                let attr = normalize_discrete(&input.participants, &spec.attribute)?;
                constraints::compile_cluster(&mut model, &attr, weight_i64)?;
                evaluator_inputs.push((spec.clone(), ConstraintAttribute::Discrete(attr)));
            }
            ConstraintKind::ClusterNumeric => {
                let attr = normalize_numeric(&input.participants, &spec.attribute)?;
                constraints::compile_cluster_numeric(&mut model, &attr, weight_i64)?;
                evaluator_inputs.push((spec.clone(), ConstraintAttribute::Numeric(attr)));
            }
            ConstraintKind::Different => {
                let attr = normalize_discrete(&input.participants, &spec.attribute)?;
                constraints::compile_different(&mut model, &attr, &team_sizes, weight_i64)?;
                evaluator_inputs.push((spec.clone(), ConstraintAttribute::Discrete(attr)));
            }
            ConstraintKind::Diversify => {
                let attr = normalize_discrete(&input.participants, &spec.attribute)?;
                constraints::compile_diversify(
                    &mut model,
                    &attr,
                    &team_sizes,
                    num_participants,
                    weight_i64,
                )?;
                evaluator_inputs.push((spec.clone(), ConstraintAttribute::Discrete(attr)));
            }
        }
    }

    let solution_count = Cell::new(0u64);
    let last_objective = Cell::new(0i64);
    let last_wall_time = Cell::new(0.0f64);
    let max_time = Duration::from_secs(config.max_time_seconds);
    let (status, assignment) = model.solve(max_time, config.seed, &mut |incumbent| {
        let count = solution_count.get() + 1;
        solution_count.set(count);
        last_objective.set(incumbent.objective_value);
        last_wall_time.set(incumbent.wall_time_seconds);
        log::debug!(
            "incumbent {count}: objective={} wall_time={:.2}s conflicts={}",
            incumbent.objective_value,
            incumbent.wall_time_seconds,
            incumbent.conflicts_count
        );
        on_progress(ProgressRecord {
            solution_count: count,
            objective_value: incumbent.objective_value,
            wall_time: incumbent.wall_time_seconds,
            num_conflicts: incumbent.conflicts_count,
            message: format!("incumbent #{count}"),
        });
        !cancel.load(Ordering::Relaxed)
    });

    log::info!(
        "solve finished: status={status:?} objective={} solutions={}",
        last_objective.get(),
        solution_count.get()
    );

    match (status, assignment) {
        (SolveStatus::Optimal, Some(assignment)) | (SolveStatus::Feasible, Some(assignment)) => {
            Ok(SolveOutcome {
                assignment,
                team_sizes,
                objective_value: last_objective.get(),
                solution_count: solution_count.get(),
                wall_time: last_wall_time.get(),
                evaluator_inputs,
            })
        }
        (SolveStatus::Infeasible, _) => Err(TeamFormationError::Infeasible),
        _ => Err(TeamFormationError::NoSolution),
    }
}

fn run_inner(
    input: &ApiInput,
    publisher: &Publisher,
    cancel: &Arc<AtomicBool>,
) -> Result<(), TeamFormationError> {
    let num_participants = input.participants.len();
    let outcome = compile_and_solve(input, cancel, |record| publisher.publish_progress(record))?;

    let participants = input
        .participants
        .iter()
        .zip(outcome.assignment.iter())
        .map(|(participant, &team)| ParticipantResult {
            id: participant.id.clone(),
            attributes: participant.attributes.clone(),
            team_number: team as u32,
        })
        .collect();
    publisher.publish_terminal(OutputRecord::Complete(CompleteRecord {
        participants,
        stats: SolveStats {
            solution_count: outcome.solution_count,
            wall_time: outcome.wall_time,
            num_teams: outcome.team_sizes.len() as u32,
            num_participants: num_participants as u32,
        },
        objective_value: outcome.objective_value,
    }));
    Ok(())
}

/// Grades an already-made assignment against a constraint list without
/// invoking the solver.
pub fn evaluate_assignment(input: &EvaluateInput) -> Result<Vec<MissRow>, TeamFormationError> {
    let num_teams = input
        .participants
        .iter()
        .map(|p| p.team_number)
        .max()
        .map(|max| max as usize + 1)
        .unwrap_or(0);
    let mut team_sizes = vec![0u32; num_teams];
    for p in &input.participants {
        team_sizes[p.team_number as usize] += 1;
    }
    let assignment: Vec<usize> = input
        .participants
        .iter()
        .map(|p| p.team_number as usize)
        .collect();
    let participants: Vec<Participant> = input
        .participants
        .iter()
        .map(|p| Participant {
            id: p.id.clone(),
            attributes: p.attributes.clone(),
        })
        .collect();

    let mut evaluator_inputs = Vec::with_capacity(input.constraints.len());
    for spec in &input.constraints {
        match spec.kind {
            ConstraintKind::Cluster | ConstraintKind::Different | ConstraintKind::Diversify => {
                let attr = normalize_discrete(&participants, &spec.attribute)?;
                evaluator_inputs.push((spec.clone(), ConstraintAttribute::Discrete(attr)));
            }
            ConstraintKind::ClusterNumeric => {
                let attr = normalize_numeric(&participants, &spec.attribute)?;
                evaluator_inputs.push((spec.clone(), ConstraintAttribute::Numeric(attr)));
            }
        }
    }

    Ok(team_evaluator::evaluate(&assignment, &team_sizes, &evaluator_inputs))
}
