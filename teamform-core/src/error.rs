//! Error types returned by every fallible entry point of the engine.
//!
//! A single enum is used end to end: the normalizer, the constraint compiler,
//! the model builder, the search driver, and the evaluator all return
//! [`TeamFormationError`]. This lets the error record of the output stream
//! (see [`crate::models::OutputRecord::Error`]) be produced directly from it.

use serde::Serialize;
use thiserror::Error;

/// All terminal error conditions for a solve, per the engine's error-handling
/// design. Every variant is terminal: there is no recovery path that resumes
/// the same solve.
#[derive(Error, Debug, Serialize, Clone, PartialEq)]
pub enum TeamFormationError {
    /// Malformed or missing input fields: non-positive weight, `target_team_size <= 2`,
    /// `max_time <= 0`, an attribute referenced by a constraint that is absent
    /// on some participant, or fewer than 3 participants.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// A `cluster_numeric` constraint referenced an attribute that could not
    /// be coerced to an integer for every participant.
    #[error("attribute `{attribute}` is not numeric: {reason}")]
    NonNumericAttribute { attribute: String, reason: String },

    /// A discrete attribute referenced by `cluster`, `different`, or
    /// `diversify` has no observed values across the roster.
    #[error("attribute `{0}` has no observed values")]
    EmptyDomain(String),

    /// `target_team_size` and `shrink`/`less_than_target` cannot partition
    /// `N` participants into teams of the allowed sizes (e.g. `T=3`,
    /// `shrink=true`, `N=4`, which would require a team of size 1).
    #[error("cannot partition {participants} participants into teams of target size {target}")]
    UnsolvableSize { participants: usize, target: u32 },

    /// The constraint compiler could not produce a consistent model from an
    /// otherwise well-formed input (an internal invariant was violated).
    #[error("failed to compile constraint model: {0}")]
    CompileError(String),

    /// Building the model exceeded the implementer-defined compile-time
    /// budget (distinct from the solver's own wall-clock deadline).
    #[error("model compilation exceeded its time budget")]
    CompileTimeout,

    /// The solver proved that no assignment satisfies the hard constraints
    /// (team-size bounds; the compiled cost constraints are always
    /// satisfiable since costs are unbounded above).
    #[error("no assignment satisfies the hard constraints")]
    Infeasible,

    /// The deadline elapsed before the solver found any incumbent.
    #[error("no incumbent solution found before the deadline")]
    NoSolution,

    /// The caller requested cancellation before any incumbent was found.
    #[error("solve cancelled before any incumbent was found")]
    Cancelled,
}

impl TeamFormationError {
    /// The machine-readable `kind` carried alongside the `error` record of
    /// the output stream.
    pub fn kind(&self) -> &'static str {
        match self {
            TeamFormationError::BadRequest(_) => "BadRequest",
            TeamFormationError::NonNumericAttribute { .. } => "NonNumericAttribute",
            TeamFormationError::EmptyDomain(_) => "EmptyDomain",
            TeamFormationError::UnsolvableSize { .. } => "UnsolvableSize",
            TeamFormationError::CompileError(_) => "CompileError",
            TeamFormationError::CompileTimeout => "CompileTimeout",
            TeamFormationError::Infeasible => "Infeasible",
            TeamFormationError::NoSolution => "NoSolution",
            TeamFormationError::Cancelled => "Cancelled",
        }
    }
}
