//! Data models for the team-formation engine's public API.
//!
//! This module contains the structures used to describe an optimization
//! problem (a roster and a weighted constraint list), to configure a solve,
//! and to receive results. Everything here is `serde`-serializable so the
//! engine can sit behind a JSON boundary without a second mapping layer.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A participant's identifier, as it appears in the input payload.
///
/// Identifiers are either strings or integers in practice; both are
/// accepted and rendered identically in output (via [`Display`](fmt::Display)),
/// so downstream consumers never have to care which form was used.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum ParticipantId {
    Text(String),
    Int(i64),
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParticipantId::Text(s) => write!(f, "{s}"),
            ParticipantId::Int(n) => write!(f, "{n}"),
        }
    }
}

/// A single row of the roster.
///
/// Attribute values are kept as raw [`serde_json::Value`]s rather than
/// interpreted up front: the same column can in principle be read either
/// as a discrete attribute (`cluster`, `different`, `diversify`) or as a
/// numeric one (`cluster_numeric`), and which interpretation applies is a
/// property of the constraint referencing it, not of the roster itself.
/// Interpretation happens in [`crate::normalizer`].
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Participant {
    pub id: ParticipantId,
    #[serde(flatten)]
    pub attributes: HashMap<String, serde_json::Value>,
}

/// The four weighted composition objectives a constraint can express.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    /// Maximize participants who share an attribute value with their team.
    Cluster,
    /// Minimize the within-team range of a numeric attribute.
    ClusterNumeric,
    /// Maximize within-team diversity of an attribute's distinct values.
    Different,
    /// Match each team's per-value counts to the roster's population proportions.
    Diversify,
}

/// One weighted composition objective over a single attribute.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ConstraintSpec {
    pub attribute: String,
    #[serde(rename = "type")]
    pub kind: ConstraintKind,
    pub weight: f64,
}

fn default_max_time() -> u64 {
    60
}

/// Complete input payload for a solve.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ApiInput {
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub constraints: Vec<ConstraintSpec>,
    pub target_team_size: u32,
    #[serde(default)]
    pub less_than_target: bool,
    #[serde(default = "default_max_time")]
    pub max_time: u64,
}

/// Solver-facing configuration derived from an [`ApiInput`].
///
/// Kept separate from `ApiInput` because it additionally carries knobs that
/// have no JSON representation, such as a deterministic search seed used
/// only by tests.
#[derive(Debug, Clone)]
pub struct SolveConfig {
    pub max_time_seconds: u64,
    pub seed: Option<u64>,
}

impl From<&ApiInput> for SolveConfig {
    fn from(input: &ApiInput) -> Self {
        SolveConfig {
            max_time_seconds: input.max_time,
            seed: None,
        }
    }
}

/// One incumbent notification, matching a solver callback invocation 1:1.
#[derive(Serialize, Debug, Clone)]
pub struct ProgressRecord {
    pub solution_count: u64,
    pub objective_value: i64,
    pub wall_time: f64,
    pub num_conflicts: i64,
    pub message: String,
}

/// Summary statistics attached to the terminal `complete` record.
#[derive(Serialize, Debug, Clone)]
pub struct SolveStats {
    pub solution_count: u64,
    pub wall_time: f64,
    pub num_teams: u32,
    pub num_participants: u32,
}

/// A participant echoed back with the team it was finally assigned to.
#[derive(Serialize, Debug, Clone)]
pub struct ParticipantResult {
    pub id: ParticipantId,
    #[serde(flatten)]
    pub attributes: HashMap<String, serde_json::Value>,
    pub team_number: u32,
}

/// The terminal success record: the full assignment plus solve statistics.
#[derive(Serialize, Debug, Clone)]
pub struct CompleteRecord {
    pub participants: Vec<ParticipantResult>,
    pub stats: SolveStats,
    pub objective_value: i64,
}

/// The terminal failure record.
#[derive(Serialize, Debug, Clone)]
pub struct ErrorRecord {
    pub kind: String,
    pub message: String,
}

/// A record of the output event stream. The framing used to carry these
/// over a network is explicitly out of scope for this engine; this type
/// only fixes their shape and order.
#[derive(Serialize, Debug, Clone)]
#[serde(tag = "record", rename_all = "snake_case")]
pub enum OutputRecord {
    Progress(ProgressRecord),
    Complete(CompleteRecord),
    Error(ErrorRecord),
}

/// A participant paired with the team it was assigned to, for the
/// `evaluate` entry point which grades an assignment without re-invoking
/// the solver.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ParticipantAssignment {
    pub id: ParticipantId,
    #[serde(flatten)]
    pub attributes: HashMap<String, serde_json::Value>,
    pub team_number: u32,
}

/// Input payload for the `evaluate` entry point: an assignment already
/// made, to be scored against a constraint list.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EvaluateInput {
    pub participants: Vec<ParticipantAssignment>,
    #[serde(default)]
    pub constraints: Vec<ConstraintSpec>,
}

/// One row of the Team Evaluator's post-solve report.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MissRow {
    pub team_index: u32,
    pub team_size: u32,
    pub attribute: String,
    pub kind: ConstraintKind,
    pub miss: i64,
}
