//! Team Evaluator.
//!
//! Computes, from a finished assignment alone, a per-team "miss" score for
//! every constraint — independent of the solver, so it can also grade an
//! assignment the solver never produced (the CLI's `evaluate` subcommand).

use crate::models::{ConstraintKind, ConstraintSpec, MissRow};
use crate::normalizer::{DiscreteAttribute, NumericAttribute};

/// Participants grouped by team, derived once from the flat assignment.
fn members_of(assignment: &[usize], num_teams: usize) -> Vec<Vec<usize>> {
    let mut teams = vec![Vec::new(); num_teams];
    for (participant, &team) in assignment.iter().enumerate() {
        teams[team].push(participant);
    }
    teams
}

/// `miss(t) = size(t) - max_v |{i in t : v admissible to i}|`: the team
/// picks whichever value the most members can claim.
fn cluster_miss(members: &[usize], attr: &DiscreteAttribute) -> i64 {
    let mut counts = vec![0usize; attr.values.len()];
    for &i in members {
        for &v in &attr.admissible[i] {
            counts[v] += 1;
        }
    }
    let best = counts.into_iter().max().unwrap_or(0);
    members.len() as i64 - best as i64
}

fn cluster_numeric_miss(members: &[usize], attr: &NumericAttribute) -> i64 {
    if members.is_empty() {
        return 0;
    }
    let lo = members.iter().map(|&i| attr.value[i]).min().unwrap();
    let hi = members.iter().map(|&i| attr.value[i]).max().unwrap();
    hi - lo
}

/// Maximum bipartite matching (participants -> admissible values),
/// via Kuhn's augmenting-path algorithm. Team and value-domain sizes are
/// small (bounded by a target team size and a roster's attribute
/// cardinality), so the naive O(V*E) algorithm is more than fast enough.
fn max_distinct_matching(members: &[usize], attr: &DiscreteAttribute) -> usize {
    let num_values = attr.values.len();
    let mut match_of_value: Vec<Option<usize>> = vec![None; num_values];

    fn try_augment(
        participant_slot: usize,
        members: &[usize],
        attr: &DiscreteAttribute,
        match_of_value: &mut [Option<usize>],
        visited: &mut [bool],
    ) -> bool {
        let i = members[participant_slot];
        for &v in &attr.admissible[i] {
            if visited[v] {
                continue;
            }
            visited[v] = true;
            let free = match match_of_value[v] {
                None => true,
                Some(other_slot) => try_augment(other_slot, members, attr, match_of_value, visited),
            };
            if free {
                match_of_value[v] = Some(participant_slot);
                return true;
            }
        }
        false
    }

    let mut matched = 0;
    for slot in 0..members.len() {
        let mut visited = vec![false; num_values];
        if try_augment(slot, members, attr, &mut match_of_value, &mut visited) {
            matched += 1;
        }
    }
    matched
}

fn different_miss(members: &[usize], attr: &DiscreteAttribute) -> i64 {
    members.len() as i64 - max_distinct_matching(members, attr) as i64
}

fn round_half_to_even_ratio(numerator: i64, denominator: i64) -> i64 {
    (numerator as f64 / denominator as f64).round_ties_even() as i64
}

/// Greedily assigns each multi-valued member to whichever admissible value
/// currently has the largest shortfall against its ideal count, which
/// minimizes (without an exact guarantee) the total absolute deviation a
/// `diversify` constraint is scored on.
fn diversify_miss(
    members: &[usize],
    attr: &DiscreteAttribute,
    total_participants: usize,
) -> i64 {
    let num_values = attr.values.len();
    let ideal: Vec<i64> = attr
        .pop_count
        .iter()
        .map(|&pop| round_half_to_even_ratio(members.len() as i64 * pop as i64, total_participants as i64))
        .collect();
    let mut count = vec![0i64; num_values];

    let mut order: Vec<usize> = members.to_vec();
    order.sort_by_key(|&i| attr.admissible[i].len());
    for i in order {
        let chosen = attr.admissible[i]
            .iter()
            .copied()
            .max_by_key(|&v| ideal[v] - count[v])
            .expect("normalizer guarantees at least one admissible value");
        count[chosen] += 1;
    }

    (0..num_values).map(|v| (count[v] - ideal[v]).abs()).sum()
}

/// Evaluates every constraint against a finished assignment.
pub fn evaluate(
    assignment: &[usize],
    team_sizes: &[u32],
    constraints: &[(ConstraintSpec, ConstraintAttribute)],
) -> Vec<MissRow> {
    let num_teams = team_sizes.len();
    let members = members_of(assignment, num_teams);
    let total_participants = assignment.len();

    let mut rows = Vec::new();
    for (spec, data) in constraints {
        for t in 0..num_teams {
            let miss = match data {
                ConstraintAttribute::Discrete(attr) => match spec.kind {
                    ConstraintKind::Cluster => cluster_miss(&members[t], attr),
                    ConstraintKind::Different => different_miss(&members[t], attr),
                    ConstraintKind::Diversify => diversify_miss(&members[t], attr, total_participants),
                    ConstraintKind::ClusterNumeric => unreachable!(
                        "a discrete attribute is never paired with cluster_numeric"
                    ),
                },
                ConstraintAttribute::Numeric(attr) => cluster_numeric_miss(&members[t], attr),
            };
            rows.push(MissRow {
                team_index: t as u32,
                team_size: team_sizes[t],
                attribute: spec.attribute.clone(),
                kind: spec.kind,
                miss,
            });
        }
    }
    rows
}

/// Either normalized form a constraint's attribute can take, so
/// [`evaluate`] doesn't need to re-derive which normalizer to call.
pub enum ConstraintAttribute {
    Discrete(DiscreteAttribute),
    Numeric(NumericAttribute),
}
