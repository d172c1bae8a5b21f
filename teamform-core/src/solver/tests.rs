use super::*;
use crate::models::{ApiInput, ConstraintKind, ConstraintSpec, Participant, ParticipantId};
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

fn participant(id: i64, attrs: &[(&str, serde_json::Value)]) -> Participant {
    Participant {
        id: ParticipantId::Int(id),
        attributes: attrs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect::<HashMap<_, _>>(),
    }
}

/// A small fixed roster used across several scenario tests below.
fn scenario_roster() -> Vec<Participant> {
    let rows: &[(i64, &str, &str)] = &[
        (8, "M", "Manager"),
        (9, "M", "Executive"),
        (10, "F", "Executive"),
        (16, "M", "Manager"),
        (18, "F", "Contributor"),
        (20, "F", "Manager"),
        (21, "M", "Executive"),
        (29, "M", "Contributor"),
        (31, "F", "Contributor"),
    ];
    rows.iter()
        .map(|&(id, gender, job)| {
            participant(
                id,
                &[
                    ("gender", json!(gender)),
                    ("job_function", json!(job)),
                ],
            )
        })
        .collect()
}

#[test]
fn unsolvable_size_is_rejected_before_building_a_model() {
    let input = ApiInput {
        participants: (0..4)
            .map(|i| participant(i, &[("gender", json!("M"))]))
            .collect(),
        constraints: vec![],
        target_team_size: 3,
        less_than_target: true,
        max_time: 5,
    };
    let cancel = Arc::new(AtomicBool::new(false));
    let err = compile_and_solve(&input, &cancel, |_| {}).unwrap_err();
    assert!(matches!(err, TeamFormationError::UnsolvableSize { .. }));
}

#[test]
fn nonpositive_weight_is_rejected() {
    let input = ApiInput {
        participants: scenario_roster(),
        constraints: vec![ConstraintSpec {
            attribute: "job_function".to_string(),
            kind: ConstraintKind::Cluster,
            weight: 0.0,
        }],
        target_team_size: 3,
        less_than_target: false,
        max_time: 5,
    };
    let cancel = Arc::new(AtomicBool::new(false));
    let err = compile_and_solve(&input, &cancel, |_| {}).unwrap_err();
    assert!(matches!(err, TeamFormationError::BadRequest(_)));
}

#[test]
fn cluster_numeric_solve_partitions_into_balanced_ranges() {
    // years = [1,2,3,10,11,12,20,21,22] splits cleanly into three
    // triplets each spanning a range of 2, for a total objective of 6.
    let years = [1, 2, 3, 10, 11, 12, 20, 21, 22];
    let input = ApiInput {
        participants: years
            .iter()
            .enumerate()
            .map(|(i, &y)| participant(i as i64, &[("years", json!(y))]))
            .collect(),
        constraints: vec![ConstraintSpec {
            attribute: "years".to_string(),
            kind: ConstraintKind::ClusterNumeric,
            weight: 1.0,
        }],
        target_team_size: 3,
        less_than_target: false,
        max_time: 10,
    };
    let cancel = Arc::new(AtomicBool::new(false));
    let outcome = compile_and_solve(&input, &cancel, |_| {}).unwrap();
    assert_eq!(outcome.assignment.len(), years.len());
    assert_eq!(outcome.team_sizes, vec![3, 3, 3]);
    // An optimal solver must find the partition with zero cross-cluster
    // range, i.e. objective 2+2+2 = 6 scaled by WEIGHT_SCALE.
    assert_eq!(outcome.objective_value, 6 * WEIGHT_SCALE as i64);
}

#[test]
fn every_participant_lands_on_exactly_one_team_of_a_valid_size() {
    let input = ApiInput {
        participants: scenario_roster(),
        constraints: vec![ConstraintSpec {
            attribute: "job_function".to_string(),
            kind: ConstraintKind::Cluster,
            weight: 1.0,
        }],
        target_team_size: 3,
        less_than_target: false,
        max_time: 10,
    };
    let cancel = Arc::new(AtomicBool::new(false));
    let outcome = compile_and_solve(&input, &cancel, |_| {}).unwrap();
    assert_eq!(outcome.assignment.len(), 9);
    let mut counts = vec![0u32; outcome.team_sizes.len()];
    for &team in &outcome.assignment {
        counts[team] += 1;
    }
    assert_eq!(counts, outcome.team_sizes);
}

#[test]
fn solution_count_strictly_increases() {
    let input = ApiInput {
        participants: scenario_roster(),
        constraints: vec![ConstraintSpec {
            attribute: "job_function".to_string(),
            kind: ConstraintKind::Cluster,
            weight: 1.0,
        }],
        target_team_size: 3,
        less_than_target: false,
        max_time: 10,
    };
    let cancel = Arc::new(AtomicBool::new(false));
    let mut last_seen = 0u64;
    let outcome = compile_and_solve(&input, &cancel, |record| {
        assert!(record.solution_count > last_seen);
        last_seen = record.solution_count;
    })
    .unwrap();
    assert_eq!(last_seen, outcome.solution_count);
}
