//! Shared test utilities for teamform-core integration tests.

use serde_json::Value;
use std::collections::HashMap;
use teamform_core::models::{ApiInput, ConstraintKind, ConstraintSpec, Participant, ParticipantId};

#[allow(dead_code)]
pub fn participant(id: i64, attrs: &[(&str, Value)]) -> Participant {
    Participant {
        id: ParticipantId::Int(id),
        attributes: attrs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect::<HashMap<_, _>>(),
    }
}

/// An `ApiInput` with `num_participants` participants (a uniform `job`
/// value) and no constraints, suitable for size-only tests.
#[allow(dead_code)]
pub fn uniform_input(num_participants: usize, target_team_size: u32, less_than_target: bool) -> ApiInput {
    ApiInput {
        participants: (0..num_participants)
            .map(|i| participant(i as i64, &[("job", Value::String("Contributor".into()))]))
            .collect(),
        constraints: vec![],
        target_team_size,
        less_than_target,
        max_time: 10,
    }
}

#[allow(dead_code)]
pub fn with_constraint(mut input: ApiInput, attribute: &str, kind: ConstraintKind, weight: f64) -> ApiInput {
    input.constraints.push(ConstraintSpec {
        attribute: attribute.to_string(),
        kind,
        weight,
    });
    input
}
