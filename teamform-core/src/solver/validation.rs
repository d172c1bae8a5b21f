//! Input validation: the `BadRequest` checks every solve runs before
//! touching the normalizer or the backend.

use crate::error::TeamFormationError;
use crate::models::ApiInput;

pub fn validate_input(input: &ApiInput) -> Result<(), TeamFormationError> {
    if input.participants.len() < 3 {
        return Err(TeamFormationError::BadRequest(format!(
            "at least 3 participants are required, got {}",
            input.participants.len()
        )));
    }
    if input.target_team_size <= 2 {
        return Err(TeamFormationError::BadRequest(
            "target_team_size must be greater than 2".to_string(),
        ));
    }
    if input.max_time == 0 {
        return Err(TeamFormationError::BadRequest(
            "max_time must be greater than 0".to_string(),
        ));
    }
    for constraint in &input.constraints {
        if !(constraint.weight > 0.0) {
            return Err(TeamFormationError::BadRequest(format!(
                "constraint weight for `{}` must be greater than 0, got {}",
                constraint.attribute, constraint.weight
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConstraintKind, ConstraintSpec, Participant, ParticipantId};
    use std::collections::HashMap;

    fn minimal_input() -> ApiInput {
        ApiInput {
            participants: vec![
                Participant {
                    id: ParticipantId::Int(1),
                    attributes: HashMap::new(),
                },
                Participant {
                    id: ParticipantId::Int(2),
                    attributes: HashMap::new(),
                },
                Participant {
                    id: ParticipantId::Int(3),
                    attributes: HashMap::new(),
                },
            ],
            constraints: vec![],
            target_team_size: 3,
            less_than_target: false,
            max_time: 10,
        }
    }

    #[test]
    fn accepts_minimal_valid_input() {
        assert!(validate_input(&minimal_input()).is_ok());
    }

    #[test]
    fn rejects_too_few_participants() {
        let mut input = minimal_input();
        input.participants.truncate(2);
        assert!(matches!(
            validate_input(&input).unwrap_err(),
            TeamFormationError::BadRequest(_)
        ));
    }

    #[test]
    fn rejects_nonpositive_weight() {
        let mut input = minimal_input();
        input.constraints.push(ConstraintSpec {
            attribute: "job".to_string(),
            kind: ConstraintKind::Cluster,
            weight: 0.0,
        });
        assert!(matches!(
            validate_input(&input).unwrap_err(),
            TeamFormationError::BadRequest(_)
        ));
    }

    #[test]
    fn rejects_zero_max_time() {
        let mut input = minimal_input();
        input.max_time = 0;
        assert!(matches!(
            validate_input(&input).unwrap_err(),
            TeamFormationError::BadRequest(_)
        ));
    }
}
