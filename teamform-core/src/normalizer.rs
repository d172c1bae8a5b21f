//! Attribute Normalizer.
//!
//! Converts a roster column into the canonical form the constraint encoders
//! consume: discrete attributes become integer category ids with, per
//! participant, the set of ids admissible for multi-valued cells; numeric
//! attributes become bounded integers.

use crate::error::TeamFormationError;
use crate::models::Participant;
use serde_json::Value;
use std::collections::BTreeMap;

/// A normalized discrete attribute: a stable `value -> id` map plus, per
/// participant (by roster index), the set of admissible ids.
#[derive(Debug, Clone)]
pub struct DiscreteAttribute {
    /// `id -> canonical string form`, in ascending id order.
    pub values: Vec<String>,
    /// `admissible[i]` is the set of value ids participant `i` may claim.
    pub admissible: Vec<Vec<usize>>,
    /// `pop_count[v]` is the number of participants admitting value `v`,
    /// counting a multi-valued participant once per admissible value.
    pub pop_count: Vec<usize>,
}

/// A normalized numeric attribute: an integer reading per participant plus
/// the observed `[min, max]` bounds.
#[derive(Debug, Clone)]
pub struct NumericAttribute {
    /// `value[i]` is participant `i`'s integer reading.
    pub value: Vec<i64>,
    pub lo: i64,
    pub hi: i64,
}

fn raw_value<'a>(
    participants: &'a [Participant],
    index: usize,
    attribute: &str,
) -> Result<&'a Value, TeamFormationError> {
    participants[index].attributes.get(attribute).ok_or_else(|| {
        TeamFormationError::BadRequest(format!(
            "attribute `{attribute}` is missing on participant {}",
            participants[index].id
        ))
    })
}

/// Renders a JSON scalar to the canonical string used for ordering and
/// deduplicating discrete attribute values. Ordering is by this string,
/// lexicographically; the caller is responsible for breaking ties by first
/// observed occurrence (done by `normalize_discrete` via a `BTreeMap` keyed
/// on this string, which is itself stable under insertion order for equal
/// keys because each key is only ever inserted once).
fn canonical_scalar(value: &Value) -> Result<String, TeamFormationError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(TeamFormationError::BadRequest(format!(
            "attribute value {other} is not a discrete scalar"
        ))),
    }
}

/// Splits a single roster cell into its admissible scalar values.
///
/// `_list`-suffixed attributes accept either a JSON array or a
/// semicolon-delimited string; both must yield identical results.
fn cell_scalars(attribute: &str, value: &Value) -> Result<Vec<String>, TeamFormationError> {
    let is_multi = attribute.ends_with("_list");
    match value {
        Value::Array(items) => items.iter().map(canonical_scalar).collect(),
        Value::String(s) if is_multi => Ok(s
            .split(';')
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect()),
        other => Ok(vec![canonical_scalar(other)?]),
    }
}

/// Normalizes a discrete attribute across the whole roster.
///
/// Returns [`TeamFormationError::EmptyDomain`] if no participant has any
/// admissible value for `attribute`.
pub fn normalize_discrete(
    participants: &[Participant],
    attribute: &str,
) -> Result<DiscreteAttribute, TeamFormationError> {
    let mut per_participant: Vec<Vec<String>> = Vec::with_capacity(participants.len());
    for i in 0..participants.len() {
        let raw = raw_value(participants, i, attribute)?;
        per_participant.push(cell_scalars(attribute, raw)?);
    }

    // Deterministic ordering: sort the distinct canonical strings. Ties are
    // impossible here since a `BTreeSet` of `String` never has duplicate keys.
    let mut distinct: BTreeMap<String, usize> = BTreeMap::new();
    for scalars in &per_participant {
        for s in scalars {
            let next_id = distinct.len();
            distinct.entry(s.clone()).or_insert(next_id);
        }
    }
    if distinct.is_empty() {
        return Err(TeamFormationError::EmptyDomain(attribute.to_string()));
    }

    // Re-derive ids in sorted key order (BTreeMap iteration is already
    // sorted by key, but the ids assigned above reflect insertion order;
    // re-map to rank-in-sorted-order for a canonical, input-independent id
    // assignment).
    let values: Vec<String> = distinct.keys().cloned().collect();
    let id_of: BTreeMap<&str, usize> = values
        .iter()
        .enumerate()
        .map(|(id, v)| (v.as_str(), id))
        .collect();

    let mut admissible = Vec::with_capacity(participants.len());
    let mut pop_count = vec![0usize; values.len()];
    for scalars in &per_participant {
        let mut ids: Vec<usize> = scalars.iter().map(|s| id_of[s.as_str()]).collect();
        ids.sort_unstable();
        ids.dedup();
        for &v in &ids {
            pop_count[v] += 1;
        }
        admissible.push(ids);
    }

    Ok(DiscreteAttribute {
        values,
        admissible,
        pop_count,
    })
}

/// Casts a JSON value to an integer, rounding half to even.
fn coerce_integer(attribute: &str, value: &Value) -> Result<i64, TeamFormationError> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i)
            } else if let Some(f) = n.as_f64() {
                if !f.is_finite() {
                    return Err(TeamFormationError::NonNumericAttribute {
                        attribute: attribute.to_string(),
                        reason: "value is not finite".to_string(),
                    });
                }
                Ok(round_half_to_even(f))
            } else {
                Err(TeamFormationError::NonNumericAttribute {
                    attribute: attribute.to_string(),
                    reason: "value is not representable as a number".to_string(),
                })
            }
        }
        Value::String(s) => s.parse::<f64>().map(round_half_to_even).map_err(|_| {
            TeamFormationError::NonNumericAttribute {
                attribute: attribute.to_string(),
                reason: format!("`{s}` does not parse as a number"),
            }
        }),
        other => Err(TeamFormationError::NonNumericAttribute {
            attribute: attribute.to_string(),
            reason: format!("{other} is not coercible to a number"),
        }),
    }
}

fn round_half_to_even(x: f64) -> i64 {
    // f64::round_ties_even is the direct primitive for this.
    x.round_ties_even() as i64
}

/// Normalizes a numeric attribute across the whole roster, for use by
/// `cluster_numeric`.
pub fn normalize_numeric(
    participants: &[Participant],
    attribute: &str,
) -> Result<NumericAttribute, TeamFormationError> {
    let mut value = Vec::with_capacity(participants.len());
    for i in 0..participants.len() {
        let raw = raw_value(participants, i, attribute)?;
        value.push(coerce_integer(attribute, raw)?);
    }
    let lo = *value.iter().min().ok_or_else(|| {
        TeamFormationError::EmptyDomain(attribute.to_string())
    })?;
    let hi = *value.iter().max().unwrap();
    Ok(NumericAttribute { value, lo, hi })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ParticipantId;
    use std::collections::HashMap;

    fn participant(id: i64, attrs: &[(&str, Value)]) -> Participant {
        Participant {
            id: ParticipantId::Int(id),
            attributes: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect::<HashMap<_, _>>(),
        }
    }

    #[test]
    fn discrete_single_valued() {
        let roster = vec![
            participant(1, &[("job", Value::String("Manager".into()))]),
            participant(2, &[("job", Value::String("Contributor".into()))]),
            participant(3, &[("job", Value::String("Manager".into()))]),
        ];
        let attr = normalize_discrete(&roster, "job").unwrap();
        assert_eq!(attr.values.len(), 2);
        assert_eq!(attr.admissible[0].len(), 1);
        assert_eq!(attr.admissible[0], attr.admissible[2]);
        assert_ne!(attr.admissible[0], attr.admissible[1]);
    }

    #[test]
    fn discrete_multi_valued_list_and_string_agree() {
        let array_form = participant(
            1,
            &[(
                "working_time_list",
                Value::Array(vec![Value::String("AM".into()), Value::String("PM".into())]),
            )],
        );
        let string_form = participant(
            2,
            &[("working_time_list", Value::String("AM;PM".into()))],
        );
        let roster = vec![array_form, string_form];
        let attr = normalize_discrete(&roster, "working_time_list").unwrap();
        let mut a = attr.admissible[0].clone();
        let mut b = attr.admissible[1].clone();
        a.sort_unstable();
        b.sort_unstable();
        assert_eq!(a, b);
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn numeric_bounds() {
        let roster: Vec<Participant> = [1, 2, 3, 10, 11, 12, 20, 21, 22]
            .iter()
            .enumerate()
            .map(|(i, &year)| {
                participant(
                    i as i64,
                    &[("years", Value::Number(serde_json::Number::from(year)))],
                )
            })
            .collect();
        let attr = normalize_numeric(&roster, "years").unwrap();
        assert_eq!(attr.lo, 1);
        assert_eq!(attr.hi, 22);
        assert_eq!(attr.value[3], 10);
    }

    #[test]
    fn missing_attribute_is_bad_request() {
        let roster = vec![participant(1, &[])];
        assert!(matches!(
            normalize_discrete(&roster, "job").unwrap_err(),
            TeamFormationError::BadRequest(_)
        ));
    }

    #[test]
    fn non_numeric_rejected() {
        let roster = vec![participant(1, &[("job", Value::String("Manager".into()))])];
        assert!(matches!(
            normalize_numeric(&roster, "job").unwrap_err(),
            TeamFormationError::NonNumericAttribute { .. }
        ));
    }
}
