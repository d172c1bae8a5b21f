//! Property-based tests for the pure, solver-independent pieces of the
//! engine: team-size derivation and attribute normalization. The CP-SAT
//! solve itself is deliberately left out of the proptest fuzz loop — each
//! invocation is too expensive to run hundreds of times per test.

use proptest::prelude::*;
use serde_json::Value;
use std::collections::HashMap;
use teamform_core::models::{Participant, ParticipantId};
use teamform_core::normalizer::normalize_discrete;
use teamform_core::team_sizes::derive_team_sizes;

fn participant(id: i64, job: &str) -> Participant {
    let mut attributes = HashMap::new();
    attributes.insert("job".to_string(), Value::String(job.to_string()));
    Participant {
        id: ParticipantId::Int(id),
        attributes,
    }
}

/// Brute-force oracle for whether any team count admits a valid split,
/// independent of `derive_team_sizes`'s closed-form choice of `K`: scans
/// every candidate `K` rather than computing one directly, so it catches
/// cases where the closed form picks (or rejects) the wrong `K`.
fn a_valid_plan_exists(n: u32, target: u32, shrink: bool) -> bool {
    if target <= 2 || (shrink && target == 2) {
        return false;
    }
    if n % target == 0 {
        return true;
    }
    let (lo, hi) = if shrink { (target - 1, target) } else { (target, target + 1) };
    (1..=n).any(|k| {
        if n < k * lo || n > k * hi {
            return false;
        }
        !(shrink && n == k * lo)
    })
}

proptest! {
    /// Whenever a size plan exists, its teams sum back to the original
    /// participant count and every size lies in the two-element set the
    /// plan reports.
    #[test]
    fn team_sizes_partition_exactly(
        n in 3usize..60,
        target in 3u32..12,
        shrink in any::<bool>(),
    ) {
        if let Ok(plan) = derive_team_sizes(n, target, shrink) {
            let sizes = plan.sizes();
            prop_assert_eq!(sizes.len(), plan.num_teams as usize);
            prop_assert_eq!(sizes.iter().map(|&s| s as usize).sum::<usize>(), n);
            for &size in &sizes {
                prop_assert!(size == plan.small_size || size == plan.large_size);
                prop_assert!(size >= 2);
            }
        }
    }

    /// `derive_team_sizes` must succeed exactly when some team count
    /// admits a valid split — it must never reject an N/target/shrink
    /// combination a brute-force scan over K shows is solvable.
    #[test]
    fn derive_team_sizes_succeeds_whenever_a_plan_exists(
        n in 3u32..60,
        target in 3u32..12,
        shrink in any::<bool>(),
    ) {
        let expected = a_valid_plan_exists(n, target, shrink);
        let actual = derive_team_sizes(n as usize, target, shrink).is_ok();
        prop_assert_eq!(actual, expected);
    }

    /// Exact division never needs a second size class.
    #[test]
    fn exact_division_has_a_single_size(n_teams in 1u32..20, target in 3u32..12) {
        let n = (n_teams * target) as usize;
        let plan = derive_team_sizes(n, target, false).unwrap();
        prop_assert_eq!(plan.num_teams, n_teams);
        prop_assert_eq!(plan.small_size, plan.large_size);
    }

    /// A discrete attribute's admissible-id sets are always within bounds
    /// and single-valued cells yield exactly one id.
    #[test]
    fn normalize_discrete_ids_are_in_bounds(
        jobs in prop::collection::vec("[a-c]", 3..20)
    ) {
        let roster: Vec<Participant> = jobs
            .iter()
            .enumerate()
            .map(|(i, job)| participant(i as i64, job))
            .collect();
        let attr = normalize_discrete(&roster, "job").unwrap();
        for ids in &attr.admissible {
            prop_assert_eq!(ids.len(), 1);
            prop_assert!(ids[0] < attr.values.len());
        }
        prop_assert_eq!(attr.pop_count.len(), attr.values.len());
        prop_assert_eq!(attr.pop_count.iter().sum::<usize>(), roster.len());
    }
}
