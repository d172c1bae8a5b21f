//! Derivation of team count and team-size bounds from `(N, T, shrink)`.

use crate::error::TeamFormationError;

/// The two-element (or single-element, when `N` divides `T` evenly) set of
/// team sizes a valid partition may use, plus how many teams take each size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamSizePlan {
    /// Total number of teams.
    pub num_teams: u32,
    /// The smaller of the two admissible sizes.
    pub small_size: u32,
    /// How many teams use `small_size`.
    pub num_small: u32,
    /// The larger of the two admissible sizes (equal to `small_size` when
    /// `N` divides `T` evenly).
    pub large_size: u32,
    /// How many teams use `large_size`.
    pub num_large: u32,
}

impl TeamSizePlan {
    /// The full multiset of team sizes, one entry per team, smallest first.
    pub fn sizes(&self) -> Vec<u32> {
        let mut sizes = Vec::with_capacity(self.num_teams as usize);
        sizes.extend(std::iter::repeat_n(self.small_size, self.num_small as usize));
        sizes.extend(std::iter::repeat_n(self.large_size, self.num_large as usize));
        sizes
    }
}

/// Determines `K` and the team-size multiset from the roster size and the
/// requested target.
///
/// `K` is the smallest team count admitting a valid split across sizes
/// `{T, T+1}` (`shrink=false`) or `{T-1, T}` (`shrink=true`): the smallest
/// `K` with `N <= K*(T+1)` when growing, or the smallest `K` with
/// `N <= K*T` when shrinking. Growing this way drives the count of
/// `T`-sized (smaller) teams as low as possible, which is the explicit
/// goal when `shrink=false`. Shrinking additionally requires at least one
/// team to stay at the full target size `T`; a `K` that would shrink every
/// team (`N == K*(T-1)`) is rejected rather than accepted, since "shrink"
/// means some teams lose a member, not all of them — e.g. `target=3,
/// shrink=true, participants=4` has no `K` satisfying that. Returns
/// [`TeamFormationError::UnsolvableSize`] when no valid `K` exists, or when
/// `target <= 2`.
pub fn derive_team_sizes(
    participants: usize,
    target: u32,
    shrink: bool,
) -> Result<TeamSizePlan, TeamFormationError> {
    if target <= 2 {
        return Err(TeamFormationError::BadRequest(
            "target_team_size must be greater than 2".to_string(),
        ));
    }
    let n = participants as u32;
    let unsolvable = || TeamFormationError::UnsolvableSize {
        participants,
        target,
    };

    // A team of size 1 is always forbidden, independent of N: with shrink
    // and target == 2 every partition would need at least one size-1 team.
    if shrink && target == 2 {
        return Err(unsolvable());
    }

    if n % target == 0 {
        let num_teams = n / target;
        return Ok(TeamSizePlan {
            num_teams,
            small_size: target,
            num_small: num_teams,
            large_size: target,
            num_large: 0,
        });
    }

    let (lo, hi) = if shrink {
        (target - 1, target)
    } else {
        (target, target + 1)
    };

    let num_teams = n.div_ceil(hi);
    if num_teams == 0 {
        return Err(unsolvable());
    }
    if n < num_teams * lo || n > num_teams * hi {
        return Err(unsolvable());
    }
    // Shrinking every team to `lo` defeats the purpose of shrinking: at
    // least one team must stay at the full target size.
    if shrink && n == num_teams * lo {
        return Err(unsolvable());
    }
    let num_large = n - num_teams * lo;
    let num_small = num_teams - num_large;
    Ok(TeamSizePlan {
        num_teams,
        small_size: lo,
        num_small,
        large_size: hi,
        num_large,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_division() {
        let plan = derive_team_sizes(9, 3, false).unwrap();
        assert_eq!(plan.num_teams, 3);
        assert_eq!(plan.sizes(), vec![3, 3, 3]);
    }

    #[test]
    fn grow_by_one() {
        // 10 participants, target 3, no shrink: 3 teams of {3,3,4}.
        let plan = derive_team_sizes(10, 3, false).unwrap();
        assert_eq!(plan.num_teams, 3);
        let mut sizes = plan.sizes();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![3, 3, 4]);
    }

    #[test]
    fn shrink_by_one() {
        // 8 participants, target 3, shrink: teams of {2,3,3} (2+3+3=8).
        let plan = derive_team_sizes(8, 3, true).unwrap();
        assert_eq!(plan.num_teams, 3);
        let mut sizes = plan.sizes();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![2, 3, 3]);
    }

    #[test]
    fn shrink_size_one_forbidden() {
        // N=4, T=3, shrink=true: the only K covering 4 participants with
        // sizes {2,3} is K=2, and that shrinks both teams to size 2 —
        // no team stays at the full target, so this is rejected.
        let err = derive_team_sizes(4, 3, true).unwrap_err();
        assert!(matches!(err, TeamFormationError::UnsolvableSize { .. }));
    }

    #[test]
    fn grow_picks_minimal_team_count_not_nearest() {
        // 11 participants, target 3, no shrink: K=3 with sizes {3,4,4}
        // fits, and it's the only valid K (rounding N/T to the nearest
        // integer would wrongly try K=4, which 11 participants can't fill
        // at sizes {3,4}).
        let plan = derive_team_sizes(11, 3, false).unwrap();
        assert_eq!(plan.num_teams, 3);
        let mut sizes = plan.sizes();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![3, 4, 4]);
    }

    #[test]
    fn grow_prefers_all_large_teams_when_it_divides_evenly() {
        // 20 participants, target 3, no shrink: K=5 teams of 4 uses zero
        // target-sized teams, which is the minimal "smaller team count";
        // K=6 would also fit numerically but isn't the minimizing choice.
        let plan = derive_team_sizes(20, 3, false).unwrap();
        assert_eq!(plan.num_teams, 5);
        assert_eq!(plan.sizes(), vec![4, 4, 4, 4, 4]);
    }

    #[test]
    fn shrink_picks_minimal_team_count() {
        // 16 participants, target 3, shrink: K=6 with sizes {2,2,3,3,3,3}.
        let plan = derive_team_sizes(16, 3, true).unwrap();
        assert_eq!(plan.num_teams, 6);
        let mut sizes = plan.sizes();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![2, 2, 3, 3, 3, 3]);
    }

    #[test]
    fn single_team_when_n_equals_target() {
        let plan = derive_team_sizes(5, 5, true).unwrap();
        assert_eq!(plan.num_teams, 1);
        assert_eq!(plan.sizes(), vec![5]);
    }

    #[test]
    fn diversify_boundary_six_participants() {
        // N=6, T=3, exact division -> 2 teams of 3.
        let plan = derive_team_sizes(6, 3, false).unwrap();
        assert_eq!(plan.num_teams, 2);
        assert_eq!(plan.sizes(), vec![3, 3]);
    }

    #[test]
    fn target_too_small() {
        assert!(matches!(
            derive_team_sizes(10, 2, false).unwrap_err(),
            TeamFormationError::BadRequest(_)
        ));
    }
}
