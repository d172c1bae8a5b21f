//! Constraint Compiler.
//!
//! Each `compile_*` function appends auxiliary variables, relational
//! constraints, and one weighted cost term to a [`TeamModel`] for a single
//! constraint record. All four share the master `on[i,t]` booleans; none of
//! them create their own.

use super::backend::CpBackend;
use super::model_builder::TeamModel;
use crate::error::TeamFormationError;
use crate::normalizer::{DiscreteAttribute, NumericAttribute};

/// `chose[i,t,v]`, built once per encoder invocation: participant `i`'s
/// claim on value `v` while assigned to team `t`, defined only for `v`
/// admissible to `i`. Shared helper since three of the four encodings need
/// it.
fn build_chose<B: CpBackend>(
    model: &mut TeamModel<B>,
    attr: &DiscreteAttribute,
    claim_is_total: bool,
) -> Vec<Vec<Vec<Option<B::BoolVar>>>> {
    let n = model.num_participants();
    let k = model.num_teams();
    let num_values = attr.values.len();
    let mut chose: Vec<Vec<Vec<Option<B::BoolVar>>>> =
        vec![vec![vec![None; num_values]; k]; n];
    for i in 0..n {
        for &v in &attr.admissible[i] {
            for t in 0..k {
                let var = model.backend_mut().new_bool_var();
                chose[i][t][v] = Some(var);
            }
        }
    }
    for i in 0..n {
        for t in 0..k {
            let terms: Vec<B::BoolVar> = attr.admissible[i]
                .iter()
                .filter_map(|&v| chose[i][t][v].clone())
                .collect();
            let sum: B::LinearExpr = terms.into_iter().collect();
            let on_it = model.on(i, t);
            if claim_is_total {
                // Every present participant claims exactly one admissible
                // value on its team (`different`, `diversify`).
                model.backend_mut().add_eq(sum, on_it.into());
            } else {
                // A participant may decline to claim any value, at the
                // cost of being counted unmatched (`cluster`).
                model.backend_mut().add_le(sum, on_it.into());
            }
        }
    }
    chose
}

/// `cluster`: maximize participants who share a team value.
///
/// A participant's claim is optional (`chose` sums to at most `on[i,t]`,
/// not exactly): a participant who cannot match any of its team's chosen
/// value is simply left unmatched rather than making the model infeasible.
pub fn compile_cluster<B: CpBackend>(
    model: &mut TeamModel<B>,
    attr: &DiscreteAttribute,
    weight: i64,
) -> Result<(), TeamFormationError> {
    let n = model.num_participants();
    let k = model.num_teams();
    let num_values = attr.values.len();
    let chose = build_chose(model, attr, false);

    // team_chosen[t,v]: the single value team t has standardized on.
    let mut team_chosen = vec![vec![None; num_values]; k];
    for t in 0..k {
        let mut row = Vec::with_capacity(num_values);
        for _ in 0..num_values {
            row.push(model.backend_mut().new_bool_var());
        }
        let sum: B::LinearExpr = row.iter().cloned().collect();
        model.backend_mut().add_eq(sum, B::LinearExpr::from(1));
        for (v, var) in row.into_iter().enumerate() {
            team_chosen[t][v] = Some(var);
        }
    }

    for t in 0..k {
        for i in 0..n {
            for &v in &attr.admissible[i] {
                let chose_itv = chose[i][t][v].clone().expect("built for admissible v");
                let team_chosen_tv = team_chosen[t][v].clone().expect("built above");
                model
                    .backend_mut()
                    .add_le(chose_itv.into(), team_chosen_tv.into());
            }
        }
    }

    // cost = N - total number of successful claims.
    let mut claim_vars = Vec::new();
    for i in 0..n {
        for t in 0..k {
            for &v in &attr.admissible[i] {
                if let Some(var) = chose[i][t][v].clone() {
                    claim_vars.push(var);
                }
            }
        }
    }
    let total_claims: B::LinearExpr = claim_vars.into_iter().collect();
    let cost = B::LinearExpr::from(n as i64) + total_claims * (-1);
    model.backend_mut().add_weighted_cost(weight, cost);
    Ok(())
}

/// `cluster_numeric`: minimize within-team range of a numeric attribute.
///
/// Each team gets a `mn[t]`/`mx[t]` pair of integer variables bounded by a
/// big-M inequality against every `(i,t)` pair: `mn[t] <= a[i] + M*(1 -
/// on[i,t])` and `mx[t] >= a[i] - M*(1 - on[i,t])`, with `M = hi - lo` the
/// attribute's observed span. For a team member (`on[i,t]=1`) this pins
/// `mn[t] <= a[i] <= mx[t]`; for anyone else the big-M term slackens the
/// bound away. Minimizing `sum(mx[t] - mn[t])` then forces `mn`/`mx` down
/// to the team's true minimum and maximum.
pub fn compile_cluster_numeric<B: CpBackend>(
    model: &mut TeamModel<B>,
    attr: &NumericAttribute,
    weight: i64,
) -> Result<(), TeamFormationError> {
    let n = model.num_participants();
    let k = model.num_teams();
    if attr.lo > attr.hi {
        return Err(TeamFormationError::CompileError(
            "numeric attribute has no observed range".to_string(),
        ));
    }
    let span = attr.hi - attr.lo;

    let mut total_range = B::LinearExpr::from(0);
    for t in 0..k {
        let mn = model.backend_mut().new_int_var(attr.lo, attr.hi);
        let mx = model.backend_mut().new_int_var(attr.lo, attr.hi);
        for i in 0..n {
            let on_it: B::LinearExpr = model.on(i, t).into();
            model.backend_mut().add_le(
                B::LinearExpr::from(mn.clone()) + on_it.clone() * span,
                B::LinearExpr::from(attr.value[i] + span),
            );
            model.backend_mut().add_ge(
                B::LinearExpr::from(mx.clone()) + on_it * (-span),
                B::LinearExpr::from(attr.value[i] - span),
            );
        }
        total_range = total_range + B::LinearExpr::from(mx) + B::LinearExpr::from(mn) * (-1);
    }
    model.backend_mut().add_weighted_cost(weight, total_range);
    Ok(())
}

/// `different`: maximize within-team diversity of distinct values.
pub fn compile_different<B: CpBackend>(
    model: &mut TeamModel<B>,
    attr: &DiscreteAttribute,
    team_sizes: &[u32],
    weight: i64,
) -> Result<(), TeamFormationError> {
    let k = model.num_teams();
    let num_values = attr.values.len();
    let chose = build_chose(model, attr, true);

    let mut total_distinct = B::LinearExpr::from(0);
    for t in 0..k {
        for v in 0..num_values {
            let claimants: Vec<B::BoolVar> = chose
                .iter()
                .filter_map(|row| row[t][v].clone())
                .collect();
            if claimants.is_empty() {
                continue;
            }
            let team_has = model.backend_mut().new_bool_var();
            for c in &claimants {
                model
                    .backend_mut()
                    .add_ge(team_has.clone().into(), c.clone().into());
            }
            let sum: B::LinearExpr = claimants.into_iter().collect();
            model.backend_mut().add_le(team_has.clone().into(), sum);
            total_distinct = total_distinct + B::LinearExpr::from(team_has);
        }
    }
    let total_size: i64 = team_sizes.iter().map(|&s| s as i64).sum();
    let cost = B::LinearExpr::from(total_size) + total_distinct * (-1);
    model.backend_mut().add_weighted_cost(weight, cost);
    Ok(())
}

fn round_half_to_even_ratio(numerator: i64, denominator: i64) -> i64 {
    (numerator as f64 / denominator as f64).round_ties_even() as i64
}

/// `diversify`: approximate the roster's population proportions on every
/// team.
pub fn compile_diversify<B: CpBackend>(
    model: &mut TeamModel<B>,
    attr: &DiscreteAttribute,
    team_sizes: &[u32],
    total_participants: usize,
    weight: i64,
) -> Result<(), TeamFormationError> {
    let k = model.num_teams();
    let num_values = attr.values.len();
    let chose = build_chose(model, attr, true);

    let mut total_dev = B::LinearExpr::from(0);
    for t in 0..k {
        let size_t = team_sizes[t] as i64;
        for v in 0..num_values {
            let ideal = round_half_to_even_ratio(size_t * attr.pop_count[v] as i64, total_participants as i64);
            let claimants: Vec<B::BoolVar> = chose
                .iter()
                .filter_map(|row| row[t][v].clone())
                .collect();
            let team_count: B::LinearExpr = claimants.into_iter().collect();
            let dev = model.backend_mut().new_int_var(0, size_t.max(ideal));
            let dev_expr = B::LinearExpr::from(dev);
            model.backend_mut().add_ge(
                dev_expr.clone(),
                team_count.clone() + B::LinearExpr::from(-ideal),
            );
            model.backend_mut().add_ge(
                dev_expr.clone(),
                B::LinearExpr::from(ideal) + team_count * (-1),
            );
            total_dev = total_dev + dev_expr;
        }
    }
    model.backend_mut().add_weighted_cost(weight, total_dev);
    Ok(())
}
