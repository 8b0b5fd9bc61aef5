//! Single-route builder and repair operator.
//!
//! [`extend_route`] grows one vehicle's route by always appending the nearest
//! remaining location that passes the validator. [`repair`] offers every
//! location left out of a plan to every vehicle and records why the rest
//! could not be placed.
//!
//! Repair does not reuse the nearest-first rule. It keeps each route's
//! order, takes leftovers highest priority first and appends each one to
//! whichever vehicle's closed route grows least in cost.

use crate::engine::{Plan, ProblemContext};
use crate::evaluation::validator::failure_rank;
use crate::evaluation::{can_append, close_route, RouteState};
use crate::models::PlacementFailure;

/// Appends nearest feasible locations to `sequence` until none fits.
///
/// `state` is the state after the current last stop of `sequence`.
/// Locations are marked in `assigned` as they are taken. Ties in distance
/// go to the lower location index.
pub fn extend_route(
    ctx: &ProblemContext<'_>,
    mut state: RouteState,
    sequence: &mut Vec<usize>,
    assigned: &mut [bool],
) -> RouteState {
    let matrix = ctx.matrix();
    loop {
        let mut candidates: Vec<(f64, usize)> = (0..assigned.len())
            .filter(|&i| !assigned[i])
            .map(|i| (matrix.distance(state.node, i), i))
            .collect();
        if candidates.is_empty() {
            return state;
        }
        candidates.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        let next = candidates
            .iter()
            .find_map(|&(_, i)| can_append(ctx, &state, i).ok().map(|step| (i, step)));
        match next {
            Some((i, step)) => {
                assigned[i] = true;
                sequence.push(i);
                state = step.state;
            }
            None => return state,
        }
    }
}

/// Builds vehicle `v`'s route from scratch over the unassigned locations.
pub fn build_route(ctx: &ProblemContext<'_>, v: usize, assigned: &mut [bool]) -> Vec<usize> {
    let mut sequence = Vec::new();
    extend_route(ctx, RouteState::start(ctx, v), &mut sequence, assigned);
    sequence
}

/// Open (not yet closed) state after each vehicle's route.
///
/// A route that fails validation is cut before the first failing stop;
/// the cut stops are returned so they can be re-placed.
pub(crate) fn route_states(ctx: &ProblemContext<'_>, plan: &mut Plan) -> (Vec<RouteState>, Vec<usize>) {
    let mut states = Vec::with_capacity(ctx.num_vehicles());
    let mut dropped = Vec::new();
    for (v, seq) in plan.routes_mut().iter_mut().enumerate() {
        let mut state = RouteState::start(ctx, v);
        let mut keep = seq.len();
        for (pos, &loc) in seq.iter().enumerate() {
            match can_append(ctx, &state, loc) {
                Ok(step) => state = step.state,
                Err(_) => {
                    keep = pos;
                    break;
                }
            }
        }
        dropped.extend(seq.drain(keep..));
        states.push(state);
    }
    (states, dropped)
}

/// Places every location missing from `plan` where it is cheapest to
/// append, then records a reason for each location that still does not fit.
///
/// Leftovers are offered in descending priority, then by index. The
/// resulting plan covers every context location exactly once across routes
/// and `unassigned`.
pub fn repair(ctx: &ProblemContext<'_>, plan: &mut Plan) {
    let (mut states, dropped) = route_states(ctx, plan);
    let mut assigned = plan.assigned_mask(ctx.num_locations());
    for i in dropped {
        assigned[i] = false;
    }

    let mut leftovers: Vec<usize> = (0..ctx.num_locations()).filter(|&i| !assigned[i]).collect();
    leftovers.sort_by(|&a, &b| {
        ctx.location(b)
            .priority()
            .cmp(&ctx.location(a).priority())
            .then(a.cmp(&b))
    });

    let mut unassigned = Vec::new();
    for loc in leftovers {
        let mut best: Option<(f64, usize, RouteState)> = None;
        let mut reason: Option<PlacementFailure> = None;
        for (v, state) in states.iter().enumerate() {
            match can_append(ctx, state, loc) {
                Ok(step) => {
                    let before = close_route(ctx, state).cost;
                    let delta = close_route(ctx, &step.state).cost - before;
                    if best.as_ref().is_none_or(|(d, _, _)| delta < *d) {
                        best = Some((delta, v, step.state));
                    }
                }
                Err(failure) => {
                    if reason.is_none_or(|r| failure_rank(failure) > failure_rank(r)) {
                        reason = Some(failure);
                    }
                }
            }
        }
        match (best, reason) {
            (Some((_, v, state)), _) => {
                plan.routes_mut()[v].push(loc);
                states[v] = state;
            }
            (None, Some(failure)) => unassigned.push((loc, failure)),
            // no vehicles at all; the orchestrator rejects an empty fleet
            (None, None) => unassigned.push((loc, PlacementFailure::CapabilityMismatch)),
        }
    }
    unassigned.sort_by_key(|&(i, _)| i);
    plan.set_unassigned(unassigned);
}
