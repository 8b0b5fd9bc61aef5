//! Intra-route 2-opt improvement.
//!
//! # Algorithm
//!
//! For a route `s -> r[0] -> ... -> r[n-1] (-> e)`, reversing the segment
//! `r[i..=j]` replaces two edges:
//!
//! ```text
//! delta = d(prev_i, r[j]) + d(r[i], next_j) - d(prev_i, r[i]) - d(r[j], next_j)
//! ```
//!
//! where `prev_i` is the vehicle start when `i == 0` and `next_j` is the end
//! node when `j == n-1` (no edge at all for an open route). A reversal is
//! applied when `delta < 0` and the reversed sequence still passes the
//! validator. First improvement; the scan restarts after every accepted move
//! until a full pass finds nothing or the move cap is hit.
//!
//! # Complexity
//!
//! O(n²) delta evaluations per pass, each accepted move costs an O(n)
//! feasibility check.
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use tracing::debug;

use crate::engine::{Plan, ProblemContext};
use crate::evaluation::check_sequence;
use crate::models::ImprovementReport;

const IMPROVEMENT_EPS: f64 = 1e-10;

/// Driving distance of vehicle `v` over `sequence`, start and closing leg included.
///
/// # Examples
///
/// ```
/// use fleet_routing::config::OptimizationConfig;
/// use fleet_routing::engine::ProblemContext;
/// use fleet_routing::geometry::Coordinates;
/// use fleet_routing::local_search::route_distance;
/// use fleet_routing::models::{Capacity, Location, Vehicle};
///
/// let vehicles = vec![Vehicle::new("v", Coordinates::new(10.0, 106.0), Capacity::weight(100.0))];
/// let locations = vec![Location::delivery("a", 10.1, 106.0, 1.0)];
/// let config = OptimizationConfig::default();
/// let ctx = ProblemContext::new(&vehicles, locations.iter().collect(), &config, 0).unwrap();
///
/// let there = ctx.matrix().distance(ctx.start_node(0), 0);
/// assert!((route_distance(&ctx, 0, &[0]) - 2.0 * there).abs() < 1e-9);
/// assert_eq!(route_distance(&ctx, 0, &[]), 0.0);
/// ```
pub fn route_distance(ctx: &ProblemContext<'_>, v: usize, sequence: &[usize]) -> f64 {
    let (Some(&first), Some(&last)) = (sequence.first(), sequence.last()) else {
        return 0.0;
    };
    let matrix = ctx.matrix();
    let mut dist = matrix.distance(ctx.start_node(v), first);
    for pair in sequence.windows(2) {
        dist += matrix.distance(pair[0], pair[1]);
    }
    if ctx.has_closing_leg(v) {
        dist += matrix.distance(last, ctx.end_node(v));
    }
    dist
}

/// Applies 2-opt to vehicle `v`'s stop sequence.
///
/// Only reversals that shorten the route and keep it feasible are taken, so
/// the returned sequence is never longer than the input. At most
/// `max_moves` reversals are applied. Returns the improved sequence and the
/// number of reversals.
pub fn two_opt_route(
    ctx: &ProblemContext<'_>,
    v: usize,
    sequence: &[usize],
    max_moves: usize,
) -> (Vec<usize>, usize) {
    let mut current = sequence.to_vec();
    if current.len() < 2 || check_sequence(ctx, v, &current).is_err() {
        return (current, 0);
    }

    let n = current.len();
    let mut moves = 0;
    let mut improved = true;
    while improved && moves < max_moves {
        improved = false;
        'scan: for i in 0..n - 1 {
            for j in i + 1..n {
                if two_opt_delta(ctx, v, &current, i, j) >= -IMPROVEMENT_EPS {
                    continue;
                }
                current[i..=j].reverse();
                if check_sequence(ctx, v, &current).is_ok() {
                    moves += 1;
                    improved = true;
                    break 'scan;
                }
                current[i..=j].reverse();
            }
        }
    }
    (current, moves)
}

/// Distance change from reversing `route[i..=j]`.
fn two_opt_delta(ctx: &ProblemContext<'_>, v: usize, route: &[usize], i: usize, j: usize) -> f64 {
    let matrix = ctx.matrix();
    let n = route.len();
    let prev_i = if i == 0 { ctx.start_node(v) } else { route[i - 1] };
    let next_j = if j + 1 < n {
        Some(route[j + 1])
    } else if ctx.has_closing_leg(v) {
        Some(ctx.end_node(v))
    } else {
        None
    };

    let (old_tail, new_tail) = match next_j {
        Some(next) => (matrix.distance(route[j], next), matrix.distance(route[i], next)),
        None => (0.0, 0.0),
    };
    let old_cost = matrix.distance(prev_i, route[i]) + old_tail;
    let new_cost = matrix.distance(prev_i, route[j]) + new_tail;
    new_cost - old_cost
}

/// Runs [`two_opt_route`] on every route of `plan` in place.
///
/// Routes are independent; unassigned locations are left untouched.
pub fn improve_plan(ctx: &ProblemContext<'_>, plan: &mut Plan, max_moves: usize) -> ImprovementReport {
    let mut report = ImprovementReport::default();
    for (v, route) in plan.routes_mut().iter_mut().enumerate() {
        let before = route_distance(ctx, v, route);
        let (improved, moves) = two_opt_route(ctx, v, route, max_moves);
        let after = route_distance(ctx, v, &improved);
        if moves > 0 {
            debug!(vehicle = ctx.vehicle(v).id(), moves, before, after, "2-opt improved route");
        }
        report.moves_applied += moves;
        report.distance_before_km += before;
        report.distance_after_km += after;
        *route = improved;
    }
    report
}
