//! Neighborhood moves on a plan.
//!
//! A move touches at most two routes; those routes are re-validated and the
//! move is discarded when either no longer passes.

use rand::Rng;

use crate::engine::{Plan, ProblemContext};
use crate::evaluation::check_sequence;

/// Kind of neighborhood move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// Exchange two stops, within a route or between routes.
    Swap,
    /// Move one stop to another position, possibly on another route.
    Relocate,
    /// Insert an unassigned location into a route.
    Insert,
}

/// Random feasible neighbor of `plan`, or `None` when the drawn move does
/// not apply or breaks a constraint.
pub fn random_neighbor<R: Rng>(ctx: &ProblemContext<'_>, plan: &Plan, rng: &mut R) -> Option<Plan> {
    let kind = if !plan.unassigned().is_empty() && rng.random_range(0.0..1.0) < 0.3 {
        Move::Insert
    } else if rng.random_range(0.0..1.0) < 0.6 {
        Move::Swap
    } else {
        Move::Relocate
    };
    apply(ctx, plan, kind, rng)
}

/// Applies a move of the given kind at random positions.
pub fn apply<R: Rng>(ctx: &ProblemContext<'_>, plan: &Plan, kind: Move, rng: &mut R) -> Option<Plan> {
    let stops: Vec<(usize, usize)> = plan
        .routes()
        .iter()
        .enumerate()
        .flat_map(|(v, seq)| (0..seq.len()).map(move |p| (v, p)))
        .collect();
    let mut next = plan.clone();
    let touched = match kind {
        Move::Swap => {
            if stops.len() < 2 {
                return None;
            }
            let (va, pa) = stops[rng.random_range(0..stops.len())];
            let (vb, pb) = stops[rng.random_range(0..stops.len())];
            if (va, pa) == (vb, pb) {
                return None;
            }
            let routes = next.routes_mut();
            if va == vb {
                routes[va].swap(pa, pb);
            } else {
                let tmp = routes[va][pa];
                routes[va][pa] = routes[vb][pb];
                routes[vb][pb] = tmp;
            }
            (va, vb)
        }
        Move::Relocate => {
            if stops.is_empty() || ctx.num_vehicles() == 0 {
                return None;
            }
            let (vs, ps) = stops[rng.random_range(0..stops.len())];
            let vt = rng.random_range(0..ctx.num_vehicles());
            let routes = next.routes_mut();
            let loc = routes[vs].remove(ps);
            let pt = rng.random_range(0..=routes[vt].len());
            if vs == vt && pt == ps {
                return None;
            }
            routes[vt].insert(pt, loc);
            (vs, vt)
        }
        Move::Insert => {
            if plan.unassigned().is_empty() || ctx.num_vehicles() == 0 {
                return None;
            }
            let k = rng.random_range(0..plan.unassigned().len());
            let (loc, _) = plan.unassigned()[k];
            let vt = rng.random_range(0..ctx.num_vehicles());
            let pt = rng.random_range(0..=plan.route(vt).len());
            next.routes_mut()[vt].insert(pt, loc);
            let mut rest = plan.unassigned().to_vec();
            rest.remove(k);
            next.set_unassigned(rest);
            (vt, vt)
        }
    };

    let (a, b) = touched;
    if check_sequence(ctx, a, next.route(a)).is_err() {
        return None;
    }
    if b != a && check_sequence(ctx, b, next.route(b)).is_err() {
        return None;
    }
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OptimizationConfig;
    use crate::geometry::Coordinates;
    use crate::models::{Capacity, Location, PlacementFailure, Vehicle};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn setup() -> (Vec<Vehicle>, Vec<Location>, OptimizationConfig) {
        let vehicles = vec![
            Vehicle::new("a", Coordinates::new(10.0, 106.0), Capacity::weight(1000.0)),
            Vehicle::new("b", Coordinates::new(10.0, 106.0), Capacity::weight(1000.0)),
        ];
        let locations = (0..5)
            .map(|i| Location::delivery(format!("l{i}"), 10.0 + 0.01 * i as f64, 106.0, 10.0))
            .collect();
        (vehicles, locations, OptimizationConfig::default())
    }

    fn covers_all(plan: &Plan, n: usize) -> bool {
        let mut seen = vec![0; n];
        for &i in plan.routes().iter().flatten() {
            seen[i] += 1;
        }
        for &(i, _) in plan.unassigned() {
            seen[i] += 1;
        }
        seen.iter().all(|&c| c == 1)
    }

    #[test]
    fn test_moves_preserve_location_set() {
        let (vehicles, locations, config) = setup();
        let ctx = ProblemContext::new(&vehicles, locations.iter().collect(), &config, 0)
            .expect("valid");
        let plan = Plan::new(
            vec![vec![0, 1], vec![2, 3]],
            vec![(4, PlacementFailure::CapacityExceeded)],
        );
        let mut rng = StdRng::seed_from_u64(9);
        for kind in [Move::Swap, Move::Relocate, Move::Insert] {
            for _ in 0..50 {
                if let Some(next) = apply(&ctx, &plan, kind, &mut rng) {
                    assert!(covers_all(&next, 5), "{kind:?} broke {next:?}");
                }
            }
        }
    }

    #[test]
    fn test_insert_moves_unassigned_onto_route() {
        let (vehicles, locations, config) = setup();
        let ctx = ProblemContext::new(&vehicles, locations.iter().collect(), &config, 0)
            .expect("valid");
        let plan = Plan::new(
            vec![vec![0, 1], vec![2, 3]],
            vec![(4, PlacementFailure::CapacityExceeded)],
        );
        let mut rng = StdRng::seed_from_u64(1);
        let next = apply(&ctx, &plan, Move::Insert, &mut rng).expect("capacity allows it");
        assert!(next.unassigned().is_empty());
        assert_eq!(next.num_assigned(), 5);
    }

    #[test]
    fn test_infeasible_move_rejected() {
        let (mut vehicles, locations, config) = setup();
        vehicles[1] = Vehicle::new("b", Coordinates::new(10.0, 106.0), Capacity::weight(10.0));
        let ctx = ProblemContext::new(&vehicles, locations.iter().collect(), &config, 0)
            .expect("valid");
        // b is full; relocating anything onto it must fail
        let plan = Plan::new(vec![vec![0, 1, 2, 3], vec![4]], vec![]);
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..50 {
            if let Some(next) = apply(&ctx, &plan, Move::Relocate, &mut rng) {
                assert!(next.route(1).len() <= 1);
            }
        }
    }

    #[test]
    fn test_swap_needs_two_stops() {
        let (vehicles, locations, config) = setup();
        let ctx = ProblemContext::new(&vehicles, locations.iter().collect(), &config, 0)
            .expect("valid");
        let plan = Plan::new(vec![vec![0], vec![]], vec![]);
        let mut rng = StdRng::seed_from_u64(4);
        assert!(apply(&ctx, &plan, Move::Swap, &mut rng).is_none());
    }
}
