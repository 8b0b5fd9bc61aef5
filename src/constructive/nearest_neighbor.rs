//! Greedy nearest-neighbor engine.
//!
//! Builds one route per vehicle, in input order, each time taking the
//! nearest feasible remaining location. Deterministic: the same input always
//! yields the same plan.
//!
//! # Complexity
//!
//! O(V·L² log L) for V vehicles and L locations.

use crate::engine::{Plan, ProblemContext};

use super::route_builder::{build_route, repair};

/// Constructs a plan with the nearest-neighbor heuristic.
///
/// Locations no vehicle can take are left in the plan's unassigned list
/// with the reason diagnosed by [`repair`].
///
/// # Examples
///
/// ```
/// use fleet_routing::config::OptimizationConfig;
/// use fleet_routing::constructive::nearest_neighbor;
/// use fleet_routing::engine::ProblemContext;
/// use fleet_routing::geometry::Coordinates;
/// use fleet_routing::models::{Capacity, Location, Vehicle};
///
/// let vehicles = vec![Vehicle::new("v", Coordinates::new(10.0, 106.0), Capacity::weight(30.0))];
/// let locations = vec![
///     Location::delivery("a", 10.01, 106.0, 10.0),
///     Location::delivery("b", 10.02, 106.0, 10.0),
///     Location::delivery("c", 10.03, 106.0, 10.0),
/// ];
/// let config = OptimizationConfig::default();
/// let ctx = ProblemContext::new(&vehicles, locations.iter().collect(), &config, 0).unwrap();
///
/// let plan = nearest_neighbor(&ctx);
/// assert_eq!(plan.route(0), &[0, 1, 2]);
/// assert!(plan.unassigned().is_empty());
/// ```
pub fn nearest_neighbor(ctx: &ProblemContext<'_>) -> Plan {
    let mut assigned = vec![false; ctx.num_locations()];
    let mut plan = Plan::empty(ctx.num_vehicles());
    for v in 0..ctx.num_vehicles() {
        if assigned.iter().all(|&a| a) {
            break;
        }
        plan.routes_mut()[v] = build_route(ctx, v, &mut assigned);
    }
    repair(ctx, &mut plan);
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OptimizationConfig;
    use crate::geometry::Coordinates;
    use crate::models::{Capacity, Location, PlacementFailure, Vehicle};

    #[test]
    fn test_fills_vehicles_in_order() {
        let vehicles = vec![
            Vehicle::new("a", Coordinates::new(10.0, 106.0), Capacity::weight(100.0)),
            Vehicle::new("b", Coordinates::new(10.0, 106.0), Capacity::weight(100.0)),
        ];
        let locations = vec![
            Location::delivery("x", 10.01, 106.0, 60.0),
            Location::delivery("y", 10.02, 106.0, 30.0),
            Location::delivery("z", 10.03, 106.0, 60.0),
        ];
        let config = OptimizationConfig::default();
        let ctx = ProblemContext::new(&vehicles, locations.iter().collect(), &config, 0)
            .expect("valid");
        let plan = nearest_neighbor(&ctx);
        assert_eq!(plan.route(0), &[0, 1]);
        assert_eq!(plan.route(1), &[2]);
        assert!(plan.unassigned().is_empty());
    }

    #[test]
    fn test_capacity_scenario() {
        let vehicles = vec![Vehicle::new(
            "v",
            Coordinates::new(10.0, 106.0),
            Capacity::weight(100.0),
        )];
        let locations = vec![
            Location::delivery("x", 10.01, 106.0, 80.0),
            Location::delivery("y", 10.02, 106.0, 80.0),
        ];
        let config = OptimizationConfig::default();
        let ctx = ProblemContext::new(&vehicles, locations.iter().collect(), &config, 0)
            .expect("valid");
        let plan = nearest_neighbor(&ctx);
        assert_eq!(plan.num_assigned(), 1);
        assert_eq!(plan.unassigned(), &[(1, PlacementFailure::CapacityExceeded)]);
    }

    #[test]
    fn test_deterministic() {
        let vehicles = vec![
            Vehicle::new("a", Coordinates::new(10.0, 106.0), Capacity::weight(50.0)),
            Vehicle::new("b", Coordinates::new(10.2, 106.2), Capacity::weight(50.0)),
        ];
        let locations: Vec<Location> = (0..12)
            .map(|i| {
                let f = i as f64;
                Location::delivery(format!("l{i}"), 10.0 + 0.017 * f, 106.0 + 0.013 * (f % 5.0), 10.0)
            })
            .collect();
        let config = OptimizationConfig::default();
        let ctx = ProblemContext::new(&vehicles, locations.iter().collect(), &config, 0)
            .expect("valid");
        assert_eq!(nearest_neighbor(&ctx), nearest_neighbor(&ctx));
    }
}
