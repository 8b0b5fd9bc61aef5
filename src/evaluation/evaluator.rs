//! Route evaluator that computes timing, load and totals.

use crate::engine::ProblemContext;
use crate::models::{PlacementFailure, Route, RouteTotals, Visit};

use super::objective::utilization;
use super::validator::{can_append, close_route, RouteState};

/// Turns a vehicle's stop sequence into a finalized [`Route`].
///
/// # Examples
///
/// ```
/// use fleet_routing::config::OptimizationConfig;
/// use fleet_routing::engine::ProblemContext;
/// use fleet_routing::evaluation::RouteEvaluator;
/// use fleet_routing::geometry::Coordinates;
/// use fleet_routing::models::{Capacity, Location, Vehicle};
///
/// let vehicles = vec![Vehicle::new("v", Coordinates::new(10.0, 106.0), Capacity::weight(500.0))];
/// let locations = vec![
///     Location::delivery("a", 10.01, 106.0, 100.0),
///     Location::delivery("b", 10.02, 106.0, 100.0),
/// ];
/// let config = OptimizationConfig::default();
/// let ctx = ProblemContext::new(&vehicles, locations.iter().collect(), &config, 0).unwrap();
///
/// let route = RouteEvaluator::new(&ctx).build_route(0, &[0, 1]).unwrap();
/// assert_eq!(route.location_ids(), vec!["a", "b"]);
/// assert!((route.utilization() - 0.4).abs() < 1e-9);
/// ```
pub struct RouteEvaluator<'c, 'a> {
    ctx: &'c ProblemContext<'a>,
}

impl<'c, 'a> RouteEvaluator<'c, 'a> {
    pub fn new(ctx: &'c ProblemContext<'a>) -> Self {
        Self { ctx }
    }

    /// Builds the route for vehicle `v` visiting `sequence` in order.
    ///
    /// Fails with the position and reason of the first stop that breaks a
    /// constraint.
    pub fn build_route(
        &self,
        v: usize,
        sequence: &[usize],
    ) -> Result<Route, (usize, PlacementFailure)> {
        let ctx = self.ctx;
        let mut state = RouteState::start(ctx, v);
        let mut visits = Vec::with_capacity(sequence.len());
        for (pos, &loc) in sequence.iter().enumerate() {
            let step = can_append(ctx, &state, loc).map_err(|f| (pos, f))?;
            state = step.state;
            visits.push(Visit {
                location_id: ctx.location(loc).id().to_string(),
                arrival_minute: step.arrival_minute,
                waiting_min: step.waiting_min,
                departure_minute: state.clock,
                load_weight_kg: state.weight_kg,
                load_volume_m3: state.volume_m3,
            });
        }
        let closed = close_route(ctx, &state);
        let vehicle = ctx.vehicle(v);
        let duration = closed.elapsed();
        let totals = RouteTotals {
            distance_km: closed.distance_km,
            duration_min: duration,
            cost: closed.cost,
            toll_cost: closed.toll,
            waiting_min: closed.waiting_min,
            utilization: utilization(ctx, &closed),
            efficiency_score: if duration > 0.0 {
                closed.stops as f64 / (duration / 60.0)
            } else {
                0.0
            },
            co2_kg: closed.distance_km * vehicle.co2_kg_per_km(),
            fuel_l: closed.fuel_l,
            finish_minute: closed.clock,
        };
        Ok(Route::new(vehicle.id(), visits, totals))
    }
}
