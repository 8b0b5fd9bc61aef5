//! Giant-tour chromosome and its decoder.
//!
//! A giant tour is one permutation of all routable locations. It is decoded
//! by slicing it across vehicles in input order: each location is appended
//! to the current vehicle, and when it does not fit the next vehicle takes
//! over. Whatever is left is handed to [`repair`].

use crate::constructive::repair;
use crate::engine::{Plan, ProblemContext};
use crate::evaluation::{can_append, score_plan, PlanScore, RouteState};

/// A permutation of location indices with its cached score.
///
/// # Examples
///
/// ```
/// use fleet_routing::evaluation::PlanScore;
/// use fleet_routing::ga::GiantTour;
///
/// let tour = GiantTour::new(vec![2, 0, 1]);
/// assert_eq!(tour.order(), &[2, 0, 1]);
/// assert_eq!(tour.fitness(), PlanScore::WORST);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GiantTour {
    order: Vec<usize>,
    fitness: PlanScore,
}

impl GiantTour {
    /// Creates an unevaluated tour.
    pub fn new(order: Vec<usize>) -> Self {
        Self {
            order,
            fitness: PlanScore::WORST,
        }
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Score of the decoded plan; [`PlanScore::WORST`] until evaluated.
    pub fn fitness(&self) -> PlanScore {
        self.fitness
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Decodes and scores this tour.
    pub fn evaluate(&mut self, ctx: &ProblemContext<'_>) {
        self.fitness = score_plan(ctx, &decode(ctx, &self.order));
    }
}

/// Slices `order` across vehicles and repairs the remainder.
pub fn decode(ctx: &ProblemContext<'_>, order: &[usize]) -> Plan {
    let num_vehicles = ctx.num_vehicles();
    let mut plan = Plan::empty(num_vehicles);
    if num_vehicles == 0 {
        repair(ctx, &mut plan);
        return plan;
    }

    let mut v = 0;
    let mut state = RouteState::start(ctx, v);
    for &loc in order {
        while v < num_vehicles {
            match can_append(ctx, &state, loc) {
                Ok(step) => {
                    plan.routes_mut()[v].push(loc);
                    state = step.state;
                    break;
                }
                // does not fit even an empty route: leave it to repair
                Err(_) if plan.route(v).is_empty() => break,
                Err(_) => {
                    v += 1;
                    if v < num_vehicles {
                        state = RouteState::start(ctx, v);
                    }
                }
            }
        }
    }
    repair(ctx, &mut plan);
    plan
}
