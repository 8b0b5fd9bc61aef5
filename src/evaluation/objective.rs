//! Objective used to compare plans.
//!
//! Distance, time and cost are divided by a naive reference (every location
//! served by its own round trip from the nearest vehicle start) so that the
//! weighted terms are comparable. Those terms are unbounded, so plans are
//! ranked by their unassigned count first and only then by the weighted
//! sum; see [`PlanScore`].

use std::cmp::Ordering;

use crate::cost::travel_cost;
use crate::engine::{Plan, ProblemContext};

use super::validator::{check_sequence, RouteState};

/// Scalar charge per unassigned location in [`PlanScore::value`] and
/// [`PlanScore::delta`].
pub const UNASSIGNED_PENALTY: f64 = 100.0;

/// Score of a plan. Lower is better.
///
/// Ordering is lexicographic: fewer unassigned locations always wins, and
/// the weighted sum only breaks ties between plans that serve the same
/// number of locations.
///
/// # Examples
///
/// ```
/// use fleet_routing::evaluation::PlanScore;
///
/// let complete = PlanScore { unassigned: 0, weighted: 950.0 };
/// let partial = PlanScore { unassigned: 1, weighted: 0.5 };
/// assert!(complete < partial);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct PlanScore {
    pub unassigned: usize,
    /// Normalized weighted sum of distance, time, cost and utilization.
    pub weighted: f64,
}

impl PlanScore {
    /// Worse than any real plan.
    pub const WORST: PlanScore = PlanScore {
        unassigned: usize::MAX,
        weighted: f64::INFINITY,
    };

    /// Total order, with `f64::total_cmp` on the weighted part.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.unassigned
            .cmp(&other.unassigned)
            .then(self.weighted.total_cmp(&other.weighted))
    }

    /// Scalar form reported in diagnostics: the weighted sum plus
    /// [`UNASSIGNED_PENALTY`] per unassigned location.
    pub fn value(&self) -> f64 {
        self.weighted + UNASSIGNED_PENALTY * self.unassigned as f64
    }

    /// Signed change from `from` to `self`, for acceptance tests.
    ///
    /// Its sign always agrees with [`PlanScore::total_cmp`]: a change in the
    /// unassigned count is charged [`UNASSIGNED_PENALTY`] per location and
    /// the weighted sum is ignored.
    pub fn delta(&self, from: &Self) -> f64 {
        if self.unassigned == from.unassigned {
            self.weighted - from.weighted
        } else {
            UNASSIGNED_PENALTY * (self.unassigned as f64 - from.unassigned as f64)
        }
    }

    /// Whether `self` is no worse than `other`, allowing `eps` of slack on
    /// the weighted sum.
    pub fn within(&self, other: &Self, eps: f64) -> bool {
        self.unassigned < other.unassigned
            || (self.unassigned == other.unassigned && self.weighted <= other.weighted + eps)
    }
}

/// Reference magnitudes for distance, time and cost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalizer {
    pub distance_km: f64,
    pub minutes: f64,
    pub cost: f64,
}

impl Normalizer {
    /// No scaling.
    pub fn unit() -> Self {
        Self {
            distance_km: 1.0,
            minutes: 1.0,
            cost: 1.0,
        }
    }

    /// One round trip per location from its nearest vehicle start.
    pub fn naive_reference(ctx: &ProblemContext<'_>) -> Self {
        let mut distance_km = 0.0;
        let mut minutes = 0.0;
        let mut cost = 0.0;
        let matrix = ctx.matrix();
        for loc in 0..ctx.num_locations() {
            let nearest = (0..ctx.num_vehicles()).min_by(|&a, &b| {
                matrix
                    .distance(ctx.start_node(a), loc)
                    .total_cmp(&matrix.distance(ctx.start_node(b), loc))
            });
            let Some(v) = nearest else { continue };
            let start = ctx.start_node(v);
            let d = 2.0 * matrix.distance(start, loc);
            let t = 2.0 * matrix.free_minutes(start, loc);
            distance_km += d;
            minutes += t + ctx.location(loc).service_minutes();
            cost += travel_cost(d, t, matrix.road_class(start, loc), ctx.vehicle(v), ctx.config());
        }
        let floor = |x: f64| if x > 1e-9 { x } else { 1.0 };
        Self {
            distance_km: floor(distance_km),
            minutes: floor(minutes),
            cost: floor(cost),
        }
    }
}

/// Aggregate figures of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlanMetrics {
    pub distance_km: f64,
    pub duration_min: f64,
    pub cost: f64,
    /// Mean utilization over vehicles with at least one stop.
    pub average_utilization: f64,
    pub unassigned: usize,
    pub routes_used: usize,
}

/// Fraction of the binding capacity dimension used by a closed route.
pub fn utilization(ctx: &ProblemContext<'_>, state: &RouteState) -> f64 {
    let cap = ctx.vehicle(state.vehicle).capacity();
    let by_weight = if cap.weight_kg > 0.0 {
        state.weight_kg / cap.weight_kg
    } else {
        0.0
    };
    let by_volume = match cap.volume_m3 {
        Some(max) if max > 0.0 => state.volume_m3 / max,
        _ => 0.0,
    };
    by_weight.max(by_volume).clamp(0.0, 1.0)
}

/// Computes plan metrics. Stops on a route that fails validation count as
/// unassigned.
pub fn plan_metrics(ctx: &ProblemContext<'_>, plan: &Plan) -> PlanMetrics {
    let mut metrics = PlanMetrics {
        unassigned: plan.unassigned().len(),
        ..PlanMetrics::default()
    };
    let mut util_sum = 0.0;
    for (v, seq) in plan.routes().iter().enumerate() {
        if seq.is_empty() {
            continue;
        }
        match check_sequence(ctx, v, seq) {
            Ok(state) => {
                metrics.distance_km += state.distance_km;
                metrics.duration_min += state.elapsed();
                metrics.cost += state.cost;
                metrics.routes_used += 1;
                util_sum += utilization(ctx, &state);
            }
            Err(_) => metrics.unassigned += seq.len(),
        }
    }
    if metrics.routes_used > 0 {
        metrics.average_utilization = util_sum / metrics.routes_used as f64;
    }
    metrics
}

/// Score of plan metrics. Lower is better.
pub fn score_metrics(ctx: &ProblemContext<'_>, metrics: &PlanMetrics) -> PlanScore {
    let w = ctx.config().weights.normalized();
    let n = ctx.normalizer();
    let weighted = w.distance * metrics.distance_km / n.distance_km
        + w.time * metrics.duration_min / n.minutes
        + w.cost * metrics.cost / n.cost
        + w.utilization * (1.0 - metrics.average_utilization);
    PlanScore {
        unassigned: metrics.unassigned,
        weighted,
    }
}

/// Scores a plan. Lower is better.
pub fn score_plan(ctx: &ProblemContext<'_>, plan: &Plan) -> PlanScore {
    score_metrics(ctx, &plan_metrics(ctx, plan))
}
