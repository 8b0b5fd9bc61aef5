//! Incremental route feasibility checks.
//!
//! A [`RouteState`] summarizes a partial route: where the vehicle is, what
//! time it is, how far it has driven and what it carries. [`can_append`]
//! decides whether one more location fits and returns the advanced state.

use crate::engine::ProblemContext;
use crate::models::PlacementFailure;

const EPS: f64 = 1e-9;

/// Summary of a partial route for one vehicle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteState {
    pub vehicle: usize,
    /// Matrix node the vehicle is at.
    pub node: usize,
    pub start_minute: f64,
    /// Departure time from `node`.
    pub clock: f64,
    pub distance_km: f64,
    pub cost: f64,
    pub toll: f64,
    pub fuel_l: f64,
    pub waiting_min: f64,
    pub weight_kg: f64,
    pub volume_m3: f64,
    pub stops: usize,
}

impl RouteState {
    /// Vehicle `v` standing at its start, not yet departed.
    pub fn start(ctx: &ProblemContext<'_>, v: usize) -> Self {
        let t0 = ctx.departure_minute(v);
        Self {
            vehicle: v,
            node: ctx.start_node(v),
            start_minute: t0,
            clock: t0,
            distance_km: 0.0,
            cost: 0.0,
            toll: 0.0,
            fuel_l: 0.0,
            waiting_min: 0.0,
            weight_kg: 0.0,
            volume_m3: 0.0,
            stops: 0,
        }
    }

    /// Elapsed minutes since departure.
    pub fn elapsed(&self) -> f64 {
        self.clock - self.start_minute
    }
}

/// Result of a successful append.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub state: RouteState,
    pub arrival_minute: f64,
    pub waiting_min: f64,
}

/// Checks whether the vehicle can serve its required tags and access limits.
pub fn is_capable(ctx: &ProblemContext<'_>, v: usize, loc: usize) -> bool {
    let vehicle = ctx.vehicle(v);
    let location = ctx.location(loc);
    if !location.required_tags().is_subset(vehicle.tags()) {
        return false;
    }
    let limits = location.restrictions();
    let too_tall = matches!(
        (limits.max_height_m, vehicle.height_m()),
        (Some(max), Some(h)) if h > max
    );
    let too_heavy = matches!(
        (limits.max_gross_weight_kg, vehicle.gross_weight_kg()),
        (Some(max), Some(w)) if w > max
    );
    !too_tall && !too_heavy
}

/// Tries to append location `loc` to a partial route.
///
/// Checks run in order: capability, capacity, time window, then distance and
/// duration limits. Limits include the closing leg from `loc`, so the
/// returned state can always be closed without breaking a limit.
pub fn can_append(
    ctx: &ProblemContext<'_>,
    state: &RouteState,
    loc: usize,
) -> Result<Step, PlacementFailure> {
    let v = state.vehicle;
    let vehicle = ctx.vehicle(v);
    let location = ctx.location(loc);
    let constraints = &ctx.config().constraints;

    if !is_capable(ctx, v, loc) {
        return Err(PlacementFailure::CapabilityMismatch);
    }

    let demand = location.demand();
    let weight = state.weight_kg + demand.weight_kg;
    let volume = state.volume_m3 + demand.volume_m3;
    if constraints.enforce_capacity {
        let cap = vehicle.capacity();
        let over_volume = cap.volume_m3.is_some_and(|max| volume > max + EPS);
        let over_stops = cap.max_stops.is_some_and(|max| state.stops + 1 > max);
        if weight > cap.weight_kg + EPS || over_volume || over_stops {
            return Err(PlacementFailure::CapacityExceeded);
        }
    }

    let leg = ctx.leg(state.node, loc, state.clock);
    let arrival = state.clock + leg.minutes;
    let mut waiting = 0.0;
    if constraints.enforce_time_windows {
        if let Some(tw) = location.time_window() {
            if tw.is_violated(arrival) {
                return Err(PlacementFailure::TimeWindowViolation);
            }
            waiting = tw.waiting_time(arrival);
        }
    }
    let departure = arrival + waiting + location.service_minutes();

    let (close_km, close_min) = closing_leg(ctx, v, loc, departure);
    let distance = state.distance_km + leg.distance_km;
    if vehicle
        .max_distance_km()
        .is_some_and(|max| distance + close_km > max + EPS)
    {
        return Err(PlacementFailure::DistanceLimitExceeded);
    }
    let finish = departure + close_min;
    let over_duration = vehicle
        .max_duration_min()
        .is_some_and(|max| finish - state.start_minute > max + EPS);
    let over_shift = constraints.enforce_time_windows
        && vehicle
            .working_hours()
            .is_some_and(|wh| finish > wh.end() + EPS);
    if over_duration || over_shift {
        return Err(PlacementFailure::DurationLimitExceeded);
    }

    let breakdown = crate::cost::cost_breakdown(
        leg.distance_km,
        leg.minutes,
        leg.class,
        vehicle,
        ctx.config(),
    );
    let waiting_cost = waiting / 60.0 * vehicle.cost_per_hour();

    Ok(Step {
        state: RouteState {
            vehicle: v,
            node: loc,
            start_minute: state.start_minute,
            clock: departure,
            distance_km: distance,
            cost: state.cost + breakdown.total() + waiting_cost,
            toll: state.toll + breakdown.toll,
            fuel_l: state.fuel_l + leg.distance_km * vehicle.fuel_l_per_km(),
            waiting_min: state.waiting_min + waiting,
            weight_kg: weight,
            volume_m3: volume,
            stops: state.stops + 1,
        },
        arrival_minute: arrival,
        waiting_min: waiting,
    })
}

/// Distance and minutes of the closing leg after leaving `loc` at `departure`.
fn closing_leg(ctx: &ProblemContext<'_>, v: usize, loc: usize, departure: f64) -> (f64, f64) {
    if !ctx.has_closing_leg(v) {
        return (0.0, 0.0);
    }
    let leg = ctx.leg(loc, ctx.end_node(v), departure);
    (leg.distance_km, leg.minutes)
}

/// Adds the closing leg to a route with at least one stop.
///
/// An empty route stays at the start and is returned unchanged.
pub fn close_route(ctx: &ProblemContext<'_>, state: &RouteState) -> RouteState {
    let v = state.vehicle;
    if state.stops == 0 || !ctx.has_closing_leg(v) {
        return *state;
    }
    let vehicle = ctx.vehicle(v);
    let leg = ctx.leg(state.node, ctx.end_node(v), state.clock);
    let breakdown =
        crate::cost::cost_breakdown(leg.distance_km, leg.minutes, leg.class, vehicle, ctx.config());
    RouteState {
        node: ctx.end_node(v),
        clock: state.clock + leg.minutes,
        distance_km: state.distance_km + leg.distance_km,
        cost: state.cost + breakdown.total(),
        toll: state.toll + breakdown.toll,
        fuel_l: state.fuel_l + leg.distance_km * vehicle.fuel_l_per_km(),
        ..*state
    }
}

/// Checks a whole sequence for vehicle `v` and returns its closed state.
///
/// On failure returns the position of the first stop that does not fit and
/// the reason.
pub fn check_sequence(
    ctx: &ProblemContext<'_>,
    v: usize,
    sequence: &[usize],
) -> Result<RouteState, (usize, PlacementFailure)> {
    let mut state = RouteState::start(ctx, v);
    for (pos, &loc) in sequence.iter().enumerate() {
        state = can_append(ctx, &state, loc).map_err(|f| (pos, f))?.state;
    }
    Ok(close_route(ctx, &state))
}

/// How far through the checks a failure got; higher is closer to fitting.
pub(crate) fn failure_rank(failure: PlacementFailure) -> u8 {
    match failure {
        PlacementFailure::CapabilityMismatch => 0,
        PlacementFailure::CapacityExceeded => 1,
        PlacementFailure::TimeWindowViolation => 2,
        PlacementFailure::DistanceLimitExceeded => 3,
        PlacementFailure::DurationLimitExceeded => 4,
    }
}
