//! Optimization entry point.
//!
//! [`optimize`] validates the input, builds the shared travel matrix once,
//! runs the configured engines in parallel, keeps the best-scoring plan,
//! polishes it with 2-opt and turns it into a [`Solution`].
//!
//! ```text
//! validate → screen locations → ProblemContext (matrix)
//!          → greedy | genetic | annealing   (rayon, in parallel)
//!          → ant colony (seeded by the best plan so far)
//!          → best PlanScore (fewest unassigned, then weighted) → 2-opt
//!          → Solution + Diagnostics
//! ```

use std::collections::HashSet;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};

use crate::config::{InvalidLocationPolicy, OptimizationConfig};
use crate::engine::{EngineOutcome, Plan, ProblemContext, RouteEngine, SearchControl};
use crate::error::RoutingError;
use crate::evaluation::{score_plan, RouteEvaluator};
use crate::local_search::improve_plan;
use crate::models::{
    Diagnostics, EngineKind, EngineReport, EngineStatus, Location, Route, Solution,
    UnassignedLocation, UnassignedReason, Vehicle,
};

/// Computes a routing solution for `vehicles` serving `locations`.
///
/// Fails only on malformed input: an empty fleet or location list,
/// duplicate ids, negative quantities, an invalid configuration, or (with
/// [`InvalidLocationPolicy::Reject`]) a location with bad coordinates.
/// Every other problem is reported in the returned solution.
///
/// # Examples
///
/// ```
/// use fleet_routing::{optimize, OptimizationConfig};
/// use fleet_routing::geometry::Coordinates;
/// use fleet_routing::models::{Capacity, Location, Vehicle};
///
/// let vehicles = vec![Vehicle::new("truck", Coordinates::new(10.0, 106.0), Capacity::weight(1000.0))];
/// let locations = vec![
///     Location::delivery("a", 10.01, 106.01, 200.0),
///     Location::delivery("b", 10.02, 106.00, 200.0),
///     Location::delivery("c", 10.00, 106.02, 200.0),
/// ];
/// let config = OptimizationConfig::default().with_seed(7);
///
/// let solution = optimize(&vehicles, &locations, &config).unwrap();
/// assert_eq!(solution.num_routes(), 1);
/// assert_eq!(solution.num_served(), 3);
/// assert!(solution.unassigned().is_empty());
/// ```
pub fn optimize(
    vehicles: &[Vehicle],
    locations: &[Location],
    config: &OptimizationConfig,
) -> Result<Solution, RoutingError> {
    optimize_with_cancel(vehicles, locations, config, Arc::new(AtomicBool::new(false)))
}

/// Like [`optimize`], but the engines also stop when `cancel` is set.
///
/// A cancelled call still returns a complete solution built from the best
/// plans found so far; the affected engines are reported as timed out.
#[instrument(skip_all, fields(vehicles = vehicles.len(), locations = locations.len()))]
pub fn optimize_with_cancel(
    vehicles: &[Vehicle],
    locations: &[Location],
    config: &OptimizationConfig,
    cancel: Arc<AtomicBool>,
) -> Result<Solution, RoutingError> {
    let started = Instant::now();
    validate_input(vehicles, locations)?;
    config.validate()?;

    let screened = screen_locations(locations, config)?;
    let seed = config.seed.unwrap_or_else(time_seed);
    let control = SearchControl::with_budget(config.time_budget_ms.map(Duration::from_millis))
        .with_cancel_flag(cancel);

    let routable: Vec<&Location> = screened.routable.iter().map(|&i| &locations[i]).collect();
    if routable.is_empty() {
        warn!("no routable locations");
        let diagnostics = Diagnostics {
            elapsed_ms: elapsed_ms(started),
            seed,
            ..Diagnostics::default()
        };
        let unassigned = collect_unassigned(locations, screened.reasons);
        return Ok(Solution::new(Vec::new(), unassigned, diagnostics));
    }

    let ctx = ProblemContext::new(vehicles, routable, config, seed)?;
    debug!(
        routable = ctx.num_locations(),
        seed,
        "problem context ready"
    );

    let (outcomes, reports) = run_engines(&ctx, &control);
    let Some(best) = outcomes
        .into_iter()
        .min_by(|a, b| a.score.total_cmp(&b.score))
    else {
        return Err(RoutingError::config("no engine produced a plan"));
    };
    let selected = best.engine;
    let mut plan = best.plan;

    let improvement = improve_plan(&ctx, &mut plan, config.two_opt_max_iterations);
    debug!(
        moves = improvement.moves_applied,
        before_km = improvement.distance_before_km,
        after_km = improvement.distance_after_km,
        "2-opt pass done"
    );
    let objective_score = score_plan(&ctx, &plan).value();

    let mut reasons = screened.reasons;
    let routes = build_routes(&ctx, &plan, &screened.routable, &mut reasons);
    for &(i, failure) in plan.unassigned() {
        reasons[screened.routable[i]] = Some(failure.into());
    }
    let unassigned = collect_unassigned(locations, reasons);

    let diagnostics = Diagnostics {
        selected_engine: Some(selected),
        objective_score,
        elapsed_ms: elapsed_ms(started),
        seed,
        engines: reports,
        improvement,
    };
    info!(
        engine = %selected,
        score = objective_score,
        routes = routes.iter().filter(|r| !r.is_empty()).count(),
        unassigned = unassigned.len(),
        elapsed_ms = diagnostics.elapsed_ms,
        "optimization finished"
    );
    Ok(Solution::new(routes, unassigned, diagnostics))
}

/// Rejects empty inputs, duplicate ids and negative quantities.
fn validate_input(vehicles: &[Vehicle], locations: &[Location]) -> Result<(), RoutingError> {
    if vehicles.is_empty() {
        return Err(RoutingError::config("at least one vehicle is required"));
    }
    if locations.is_empty() {
        return Err(RoutingError::config("at least one location is required"));
    }

    let mut ids = HashSet::new();
    for vehicle in vehicles {
        if !ids.insert(vehicle.id()) {
            return Err(RoutingError::config(format!(
                "duplicate vehicle id `{}`",
                vehicle.id()
            )));
        }
        let cap = vehicle.capacity();
        let quantities = [
            ("capacity weight", Some(cap.weight_kg)),
            ("capacity volume", cap.volume_m3),
            ("cost_per_km", Some(vehicle.cost_per_km())),
            ("cost_per_hour", Some(vehicle.cost_per_hour())),
            ("max_distance_km", vehicle.max_distance_km()),
            ("max_duration_min", vehicle.max_duration_min()),
            ("fuel_l_per_km", Some(vehicle.fuel_l_per_km())),
        ];
        for (name, value) in quantities {
            if value.is_some_and(|x| !x.is_finite() || x < 0.0) {
                return Err(RoutingError::config(format!(
                    "vehicle `{}`: {name} must be non-negative",
                    vehicle.id()
                )));
            }
        }
    }

    let mut ids = HashSet::new();
    for loc in locations {
        if !ids.insert(loc.id()) {
            return Err(RoutingError::config(format!(
                "duplicate location id `{}`",
                loc.id()
            )));
        }
        let demand = loc.demand();
        let quantities = [
            ("demand weight", demand.weight_kg),
            ("demand volume", demand.volume_m3),
            ("service minutes", loc.service_minutes()),
        ];
        for (name, value) in quantities {
            if !value.is_finite() || value < 0.0 {
                return Err(RoutingError::config(format!(
                    "location `{}`: {name} must be non-negative",
                    loc.id()
                )));
            }
        }
    }
    Ok(())
}

/// Input locations split into routable ones and pre-decided reasons.
struct Screened {
    /// Input indices of routable locations, in input order.
    routable: Vec<usize>,
    /// Reason per input location, filled for those already excluded.
    reasons: Vec<Option<UnassignedReason>>,
}

fn screen_locations(
    locations: &[Location],
    config: &OptimizationConfig,
) -> Result<Screened, RoutingError> {
    let mut routable = Vec::with_capacity(locations.len());
    let mut reasons = vec![None; locations.len()];
    for (i, loc) in locations.iter().enumerate() {
        if let Err(source) = loc.coordinates().validate() {
            match config.invalid_locations {
                InvalidLocationPolicy::Reject => {
                    return Err(RoutingError::InvalidLocation {
                        id: loc.id().to_string(),
                        source,
                    });
                }
                InvalidLocationPolicy::Unassign => {
                    warn!(location = loc.id(), error = %source, "dropping invalid location");
                    reasons[i] = Some(UnassignedReason::InvalidLocation);
                }
            }
        } else if !loc.is_serviceable() {
            reasons[i] = Some(UnassignedReason::NotServiceable);
        } else {
            routable.push(i);
        }
    }
    Ok(Screened { routable, reasons })
}

/// Runs the configured engines; the ant colony goes last, seeded with the
/// best plan of the others.
fn run_engines(
    ctx: &ProblemContext<'_>,
    control: &SearchControl,
) -> (Vec<EngineOutcome>, Vec<EngineReport>) {
    let config = ctx.config();
    let mut kinds: Vec<EngineKind> = Vec::new();
    for &kind in &config.engines {
        if kind != EngineKind::AntColony && !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }

    let mut results: Vec<(EngineOutcome, u64)> = kinds
        .par_iter()
        .map(|&kind| run_engine(ctx, RouteEngine::from_config(kind, config), control, None))
        .collect();

    if config.engines.contains(&EngineKind::AntColony) {
        let incumbent = results
            .iter()
            .map(|(outcome, _)| outcome)
            .min_by(|a, b| a.score.total_cmp(&b.score))
            .map(|outcome| &outcome.plan);
        let engine = RouteEngine::from_config(EngineKind::AntColony, config);
        let result = run_engine(ctx, engine, control, incumbent);
        results.push(result);
    }

    let reports = results
        .iter()
        .map(|(outcome, elapsed)| EngineReport {
            engine: outcome.engine,
            status: outcome.status,
            score: outcome.score.value(),
            iterations: outcome.iterations,
            unassigned: outcome.score.unassigned,
            elapsed_ms: *elapsed,
        })
        .collect();
    (results.into_iter().map(|(outcome, _)| outcome).collect(), reports)
}

fn run_engine(
    ctx: &ProblemContext<'_>,
    engine: RouteEngine,
    control: &SearchControl,
    incumbent: Option<&Plan>,
) -> (EngineOutcome, u64) {
    let started = Instant::now();
    let outcome = engine.run(ctx, control, incumbent);
    let elapsed = elapsed_ms(started);
    if outcome.status == EngineStatus::TimedOut {
        warn!(
            engine = %outcome.engine,
            iterations = outcome.iterations,
            "engine stopped early, using its best plan so far"
        );
    }
    debug!(
        engine = %outcome.engine,
        score = outcome.score.value(),
        iterations = outcome.iterations,
        unassigned = outcome.plan.unassigned().len(),
        elapsed_ms = elapsed,
        "engine finished"
    );
    (outcome, elapsed)
}

/// Finalizes every vehicle's route.
///
/// A route that fails re-validation keeps its feasible prefix; the rest of
/// its stops are marked unassigned with the failure reason.
fn build_routes(
    ctx: &ProblemContext<'_>,
    plan: &Plan,
    routable: &[usize],
    reasons: &mut [Option<UnassignedReason>],
) -> Vec<Route> {
    let evaluator = RouteEvaluator::new(ctx);
    let mut routes = Vec::with_capacity(plan.routes().len());
    for (v, sequence) in plan.routes().iter().enumerate() {
        match evaluator.build_route(v, sequence) {
            Ok(route) => routes.push(route),
            Err((pos, failure)) => {
                warn!(
                    vehicle = ctx.vehicle(v).id(),
                    position = pos,
                    ?failure,
                    "route failed final validation, truncating"
                );
                for &i in &sequence[pos..] {
                    reasons[routable[i]] = Some(failure.into());
                }
                if let Ok(route) = evaluator.build_route(v, &sequence[..pos]) {
                    routes.push(route);
                }
            }
        }
    }
    routes
}

/// Unassigned locations in input order.
fn collect_unassigned(
    locations: &[Location],
    reasons: Vec<Option<UnassignedReason>>,
) -> Vec<UnassignedLocation> {
    locations
        .iter()
        .zip(reasons)
        .filter_map(|(loc, reason)| {
            reason.map(|reason| UnassignedLocation {
                location_id: loc.id().to_string(),
                reason,
            })
        })
        .collect()
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

fn elapsed_ms(since: Instant) -> u64 {
    since.elapsed().as_millis() as u64
}
