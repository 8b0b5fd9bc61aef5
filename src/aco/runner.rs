//! Colony loop of the ant colony engine.

use rand::Rng;
use tracing::debug;

use crate::constructive::repair;
use crate::engine::{EngineOutcome, Plan, ProblemContext, SearchControl};
use crate::evaluation::{can_append, score_plan, PlanScore, RouteState, Step};
use crate::models::{EngineKind, EngineStatus};

use super::config::AntColonyConfig;
use super::pheromone::PheromoneMatrix;

/// Runs the ant colony, optionally refining an incumbent plan.
///
/// The incumbent's edges are reinforced before the first iteration and it
/// counts as the initial best, so the result is never worse than it.
pub fn run_ant_colony(
    ctx: &ProblemContext<'_>,
    config: &AntColonyConfig,
    control: &SearchControl,
    incumbent: Option<&Plan>,
) -> EngineOutcome {
    let mut rng = ctx.rng_for(EngineKind::AntColony);
    let mut trails = PheromoneMatrix::new(
        ctx.matrix().size(),
        config.initial_pheromone,
        config.min_pheromone,
        config.max_pheromone,
    );

    let mut best: Option<(Plan, PlanScore)> = incumbent.map(|plan| {
        let mut plan = plan.clone();
        repair(ctx, &mut plan);
        let score = score_plan(ctx, &plan);
        (plan, score)
    });
    if let Some((plan, score)) = &best {
        trails.reinforce(ctx, plan, config.deposit / (1.0 + score.value()));
    }

    let mut iterations = 0usize;
    let mut stagnation = 0usize;
    let mut status = EngineStatus::Completed;

    for _ in 0..config.max_iterations {
        if control.should_stop() {
            status = EngineStatus::TimedOut;
            break;
        }
        iterations += 1;

        let mut iteration_best: Option<(Plan, PlanScore)> = None;
        for _ in 0..config.num_ants {
            let plan = construct(ctx, config, &trails, &mut rng);
            let score = score_plan(ctx, &plan);
            if iteration_best.as_ref().is_none_or(|(_, s)| score < *s) {
                iteration_best = Some((plan, score));
            }
        }

        trails.evaporate(config.evaporation);
        let Some((plan, score)) = iteration_best else {
            break;
        };
        trails.reinforce(ctx, &plan, config.deposit / (1.0 + score.value()));

        if best.as_ref().is_none_or(|(_, s)| score < *s) {
            best = Some((plan, score));
            stagnation = 0;
        } else {
            stagnation += 1;
        }
        if let Some((plan, score)) = &best {
            trails.reinforce(ctx, plan, config.deposit / (1.0 + score.value()));
        }

        if config.stagnation_limit > 0 && stagnation >= config.stagnation_limit {
            debug!(iterations, "ant colony stagnated");
            break;
        }
    }

    let (plan, score) = best.unwrap_or_else(|| {
        let mut plan = Plan::empty(ctx.num_vehicles());
        repair(ctx, &mut plan);
        let score = score_plan(ctx, &plan);
        (plan, score)
    });
    EngineOutcome {
        engine: EngineKind::AntColony,
        plan,
        score,
        iterations,
        status,
    }
}

/// One ant builds routes vehicle by vehicle, choosing each next stop among
/// feasible candidates with probability proportional to
/// `pheromone^alpha * (1 / distance)^beta`.
fn construct<R: Rng>(
    ctx: &ProblemContext<'_>,
    config: &AntColonyConfig,
    trails: &PheromoneMatrix,
    rng: &mut R,
) -> Plan {
    let n = ctx.num_locations();
    let mut assigned = vec![false; n];
    let mut plan = Plan::empty(ctx.num_vehicles());
    let mut remaining = n;

    for v in 0..ctx.num_vehicles() {
        let mut state = RouteState::start(ctx, v);
        while remaining > 0 {
            let options: Vec<(usize, Step, f64)> = (0..n)
                .filter(|&i| !assigned[i])
                .filter_map(|i| {
                    let step = can_append(ctx, &state, i).ok()?;
                    let d = ctx.matrix().distance(state.node, i).max(1e-3);
                    let weight =
                        trails.get(state.node, i).powf(config.alpha) * (1.0 / d).powf(config.beta);
                    Some((i, step, weight))
                })
                .collect();
            let weights: Vec<f64> = options.iter().map(|o| o.2).collect();
            let Some(pick) = roulette(&weights, rng) else {
                break;
            };
            let (next, step, _) = options[pick];
            assigned[next] = true;
            remaining -= 1;
            plan.routes_mut()[v].push(next);
            state = step.state;
        }
    }
    repair(ctx, &mut plan);
    plan
}

/// Index drawn with probability proportional to its weight. Falls back
/// to the first index when no weight is positive.
fn roulette<R: Rng>(weights: &[f64], rng: &mut R) -> Option<usize> {
    if weights.is_empty() {
        return None;
    }
    let total: f64 = weights.iter().sum();
    if total <= 0.0 || !total.is_finite() {
        return Some(0);
    }
    let mut pick = rng.random_range(0.0..total);
    for (i, &w) in weights.iter().enumerate() {
        if pick < w {
            return Some(i);
        }
        pick -= w;
    }
    Some(weights.len() - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OptimizationConfig;
    use crate::constructive::nearest_neighbor;
    use crate::geometry::Coordinates;
    use crate::models::{Capacity, Location, Vehicle};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn instance() -> (Vec<Vehicle>, Vec<Location>) {
        let vehicles = vec![
            Vehicle::new("a", Coordinates::new(10.0, 106.0), Capacity::weight(50.0)),
            Vehicle::new("b", Coordinates::new(10.04, 106.04), Capacity::weight(50.0)),
        ];
        let locations = (0..8)
            .map(|i| {
                let f = i as f64;
                Location::delivery(
                    format!("l{i}"),
                    10.0 + 0.006 * f,
                    106.0 + 0.005 * ((f * 5.0) % 8.0),
                    10.0,
                )
            })
            .collect();
        (vehicles, locations)
    }

    fn quick() -> AntColonyConfig {
        AntColonyConfig::default()
            .with_num_ants(5)
            .with_max_iterations(10)
    }

    #[test]
    fn test_never_worse_than_incumbent() {
        let (vehicles, locations) = instance();
        let config = OptimizationConfig::default();
        let ctx = ProblemContext::new(&vehicles, locations.iter().collect(), &config, 8)
            .expect("valid");
        let greedy = nearest_neighbor(&ctx);
        let greedy_score = score_plan(&ctx, &greedy);
        let outcome = run_ant_colony(&ctx, &quick(), &SearchControl::unbounded(), Some(&greedy));
        assert!(outcome.score.within(&greedy_score, 1e-9));
        assert_eq!(outcome.plan.num_assigned(), 8);
    }

    #[test]
    fn test_runs_without_incumbent() {
        let (vehicles, locations) = instance();
        let config = OptimizationConfig::default();
        let ctx = ProblemContext::new(&vehicles, locations.iter().collect(), &config, 8)
            .expect("valid");
        let outcome = run_ant_colony(&ctx, &quick(), &SearchControl::unbounded(), None);
        assert_eq!(
            outcome.plan.num_assigned() + outcome.plan.unassigned().len(),
            8
        );
        assert!(outcome.iterations >= 1);
    }

    #[test]
    fn test_cancelled_keeps_incumbent() {
        let (vehicles, locations) = instance();
        let config = OptimizationConfig::default();
        let ctx = ProblemContext::new(&vehicles, locations.iter().collect(), &config, 8)
            .expect("valid");
        let greedy = nearest_neighbor(&ctx);
        let control = SearchControl::unbounded();
        control.cancel();
        let outcome = run_ant_colony(&ctx, &quick(), &control, Some(&greedy));
        assert_eq!(outcome.status, EngineStatus::TimedOut);
        assert_eq!(outcome.plan, greedy);
    }

    #[test]
    fn test_roulette_picks_only_positive_weight() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..20 {
            assert_eq!(roulette(&[0.0, 1.0, 0.0], &mut rng), Some(1));
        }
        assert_eq!(roulette(&[], &mut rng), None);
        assert_eq!(roulette(&[0.0, 0.0], &mut rng), Some(0));
    }
}
