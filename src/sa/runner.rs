//! Simulated annealing over plans.

use rand::Rng;
use tracing::debug;

use crate::constructive::{nearest_neighbor, repair};
use crate::engine::{EngineOutcome, ProblemContext, SearchControl};
use crate::evaluation::score_plan;
use crate::models::{EngineKind, EngineStatus};

use super::config::AnnealingConfig;
use super::moves::random_neighbor;

/// Runs simulated annealing from the greedy plan.
///
/// Worse neighbors are accepted with probability `exp(-delta / T)`
/// (Metropolis). The temperature cools geometrically after every
/// `iterations_per_temperature` neighbors until it falls below the floor.
/// The best plan seen is returned, not the final one.
pub fn run_annealing(
    ctx: &ProblemContext<'_>,
    config: &AnnealingConfig,
    control: &SearchControl,
) -> EngineOutcome {
    let mut rng = ctx.rng_for(EngineKind::Annealing);

    let mut current = nearest_neighbor(ctx);
    let mut current_cost = score_plan(ctx, &current);
    let mut best = current.clone();
    let mut best_cost = current_cost;

    let mut temperature = config.initial_temperature;
    let mut iterations = 0usize;
    let mut accepted = 0usize;
    let mut status = EngineStatus::Completed;

    'cooling: while temperature > config.min_temperature {
        if control.should_stop() {
            status = EngineStatus::TimedOut;
            break;
        }
        for _ in 0..config.iterations_per_temperature {
            if config.max_iterations > 0 && iterations >= config.max_iterations {
                break 'cooling;
            }
            iterations += 1;

            let Some(neighbor) = random_neighbor(ctx, &current, &mut rng) else {
                continue;
            };
            let neighbor_cost = score_plan(ctx, &neighbor);
            let delta = neighbor_cost.delta(&current_cost);

            let accept = delta < 0.0 || rng.random_range(0.0..1.0) < (-delta / temperature).exp();
            if accept {
                current = neighbor;
                current_cost = neighbor_cost;
                accepted += 1;
                if current_cost < best_cost {
                    best = current.clone();
                    best_cost = current_cost;
                }
            }
        }
        temperature *= config.cooling_rate;
    }

    debug!(
        iterations,
        accepted,
        best_unassigned = best_cost.unassigned,
        best_weighted = best_cost.weighted,
        "annealing finished"
    );

    repair(ctx, &mut best);
    let score = score_plan(ctx, &best);
    EngineOutcome {
        engine: EngineKind::Annealing,
        plan: best,
        score,
        iterations,
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OptimizationConfig;
    use crate::geometry::Coordinates;
    use crate::models::{Capacity, Location, Vehicle};

    fn instance() -> (Vec<Vehicle>, Vec<Location>) {
        let vehicles = vec![
            Vehicle::new("a", Coordinates::new(10.0, 106.0), Capacity::weight(60.0)),
            Vehicle::new("b", Coordinates::new(10.05, 106.05), Capacity::weight(60.0)),
        ];
        let locations = (0..8)
            .map(|i| {
                let f = i as f64;
                Location::delivery(
                    format!("l{i}"),
                    10.0 + 0.008 * ((f * 3.0) % 8.0),
                    106.0 + 0.007 * f,
                    12.0,
                )
            })
            .collect();
        (vehicles, locations)
    }

    fn quick() -> AnnealingConfig {
        AnnealingConfig::default()
            .with_cooling_rate(0.9)
            .with_iterations_per_temperature(20)
    }

    #[test]
    fn test_never_worse_than_greedy() {
        let (vehicles, locations) = instance();
        let config = OptimizationConfig::default();
        let ctx = ProblemContext::new(&vehicles, locations.iter().collect(), &config, 3)
            .expect("valid");
        let greedy = score_plan(&ctx, &nearest_neighbor(&ctx));
        let outcome = run_annealing(&ctx, &quick(), &SearchControl::unbounded());
        assert!(outcome.score.within(&greedy, 1e-9));
        assert_eq!(outcome.plan.num_assigned(), 8);
        assert!(outcome.iterations > 0);
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let (vehicles, locations) = instance();
        let config = OptimizationConfig::default();
        let ctx = ProblemContext::new(&vehicles, locations.iter().collect(), &config, 3)
            .expect("valid");
        let a = run_annealing(&ctx, &quick(), &SearchControl::unbounded());
        let b = run_annealing(&ctx, &quick(), &SearchControl::unbounded());
        assert_eq!(a.plan, b.plan);
        assert_eq!(a.score, b.score);
    }

    #[test]
    fn test_max_iterations_cap() {
        let (vehicles, locations) = instance();
        let config = OptimizationConfig::default();
        let ctx = ProblemContext::new(&vehicles, locations.iter().collect(), &config, 3)
            .expect("valid");
        let outcome = run_annealing(&ctx, &quick().with_max_iterations(25), &SearchControl::unbounded());
        assert_eq!(outcome.iterations, 25);
    }

    #[test]
    fn test_cancelled_returns_greedy_start() {
        let (vehicles, locations) = instance();
        let config = OptimizationConfig::default();
        let ctx = ProblemContext::new(&vehicles, locations.iter().collect(), &config, 3)
            .expect("valid");
        let control = SearchControl::unbounded();
        control.cancel();
        let outcome = run_annealing(&ctx, &quick(), &control);
        assert_eq!(outcome.status, EngineStatus::TimedOut);
        assert_eq!(outcome.iterations, 0);
        assert_eq!(outcome.plan, nearest_neighbor(&ctx));
    }
}
