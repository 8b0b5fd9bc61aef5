//! Evolutionary loop of the genetic engine.
//!
//! initialization → evaluation → elitism + tournament selection → order
//! crossover → swap mutation → repeat, until the generation cap, the
//! stagnation limit or the search control stops it.

use rand::seq::SliceRandom;
use rand::Rng;
use rayon::prelude::*;
use tracing::debug;

use crate::constructive::nearest_neighbor;
use crate::engine::{EngineOutcome, ProblemContext, SearchControl};
use crate::evaluation::{score_plan, PlanScore};
use crate::models::{EngineKind, EngineStatus};

use super::chromosome::{decode, GiantTour};
use super::config::GeneticConfig;
use super::operators::{order_crossover, swap_mutation, tournament};

/// Runs the genetic engine.
///
/// The first individual is the greedy plan's visiting order; the rest are
/// random permutations. Returns the best plan seen in any generation.
pub fn run_genetic(
    ctx: &ProblemContext<'_>,
    config: &GeneticConfig,
    control: &SearchControl,
) -> EngineOutcome {
    let n = ctx.num_locations();
    let mut rng = ctx.rng_for(EngineKind::Genetic);

    let greedy = nearest_neighbor(ctx);
    let mut seed_order = greedy.flatten();
    seed_order.extend(greedy.unassigned().iter().map(|&(i, _)| i));

    let mut population: Vec<GiantTour> = Vec::with_capacity(config.population_size);
    population.push(GiantTour::new(seed_order));
    while population.len() < config.population_size {
        let mut order: Vec<usize> = (0..n).collect();
        order.shuffle(&mut rng);
        population.push(GiantTour::new(order));
    }
    evaluate(ctx, &mut population, config.parallel);

    let mut best = best_of(&population).clone();
    let mut stagnation = 0usize;
    let mut generations = 0usize;
    let mut status = EngineStatus::Completed;
    let elite_count = config.elite_count();

    if n >= 2 {
        for _ in 0..config.max_generations {
            if control.should_stop() {
                status = EngineStatus::TimedOut;
                break;
            }

            population.sort_by(|a, b| a.fitness().total_cmp(&b.fitness()));
            let fitness: Vec<PlanScore> = population.iter().map(GiantTour::fitness).collect();
            let mut next_gen: Vec<GiantTour> = population[..elite_count].to_vec();

            while next_gen.len() < config.population_size {
                let p1 = &population[tournament(&fitness, config.tournament_size, &mut rng)];
                let p2 = &population[tournament(&fitness, config.tournament_size, &mut rng)];

                let children = if rng.random_range(0.0..1.0) < config.crossover_rate {
                    let (c1, c2) = order_crossover(p1.order(), p2.order(), &mut rng);
                    vec![c1, c2]
                } else {
                    vec![p1.order().to_vec()]
                };

                for mut child in children {
                    if next_gen.len() >= config.population_size {
                        break;
                    }
                    if rng.random_range(0.0..1.0) < config.mutation_rate {
                        swap_mutation(&mut child, &mut rng);
                    }
                    next_gen.push(GiantTour::new(child));
                }
            }

            evaluate(ctx, &mut next_gen[elite_count..], config.parallel);
            population = next_gen;
            generations += 1;

            let gen_best = best_of(&population);
            if gen_best.fitness() < best.fitness() {
                best = gen_best.clone();
                stagnation = 0;
            } else {
                stagnation += 1;
            }

            if config.stagnation_limit > 0 && stagnation >= config.stagnation_limit {
                debug!(generations, "genetic engine stagnated");
                break;
            }
        }
    }

    let plan = decode(ctx, best.order());
    let score = score_plan(ctx, &plan);
    EngineOutcome {
        engine: EngineKind::Genetic,
        plan,
        score,
        iterations: generations,
        status,
    }
}

fn evaluate(ctx: &ProblemContext<'_>, individuals: &mut [GiantTour], parallel: bool) {
    if parallel {
        individuals.par_iter_mut().for_each(|ind| ind.evaluate(ctx));
    } else {
        for ind in individuals {
            ind.evaluate(ctx);
        }
    }
}

fn best_of(population: &[GiantTour]) -> &GiantTour {
    population
        .iter()
        .min_by(|a, b| a.fitness().total_cmp(&b.fitness()))
        .unwrap_or(&population[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OptimizationConfig;
    use crate::evaluation::score_plan;
    use crate::geometry::Coordinates;
    use crate::models::{Capacity, Location, Vehicle};

    fn instance() -> (Vec<Vehicle>, Vec<Location>) {
        let vehicles = vec![
            Vehicle::new("a", Coordinates::new(10.0, 106.0), Capacity::weight(100.0)),
            Vehicle::new("b", Coordinates::new(10.1, 106.1), Capacity::weight(100.0)),
        ];
        let locations = (0..10)
            .map(|i| {
                let f = i as f64;
                Location::delivery(
                    format!("l{i}"),
                    10.0 + 0.011 * f,
                    106.0 + 0.009 * ((f * 7.0) % 10.0),
                    15.0,
                )
            })
            .collect();
        (vehicles, locations)
    }

    fn small_config() -> GeneticConfig {
        GeneticConfig::default()
            .with_population_size(16)
            .with_max_generations(20)
            .with_parallel(false)
    }

    #[test]
    fn test_never_worse_than_greedy() {
        let (vehicles, locations) = instance();
        let config = OptimizationConfig::default();
        let ctx = ProblemContext::new(&vehicles, locations.iter().collect(), &config, 11)
            .expect("valid");
        let greedy_score = score_plan(&ctx, &nearest_neighbor(&ctx));
        let outcome = run_genetic(&ctx, &small_config(), &SearchControl::unbounded());
        assert!(outcome.score.within(&greedy_score, 1e-9));
        assert_eq!(outcome.status, EngineStatus::Completed);
        assert_eq!(outcome.plan.num_assigned(), 10);
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let (vehicles, locations) = instance();
        let config = OptimizationConfig::default();
        let ctx = ProblemContext::new(&vehicles, locations.iter().collect(), &config, 5)
            .expect("valid");
        let a = run_genetic(&ctx, &small_config(), &SearchControl::unbounded());
        let b = run_genetic(&ctx, &small_config().with_parallel(true), &SearchControl::unbounded());
        assert_eq!(a.plan, b.plan);
        assert_eq!(a.iterations, b.iterations);
    }

    #[test]
    fn test_stops_when_cancelled() {
        let (vehicles, locations) = instance();
        let config = OptimizationConfig::default();
        let ctx = ProblemContext::new(&vehicles, locations.iter().collect(), &config, 5)
            .expect("valid");
        let control = SearchControl::unbounded();
        control.cancel();
        let outcome = run_genetic(&ctx, &small_config(), &control);
        assert_eq!(outcome.status, EngineStatus::TimedOut);
        assert_eq!(outcome.iterations, 0);
        // still returns a complete plan
        assert_eq!(outcome.plan.num_assigned() + outcome.plan.unassigned().len(), 10);
    }
}
