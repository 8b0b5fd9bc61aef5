//! Engine abstraction shared by the four route-generation strategies.
//!
//! Every engine reads the same [`ProblemContext`] and returns an
//! [`EngineOutcome`]: a complete [`Plan`] (every routable location is either
//! on a route or unassigned with a reason), its score and run statistics.
//! Engines poll a [`SearchControl`] at iteration boundaries and return their
//! best-so-far plan when it fires.

mod context;
mod control;
mod plan;

pub use context::{Leg, ProblemContext};
pub use control::SearchControl;
pub use plan::Plan;

use crate::aco::{run_ant_colony, AntColonyConfig};
use crate::config::OptimizationConfig;
use crate::constructive::nearest_neighbor;
use crate::evaluation::{score_plan, PlanScore};
use crate::ga::{run_genetic, GeneticConfig};
use crate::models::{EngineKind, EngineStatus};
use crate::sa::{run_annealing, AnnealingConfig};

/// Result of one engine run.
#[derive(Debug, Clone)]
pub struct EngineOutcome {
    pub engine: EngineKind,
    pub plan: Plan,
    /// Score of `plan`, lower is better.
    pub score: PlanScore,
    /// Generations, temperature steps or colony iterations; 1 for greedy.
    pub iterations: usize,
    pub status: EngineStatus,
}

/// The closed set of route-generation engines.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteEngine {
    Greedy,
    Genetic(GeneticConfig),
    Annealing(AnnealingConfig),
    AntColony(AntColonyConfig),
}

impl RouteEngine {
    /// The engine of `kind` tuned by `config`.
    pub fn from_config(kind: EngineKind, config: &OptimizationConfig) -> Self {
        match kind {
            EngineKind::Greedy => RouteEngine::Greedy,
            EngineKind::Genetic => RouteEngine::Genetic(config.genetic.clone()),
            EngineKind::Annealing => RouteEngine::Annealing(config.annealing.clone()),
            EngineKind::AntColony => RouteEngine::AntColony(config.ant_colony.clone()),
        }
    }

    pub fn kind(&self) -> EngineKind {
        match self {
            RouteEngine::Greedy => EngineKind::Greedy,
            RouteEngine::Genetic(_) => EngineKind::Genetic,
            RouteEngine::Annealing(_) => EngineKind::Annealing,
            RouteEngine::AntColony(_) => EngineKind::AntColony,
        }
    }

    /// Runs the engine. `incumbent` is the best plan found so far by other
    /// engines; only the ant colony uses it.
    pub fn run(
        &self,
        ctx: &ProblemContext<'_>,
        control: &SearchControl,
        incumbent: Option<&Plan>,
    ) -> EngineOutcome {
        match self {
            RouteEngine::Greedy => {
                let plan = nearest_neighbor(ctx);
                EngineOutcome {
                    engine: EngineKind::Greedy,
                    score: score_plan(ctx, &plan),
                    plan,
                    iterations: 1,
                    status: EngineStatus::Completed,
                }
            }
            RouteEngine::Genetic(config) => run_genetic(ctx, config, control),
            RouteEngine::Annealing(config) => run_annealing(ctx, config, control),
            RouteEngine::AntColony(config) => run_ant_colony(ctx, config, control, incumbent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_roundtrip() {
        let config = OptimizationConfig::default();
        for kind in EngineKind::ALL {
            assert_eq!(RouteEngine::from_config(kind, &config).kind(), kind);
        }
    }

    #[test]
    fn test_engine_carries_tuning() {
        let mut config = OptimizationConfig::default();
        config.genetic.population_size = 12;
        match RouteEngine::from_config(EngineKind::Genetic, &config) {
            RouteEngine::Genetic(ga) => assert_eq!(ga.population_size, 12),
            other => panic!("unexpected engine {other:?}"),
        }
    }
}
