//! Ant colony configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the ant colony engine.
///
/// Edge attractiveness is `pheromone^alpha * (1 / distance)^beta`. After each
/// iteration every trail evaporates by `evaporation`, then the iteration-best
/// and best-so-far solutions deposit `deposit / (1 + score)` on their edges.
/// Trails are clamped to `[min_pheromone, max_pheromone]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AntColonyConfig {
    /// Ants per iteration.
    pub num_ants: usize,
    /// Hard cap on iterations.
    pub max_iterations: usize,
    /// Pheromone exponent.
    pub alpha: f64,
    /// Heuristic (inverse distance) exponent.
    pub beta: f64,
    /// Evaporation rate in (0, 1).
    pub evaporation: f64,
    /// Deposit scale.
    pub deposit: f64,
    pub initial_pheromone: f64,
    pub min_pheromone: f64,
    pub max_pheromone: f64,
    /// Iterations without improvement before stopping early. 0 disables.
    pub stagnation_limit: usize,
}

impl Default for AntColonyConfig {
    fn default() -> Self {
        Self {
            num_ants: 10,
            max_iterations: 50,
            alpha: 1.0,
            beta: 2.0,
            evaporation: 0.1,
            deposit: 1.0,
            initial_pheromone: 1.0,
            min_pheromone: 0.01,
            max_pheromone: 10.0,
            stagnation_limit: 15,
        }
    }
}

impl AntColonyConfig {
    pub fn with_num_ants(mut self, n: usize) -> Self {
        self.num_ants = n;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_exponents(mut self, alpha: f64, beta: f64) -> Self {
        self.alpha = alpha;
        self.beta = beta;
        self
    }

    pub fn with_evaporation(mut self, rate: f64) -> Self {
        self.evaporation = rate;
        self
    }

    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.stagnation_limit = limit;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.num_ants == 0 {
            return Err("num_ants must be positive".into());
        }
        if !(self.evaporation > 0.0 && self.evaporation < 1.0) {
            return Err(format!(
                "evaporation must be in (0, 1), got {}",
                self.evaporation
            ));
        }
        if self.alpha < 0.0 || self.beta < 0.0 {
            return Err("alpha and beta must be non-negative".into());
        }
        if !(self.min_pheromone > 0.0) || self.min_pheromone > self.max_pheromone {
            return Err("pheromone bounds must satisfy 0 < min <= max".into());
        }
        if !(self.min_pheromone..=self.max_pheromone).contains(&self.initial_pheromone) {
            return Err("initial_pheromone must lie within the pheromone bounds".into());
        }
        if !(self.deposit > 0.0) {
            return Err("deposit must be positive".into());
        }
        Ok(())
    }
}
