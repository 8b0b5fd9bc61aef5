//! Genetic engine configuration.
//!
//! [`GeneticConfig`] holds the parameters of the evolutionary loop.

use serde::{Deserialize, Serialize};

/// Configuration for the genetic engine.
///
/// # Examples
///
/// ```
/// use fleet_routing::ga::GeneticConfig;
///
/// let config = GeneticConfig::default()
///     .with_population_size(60)
///     .with_max_generations(200)
///     .with_mutation_rate(0.2);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneticConfig {
    /// Number of permutations per generation.
    pub population_size: usize,

    /// Hard cap on generations.
    pub max_generations: usize,

    /// Individuals drawn per tournament.
    pub tournament_size: usize,

    /// Fraction of the population copied unchanged to the next generation.
    pub elite_ratio: f64,

    /// Probability of applying order crossover to a parent pair.
    pub crossover_rate: f64,

    /// Probability of applying swap mutation to an offspring.
    pub mutation_rate: f64,

    /// Generations without improvement before stopping early. 0 disables.
    pub stagnation_limit: usize,

    /// Evaluate offspring in parallel with rayon.
    pub parallel: bool,
}

impl Default for GeneticConfig {
    fn default() -> Self {
        Self {
            population_size: 40,
            max_generations: 150,
            tournament_size: 3,
            elite_ratio: 0.1,
            crossover_rate: 0.9,
            mutation_rate: 0.15,
            stagnation_limit: 30,
            parallel: true,
        }
    }
}

impl GeneticConfig {
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    pub fn with_tournament_size(mut self, k: usize) -> Self {
        self.tournament_size = k;
        self
    }

    pub fn with_elite_ratio(mut self, ratio: f64) -> Self {
        self.elite_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the stagnation limit (0 to disable).
    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.stagnation_limit = limit;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Number of elites carried per generation.
    pub(crate) fn elite_count(&self) -> usize {
        ((self.population_size as f64 * self.elite_ratio) as usize).min(self.population_size)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.population_size < 2 {
            return Err("population_size must be at least 2".into());
        }
        if self.tournament_size == 0 {
            return Err("tournament_size must be positive".into());
        }
        for (name, rate) in [
            ("elite_ratio", self.elite_ratio),
            ("crossover_rate", self.crossover_rate),
            ("mutation_rate", self.mutation_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(format!("{name} must be in [0, 1], got {rate}"));
            }
        }
        if self.elite_count() >= self.population_size {
            return Err("elite_ratio leaves no room for offspring".into());
        }
        Ok(())
    }
}
