//! Annealing engine configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the simulated annealing engine.
///
/// Temperature cools geometrically, `T_{k+1} = cooling_rate * T_k`, until it
/// drops below `min_temperature`. Temperatures are on the scale of the
/// objective score.
///
/// # Examples
///
/// ```
/// use fleet_routing::sa::AnnealingConfig;
///
/// let config = AnnealingConfig::default()
///     .with_initial_temperature(2.0)
///     .with_cooling_rate(0.98)
///     .with_iterations_per_temperature(20);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnealingConfig {
    /// Starting temperature. Higher values accept more worsening moves.
    pub initial_temperature: f64,

    /// The search stops once the temperature falls below this floor.
    pub min_temperature: f64,

    /// Geometric cooling factor in (0, 1).
    pub cooling_rate: f64,

    /// Neighbors tried at each temperature level.
    pub iterations_per_temperature: usize,

    /// Hard cap on neighbors tried. 0 = no limit.
    pub max_iterations: usize,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 1.0,
            min_temperature: 1e-3,
            cooling_rate: 0.995,
            iterations_per_temperature: 10,
            max_iterations: 0,
        }
    }
}

impl AnnealingConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate;
        self
    }

    pub fn with_iterations_per_temperature(mut self, n: usize) -> Self {
        self.iterations_per_temperature = n;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.initial_temperature > 0.0) || !self.initial_temperature.is_finite() {
            return Err("initial_temperature must be positive".into());
        }
        if !(self.min_temperature > 0.0) {
            return Err("min_temperature must be positive".into());
        }
        if self.min_temperature >= self.initial_temperature {
            return Err("min_temperature must be below initial_temperature".into());
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
            return Err(format!(
                "cooling_rate must be in (0, 1), got {}",
                self.cooling_rate
            ));
        }
        if self.iterations_per_temperature == 0 {
            return Err("iterations_per_temperature must be positive".into());
        }
        Ok(())
    }
}
