//! Optimization configuration.
//!
//! [`OptimizationConfig`] holds the objective weights, constraint toggles,
//! regional factors and engine tuning for one call to
//! [`optimize`](crate::optimizer::optimize).

use serde::{Deserialize, Serialize};

use crate::aco::AntColonyConfig;
use crate::error::RoutingError;
use crate::ga::GeneticConfig;
use crate::geometry::{RoadClass, TravelContext};
use crate::models::EngineKind;
use crate::sa::AnnealingConfig;

/// Relative importance of each objective term.
///
/// Each weight lies in `[0, 1]`. They need not sum to one: the evaluator
/// normalizes them. All-zero weights are treated as equal weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveWeights {
    pub distance: f64,
    pub time: f64,
    pub cost: f64,
    pub utilization: f64,
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        Self {
            distance: 0.3,
            time: 0.2,
            cost: 0.4,
            utilization: 0.1,
        }
    }
}

impl ObjectiveWeights {
    /// Weights scaled to sum to one.
    pub fn normalized(&self) -> Self {
        let sum = self.distance + self.time + self.cost + self.utilization;
        if sum <= 0.0 || !sum.is_finite() {
            return Self {
                distance: 0.25,
                time: 0.25,
                cost: 0.25,
                utilization: 0.25,
            };
        }
        Self {
            distance: self.distance / sum,
            time: self.time / sum,
            cost: self.cost / sum,
            utilization: self.utilization / sum,
        }
    }

    fn validate(&self) -> Result<(), String> {
        for (name, w) in [
            ("distance", self.distance),
            ("time", self.time),
            ("cost", self.cost),
            ("utilization", self.utilization),
        ] {
            if !w.is_finite() || !(0.0..=1.0).contains(&w) {
                return Err(format!("objective weight `{name}` must be in [0, 1], got {w}"));
            }
        }
        Ok(())
    }
}

/// Which constraints are enforced and which road features are avoided.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConstraintToggles {
    pub enforce_time_windows: bool,
    pub enforce_capacity: bool,
    pub avoid_tolls: bool,
    pub avoid_highways: bool,
}

impl Default for ConstraintToggles {
    fn default() -> Self {
        Self {
            enforce_time_windows: true,
            enforce_capacity: true,
            avoid_tolls: false,
            avoid_highways: false,
        }
    }
}

/// Which regional factors feed into travel time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionalToggles {
    pub traffic: bool,
    pub weather: bool,
    pub road_condition: bool,
}

impl Default for RegionalToggles {
    fn default() -> Self {
        Self {
            traffic: true,
            weather: true,
            road_condition: true,
        }
    }
}

/// A slowdown during part of the day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeakWindow {
    /// Window start, minutes since midnight.
    pub start_minute: f64,
    /// Window end (exclusive), minutes since midnight.
    pub end_minute: f64,
    /// Speed factor inside the window, `(0, 1]`.
    pub factor: f64,
}

/// Speed, toll and detour characteristics of one road class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoadProfile {
    /// Road quality factor, `(0, 1]`.
    pub speed_factor: f64,
    /// Toll charged per km on this class.
    pub toll_per_km: f64,
    /// Whether a toll-free alternative exists for segments of this class.
    pub toll_free_alternative: bool,
}

/// Deterministic road, traffic and weather factors for the service region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalFactors {
    pub peak_windows: Vec<PeakWindow>,
    /// Months (1..=12) with adverse weather.
    pub adverse_months: Vec<u8>,
    /// Speed factor during adverse months, `(0, 1]`.
    pub adverse_weather_factor: f64,
    pub local: RoadProfile,
    pub arterial: RoadProfile,
    pub highway: RoadProfile,
    /// Fuel price per litre, used with each vehicle's consumption.
    pub fuel_price_per_liter: f64,
}

impl Default for RegionalFactors {
    fn default() -> Self {
        Self {
            peak_windows: vec![
                PeakWindow {
                    start_minute: 420.0,
                    end_minute: 540.0,
                    factor: 0.6,
                },
                PeakWindow {
                    start_minute: 1020.0,
                    end_minute: 1140.0,
                    factor: 0.6,
                },
            ],
            adverse_months: vec![6, 7, 8, 9],
            adverse_weather_factor: 0.85,
            local: RoadProfile {
                speed_factor: 0.7,
                toll_per_km: 0.0,
                toll_free_alternative: true,
            },
            arterial: RoadProfile {
                speed_factor: 0.9,
                toll_per_km: 0.0,
                toll_free_alternative: true,
            },
            highway: RoadProfile {
                speed_factor: 1.0,
                toll_per_km: 0.05,
                toll_free_alternative: true,
            },
            fuel_price_per_liter: 0.0,
        }
    }
}

impl RegionalFactors {
    /// Profile for a road class.
    pub fn road(&self, class: RoadClass) -> &RoadProfile {
        match class {
            RoadClass::Local => &self.local,
            RoadClass::Arterial => &self.arterial,
            RoadClass::Highway => &self.highway,
        }
    }

    /// Traffic factor for a departure at `minute` (wrapped to one day).
    ///
    /// Overlapping windows take the strongest slowdown.
    pub fn traffic_factor(&self, minute: f64) -> f64 {
        let minute = minute.rem_euclid(1440.0);
        self.peak_windows
            .iter()
            .filter(|w| minute >= w.start_minute && minute < w.end_minute)
            .map(|w| w.factor)
            .fold(1.0, f64::min)
    }

    /// Weather factor for a calendar month.
    pub fn weather_factor(&self, month: u8) -> f64 {
        if self.adverse_months.contains(&month) {
            self.adverse_weather_factor
        } else {
            1.0
        }
    }

    fn validate(&self) -> Result<(), String> {
        let in_unit = |f: f64| f.is_finite() && f > 0.0 && f <= 1.0;
        for w in &self.peak_windows {
            if !in_unit(w.factor) || w.start_minute > w.end_minute {
                return Err(format!("invalid peak window {w:?}"));
            }
        }
        if !in_unit(self.adverse_weather_factor) {
            return Err("adverse_weather_factor must be in (0, 1]".into());
        }
        if self.adverse_months.iter().any(|m| !(1..=12).contains(m)) {
            return Err("adverse_months must be in 1..=12".into());
        }
        for (name, road) in [
            ("local", &self.local),
            ("arterial", &self.arterial),
            ("highway", &self.highway),
        ] {
            if !in_unit(road.speed_factor) {
                return Err(format!("{name} speed_factor must be in (0, 1]"));
            }
            if !road.toll_per_km.is_finite() || road.toll_per_km < 0.0 {
                return Err(format!("{name} toll_per_km must be non-negative"));
            }
        }
        if !self.fuel_price_per_liter.is_finite() || self.fuel_price_per_liter < 0.0 {
            return Err("fuel_price_per_liter must be non-negative".into());
        }
        Ok(())
    }
}

/// What to do with a location whose coordinates are out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InvalidLocationPolicy {
    /// Leave it unassigned with `InvalidLocation` and route everything else.
    #[default]
    Unassign,
    /// Abort the call with [`RoutingError::InvalidLocation`].
    Reject,
}

/// Configuration for one optimization call.
///
/// # Examples
///
/// ```
/// use fleet_routing::config::{ObjectiveWeights, OptimizationConfig};
/// use fleet_routing::models::EngineKind;
///
/// let config = OptimizationConfig::default()
///     .with_seed(7)
///     .with_time_budget_ms(2_000)
///     .with_engines(vec![EngineKind::Greedy, EngineKind::Annealing])
///     .with_weights(ObjectiveWeights { distance: 1.0, time: 0.0, cost: 0.0, utilization: 0.0 });
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizationConfig {
    pub weights: ObjectiveWeights,
    pub constraints: ConstraintToggles,
    pub regional_toggles: RegionalToggles,
    pub regional: RegionalFactors,
    pub invalid_locations: InvalidLocationPolicy,
    /// Engines to run. The ant colony always runs last.
    pub engines: Vec<EngineKind>,
    /// Wall-clock budget for the engine phase. `None` = unbounded.
    pub time_budget_ms: Option<u64>,
    /// Seed for the stochastic engines. `None` = time-based.
    pub seed: Option<u64>,
    /// Default route departure, minutes since midnight.
    pub departure_minute: f64,
    /// Calendar month of the run (1..=12), for weather factors.
    pub month: u8,
    /// Free-flow speed in km/h.
    pub base_speed_kmh: f64,
    /// Cap on accepted 2-opt reversals per route.
    pub two_opt_max_iterations: usize,
    pub genetic: GeneticConfig,
    pub annealing: AnnealingConfig,
    pub ant_colony: AntColonyConfig,
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        Self {
            weights: ObjectiveWeights::default(),
            constraints: ConstraintToggles::default(),
            regional_toggles: RegionalToggles::default(),
            regional: RegionalFactors::default(),
            invalid_locations: InvalidLocationPolicy::default(),
            engines: EngineKind::ALL.to_vec(),
            time_budget_ms: None,
            seed: None,
            departure_minute: 480.0,
            month: 1,
            base_speed_kmh: 40.0,
            two_opt_max_iterations: 1000,
            genetic: GeneticConfig::default(),
            annealing: AnnealingConfig::default(),
            ant_colony: AntColonyConfig::default(),
        }
    }
}

impl OptimizationConfig {
    pub fn with_weights(mut self, weights: ObjectiveWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_constraints(mut self, constraints: ConstraintToggles) -> Self {
        self.constraints = constraints;
        self
    }

    pub fn with_regional_toggles(mut self, toggles: RegionalToggles) -> Self {
        self.regional_toggles = toggles;
        self
    }

    pub fn with_regional(mut self, regional: RegionalFactors) -> Self {
        self.regional = regional;
        self
    }

    pub fn with_invalid_locations(mut self, policy: InvalidLocationPolicy) -> Self {
        self.invalid_locations = policy;
        self
    }

    pub fn with_engines(mut self, engines: Vec<EngineKind>) -> Self {
        self.engines = engines;
        self
    }

    pub fn with_time_budget_ms(mut self, ms: u64) -> Self {
        self.time_budget_ms = Some(ms);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_departure_minute(mut self, minute: f64) -> Self {
        self.departure_minute = minute;
        self
    }

    pub fn with_month(mut self, month: u8) -> Self {
        self.month = month;
        self
    }

    pub fn with_base_speed_kmh(mut self, speed: f64) -> Self {
        self.base_speed_kmh = speed;
        self
    }

    pub fn with_genetic(mut self, genetic: GeneticConfig) -> Self {
        self.genetic = genetic;
        self
    }

    pub fn with_annealing(mut self, annealing: AnnealingConfig) -> Self {
        self.annealing = annealing;
        self
    }

    pub fn with_ant_colony(mut self, ant_colony: AntColonyConfig) -> Self {
        self.ant_colony = ant_colony;
        self
    }

    /// Disables traffic, weather and road-condition factors.
    pub fn without_regional_factors(mut self) -> Self {
        self.regional_toggles = RegionalToggles {
            traffic: false,
            weather: false,
            road_condition: false,
        };
        self
    }

    /// Road class used for a segment of `distance_km`.
    ///
    /// With `avoid_highways` set, highway-length segments run on arterials.
    pub fn road_class_for(&self, distance_km: f64) -> RoadClass {
        match RoadClass::for_distance(distance_km) {
            RoadClass::Highway if self.constraints.avoid_highways => RoadClass::Arterial,
            class => class,
        }
    }

    /// Travel context for a segment of `class` departing at `minute`.
    pub fn travel_context(&self, class: RoadClass, minute: f64) -> TravelContext {
        let toggles = &self.regional_toggles;
        TravelContext {
            base_speed_kmh: self.base_speed_kmh,
            road_factor: if toggles.road_condition {
                self.regional.road(class).speed_factor
            } else {
                1.0
            },
            traffic_factor: self.traffic_factor_at(minute),
            weather_factor: if toggles.weather {
                self.regional.weather_factor(self.month)
            } else {
                1.0
            },
        }
    }

    /// Traffic factor for a departure at `minute`, 1.0 when traffic is off.
    pub fn traffic_factor_at(&self, minute: f64) -> f64 {
        if self.regional_toggles.traffic {
            self.regional.traffic_factor(minute)
        } else {
            1.0
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), RoutingError> {
        self.weights.validate().map_err(RoutingError::Configuration)?;
        self.regional.validate().map_err(RoutingError::Configuration)?;
        if self.engines.is_empty() {
            return Err(RoutingError::config("at least one engine must be enabled"));
        }
        if !(1..=12).contains(&self.month) {
            return Err(RoutingError::config(format!(
                "month must be in 1..=12, got {}",
                self.month
            )));
        }
        if !self.base_speed_kmh.is_finite() || self.base_speed_kmh <= 0.0 {
            return Err(RoutingError::config("base_speed_kmh must be positive"));
        }
        if !self.departure_minute.is_finite() || self.departure_minute < 0.0 {
            return Err(RoutingError::config("departure_minute must be non-negative"));
        }
        self.genetic
            .validate()
            .map_err(|e| RoutingError::config(format!("genetic: {e}")))?;
        self.annealing
            .validate()
            .map_err(|e| RoutingError::config(format!("annealing: {e}")))?;
        self.ant_colony
            .validate()
            .map_err(|e| RoutingError::config(format!("ant_colony: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = OptimizationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.engines.len(), 4);
    }

    #[test]
    fn test_weights_normalized() {
        let w = ObjectiveWeights {
            distance: 1.0,
            time: 1.0,
            cost: 0.0,
            utilization: 0.0,
        }
        .normalized();
        assert!((w.distance - 0.5).abs() < 1e-12);
        assert!((w.time - 0.5).abs() < 1e-12);
        assert_eq!(w.cost, 0.0);
    }

    #[test]
    fn test_zero_weights_become_equal() {
        let w = ObjectiveWeights {
            distance: 0.0,
            time: 0.0,
            cost: 0.0,
            utilization: 0.0,
        }
        .normalized();
        assert_eq!(w.distance, 0.25);
        assert_eq!(w.utilization, 0.25);
    }

    #[test]
    fn test_negative_weight_rejected() {
        let config = OptimizationConfig::default().with_weights(ObjectiveWeights {
            distance: -0.1,
            ..ObjectiveWeights::default()
        });
        assert!(matches!(
            config.validate(),
            Err(RoutingError::Configuration(_))
        ));
    }

    #[test]
    fn test_empty_engine_list_rejected() {
        let config = OptimizationConfig::default().with_engines(vec![]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_traffic_factor_windows() {
        let regional = RegionalFactors::default();
        assert_eq!(regional.traffic_factor(480.0), 0.6);
        assert_eq!(regional.traffic_factor(600.0), 1.0);
        assert_eq!(regional.traffic_factor(1080.0), 0.6);
        // next day's morning peak
        assert_eq!(regional.traffic_factor(1440.0 + 450.0), 0.6);
    }

    #[test]
    fn test_weather_factor_months() {
        let regional = RegionalFactors::default();
        assert_eq!(regional.weather_factor(7), 0.85);
        assert_eq!(regional.weather_factor(1), 1.0);
    }

    #[test]
    fn test_travel_context_toggles() {
        let config = OptimizationConfig::default().with_month(7);
        let ctx = config.travel_context(RoadClass::Local, 480.0);
        assert_eq!(ctx.road_factor, 0.7);
        assert_eq!(ctx.traffic_factor, 0.6);
        assert_eq!(ctx.weather_factor, 0.85);

        let plain = config.without_regional_factors();
        let ctx = plain.travel_context(RoadClass::Local, 480.0);
        assert_eq!(ctx.effective_speed(), plain.base_speed_kmh);
    }

    #[test]
    fn test_avoid_highways_uses_arterial_speed() {
        let mut config = OptimizationConfig::default();
        config.constraints.avoid_highways = true;
        assert_eq!(config.road_class_for(120.0), RoadClass::Arterial);
        assert_eq!(config.road_class_for(2.0), RoadClass::Local);
        let ctx = config.travel_context(config.road_class_for(120.0), 600.0);
        assert_eq!(ctx.road_factor, config.regional.arterial.speed_factor);
    }

    #[test]
    fn test_config_roundtrips_through_json() {
        let config = OptimizationConfig::default().with_seed(11);
        let json = serde_json::to_string(&config).expect("serialize");
        let back: OptimizationConfig = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let back: OptimizationConfig =
            serde_json::from_str(r#"{"seed": 3, "month": 8}"#).expect("deserialize");
        assert_eq!(back.seed, Some(3));
        assert_eq!(back.month, 8);
        assert_eq!(back.base_speed_kmh, 40.0);
    }
}
