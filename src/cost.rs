//! Travel cost model.
//!
//! Cost of a leg is distance cost + time cost + tolls + fuel, all in the
//! configured currency unit. Pure functions of their inputs.

use crate::config::OptimizationConfig;
use crate::geometry::RoadClass;
use crate::models::Vehicle;

/// Cost of one leg split by component.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CostBreakdown {
    pub distance: f64,
    pub time: f64,
    pub toll: f64,
    pub fuel: f64,
}

impl CostBreakdown {
    pub fn total(&self) -> f64 {
        self.distance + self.time + self.toll + self.fuel
    }
}

/// Estimated toll for a segment of `class`.
///
/// Zero when tolls are avoided and the class has a toll-free alternative.
///
/// ```
/// use fleet_routing::config::OptimizationConfig;
/// use fleet_routing::cost::toll_estimate;
/// use fleet_routing::geometry::RoadClass;
///
/// let mut config = OptimizationConfig::default();
/// let toll = toll_estimate(100.0, RoadClass::Highway, &config);
/// assert!((toll - 5.0).abs() < 1e-9);
///
/// config.constraints.avoid_tolls = true;
/// assert_eq!(toll_estimate(100.0, RoadClass::Highway, &config), 0.0);
/// ```
pub fn toll_estimate(distance_km: f64, class: RoadClass, config: &OptimizationConfig) -> f64 {
    let road = config.regional.road(class);
    if config.constraints.avoid_tolls && road.toll_free_alternative {
        return 0.0;
    }
    distance_km.max(0.0) * road.toll_per_km
}

/// Cost of a leg broken down by component.
pub fn cost_breakdown(
    distance_km: f64,
    time_minutes: f64,
    class: RoadClass,
    vehicle: &Vehicle,
    config: &OptimizationConfig,
) -> CostBreakdown {
    let distance_km = distance_km.max(0.0);
    CostBreakdown {
        distance: distance_km * vehicle.cost_per_km(),
        time: time_minutes.max(0.0) / 60.0 * vehicle.cost_per_hour(),
        toll: toll_estimate(distance_km, class, config),
        fuel: distance_km * vehicle.fuel_l_per_km() * config.regional.fuel_price_per_liter,
    }
}

/// Total cost of a leg.
pub fn travel_cost(
    distance_km: f64,
    time_minutes: f64,
    class: RoadClass,
    vehicle: &Vehicle,
    config: &OptimizationConfig,
) -> f64 {
    cost_breakdown(distance_km, time_minutes, class, vehicle, config).total()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Coordinates;
    use crate::models::Capacity;

    fn vehicle() -> Vehicle {
        Vehicle::new("v1", Coordinates::new(10.0, 106.0), Capacity::weight(1000.0))
            .with_cost_per_km(2.0)
            .with_cost_per_hour(30.0)
    }

    #[test]
    fn test_distance_and_time_cost() {
        let config = OptimizationConfig::default();
        let cost = travel_cost(10.0, 30.0, RoadClass::Arterial, &vehicle(), &config);
        // 10 km * 2.0 + 0.5 h * 30.0, arterial roads are toll-free
        assert!((cost - 35.0).abs() < 1e-9);
    }

    #[test]
    fn test_highway_toll_included() {
        let config = OptimizationConfig::default();
        let b = cost_breakdown(100.0, 60.0, RoadClass::Highway, &vehicle(), &config);
        assert!((b.toll - 5.0).abs() < 1e-9);
        assert!((b.total() - (200.0 + 30.0 + 5.0)).abs() < 1e-9);
    }

    #[test]
    fn test_toll_kept_without_alternative() {
        let mut config = OptimizationConfig::default();
        config.constraints.avoid_tolls = true;
        config.regional.highway.toll_free_alternative = false;
        assert!(toll_estimate(100.0, RoadClass::Highway, &config) > 0.0);
    }

    #[test]
    fn test_fuel_cost() {
        let mut config = OptimizationConfig::default();
        config.regional.fuel_price_per_liter = 1.5;
        let v = vehicle().with_fuel_consumption(0.2);
        let b = cost_breakdown(10.0, 0.0, RoadClass::Local, &v, &config);
        assert!((b.fuel - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_leg_is_free() {
        let config = OptimizationConfig::default();
        assert_eq!(travel_cost(0.0, 0.0, RoadClass::Local, &vehicle(), &config), 0.0);
    }
}
