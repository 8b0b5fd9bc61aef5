//! Travel time under road, traffic and weather factors.

use serde::{Deserialize, Serialize};

/// Road classification of a segment.
///
/// Derived from segment length when no road network data is available:
/// short hops stay on local streets, medium hops use arterials, long hops
/// use highways.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoadClass {
    /// Local streets, segments under 5 km.
    Local,
    /// Arterial roads, segments under 50 km.
    Arterial,
    /// Highways and expressways.
    Highway,
}

impl RoadClass {
    /// Classifies a segment by its great-circle length.
    pub fn for_distance(distance_km: f64) -> Self {
        if distance_km < 5.0 {
            RoadClass::Local
        } else if distance_km < 50.0 {
            RoadClass::Arterial
        } else {
            RoadClass::Highway
        }
    }
}

/// Speed and slowdown factors for one leg.
///
/// Each factor lies in `(0, 1]`; `1.0` means no penalty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TravelContext {
    /// Free-flow speed in km/h.
    pub base_speed_kmh: f64,
    /// Road quality factor for the segment class.
    pub road_factor: f64,
    /// Peak-hour traffic factor at the leg's departure minute.
    pub traffic_factor: f64,
    /// Seasonal weather factor.
    pub weather_factor: f64,
}

impl TravelContext {
    /// A context with no penalties at the given speed.
    pub fn free_flow(base_speed_kmh: f64) -> Self {
        Self {
            base_speed_kmh,
            road_factor: 1.0,
            traffic_factor: 1.0,
            weather_factor: 1.0,
        }
    }

    /// Speed after all factors are applied.
    pub fn effective_speed(&self) -> f64 {
        self.base_speed_kmh * self.road_factor * self.traffic_factor * self.weather_factor
    }
}

/// Travel time in minutes: `distance / effective_speed * 60`.
///
/// A non-positive effective speed yields `f64::INFINITY`, which every
/// constraint check treats as unreachable.
///
/// # Examples
///
/// ```
/// use fleet_routing::geometry::{travel_time, TravelContext};
///
/// let ctx = TravelContext::free_flow(60.0);
/// assert!((travel_time(30.0, &ctx) - 30.0).abs() < 1e-10);
///
/// let rush = TravelContext { traffic_factor: 0.5, ..ctx };
/// assert!((travel_time(30.0, &rush) - 60.0).abs() < 1e-10);
/// ```
pub fn travel_time(distance_km: f64, context: &TravelContext) -> f64 {
    if distance_km <= 0.0 {
        return 0.0;
    }
    let speed = context.effective_speed();
    if speed <= 0.0 || !speed.is_finite() {
        return f64::INFINITY;
    }
    distance_km / speed * 60.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_flow() {
        let ctx = TravelContext::free_flow(40.0);
        assert!((travel_time(20.0, &ctx) - 30.0).abs() < 1e-10);
    }

    #[test]
    fn test_factors_multiply() {
        let ctx = TravelContext {
            base_speed_kmh: 100.0,
            road_factor: 0.5,
            traffic_factor: 0.8,
            weather_factor: 0.5,
        };
        // effective speed = 20 km/h
        assert!((ctx.effective_speed() - 20.0).abs() < 1e-10);
        assert!((travel_time(10.0, &ctx) - 30.0).abs() < 1e-10);
    }

    #[test]
    fn test_zero_distance() {
        let ctx = TravelContext::free_flow(40.0);
        assert_eq!(travel_time(0.0, &ctx), 0.0);
    }

    #[test]
    fn test_zero_speed_is_unreachable() {
        let ctx = TravelContext::free_flow(0.0);
        assert!(travel_time(1.0, &ctx).is_infinite());
    }

    #[test]
    fn test_road_class_thresholds() {
        assert_eq!(RoadClass::for_distance(0.5), RoadClass::Local);
        assert_eq!(RoadClass::for_distance(5.0), RoadClass::Arterial);
        assert_eq!(RoadClass::for_distance(49.9), RoadClass::Arterial);
        assert_eq!(RoadClass::for_distance(120.0), RoadClass::Highway);
    }
}
