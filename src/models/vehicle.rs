//! Vehicle type with capacity, cost rates and capabilities.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::TimeWindow;
use crate::geometry::Coordinates;

/// Load limits of a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Capacity {
    /// Payload in kilograms.
    pub weight_kg: f64,
    /// Cargo volume in cubic metres; `None` means volume is not limited.
    pub volume_m3: Option<f64>,
    /// Maximum number of stops on one route.
    pub max_stops: Option<usize>,
}

impl Capacity {
    /// Weight-only capacity.
    pub fn weight(weight_kg: f64) -> Self {
        Self {
            weight_kg,
            volume_m3: None,
            max_stops: None,
        }
    }
}

/// A vehicle that services one route.
///
/// # Examples
///
/// ```
/// use fleet_routing::geometry::Coordinates;
/// use fleet_routing::models::{Capacity, Vehicle};
///
/// let v = Vehicle::new("truck-1", Coordinates::new(10.0, 106.0), Capacity::weight(1000.0))
///     .with_cost_per_km(0.8)
///     .with_cost_per_hour(12.0)
///     .with_tag("hazmat");
/// assert_eq!(v.id(), "truck-1");
/// assert_eq!(v.capacity().weight_kg, 1000.0);
/// assert!(v.returns_to_depot());
/// assert!(v.tags().contains("hazmat"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    id: String,
    start: Coordinates,
    #[serde(default)]
    end: Option<Coordinates>,
    #[serde(default = "default_true")]
    return_to_depot: bool,
    capacity: Capacity,
    #[serde(default = "default_cost_per_km")]
    cost_per_km: f64,
    #[serde(default)]
    cost_per_hour: f64,
    #[serde(default)]
    max_distance_km: Option<f64>,
    #[serde(default)]
    max_duration_min: Option<f64>,
    #[serde(default)]
    tags: BTreeSet<String>,
    #[serde(default)]
    working_hours: Option<TimeWindow>,
    #[serde(default)]
    height_m: Option<f64>,
    #[serde(default)]
    gross_weight_kg: Option<f64>,
    #[serde(default)]
    fuel_l_per_km: f64,
    #[serde(default = "default_co2_per_km")]
    co2_kg_per_km: f64,
}

fn default_true() -> bool {
    true
}

fn default_cost_per_km() -> f64 {
    1.0
}

fn default_co2_per_km() -> f64 {
    0.27
}

impl Vehicle {
    /// Creates a vehicle starting (and ending) at `start`.
    ///
    /// Defaults: cost 1.0 per km, nothing per hour, no distance/duration
    /// limits, no tags, 0.27 kg CO2 per km.
    pub fn new(id: impl Into<String>, start: Coordinates, capacity: Capacity) -> Self {
        Self {
            id: id.into(),
            start,
            end: None,
            return_to_depot: true,
            capacity,
            cost_per_km: default_cost_per_km(),
            cost_per_hour: 0.0,
            max_distance_km: None,
            max_duration_min: None,
            tags: BTreeSet::new(),
            working_hours: None,
            height_m: None,
            gross_weight_kg: None,
            fuel_l_per_km: 0.0,
            co2_kg_per_km: default_co2_per_km(),
        }
    }

    /// Sets a distinct end location.
    pub fn with_end(mut self, end: Coordinates) -> Self {
        self.end = Some(end);
        self
    }

    /// Controls whether the route closes with a leg back to the start.
    ///
    /// Ignored when an explicit end location is set.
    pub fn with_return_to_depot(mut self, value: bool) -> Self {
        self.return_to_depot = value;
        self
    }

    pub fn with_cost_per_km(mut self, cost: f64) -> Self {
        self.cost_per_km = cost;
        self
    }

    pub fn with_cost_per_hour(mut self, cost: f64) -> Self {
        self.cost_per_hour = cost;
        self
    }

    pub fn with_max_distance_km(mut self, max: f64) -> Self {
        self.max_distance_km = Some(max);
        self
    }

    pub fn with_max_duration_min(mut self, max: f64) -> Self {
        self.max_duration_min = Some(max);
        self
    }

    /// Adds a capability tag such as `hazmat` or `refrigerated`.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn with_working_hours(mut self, hours: TimeWindow) -> Self {
        self.working_hours = Some(hours);
        self
    }

    /// Sets physical dimensions checked against location restrictions.
    pub fn with_dimensions(mut self, height_m: f64, gross_weight_kg: f64) -> Self {
        self.height_m = Some(height_m);
        self.gross_weight_kg = Some(gross_weight_kg);
        self
    }

    pub fn with_fuel_consumption(mut self, litres_per_km: f64) -> Self {
        self.fuel_l_per_km = litres_per_km;
        self
    }

    pub fn with_co2_per_km(mut self, kg_per_km: f64) -> Self {
        self.co2_kg_per_km = kg_per_km;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn start(&self) -> &Coordinates {
        &self.start
    }

    /// Where the route must finish, if anywhere.
    ///
    /// The explicit end location wins; otherwise the start when the vehicle
    /// returns to depot; otherwise `None` (route ends at its last stop).
    pub fn finish(&self) -> Option<&Coordinates> {
        match &self.end {
            Some(end) => Some(end),
            None if self.return_to_depot => Some(&self.start),
            None => None,
        }
    }

    pub fn end(&self) -> Option<&Coordinates> {
        self.end.as_ref()
    }

    pub fn returns_to_depot(&self) -> bool {
        self.return_to_depot
    }

    pub fn capacity(&self) -> &Capacity {
        &self.capacity
    }

    pub fn cost_per_km(&self) -> f64 {
        self.cost_per_km
    }

    pub fn cost_per_hour(&self) -> f64 {
        self.cost_per_hour
    }

    pub fn max_distance_km(&self) -> Option<f64> {
        self.max_distance_km
    }

    pub fn max_duration_min(&self) -> Option<f64> {
        self.max_duration_min
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn working_hours(&self) -> Option<&TimeWindow> {
        self.working_hours.as_ref()
    }

    pub fn height_m(&self) -> Option<f64> {
        self.height_m
    }

    pub fn gross_weight_kg(&self) -> Option<f64> {
        self.gross_weight_kg
    }

    pub fn fuel_l_per_km(&self) -> f64 {
        self.fuel_l_per_km
    }

    pub fn co2_kg_per_km(&self) -> f64 {
        self.co2_kg_per_km
    }
}
