//! Route and visit types.

use serde::{Deserialize, Serialize};

/// A single stop within a route, with its computed timing and load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visit {
    /// Location served at this stop.
    pub location_id: String,
    /// Arrival time, minutes since midnight.
    pub arrival_minute: f64,
    /// Time spent waiting for the window to open.
    pub waiting_min: f64,
    /// Departure time (arrival + waiting + service).
    pub departure_minute: f64,
    /// Cumulative weight after this stop.
    pub load_weight_kg: f64,
    /// Cumulative volume after this stop.
    pub load_volume_m3: f64,
}

/// Derived totals of a finalized route.
///
/// Distance in km, durations in minutes, cost in the configured currency unit.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RouteTotals {
    pub distance_km: f64,
    pub duration_min: f64,
    /// Travel cost including tolls and fuel.
    pub cost: f64,
    /// Toll share of `cost`.
    pub toll_cost: f64,
    pub waiting_min: f64,
    /// Fraction of the binding capacity dimension used, `0..=1`.
    pub utilization: f64,
    /// Stops served per route hour.
    pub efficiency_score: f64,
    pub co2_kg: f64,
    pub fuel_l: f64,
    /// Clock time when the vehicle finishes.
    pub finish_minute: f64,
}

/// An ordered sequence of stops assigned to a single vehicle.
///
/// A route starts at the vehicle's start location; the closing leg (if any)
/// is included in the totals but not stored as a visit. Routes are
/// immutable: changing the stop order means building a new route.
///
/// # Examples
///
/// ```
/// use fleet_routing::models::{Route, RouteTotals, Visit};
///
/// let visit = Visit {
///     location_id: "A".into(),
///     arrival_minute: 490.0,
///     waiting_min: 0.0,
///     departure_minute: 500.0,
///     load_weight_kg: 200.0,
///     load_volume_m3: 0.0,
/// };
/// let route = Route::new("truck-1", vec![visit], RouteTotals::default());
/// assert_eq!(route.len(), 1);
/// assert_eq!(route.location_ids(), vec!["A"]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    vehicle_id: String,
    visits: Vec<Visit>,
    totals: RouteTotals,
}

impl Route {
    /// Creates a finalized route.
    pub fn new(vehicle_id: impl Into<String>, visits: Vec<Visit>, totals: RouteTotals) -> Self {
        Self {
            vehicle_id: vehicle_id.into(),
            visits,
            totals,
        }
    }

    pub fn vehicle_id(&self) -> &str {
        &self.vehicle_id
    }

    /// Returns the ordered sequence of visits.
    pub fn visits(&self) -> &[Visit] {
        &self.visits
    }

    pub fn len(&self) -> usize {
        self.visits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visits.is_empty()
    }

    /// Returns the location ids in visit order.
    pub fn location_ids(&self) -> Vec<&str> {
        self.visits.iter().map(|v| v.location_id.as_str()).collect()
    }

    pub fn totals(&self) -> &RouteTotals {
        &self.totals
    }

    pub fn distance_km(&self) -> f64 {
        self.totals.distance_km
    }

    pub fn duration_min(&self) -> f64 {
        self.totals.duration_min
    }

    pub fn cost(&self) -> f64 {
        self.totals.cost
    }

    pub fn utilization(&self) -> f64 {
        self.totals.utilization
    }
}
