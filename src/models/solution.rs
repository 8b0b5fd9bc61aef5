//! Solution, unassigned-location and placement-failure types.

use serde::{Deserialize, Serialize};

use super::{Diagnostics, Route};

/// Why a location could not be appended to a vehicle's route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementFailure {
    /// Weight, volume or stop count would exceed the vehicle's capacity.
    CapacityExceeded,
    /// Arrival would fall after the location's window closes.
    TimeWindowViolation,
    /// The vehicle lacks a required tag or breaks a height/weight restriction.
    CapabilityMismatch,
    /// The route (including its closing leg) would exceed the vehicle's max distance.
    DistanceLimitExceeded,
    /// The route would exceed the vehicle's max duration or working hours.
    DurationLimitExceeded,
}

/// Reason attached to an unassigned location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnassignedReason {
    /// No vehicle could feasibly take the location.
    Placement(PlacementFailure),
    /// The location's coordinates are out of range.
    InvalidLocation,
    /// The record is a depot, not a stop.
    NotServiceable,
}

impl From<PlacementFailure> for UnassignedReason {
    fn from(failure: PlacementFailure) -> Self {
        UnassignedReason::Placement(failure)
    }
}

/// A location left out of every route, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnassignedLocation {
    pub location_id: String,
    pub reason: UnassignedReason,
}

/// The result of one optimization call.
///
/// Every input location appears exactly once: either in one route or in
/// `unassigned`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    routes: Vec<Route>,
    unassigned: Vec<UnassignedLocation>,
    diagnostics: Diagnostics,
}

impl Solution {
    /// Assembles a solution; routes without stops are dropped.
    pub fn new(
        routes: Vec<Route>,
        unassigned: Vec<UnassignedLocation>,
        diagnostics: Diagnostics,
    ) -> Self {
        Self {
            routes: routes.into_iter().filter(|r| !r.is_empty()).collect(),
            unassigned,
            diagnostics,
        }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn num_routes(&self) -> usize {
        self.routes.len()
    }

    pub fn unassigned(&self) -> &[UnassignedLocation] {
        &self.unassigned
    }

    pub fn num_unassigned(&self) -> usize {
        self.unassigned.len()
    }

    /// Reason for an unassigned location, if it is unassigned.
    pub fn unassigned_reason(&self, location_id: &str) -> Option<UnassignedReason> {
        self.unassigned
            .iter()
            .find(|u| u.location_id == location_id)
            .map(|u| u.reason)
    }

    /// Route serving the given vehicle, if it has any stops.
    pub fn route_for(&self, vehicle_id: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.vehicle_id() == vehicle_id)
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Total number of stops served across all routes.
    pub fn num_served(&self) -> usize {
        self.routes.iter().map(|r| r.len()).sum()
    }

    pub fn total_distance_km(&self) -> f64 {
        self.routes.iter().map(|r| r.distance_km()).sum()
    }

    pub fn total_duration_min(&self) -> f64 {
        self.routes.iter().map(|r| r.duration_min()).sum()
    }

    pub fn total_cost(&self) -> f64 {
        self.routes.iter().map(|r| r.cost()).sum()
    }

    /// Mean utilization over the routes that were used.
    pub fn average_utilization(&self) -> f64 {
        if self.routes.is_empty() {
            return 0.0;
        }
        self.routes.iter().map(|r| r.utilization()).sum::<f64>() / self.routes.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RouteTotals, Visit};

    fn route(vehicle: &str, ids: &[&str], distance: f64, utilization: f64) -> Route {
        let visits = ids
            .iter()
            .map(|id| Visit {
                location_id: id.to_string(),
                arrival_minute: 0.0,
                waiting_min: 0.0,
                departure_minute: 0.0,
                load_weight_kg: 0.0,
                load_volume_m3: 0.0,
            })
            .collect();
        Route::new(
            vehicle,
            visits,
            RouteTotals {
                distance_km: distance,
                cost: distance * 2.0,
                utilization,
                ..RouteTotals::default()
            },
        )
    }

    #[test]
    fn test_empty_routes_dropped() {
        let sol = Solution::new(
            vec![route("a", &[], 0.0, 0.0), route("b", &["x"], 5.0, 0.5)],
            vec![],
            Diagnostics::default(),
        );
        assert_eq!(sol.num_routes(), 1);
        assert_eq!(sol.routes()[0].vehicle_id(), "b");
    }

    #[test]
    fn test_solution_totals() {
        let sol = Solution::new(
            vec![route("a", &["x"], 50.0, 0.2), route("b", &["y", "z"], 80.0, 0.6)],
            vec![UnassignedLocation {
                location_id: "w".into(),
                reason: PlacementFailure::CapacityExceeded.into(),
            }],
            Diagnostics::default(),
        );
        assert_eq!(sol.num_served(), 3);
        assert_eq!(sol.num_unassigned(), 1);
        assert!((sol.total_distance_km() - 130.0).abs() < 1e-10);
        assert!((sol.total_cost() - 260.0).abs() < 1e-10);
        assert!((sol.average_utilization() - 0.4).abs() < 1e-10);
        assert_eq!(
            sol.unassigned_reason("w"),
            Some(UnassignedReason::Placement(PlacementFailure::CapacityExceeded))
        );
        assert!(sol.unassigned_reason("x").is_none());
        assert!(sol.route_for("b").is_some());
    }
}
