//! Index-based working solution used inside engines.

use crate::models::PlacementFailure;

/// Stop sequences per vehicle plus the locations left out.
///
/// Indices refer to [`ProblemContext`](super::ProblemContext) locations.
/// `routes[v]` is vehicle `v`'s sequence, possibly empty.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Plan {
    routes: Vec<Vec<usize>>,
    unassigned: Vec<(usize, PlacementFailure)>,
}

impl Plan {
    pub fn new(routes: Vec<Vec<usize>>, unassigned: Vec<(usize, PlacementFailure)>) -> Self {
        Self { routes, unassigned }
    }

    /// A plan with no stops for `num_vehicles` vehicles.
    pub fn empty(num_vehicles: usize) -> Self {
        Self {
            routes: vec![Vec::new(); num_vehicles],
            unassigned: Vec::new(),
        }
    }

    pub fn routes(&self) -> &[Vec<usize>] {
        &self.routes
    }

    pub fn route(&self, vehicle: usize) -> &[usize] {
        &self.routes[vehicle]
    }

    pub fn routes_mut(&mut self) -> &mut [Vec<usize>] {
        &mut self.routes
    }

    pub fn unassigned(&self) -> &[(usize, PlacementFailure)] {
        &self.unassigned
    }

    pub fn set_unassigned(&mut self, unassigned: Vec<(usize, PlacementFailure)>) {
        self.unassigned = unassigned;
    }

    pub fn num_assigned(&self) -> usize {
        self.routes.iter().map(Vec::len).sum()
    }

    /// `assigned[i]` is true when location `i` is on some route.
    pub fn assigned_mask(&self, num_locations: usize) -> Vec<bool> {
        let mut mask = vec![false; num_locations];
        for &i in self.routes.iter().flatten() {
            mask[i] = true;
        }
        mask
    }

    /// Visiting order of all assigned locations, vehicle by vehicle.
    pub fn flatten(&self) -> Vec<usize> {
        self.routes.iter().flatten().copied().collect()
    }
}
