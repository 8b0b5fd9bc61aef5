//! Distance plus free-flow travel time for every node pair.

use crate::config::OptimizationConfig;
use crate::error::InvalidCoordinates;
use crate::geometry::{travel_time, Coordinates, RoadClass};

use super::DistanceMatrix;

/// Pairwise distances, road classes and traffic-free travel times.
///
/// Time of day only changes the traffic factor, so a leg's travel time is
/// `free_minutes / traffic_factor(departure)`; everything else is fixed
/// when the matrix is built.
#[derive(Debug, Clone)]
pub struct TravelMatrix {
    distances: DistanceMatrix,
    classes: Vec<RoadClass>,
    free_minutes: Vec<f64>,
}

impl TravelMatrix {
    /// Builds the matrix for `points` under `config`'s road and weather factors.
    pub fn build(
        points: &[Coordinates],
        config: &OptimizationConfig,
    ) -> Result<Self, InvalidCoordinates> {
        let distances = DistanceMatrix::from_coordinates(points)?;
        let n = distances.size();
        let mut classes = vec![RoadClass::Local; n * n];
        let mut free_minutes = vec![0.0; n * n];
        for i in 0..n {
            for j in 0..n {
                let d = distances.get(i, j);
                let class = config.road_class_for(d);
                let mut ctx = config.travel_context(class, 0.0);
                ctx.traffic_factor = 1.0;
                classes[i * n + j] = class;
                free_minutes[i * n + j] = travel_time(d, &ctx);
            }
        }
        Ok(Self {
            distances,
            classes,
            free_minutes,
        })
    }

    pub fn size(&self) -> usize {
        self.distances.size()
    }

    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    /// Distance in km.
    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.distances.get(from, to)
    }

    pub fn road_class(&self, from: usize, to: usize) -> RoadClass {
        self.classes[from * self.size() + to]
    }

    /// Travel minutes with no traffic slowdown.
    pub fn free_minutes(&self, from: usize, to: usize) -> f64 {
        self.free_minutes[from * self.size() + to]
    }

    /// Travel minutes for a leg departing at `departure_minute`.
    pub fn minutes(
        &self,
        from: usize,
        to: usize,
        departure_minute: f64,
        config: &OptimizationConfig,
    ) -> f64 {
        self.free_minutes(from, to) / config.traffic_factor_at(departure_minute)
    }
}
