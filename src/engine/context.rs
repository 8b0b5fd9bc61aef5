//! Read-only problem data shared by every engine.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::OptimizationConfig;
use crate::distance::TravelMatrix;
use crate::error::RoutingError;
use crate::evaluation::Normalizer;
use crate::geometry::{Coordinates, RoadClass};
use crate::models::{EngineKind, Location, Vehicle};

/// One leg between two matrix nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leg {
    pub distance_km: f64,
    pub minutes: f64,
    pub class: RoadClass,
}

/// Immutable input of one optimization call.
///
/// Locations are indexed `0..num_locations()`; only routable locations are
/// included. Matrix nodes `0..n` are those locations, followed by a start
/// and an end node per vehicle.
#[derive(Debug)]
pub struct ProblemContext<'a> {
    vehicles: &'a [Vehicle],
    locations: Vec<&'a Location>,
    config: &'a OptimizationConfig,
    matrix: TravelMatrix,
    normalizer: Normalizer,
    seed: u64,
}

impl<'a> ProblemContext<'a> {
    /// Builds the context and its travel matrix.
    pub fn new(
        vehicles: &'a [Vehicle],
        locations: Vec<&'a Location>,
        config: &'a OptimizationConfig,
        seed: u64,
    ) -> Result<Self, RoutingError> {
        let mut points: Vec<Coordinates> = Vec::with_capacity(locations.len() + 2 * vehicles.len());
        for loc in &locations {
            loc.coordinates()
                .validate()
                .map_err(|source| RoutingError::InvalidLocation {
                    id: loc.id().to_string(),
                    source,
                })?;
            points.push(*loc.coordinates());
        }
        for vehicle in vehicles {
            let end = vehicle.finish().unwrap_or(vehicle.start());
            for point in [vehicle.start(), end] {
                point.validate().map_err(|e| {
                    RoutingError::config(format!("vehicle `{}`: {e}", vehicle.id()))
                })?;
                points.push(*point);
            }
        }
        let matrix = TravelMatrix::build(&points, config)
            .map_err(|e| RoutingError::config(e.to_string()))?;

        let mut ctx = Self {
            vehicles,
            locations,
            config,
            matrix,
            normalizer: Normalizer::unit(),
            seed,
        };
        ctx.normalizer = Normalizer::naive_reference(&ctx);
        Ok(ctx)
    }

    pub fn num_locations(&self) -> usize {
        self.locations.len()
    }

    pub fn num_vehicles(&self) -> usize {
        self.vehicles.len()
    }

    pub fn location(&self, index: usize) -> &'a Location {
        self.locations[index]
    }

    pub fn vehicle(&self, index: usize) -> &'a Vehicle {
        &self.vehicles[index]
    }

    pub fn vehicles(&self) -> &'a [Vehicle] {
        self.vehicles
    }

    pub fn config(&self) -> &'a OptimizationConfig {
        self.config
    }

    pub fn matrix(&self) -> &TravelMatrix {
        &self.matrix
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Random stream for one engine, derived from the run seed.
    pub fn rng_for(&self, engine: EngineKind) -> StdRng {
        let salt: u64 = match engine {
            EngineKind::Greedy => 0,
            EngineKind::Genetic => 0x9E37_79B9_7F4A_7C15,
            EngineKind::Annealing => 0xBF58_476D_1CE4_E5B9,
            EngineKind::AntColony => 0x94D0_49BB_1331_11EB,
        };
        StdRng::seed_from_u64(self.seed ^ salt)
    }

    /// Matrix node of vehicle `v`'s start.
    pub fn start_node(&self, v: usize) -> usize {
        self.locations.len() + 2 * v
    }

    /// Matrix node of vehicle `v`'s end. Equal in position to the start when
    /// the vehicle has no distinct end.
    pub fn end_node(&self, v: usize) -> usize {
        self.locations.len() + 2 * v + 1
    }

    /// Whether vehicle `v` drives a closing leg after its last stop.
    pub fn has_closing_leg(&self, v: usize) -> bool {
        self.vehicles[v].finish().is_some()
    }

    /// Clock time at which vehicle `v` leaves its start.
    pub fn departure_minute(&self, v: usize) -> f64 {
        self.vehicles[v]
            .working_hours()
            .map(|wh| wh.start())
            .unwrap_or(self.config.departure_minute)
    }

    /// Leg from `from` to `to` leaving at `departure_minute`.
    pub fn leg(&self, from: usize, to: usize, departure_minute: f64) -> Leg {
        Leg {
            distance_km: self.matrix.distance(from, to),
            minutes: self.matrix.minutes(from, to, departure_minute, self.config),
            class: self.matrix.road_class(from, to),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Capacity;
    use rand::Rng;

    fn fleet() -> Vec<Vehicle> {
        vec![
            Vehicle::new("a", Coordinates::new(10.0, 106.0), Capacity::weight(100.0)),
            Vehicle::new("b", Coordinates::new(11.0, 107.0), Capacity::weight(100.0))
                .with_return_to_depot(false),
        ]
    }

    fn stops() -> Vec<Location> {
        vec![
            Location::delivery("x", 10.01, 106.0, 10.0),
            Location::delivery("y", 10.02, 106.0, 10.0),
        ]
    }

    #[test]
    fn test_node_layout() {
        let vehicles = fleet();
        let locations = stops();
        let config = OptimizationConfig::default();
        let ctx = ProblemContext::new(&vehicles, locations.iter().collect(), &config, 1)
            .expect("valid");
        assert_eq!(ctx.matrix().size(), 2 + 4);
        assert_eq!(ctx.start_node(0), 2);
        assert_eq!(ctx.end_node(1), 5);
        assert!(ctx.has_closing_leg(0));
        assert!(!ctx.has_closing_leg(1));
        assert_eq!(ctx.leg(ctx.start_node(0), ctx.end_node(0), 480.0).distance_km, 0.0);
    }

    #[test]
    fn test_invalid_vehicle_rejected() {
        let vehicles = vec![Vehicle::new(
            "bad",
            Coordinates::new(0.0, 200.0),
            Capacity::weight(1.0),
        )];
        let locations = stops();
        let config = OptimizationConfig::default();
        let err = ProblemContext::new(&vehicles, locations.iter().collect(), &config, 1)
            .unwrap_err();
        assert!(matches!(err, RoutingError::Configuration(_)));
    }

    #[test]
    fn test_engine_streams_differ_but_repeat() {
        let vehicles = fleet();
        let locations = stops();
        let config = OptimizationConfig::default();
        let ctx = ProblemContext::new(&vehicles, locations.iter().collect(), &config, 42)
            .expect("valid");
        let a: u64 = ctx.rng_for(EngineKind::Genetic).random();
        let b: u64 = ctx.rng_for(EngineKind::Genetic).random();
        let c: u64 = ctx.rng_for(EngineKind::Annealing).random();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_departure_uses_working_hours() {
        let vehicles = vec![fleet()[0]
            .clone()
            .with_working_hours(crate::models::TimeWindow::new(360.0, 900.0).expect("valid"))];
        let locations = stops();
        let config = OptimizationConfig::default();
        let ctx = ProblemContext::new(&vehicles, locations.iter().collect(), &config, 1)
            .expect("valid");
        assert_eq!(ctx.departure_minute(0), 360.0);
    }
}
