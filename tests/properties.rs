//! Property tests over randomly generated fleets and stops.

use std::collections::HashSet;

use proptest::prelude::*;

use fleet_routing::constructive::nearest_neighbor;
use fleet_routing::engine::ProblemContext;
use fleet_routing::geometry::{distance, Coordinates};
use fleet_routing::local_search::{route_distance, two_opt_route};
use fleet_routing::models::{Capacity, Location, TimeWindow, UnassignedReason, Vehicle};
use fleet_routing::{optimize, OptimizationConfig};

fn fast_config(seed: u64) -> OptimizationConfig {
    let mut config = OptimizationConfig::default().with_seed(seed);
    config.genetic.population_size = 8;
    config.genetic.max_generations = 10;
    config.annealing.max_iterations = 150;
    config.ant_colony.num_ants = 4;
    config.ant_colony.max_iterations = 5;
    config
}

fn coordinates() -> impl Strategy<Value = Coordinates> {
    (9.9f64..10.1, 105.9f64..106.1).prop_map(|(lat, lng)| Coordinates::new(lat, lng))
}

fn stop() -> impl Strategy<Value = (Coordinates, f64, Option<(f64, f64)>)> {
    (
        coordinates(),
        0.0f64..150.0,
        prop::option::of((480.0f64..700.0, 30.0f64..240.0)),
    )
}

fn instance() -> impl Strategy<Value = (Vec<Vehicle>, Vec<Location>)> {
    (
        prop::collection::vec((coordinates(), 100.0f64..600.0), 1..=3),
        prop::collection::vec(stop(), 1..=14),
    )
        .prop_map(|(fleet, stops)| {
            let vehicles: Vec<Vehicle> = fleet
                .into_iter()
                .enumerate()
                .map(|(i, (start, cap))| Vehicle::new(format!("v{i}"), start, Capacity::weight(cap)))
                .collect();
            let locations: Vec<Location> = stops
                .into_iter()
                .enumerate()
                .map(|(i, (at, weight, window))| {
                    let loc = Location::delivery(format!("s{i}"), at.lat, at.lng, weight);
                    match window.and_then(|(start, width)| TimeWindow::new(start, start + width)) {
                        Some(tw) => loc.with_time_window(tw),
                        None => loc,
                    }
                })
                .collect();
            (vehicles, locations)
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn every_location_accounted_for_once((vehicles, locations) in instance(), seed in 0u64..1_000) {
        let solution = optimize(&vehicles, &locations, &fast_config(seed)).expect("valid input");

        let mut seen = HashSet::new();
        for route in solution.routes() {
            for id in route.location_ids() {
                prop_assert!(seen.insert(id.to_string()), "duplicate stop {}", id);
            }
        }
        for u in solution.unassigned() {
            prop_assert!(seen.insert(u.location_id.clone()), "duplicate {}", u.location_id);
        }
        let expected: HashSet<String> = locations.iter().map(|l| l.id().to_string()).collect();
        prop_assert_eq!(seen, expected);
    }

    #[test]
    fn loads_never_exceed_capacity((vehicles, locations) in instance(), seed in 0u64..1_000) {
        let solution = optimize(&vehicles, &locations, &fast_config(seed)).expect("valid input");
        for route in solution.routes() {
            let vehicle = vehicles
                .iter()
                .find(|v| v.id() == route.vehicle_id())
                .expect("known vehicle");
            for visit in route.visits() {
                prop_assert!(visit.load_weight_kg <= vehicle.capacity().weight_kg + 1e-9);
            }
        }
    }

    #[test]
    fn arrivals_inside_windows((vehicles, locations) in instance(), seed in 0u64..1_000) {
        let solution = optimize(&vehicles, &locations, &fast_config(seed)).expect("valid input");
        for route in solution.routes() {
            for visit in route.visits() {
                let loc = locations
                    .iter()
                    .find(|l| l.id() == visit.location_id)
                    .expect("known location");
                if let Some(tw) = loc.time_window() {
                    prop_assert!(visit.arrival_minute <= tw.end() + 1e-9);
                }
            }
        }
    }

    #[test]
    fn selected_plan_leaves_fewest_unassigned((vehicles, locations) in instance(), seed in 0u64..1_000) {
        let solution = optimize(&vehicles, &locations, &fast_config(seed)).expect("valid input");
        for report in &solution.diagnostics().engines {
            prop_assert!(
                solution.num_unassigned() <= report.unassigned,
                "{:?} left {} out, solution left {}",
                report.engine,
                report.unassigned,
                solution.num_unassigned()
            );
        }
        // every generated stop has valid coordinates and a delivery role
        for u in solution.unassigned() {
            prop_assert!(matches!(u.reason, UnassignedReason::Placement(_)), "{:?}", u);
        }
    }

    #[test]
    fn distance_is_symmetric(a in coordinates(), b in coordinates()) {
        let ab = distance(&a, &b).expect("valid");
        let ba = distance(&b, &a).expect("valid");
        prop_assert!((ab - ba).abs() < 1e-9);
        prop_assert_eq!(distance(&a, &a).expect("valid"), 0.0);
    }

    #[test]
    fn two_opt_never_lengthens(
        start in coordinates(),
        points in prop::collection::vec(coordinates(), 2..=10),
        order_seed in any::<u64>(),
    ) {
        let vehicles = vec![Vehicle::new("v", start, Capacity::weight(1e6))];
        let locations: Vec<Location> = points
            .iter()
            .enumerate()
            .map(|(i, p)| Location::delivery(format!("s{i}"), p.lat, p.lng, 1.0))
            .collect();
        let config = OptimizationConfig::default();
        let ctx = ProblemContext::new(&vehicles, locations.iter().collect(), &config, 0)
            .expect("valid");

        let mut order: Vec<usize> = (0..locations.len()).collect();
        order.rotate_left((order_seed % locations.len() as u64) as usize);
        if order_seed % 2 == 1 {
            order.reverse();
        }
        let (improved, _) = two_opt_route(&ctx, 0, &order, 1_000);
        prop_assert!(route_distance(&ctx, 0, &improved) <= route_distance(&ctx, 0, &order) + 1e-9);
    }

    #[test]
    fn greedy_is_deterministic((vehicles, locations) in instance()) {
        let config = OptimizationConfig::default();
        let ctx = ProblemContext::new(&vehicles, locations.iter().collect(), &config, 1)
            .expect("valid");
        prop_assert_eq!(nearest_neighbor(&ctx), nearest_neighbor(&ctx));
    }
}
