//! # fleet-routing
//!
//! Fleet route optimization: assigns pickup and delivery locations to
//! vehicles and orders each vehicle's stops, subject to capacity, time
//! window, capability, distance and working-hour constraints.
//!
//! Four engines (greedy nearest-feasible, genetic algorithm, simulated
//! annealing, ant colony) run over one shared, immutable
//! [`ProblemContext`](engine::ProblemContext). The lowest-scoring plan is
//! polished with 2-opt and returned as a [`Solution`](models::Solution)
//! with diagnostics.
//!
//! ## Modules
//!
//! - [`models`] — Locations, vehicles, routes, solution and diagnostics
//! - [`config`] — Objective weights, constraint toggles, regional factors, engine tuning
//! - [`geometry`] — Haversine distance and factor-adjusted travel time
//! - [`distance`] — Distance and travel matrices
//! - [`cost`] — Leg cost model
//! - [`evaluation`] — Constraint validator, route totals, plan score
//! - [`constructive`] — Nearest-feasible route builder and repair
//! - [`ga`] — Genetic algorithm over giant tours
//! - [`sa`] — Simulated annealing
//! - [`aco`] — MAX-MIN ant colony
//! - [`engine`] — Engine abstraction, shared context, cancellation
//! - [`local_search`] — 2-opt improvement
//! - [`optimizer`] — The [`optimize`] entry point

pub mod aco;
pub mod config;
pub mod constructive;
pub mod cost;
pub mod distance;
pub mod engine;
pub mod error;
pub mod evaluation;
pub mod ga;
pub mod geometry;
pub mod local_search;
pub mod models;
pub mod optimizer;
pub mod sa;

pub use config::OptimizationConfig;
pub use error::RoutingError;
pub use optimizer::{optimize, optimize_with_cancel};
