//! Genetic engine for fleet routing.
//!
//! - [`GiantTour`] — permutation chromosome over all routable locations
//! - [`decode`] — slices a tour across vehicles, then repairs
//! - [`operators`] — order crossover, swap mutation, tournament selection
//! - [`run_genetic`] — the evolutionary loop

mod chromosome;
mod config;
pub mod operators;
mod runner;

pub use chromosome::{decode, GiantTour};
pub use config::GeneticConfig;
pub use runner::run_genetic;
