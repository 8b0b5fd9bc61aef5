//! Simulated annealing engine.
//!
//! Starts from the greedy plan and explores swap, relocate and insert moves
//! under a geometric cooling schedule.
//!
//! # References
//!
//! Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"

mod config;
pub mod moves;
mod runner;

pub use config::AnnealingConfig;
pub use runner::run_annealing;
