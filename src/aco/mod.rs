//! Ant colony engine.
//!
//! Each ant builds a full plan, biased toward edges with strong pheromone
//! trails and short distances. Trails evaporate every iteration and the
//! iteration-best and best-so-far plans reinforce their edges in proportion
//! to their quality. The optimizer runs this engine last, seeded with the
//! best plan of the other engines.
//!
//! # References
//!
//! Dorigo & Gambardella (1997), "Ant colony system"; Stützle & Hoos (2000),
//! "MAX-MIN Ant System"

mod config;
mod pheromone;
mod runner;

pub use config::AntColonyConfig;
pub use pheromone::PheromoneMatrix;
pub use runner::run_ant_colony;
