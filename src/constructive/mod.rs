//! Constructive heuristics.
//!
//! - [`route_builder`] — nearest-feasible single-route builder and the
//!   [`repair`] operator shared by the metaheuristics
//! - [`nearest_neighbor`] — the greedy engine, O(V·L² log L)

mod nearest_neighbor;
pub mod route_builder;

pub use nearest_neighbor::nearest_neighbor;
pub use route_builder::{build_route, extend_route, repair};
