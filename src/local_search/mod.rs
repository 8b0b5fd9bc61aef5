//! Local improvement applied to the selected plan.
//!
//! - `two_opt` — intra-route segment reversal, feasibility-checked

mod two_opt;

pub use two_opt::{improve_plan, route_distance, two_opt_route};
