//! Great-circle distance and factor-adjusted travel time.
//!
//! Pure functions with no state. Everything here is deterministic: the
//! traffic, weather and road factors are supplied by the caller through a
//! [`TravelContext`].

mod haversine;
mod travel;

pub use haversine::{distance, Coordinates};
pub use travel::{travel_time, RoadClass, TravelContext};
