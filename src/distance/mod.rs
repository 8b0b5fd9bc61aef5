//! Distance and travel time matrices.
//!
//! Built once per optimization call and shared read-only by every engine.

mod matrix;
mod travel_matrix;

pub use matrix::DistanceMatrix;
pub use travel_matrix::TravelMatrix;
