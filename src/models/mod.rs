//! Domain model types for fleet routing.
//!
//! Locations and vehicles are the read-only inputs of an optimization call;
//! routes and the solution are its output and are never mutated after
//! being returned.

mod diagnostics;
mod location;
mod route;
mod solution;
mod vehicle;

pub use diagnostics::{Diagnostics, EngineKind, EngineReport, EngineStatus, ImprovementReport};
pub use location::{AccessRestrictions, Demand, Location, LocationRole, TimeWindow};
pub use route::{Route, RouteTotals, Visit};
pub use solution::{PlacementFailure, Solution, UnassignedLocation, UnassignedReason};
pub use vehicle::{Capacity, Vehicle};
