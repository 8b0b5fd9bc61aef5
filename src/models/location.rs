//! Locations, demands and time windows.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::geometry::Coordinates;

/// The interval during which a stop may be serviced, in minutes since midnight.
///
/// A vehicle arriving early waits until `start`; arriving after `end`
/// violates the window.
///
/// # Examples
///
/// ```
/// use fleet_routing::models::TimeWindow;
///
/// let tw = TimeWindow::new(540.0, 720.0).unwrap();
/// assert!(tw.contains(600.0));
/// assert!(!tw.contains(721.0));
/// assert_eq!(tw.waiting_time(500.0), 40.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    start: f64,
    end: f64,
}

impl TimeWindow {
    /// Creates a new time window.
    ///
    /// Returns `None` if `start > end` or either value is non-finite.
    pub fn new(start: f64, end: f64) -> Option<Self> {
        if !start.is_finite() || !end.is_finite() || start > end {
            return None;
        }
        Some(Self { start, end })
    }

    /// Earliest service start.
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Latest allowable arrival.
    pub fn end(&self) -> f64 {
        self.end
    }

    /// Returns `true` if `start <= end` and both are finite.
    pub fn is_valid(&self) -> bool {
        self.start.is_finite() && self.end.is_finite() && self.start <= self.end
    }

    /// Returns `true` if the given time falls within this window.
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start && time <= self.end
    }

    /// Waiting time when arriving at `arrival`; zero inside or after the window.
    pub fn waiting_time(&self, arrival: f64) -> f64 {
        if arrival < self.start {
            self.start - arrival
        } else {
            0.0
        }
    }

    /// Returns `true` if arriving at the given time is too late.
    pub fn is_violated(&self, arrival: f64) -> bool {
        arrival > self.end
    }
}

/// What a location is in the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationRole {
    /// A depot or yard. Not a stop; never routed.
    Depot,
    /// Goods are collected here.
    Pickup,
    /// Goods are dropped off here.
    Delivery,
}

/// Load a stop adds to the vehicle serving it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Demand {
    /// Weight in kilograms.
    pub weight_kg: f64,
    /// Volume in cubic metres.
    pub volume_m3: f64,
}

impl Demand {
    /// Demand with weight only.
    pub fn weight(weight_kg: f64) -> Self {
        Self {
            weight_kg,
            volume_m3: 0.0,
        }
    }

    /// Demand with both weight and volume.
    pub fn new(weight_kg: f64, volume_m3: f64) -> Self {
        Self {
            weight_kg,
            volume_m3,
        }
    }
}

/// Physical limits a location imposes on the vehicle serving it,
/// e.g. a low bridge or a weight-restricted street.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AccessRestrictions {
    /// Maximum vehicle height in metres.
    pub max_height_m: Option<f64>,
    /// Maximum vehicle gross weight in kilograms.
    pub max_gross_weight_kg: Option<f64>,
}

/// A pickup or delivery point (or depot record) in an optimization call.
///
/// Locations are read-only for the duration of a solve and referenced by
/// index everywhere inside the optimizer.
///
/// # Examples
///
/// ```
/// use fleet_routing::geometry::Coordinates;
/// use fleet_routing::models::{Demand, Location, LocationRole, TimeWindow};
///
/// let loc = Location::new("L1", Coordinates::new(10.01, 106.02), LocationRole::Delivery)
///     .with_demand(Demand::weight(200.0))
///     .with_service_minutes(10.0)
///     .with_time_window(TimeWindow::new(480.0, 720.0).unwrap())
///     .with_required_tag("refrigerated");
/// assert_eq!(loc.id(), "L1");
/// assert!(loc.is_serviceable());
/// assert!(loc.required_tags().contains("refrigerated"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    id: String,
    coordinates: Coordinates,
    role: LocationRole,
    #[serde(default)]
    time_window: Option<TimeWindow>,
    #[serde(default)]
    service_minutes: f64,
    #[serde(default)]
    demand: Demand,
    #[serde(default)]
    priority: u8,
    #[serde(default)]
    required_tags: BTreeSet<String>,
    #[serde(default)]
    restrictions: AccessRestrictions,
}

impl Location {
    /// Creates a location with no demand, window, service time or tags.
    pub fn new(id: impl Into<String>, coordinates: Coordinates, role: LocationRole) -> Self {
        Self {
            id: id.into(),
            coordinates,
            role,
            time_window: None,
            service_minutes: 0.0,
            demand: Demand::default(),
            priority: 0,
            required_tags: BTreeSet::new(),
            restrictions: AccessRestrictions::default(),
        }
    }

    /// Shorthand for a delivery stop with a weight demand.
    pub fn delivery(id: impl Into<String>, lat: f64, lng: f64, weight_kg: f64) -> Self {
        Self::new(id, Coordinates::new(lat, lng), LocationRole::Delivery)
            .with_demand(Demand::weight(weight_kg))
    }

    /// Sets the service time window.
    pub fn with_time_window(mut self, tw: TimeWindow) -> Self {
        self.time_window = Some(tw);
        self
    }

    /// Sets the on-site service duration in minutes.
    pub fn with_service_minutes(mut self, minutes: f64) -> Self {
        self.service_minutes = minutes;
        self
    }

    /// Sets the demand.
    pub fn with_demand(mut self, demand: Demand) -> Self {
        self.demand = demand;
        self
    }

    /// Sets the priority (higher is more important).
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    /// Adds a capability the serving vehicle must have.
    pub fn with_required_tag(mut self, tag: impl Into<String>) -> Self {
        self.required_tags.insert(tag.into());
        self
    }

    /// Sets vehicle height/weight restrictions.
    pub fn with_restrictions(mut self, restrictions: AccessRestrictions) -> Self {
        self.restrictions = restrictions;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn coordinates(&self) -> &Coordinates {
        &self.coordinates
    }

    pub fn role(&self) -> LocationRole {
        self.role
    }

    pub fn time_window(&self) -> Option<&TimeWindow> {
        self.time_window.as_ref()
    }

    pub fn service_minutes(&self) -> f64 {
        self.service_minutes
    }

    pub fn demand(&self) -> &Demand {
        &self.demand
    }

    pub fn priority(&self) -> u8 {
        self.priority
    }

    pub fn required_tags(&self) -> &BTreeSet<String> {
        &self.required_tags
    }

    pub fn restrictions(&self) -> &AccessRestrictions {
        &self.restrictions
    }

    /// Pickups and deliveries are stops; depot records are not.
    pub fn is_serviceable(&self) -> bool {
        !matches!(self.role, LocationRole::Depot)
    }
}
