//! Haversine distance between latitude/longitude pairs.

use geo::{Distance, Haversine, Point};
use serde::{Deserialize, Serialize};

use crate::error::InvalidCoordinates;

/// A WGS84 position in decimal degrees.
///
/// # Examples
///
/// ```
/// use fleet_routing::geometry::Coordinates;
///
/// let depot = Coordinates::new(10.0, 106.0);
/// assert!(depot.validate().is_ok());
/// assert!(Coordinates::new(95.0, 0.0).validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees, `[-90, 90]`.
    pub lat: f64,
    /// Longitude in degrees, `[-180, 180]`.
    pub lng: f64,
}

impl Coordinates {
    /// Creates a coordinate pair without validating it.
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Checks that both components are finite and in range.
    pub fn validate(&self) -> Result<(), InvalidCoordinates> {
        let lat_ok = self.lat.is_finite() && (-90.0..=90.0).contains(&self.lat);
        let lng_ok = self.lng.is_finite() && (-180.0..=180.0).contains(&self.lng);
        if lat_ok && lng_ok {
            Ok(())
        } else {
            Err(InvalidCoordinates {
                lat: self.lat,
                lng: self.lng,
            })
        }
    }

    fn to_point(self) -> Point<f64> {
        Point::new(self.lng, self.lat)
    }
}

/// Great-circle distance in kilometres.
///
/// Fails with [`InvalidCoordinates`] when either endpoint is out of range.
///
/// # Examples
///
/// ```
/// use fleet_routing::geometry::{distance, Coordinates};
///
/// let a = Coordinates::new(10.0, 106.0);
/// let b = Coordinates::new(10.0, 106.1);
/// let d = distance(&a, &b).unwrap();
/// assert!((d - 10.95).abs() < 0.05);
/// assert_eq!(distance(&a, &a).unwrap(), 0.0);
/// ```
pub fn distance(a: &Coordinates, b: &Coordinates) -> Result<f64, InvalidCoordinates> {
    a.validate()?;
    b.validate()?;
    Ok(Haversine.distance(a.to_point(), b.to_point()) / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_distance_to_self() {
        let a = Coordinates::new(10.762622, 106.660172);
        assert_eq!(distance(&a, &a).unwrap(), 0.0);
    }

    #[test]
    fn test_symmetric() {
        let a = Coordinates::new(10.762622, 106.660172);
        let b = Coordinates::new(21.028511, 105.804817);
        let ab = distance(&a, &b).unwrap();
        let ba = distance(&b, &a).unwrap();
        assert!((ab - ba).abs() < 1e-9);
        // Ho Chi Minh City to Hanoi, roughly 1140 km as the crow flies
        assert!(ab > 1100.0 && ab < 1180.0, "got {ab}");
    }

    #[test]
    fn test_one_degree_latitude() {
        let a = Coordinates::new(0.0, 0.0);
        let b = Coordinates::new(1.0, 0.0);
        let d = distance(&a, &b).unwrap();
        assert!((d - 111.19).abs() < 0.1, "got {d}");
    }

    #[test]
    fn test_invalid_latitude() {
        let a = Coordinates::new(90.5, 0.0);
        let b = Coordinates::new(0.0, 0.0);
        let err = distance(&a, &b).unwrap_err();
        assert_eq!(err.lat, 90.5);
    }

    #[test]
    fn test_invalid_longitude_and_nan() {
        assert!(Coordinates::new(0.0, -180.1).validate().is_err());
        assert!(Coordinates::new(f64::NAN, 0.0).validate().is_err());
        assert!(Coordinates::new(-90.0, 180.0).validate().is_ok());
    }
}
