//! Error types for the optimizer.
//!
//! Only malformed input aborts an optimization call. Per-location placement
//! failures and engine timeouts are reported as data in the returned
//! [`Solution`](crate::models::Solution), never as errors.

use thiserror::Error;

/// Coordinates outside the valid latitude/longitude range (or non-finite).
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("coordinates out of range: lat={lat}, lng={lng}")]
pub struct InvalidCoordinates {
    /// Offending latitude.
    pub lat: f64,
    /// Offending longitude.
    pub lng: f64,
}

/// Fatal errors returned by [`optimize`](crate::optimizer::optimize).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RoutingError {
    /// Empty fleet, empty location list, duplicate ids, negative weights, etc.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A location has unusable coordinates and the config asks to reject
    /// the whole call rather than leave the location unassigned.
    #[error("invalid location `{id}`")]
    InvalidLocation {
        /// Location id.
        id: String,
        /// Underlying coordinate error.
        #[source]
        source: InvalidCoordinates,
    },
}

impl RoutingError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        RoutingError::Configuration(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_configuration_message() {
        let err = RoutingError::config("at least one vehicle is required");
        assert_eq!(
            err.to_string(),
            "configuration error: at least one vehicle is required"
        );
    }

    #[test]
    fn test_invalid_location_source() {
        let err = RoutingError::InvalidLocation {
            id: "L7".into(),
            source: InvalidCoordinates {
                lat: 91.0,
                lng: 0.0,
            },
        };
        assert_eq!(err.to_string(), "invalid location `L7`");
        let source = err.source().expect("has source");
        assert!(source.to_string().contains("lat=91"));
    }
}
