//! Geographic primitives used by the geofence workflow.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Mean earth radius used by the haversine distance, in metres.
pub const EARTH_RADIUS_METRES: f64 = 6_371_008.8;

/// A technician within this distance of the destination counts as arrived.
pub const GEOFENCE_RADIUS_METRES: f64 = 50.0;

/// Validation errors returned by [`Coordinates::new`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoordinatesValidationError {
    /// Latitude is not finite or lies outside `[-90, 90]`.
    LatitudeOutOfRange { value: f64 },
    /// Longitude is not finite or lies outside `[-180, 180]`.
    LongitudeOutOfRange { value: f64 },
    /// Only one of latitude and longitude was supplied.
    Incomplete,
}

impl fmt::Display for CoordinatesValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LatitudeOutOfRange { value } => {
                write!(f, "latitude must be within [-90, 90], got {value}")
            }
            Self::LongitudeOutOfRange { value } => {
                write!(f, "longitude must be within [-180, 180], got {value}")
            }
            Self::Incomplete => write!(f, "latitude and longitude must be supplied together"),
        }
    }
}

impl std::error::Error for CoordinatesValidationError {}

#[rustfmt::skip]
fn valid_latitude(value: f64) -> bool { value.is_finite() && (-90.0..=90.0).contains(&value) }

#[rustfmt::skip]
fn valid_longitude(value: f64) -> bool { value.is_finite() && (-180.0..=180.0).contains(&value) }

/// WGS84 position in decimal degrees.
///
/// # Examples
/// ```
/// use helpdesk::domain::Coordinates;
///
/// let bogota = Coordinates::new(4.711, -74.0721).expect("valid position");
/// assert_eq!(bogota.distance_to(&bogota), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// Validate and construct a position.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinatesValidationError> {
        if !valid_latitude(latitude) {
            return Err(CoordinatesValidationError::LatitudeOutOfRange { value: latitude });
        }
        if !valid_longitude(longitude) {
            return Err(CoordinatesValidationError::LongitudeOutOfRange { value: longitude });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Build an optional position from a pair of optional components.
    ///
    /// Both absent yields `None`; exactly one present is an error.
    pub fn from_optional(
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Result<Option<Self>, CoordinatesValidationError> {
        match (latitude, longitude) {
            (None, None) => Ok(None),
            (Some(lat), Some(lng)) => Self::new(lat, lng).map(Some),
            _ => Err(CoordinatesValidationError::Incomplete),
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance in metres using the haversine formula.
    pub fn distance_to(&self, other: &Self) -> f64 {
        let phi1 = self.latitude.to_radians();
        let phi2 = other.latitude.to_radians();
        let d_phi = (other.latitude - self.latitude).to_radians();
        let d_lambda = (other.longitude - self.longitude).to_radians();

        let a = (d_phi / 2.0).sin().powi(2)
            + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
        // Rounding can push `a` fractionally above 1 for antipodal points.
        let c = 2.0 * a.sqrt().min(1.0).asin();
        EARTH_RADIUS_METRES * c
    }

    /// Whether `self` lies within [`GEOFENCE_RADIUS_METRES`] of `destination`.
    /// The boundary itself counts as inside.
    pub fn within_geofence(&self, destination: &Self) -> bool {
        self.distance_to(destination) <= GEOFENCE_RADIUS_METRES
    }
}
