//! Spherical-earth geometry
//!
//! Conversions between geographic coordinates and earth-centered Cartesian
//! positions on the mean earth sphere.

use crate::constants::EARTH_RADIUS_M;
use crate::{OrbitError, Result};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Point at `radius` with colatitude measured from the north pole and
/// longitude measured around the equator, both in radians
pub fn spherical_to_cartesian(radius: f64, colatitude: f64, longitude: f64) -> Vector3<f64> {
    Vector3::new(
        radius * colatitude.sin() * longitude.cos(),
        radius * colatitude.sin() * longitude.sin(),
        radius * colatitude.cos(),
    )
}

/// Geographic latitude/longitude in degrees.
///
/// Textual form is `latitude:longitude`, e.g. `48.14:11.58`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LatLongSpec", into = "LatLongSpec")]
pub struct LatLong {
    latitude: f64,
    longitude: f64,
}

impl LatLong {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(OrbitError::invalid(
                "latitude",
                format!("{latitude} is outside [-90, 90] degrees"),
            ));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(OrbitError::invalid(
                "longitude",
                format!("{longitude} is outside [-180, 180] degrees"),
            ));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Cartesian position at `radius_m` from the earth's center
    pub fn to_cartesian(&self, radius_m: f64) -> Vector3<f64> {
        let colatitude = (90.0 - self.latitude).to_radians();
        spherical_to_cartesian(radius_m, colatitude, self.longitude.to_radians())
    }

    /// Cartesian position on the earth's surface
    pub fn surface_position(&self) -> Vector3<f64> {
        self.to_cartesian(EARTH_RADIUS_M)
    }

    /// Latitude/longitude of the surface point below `position`.
    /// The earth's center maps to 0:0.
    pub fn from_cartesian(position: &Vector3<f64>) -> Self {
        let horizontal = (position.x * position.x + position.y * position.y).sqrt();
        Self {
            latitude: position.z.atan2(horizontal).to_degrees(),
            longitude: position.y.atan2(position.x).to_degrees(),
        }
    }
}

impl fmt::Display for LatLong {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.latitude, self.longitude)
    }
}

impl FromStr for LatLong {
    type Err = OrbitError;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = || OrbitError::MalformedLatLong(s.to_string());
        let (lat, lon) = s.trim().split_once(':').ok_or_else(malformed)?;
        let latitude = lat.trim().parse::<f64>().map_err(|_| malformed())?;
        let longitude = lon.trim().parse::<f64>().map_err(|_| malformed())?;
        LatLong::new(latitude, longitude)
    }
}

/// Configuration form of [`LatLong`]: either `"lat:lon"` or an object
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum LatLongSpec {
    Text(String),
    Fields { latitude: f64, longitude: f64 },
}

impl TryFrom<LatLongSpec> for LatLong {
    type Error = OrbitError;

    fn try_from(spec: LatLongSpec) -> Result<Self> {
        match spec {
            LatLongSpec::Text(text) => text.parse(),
            LatLongSpec::Fields {
                latitude,
                longitude,
            } => LatLong::new(latitude, longitude),
        }
    }
}

impl From<LatLong> for LatLongSpec {
    fn from(value: LatLong) -> Self {
        LatLongSpec::Fields {
            latitude: value.latitude,
            longitude: value.longitude,
        }
    }
}

/// Ground node placed on the polar grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundPosition {
    /// Latitude ring, 0 at the north pole
    pub latitude_index: u32,
    /// Longitude division, 0 at the prime meridian
    pub longitude_index: u32,
    /// Earth-centered position in metres
    pub position: Vector3<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equator_prime_meridian() {
        let pos = LatLong::new(0.0, 0.0).unwrap().surface_position();
        assert!((pos.x - EARTH_RADIUS_M).abs() < 1e-6);
        assert!(pos.y.abs() < 1e-6);
        assert!(pos.z.abs() < 1e-6);
    }

    #[test]
    fn test_north_pole() {
        let pos = LatLong::new(90.0, 45.0).unwrap().surface_position();
        assert!((pos.z - EARTH_RADIUS_M).abs() < 1e-6);
        assert!(pos.x.abs() < 1e-3 && pos.y.abs() < 1e-3);
    }

    #[test]
    fn test_cartesian_round_trip() {
        let loc = LatLong::new(-33.9, 151.2).unwrap();
        let back = LatLong::from_cartesian(&loc.surface_position());
        assert!((back.latitude() - loc.latitude()).abs() < 1e-9);
        assert!((back.longitude() - loc.longitude()).abs() < 1e-9);
    }

    #[test]
    fn test_parse_colon_separated() {
        let loc: LatLong = "48.14:11.58".parse().unwrap();
        assert_eq!(loc.latitude(), 48.14);
        assert_eq!(loc.longitude(), 11.58);
        assert_eq!(loc.to_string(), "48.14:11.58");
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(
            "48.14,11.58".parse::<LatLong>(),
            Err(OrbitError::MalformedLatLong(_))
        ));
        assert!(matches!(
            "95:0".parse::<LatLong>(),
            Err(OrbitError::InvalidParameter { parameter: "latitude", .. })
        ));
    }

    #[test]
    fn test_deserialize_both_forms() {
        let text: LatLong = serde_json::from_str("\"10:20\"").unwrap();
        let object: LatLong = serde_json::from_str(r#"{"latitude": 10.0, "longitude": 20.0}"#).unwrap();
        assert_eq!(text, object);
        assert!(serde_json::from_str::<LatLong>(r#"{"latitude": 10.0, "longitude": 200.0}"#).is_err());
    }
}
