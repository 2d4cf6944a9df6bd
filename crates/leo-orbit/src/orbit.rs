//! Orbit shell description
//!
//! An [`OrbitDescriptor`] describes one shell of a constellation: a set of
//! circular orbital planes sharing altitude and inclination, each carrying the
//! same number of evenly phased satellites.

use crate::constants::{EARTH_MU_KM3_S2, EARTH_RADIUS_KM};
use crate::{OrbitError, Result};
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};
use std::fmt;
use std::str::FromStr;

/// Immutable orbit shell parameters.
///
/// Textual form is `altitude_km:inclination_deg:planes:satellites`,
/// e.g. `1200:20:32:16`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "OrbitSpec", into = "OrbitSpec")]
pub struct OrbitDescriptor {
    altitude_km: f64,
    inclination_rad: f64,
    /// Inclination as configured, kept so the text form prints back unchanged
    inclination_deg: f64,
    planes: u16,
    satellites_per_plane: u16,
}

impl OrbitDescriptor {
    pub fn new(
        altitude_km: f64,
        inclination_rad: f64,
        planes: u16,
        satellites_per_plane: u16,
    ) -> Result<Self> {
        Self::validated(
            altitude_km,
            inclination_rad,
            inclination_rad.to_degrees(),
            planes,
            satellites_per_plane,
        )
    }

    pub fn from_degrees(
        altitude_km: f64,
        inclination_deg: f64,
        planes: u16,
        satellites_per_plane: u16,
    ) -> Result<Self> {
        if !inclination_deg.is_finite() || !(0.0..=180.0).contains(&inclination_deg) {
            return Err(OrbitError::invalid(
                "inclination",
                format!("{inclination_deg} degrees is outside [0, 180]"),
            ));
        }
        Self::validated(
            altitude_km,
            inclination_deg.to_radians().clamp(0.0, PI),
            inclination_deg,
            planes,
            satellites_per_plane,
        )
    }

    fn validated(
        altitude_km: f64,
        inclination_rad: f64,
        inclination_deg: f64,
        planes: u16,
        satellites_per_plane: u16,
    ) -> Result<Self> {
        if !altitude_km.is_finite() {
            return Err(OrbitError::invalid("altitude_km", "must be finite"));
        }
        let radius_km = EARTH_RADIUS_KM + altitude_km;
        if radius_km <= 0.0 {
            return Err(OrbitError::invalid(
                "altitude_km",
                format!("effective orbital radius {radius_km} km is not positive"),
            ));
        }
        if !inclination_rad.is_finite() || !(0.0..=PI).contains(&inclination_rad) {
            return Err(OrbitError::invalid(
                "inclination",
                format!("{inclination_rad} rad is outside [0, π]"),
            ));
        }
        if planes == 0 {
            return Err(OrbitError::EmptyGrid("planes"));
        }
        if satellites_per_plane == 0 {
            return Err(OrbitError::EmptyGrid("satellites_per_plane"));
        }

        Ok(Self {
            altitude_km,
            inclination_rad,
            inclination_deg,
            planes,
            satellites_per_plane,
        })
    }

    pub fn altitude_km(&self) -> f64 {
        self.altitude_km
    }

    pub fn inclination_rad(&self) -> f64 {
        self.inclination_rad
    }

    pub fn inclination_deg(&self) -> f64 {
        self.inclination_deg
    }

    pub fn planes(&self) -> u16 {
        self.planes
    }

    pub fn satellites_per_plane(&self) -> u16 {
        self.satellites_per_plane
    }

    pub fn satellite_count(&self) -> u32 {
        u32::from(self.planes) * u32::from(self.satellites_per_plane)
    }

    /// Effective orbital radius (earth radius + altitude) in km
    pub fn radius_km(&self) -> f64 {
        EARTH_RADIUS_KM + self.altitude_km
    }

    pub fn radius_m(&self) -> f64 {
        self.radius_km() * 1000.0
    }

    /// Mean motion ω = sqrt(μ / r³) in rad/s
    pub fn angular_velocity(&self) -> f64 {
        (EARTH_MU_KM3_S2 / self.radius_km().powi(3)).sqrt()
    }

    /// Circular orbital speed ω·r in m/s
    pub fn orbital_speed(&self) -> f64 {
        self.angular_velocity() * self.radius_m()
    }

    /// Orbital period in seconds
    pub fn period_s(&self) -> f64 {
        TAU / self.angular_velocity()
    }
}

impl fmt::Display for OrbitDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.altitude_km,
            self.inclination_deg(),
            self.planes,
            self.satellites_per_plane
        )
    }
}

impl FromStr for OrbitDescriptor {
    type Err = OrbitError;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = || OrbitError::MalformedOrbit(s.to_string());
        let fields: Vec<&str> = s.trim().split(':').map(str::trim).collect();
        let [alt, inc, planes, sats] = fields.as_slice() else {
            return Err(malformed());
        };

        let altitude_km = alt.parse::<f64>().map_err(|_| malformed())?;
        let inclination_deg = inc.parse::<f64>().map_err(|_| malformed())?;
        let planes = planes.parse::<u16>().map_err(|_| malformed())?;
        let sats = sats.parse::<u16>().map_err(|_| malformed())?;

        OrbitDescriptor::from_degrees(altitude_km, inclination_deg, planes, sats)
    }
}

/// Configuration form of [`OrbitDescriptor`]: the textual form or an object
/// with the inclination in degrees
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum OrbitSpec {
    Text(String),
    Fields {
        altitude_km: f64,
        inclination_deg: f64,
        planes: u16,
        satellites_per_plane: u16,
    },
}

impl TryFrom<OrbitSpec> for OrbitDescriptor {
    type Error = OrbitError;

    fn try_from(spec: OrbitSpec) -> Result<Self> {
        match spec {
            OrbitSpec::Text(text) => text.parse(),
            OrbitSpec::Fields {
                altitude_km,
                inclination_deg,
                planes,
                satellites_per_plane,
            } => OrbitDescriptor::from_degrees(
                altitude_km,
                inclination_deg,
                planes,
                satellites_per_plane,
            ),
        }
    }
}

impl From<OrbitDescriptor> for OrbitSpec {
    fn from(orbit: OrbitDescriptor) -> Self {
        OrbitSpec::Fields {
            altitude_km: orbit.altitude_km,
            inclination_deg: orbit.inclination_deg,
            planes: orbit.planes,
            satellites_per_plane: orbit.satellites_per_plane,
        }
    }
}
