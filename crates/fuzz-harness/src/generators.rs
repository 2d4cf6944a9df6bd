//! Constellation-domain generators
//!
//! Ranges follow the envelopes the simulator is used in: LEO shells, grids
//! small enough to enumerate, and at most a week of simulated time.

use proptest::prelude::*;
use std::f64::consts::PI;

/// Mean earth radius used by the geometry generators (m)
const EARTH_RADIUS_M: f64 = 6_371_000.0;

// ============================================================================
// Orbit Shells
// ============================================================================

/// LEO altitude in km
pub fn altitude_km() -> impl Strategy<Value = f64> {
    160.0f64..2_000.0
}

/// Inclination in radians, equatorial through retrograde polar
pub fn inclination_rad() -> impl Strategy<Value = f64> {
    0.0f64..=PI
}

/// Inclination in degrees
pub fn inclination_deg() -> impl Strategy<Value = f64> {
    0.0f64..=180.0
}

/// Orbital planes per shell
pub fn plane_count() -> impl Strategy<Value = u16> {
    1u16..=12
}

/// Satellites per orbital plane
pub fn slot_count() -> impl Strategy<Value = u16> {
    1u16..=12
}

/// Shell tuple `(altitude_km, inclination_deg, planes, satellites_per_plane)`
pub fn shell() -> impl Strategy<Value = (f64, f64, u16, u16)> {
    (altitude_km(), inclination_deg(), plane_count(), slot_count())
}

// ============================================================================
// Time
// ============================================================================

/// Whole seconds since epoch, up to one week
pub fn elapsed_seconds() -> impl Strategy<Value = i64> {
    0i64..=7 * 86_400
}

/// Sampling precision in milliseconds, zero meaning exact
pub fn precision_ms() -> impl Strategy<Value = i64> {
    prop_oneof![Just(0i64), 1i64..=60_000]
}

// ============================================================================
// Ground
// ============================================================================

/// Latitude in degrees
pub fn latitude_deg() -> impl Strategy<Value = f64> {
    -90.0f64..=90.0
}

/// Longitude in degrees
pub fn longitude_deg() -> impl Strategy<Value = f64> {
    -180.0f64..=180.0
}

/// Heading in degrees clockwise from north
pub fn azimuth_deg() -> impl Strategy<Value = f64> {
    0.0f64..=360.0
}

/// Ground vehicle speed in m/s
pub fn vehicle_speed() -> impl Strategy<Value = f64> {
    0.0f64..=300.0
}

/// Elevation threshold in degrees
pub fn elevation_deg() -> impl Strategy<Value = f64> {
    0.0f64..=90.0
}

// ============================================================================
// Cartesian Points
// ============================================================================

fn direction() -> impl Strategy<Value = (f64, f64)> {
    (0.0f64..=PI, 0.0f64..2.0 * PI)
}

fn at_radius(radius: f64, colatitude: f64, longitude: f64) -> [f64; 3] {
    [
        radius * colatitude.sin() * longitude.cos(),
        radius * colatitude.sin() * longitude.sin(),
        radius * colatitude.cos(),
    ]
}

/// Point on the earth's surface, earth-centered metres
pub fn surface_point() -> impl Strategy<Value = [f64; 3]> {
    direction().prop_map(|(colat, lon)| at_radius(EARTH_RADIUS_M, colat, lon))
}

/// Point at LEO altitude, earth-centered metres
pub fn orbit_point() -> impl Strategy<Value = [f64; 3]> {
    (altitude_km(), direction())
        .prop_map(|(alt, (colat, lon))| at_radius(EARTH_RADIUS_M + alt * 1000.0, colat, lon))
}

// ============================================================================
// Link Budget
// ============================================================================

/// Transmit power or EIRP in dBm
pub fn tx_power_dbm() -> impl Strategy<Value = f64> {
    -30.0f64..=110.0
}

/// Non-negative loss term in dB
pub fn loss_db() -> impl Strategy<Value = f64> {
    0.0f64..=200.0
}
