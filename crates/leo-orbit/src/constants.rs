//! Spherical-earth constants

/// Mean earth sphere radius in metres
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Mean earth sphere radius in kilometres
pub const EARTH_RADIUS_KM: f64 = EARTH_RADIUS_M / 1000.0;

/// Standard gravitational parameter of the earth (km³/s²)
pub const EARTH_MU_KM3_S2: f64 = 398_600.4418;

/// Circular orbital speed at zero altitude over the mean sphere (m/s).
///
/// Regression reference for the propagator: sqrt(μ / R) with the constants above.
pub const SURFACE_ORBITAL_SPEED_M_S: f64 = 7909.79;
