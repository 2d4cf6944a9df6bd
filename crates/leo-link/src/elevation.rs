//! Elevation angle above the local horizon of the lower endpoint

use nalgebra::Vector3;
use std::f64::consts::FRAC_PI_2;

/// Elevation in radians of the farther-out point as seen from the point
/// nearer the earth's center: `asin(r̂_obs · d̂)`.
///
/// Coincident points, or an observer at the earth's center, count as zenith.
pub fn elevation_angle(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    let (observer, target) = if a.norm() <= b.norm() { (a, b) } else { (b, a) };
    let (Some(up), Some(line)) = (
        observer.try_normalize(0.0),
        (target - observer).try_normalize(0.0),
    ) else {
        return FRAC_PI_2;
    };
    up.dot(&line).clamp(-1.0, 1.0).asin()
}

pub fn elevation_angle_deg(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    elevation_angle(a, b).to_degrees()
}
