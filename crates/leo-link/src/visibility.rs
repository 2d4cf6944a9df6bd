//! Earth occlusion
//!
//! The ray from the point farther from the earth's center towards the nearer
//! point is intersected with the earth sphere `|o + t·u|² = R²`:
//!
//! ```text
//! b = 2·(o·u)    c = |o|² − R²    Δ = b² − 4c
//! ```
//!
//! A negative discriminant means the line never touches the sphere. Otherwise
//! the segment is clear only if it ends before both intersection parameters.

use leo_orbit::constants::EARTH_RADIUS_M;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisibilityResult {
    pub line_of_sight: bool,
    /// Ray parameters `(t1, t2)` where the line meets the earth sphere,
    /// absent when it misses the sphere or the points coincide
    pub intersections: Option<(f64, f64)>,
}

impl VisibilityResult {
    fn clear() -> Self {
        Self {
            line_of_sight: true,
            intersections: None,
        }
    }
}

/// Line-of-sight test against the mean earth sphere
pub fn line_of_sight(a: &Vector3<f64>, b: &Vector3<f64>) -> VisibilityResult {
    line_of_sight_with_radius(a, b, EARTH_RADIUS_M)
}

/// Line-of-sight test against a sphere of `radius_m` centered at the origin
pub fn line_of_sight_with_radius(
    a: &Vector3<f64>,
    b: &Vector3<f64>,
    radius_m: f64,
) -> VisibilityResult {
    let (origin, other) = if a.norm() > b.norm() { (a, b) } else { (b, a) };
    let delta = other - origin;
    let distance = delta.norm();
    if distance == 0.0 {
        return VisibilityResult::clear();
    }
    let u = delta / distance;

    let b = 2.0 * origin.dot(&u);
    let c = origin.norm_squared() - radius_m * radius_m;
    let disc = b * b - 4.0 * c;
    if disc < 0.0 {
        debug!(disc, distance, "line misses earth sphere");
        return VisibilityResult::clear();
    }

    let root = disc.sqrt();
    let t1 = (-b - root) / 2.0;
    let t2 = (-b + root) / 2.0;
    let line_of_sight = distance < t1.abs() && distance < t2.abs();
    debug!(disc, distance, t1, t2, line_of_sight, "earth intersection");

    VisibilityResult {
        line_of_sight,
        intersections: Some((t1, t2)),
    }
}

pub fn is_visible(a: &Vector3<f64>, b: &Vector3<f64>) -> bool {
    line_of_sight(a, b).line_of_sight
}
