//! Simulated time
//!
//! Simulated time is the elapsed duration since the simulation epoch. The
//! scheduler owns the clock; everything here only converts and quantizes.

use chrono::Duration;

/// Elapsed simulated time since epoch
pub type SimTime = Duration;

/// Elapsed time in fractional seconds
pub fn as_seconds(t: SimTime) -> f64 {
    match t.num_nanoseconds() {
        Some(ns) => ns as f64 * 1e-9,
        None => t.num_milliseconds() as f64 * 1e-3,
    }
}

/// Simulated time from fractional seconds, rounded to the nanosecond
pub fn from_seconds(seconds: f64) -> SimTime {
    Duration::nanoseconds((seconds * 1e9).round() as i64)
}

/// Latest multiple of `precision` that is not after `t`.
///
/// A zero or negative precision leaves `t` unchanged.
pub fn sample_instant(t: SimTime, precision: SimTime) -> SimTime {
    if precision <= Duration::zero() {
        return t;
    }
    match (t.num_nanoseconds(), precision.num_nanoseconds()) {
        (Some(t_ns), Some(p_ns)) => Duration::nanoseconds(t_ns.div_euclid(p_ns) * p_ns),
        _ => {
            let p_ms = precision.num_milliseconds().max(1);
            Duration::milliseconds(t.num_milliseconds().div_euclid(p_ms) * p_ms)
        }
    }
}
