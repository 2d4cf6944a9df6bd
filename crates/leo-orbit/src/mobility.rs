//! Node mobility
//!
//! Every node owns one [`Mobility`]: a circular orbit for satellites, a fixed
//! surface point for ground stations, or a great-circle track for ground
//! vehicles. All three answer the same two questions (where, how fast) through
//! [`MobilityModel`].

use crate::constants::EARTH_RADIUS_M;
use crate::geo::LatLong;
use crate::propagator::CircularOrbitMobility;
use crate::time::{as_seconds, sample_instant, SimTime};
use crate::{OrbitError, Result};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Position (m) and velocity (m/s) in the earth-centered frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Kinematics {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
}

impl Kinematics {
    pub fn stationary(position: Vector3<f64>) -> Self {
        Self {
            position,
            velocity: Vector3::zeros(),
        }
    }
}

/// Result of querying a mobility model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub kinematics: Kinematics,
    /// The cached state moved to a new sampling instant; observers of
    /// course changes should be notified
    pub refreshed: bool,
}

pub trait MobilityModel {
    fn sample(&mut self, now: SimTime) -> Sample;

    fn position(&mut self, now: SimTime) -> Vector3<f64> {
        self.sample(now).kinematics.position
    }

    fn velocity(&mut self, now: SimTime) -> Vector3<f64> {
        self.sample(now).kinematics.velocity
    }
}

/// What a cached model must do for a query at `now`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Refresh {
    /// Zero precision: evaluate at `now` without touching the cache
    Exact,
    /// Still inside the last sampling interval
    Hold,
    /// Move the cache to this sampling instant
    At(SimTime),
}

pub(crate) fn refresh_for(now: SimTime, precision: SimTime, last: Option<SimTime>) -> Refresh {
    if precision <= SimTime::zero() {
        return Refresh::Exact;
    }
    let instant = sample_instant(now, precision);
    if last == Some(instant) {
        Refresh::Hold
    } else {
        Refresh::At(instant)
    }
}

pub(crate) fn check_precision(precision: SimTime) -> Result<SimTime> {
    if precision < SimTime::zero() {
        return Err(OrbitError::invalid(
            "precision",
            format!("{precision} is negative"),
        ));
    }
    Ok(precision)
}

/// A node that never moves
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantPosition {
    position: Vector3<f64>,
}

impl ConstantPosition {
    pub fn new(position: Vector3<f64>) -> Self {
        Self { position }
    }

    pub fn at(location: LatLong) -> Self {
        Self::new(location.surface_position())
    }
}

impl MobilityModel for ConstantPosition {
    fn sample(&mut self, _now: SimTime) -> Sample {
        Sample {
            kinematics: Kinematics::stationary(self.position),
            refreshed: false,
        }
    }
}

/// Ground vehicle travelling a great circle at constant speed and altitude.
///
/// With `A` the unit start vector and `B` the unit heading tangent at the
/// start, the track is `p(t) = r·(cos δ·A + sin δ·B)` where `δ = speed·t / r`.
#[derive(Debug, Clone, PartialEq)]
pub struct GroundVehicleMobility {
    radius_m: f64,
    speed: f64,
    start: Vector3<f64>,
    heading: Vector3<f64>,
    precision: SimTime,
    last_sample: Option<SimTime>,
    cached: Kinematics,
}

impl GroundVehicleMobility {
    /// `speed` in m/s, `azimuth_deg` clockwise from north, `altitude_m` above
    /// the mean earth sphere
    pub fn new(start: LatLong, altitude_m: f64, speed: f64, azimuth_deg: f64) -> Result<Self> {
        if !speed.is_finite() || speed < 0.0 {
            return Err(OrbitError::invalid(
                "speed",
                format!("{speed} m/s is negative"),
            ));
        }
        if !azimuth_deg.is_finite() || !(0.0..=360.0).contains(&azimuth_deg) {
            return Err(OrbitError::invalid(
                "azimuth",
                format!("{azimuth_deg} is outside [0, 360] degrees"),
            ));
        }
        if !altitude_m.is_finite() || altitude_m < 0.0 {
            return Err(OrbitError::invalid(
                "altitude_m",
                format!("{altitude_m} m is negative"),
            ));
        }

        let lat = start.latitude().to_radians();
        let lon = start.longitude().to_radians();
        let (sin_lat, cos_lat) = lat.sin_cos();
        let (sin_lon, cos_lon) = lon.sin_cos();
        let up = Vector3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat);
        let north = Vector3::new(-sin_lat * cos_lon, -sin_lat * sin_lon, cos_lat);
        let east = Vector3::new(-sin_lon, cos_lon, 0.0);
        let (sin_az, cos_az) = azimuth_deg.to_radians().sin_cos();

        let radius_m = EARTH_RADIUS_M + altitude_m;
        let heading = cos_az * north + sin_az * east;
        let epoch = SimTime::zero();

        Ok(Self {
            radius_m,
            speed,
            start: up,
            heading,
            precision: CircularOrbitMobility::default_precision(),
            last_sample: Some(epoch),
            cached: Self::track(radius_m, speed, &up, &heading, epoch),
        })
    }

    pub fn with_precision(mut self, precision: SimTime) -> Result<Self> {
        self.precision = check_precision(precision)?;
        Ok(self)
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn radius_m(&self) -> f64 {
        self.radius_m
    }

    pub fn state_at(&self, t: SimTime) -> Kinematics {
        Self::track(self.radius_m, self.speed, &self.start, &self.heading, t)
    }

    fn track(
        radius_m: f64,
        speed: f64,
        start: &Vector3<f64>,
        heading: &Vector3<f64>,
        t: SimTime,
    ) -> Kinematics {
        let (sin_d, cos_d) = (speed * as_seconds(t) / radius_m).sin_cos();
        Kinematics {
            position: radius_m * (cos_d * start + sin_d * heading),
            velocity: speed * (-sin_d * start + cos_d * heading),
        }
    }
}

impl MobilityModel for GroundVehicleMobility {
    fn sample(&mut self, now: SimTime) -> Sample {
        match refresh_for(now, self.precision, self.last_sample) {
            Refresh::Exact => Sample {
                kinematics: self.state_at(now),
                refreshed: false,
            },
            Refresh::Hold => Sample {
                kinematics: self.cached,
                refreshed: false,
            },
            Refresh::At(instant) => {
                self.cached = self.state_at(instant);
                self.last_sample = Some(instant);
                trace!("vehicle sample at {}s: {:?}", as_seconds(instant), self.cached.position);
                Sample {
                    kinematics: self.cached,
                    refreshed: true,
                }
            }
        }
    }
}

/// Mobility of one node
#[derive(Debug, Clone, PartialEq)]
pub enum Mobility {
    Orbit(CircularOrbitMobility),
    Fixed(ConstantPosition),
    Vehicle(GroundVehicleMobility),
}

impl Mobility {
    pub fn is_orbit(&self) -> bool {
        matches!(self, Mobility::Orbit(_))
    }
}

impl MobilityModel for Mobility {
    fn sample(&mut self, now: SimTime) -> Sample {
        match self {
            Mobility::Orbit(orbit) => orbit.sample(now),
            Mobility::Fixed(fixed) => fixed.sample(now),
            Mobility::Vehicle(vehicle) => vehicle.sample(now),
        }
    }
}

impl From<CircularOrbitMobility> for Mobility {
    fn from(orbit: CircularOrbitMobility) -> Self {
        Mobility::Orbit(orbit)
    }
}

impl From<ConstantPosition> for Mobility {
    fn from(fixed: ConstantPosition) -> Self {
        Mobility::Fixed(fixed)
    }
}

impl From<GroundVehicleMobility> for Mobility {
    fn from(vehicle: GroundVehicleMobility) -> Self {
        Mobility::Vehicle(vehicle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::SlotAssignment;
    use crate::orbit::OrbitDescriptor;
    use fuzz_harness::prelude::*;

    fn equator() -> LatLong {
        LatLong::new(0.0, 0.0).unwrap()
    }

    #[test]
    fn test_refresh_rule() {
        let p = SimTime::seconds(10);
        assert_eq!(refresh_for(SimTime::seconds(3), SimTime::zero(), None), Refresh::Exact);
        assert_eq!(refresh_for(SimTime::seconds(3), p, Some(SimTime::zero())), Refresh::Hold);
        assert_eq!(
            refresh_for(SimTime::seconds(13), p, Some(SimTime::zero())),
            Refresh::At(SimTime::seconds(10))
        );
        assert_eq!(refresh_for(SimTime::seconds(3), p, None), Refresh::At(SimTime::zero()));
    }

    #[test]
    fn test_constant_position_never_moves() {
        let mut fixed = ConstantPosition::at(LatLong::new(45.0, 7.0).unwrap());
        let a = fixed.sample(SimTime::zero());
        let b = fixed.sample(SimTime::seconds(3600));
        assert_eq!(a, b);
        assert!(!b.refreshed);
        assert_eq!(fixed.velocity(SimTime::seconds(1)), Vector3::zeros());
    }

    #[test]
    fn test_vehicle_heads_east_along_equator() {
        let mut vehicle = GroundVehicleMobility::new(equator(), 0.0, 100.0, 90.0)
            .unwrap()
            .with_precision(SimTime::zero())
            .unwrap();
        let k = vehicle.sample(SimTime::seconds(1000));
        assert!(k.kinematics.position.z.abs() < 1e-6);
        assert!(k.kinematics.position.y > 0.0);
        assert!((k.kinematics.position.norm() - EARTH_RADIUS_M).abs() < 1e-6);
        // 100 km of arc
        let arc = EARTH_RADIUS_M * k.kinematics.position.y.atan2(k.kinematics.position.x);
        assert!((arc - 100_000.0).abs() < 1e-3);
    }

    #[test]
    fn test_vehicle_heads_north() {
        let vehicle = GroundVehicleMobility::new(equator(), 0.0, 250.0, 0.0).unwrap();
        let k = vehicle.state_at(SimTime::seconds(60));
        assert!(k.position.z > 0.0);
        assert!(k.position.y.abs() < 1e-6);
        assert!((k.velocity.norm() - 250.0).abs() < 1e-9);
        assert!(k.velocity.dot(&k.position).abs() < 1e-3);
    }

    #[test]
    fn test_vehicle_holds_between_samples() {
        let mut vehicle = GroundVehicleMobility::new(equator(), 10.0, 30.0, 45.0)
            .unwrap()
            .with_precision(SimTime::seconds(5))
            .unwrap();
        let start = vehicle.sample(SimTime::seconds(4));
        assert!(!start.refreshed);
        let moved = vehicle.sample(SimTime::seconds(5));
        assert!(moved.refreshed);
        assert_ne!(moved.kinematics.position, start.kinematics.position);
        assert!((moved.kinematics.position.norm() - (EARTH_RADIUS_M + 10.0)).abs() < 1e-6);
    }

    #[test]
    fn test_vehicle_rejects_bad_parameters() {
        assert!(GroundVehicleMobility::new(equator(), 0.0, -1.0, 0.0).is_err());
        assert!(GroundVehicleMobility::new(equator(), 0.0, 1.0, 361.0).is_err());
        assert!(GroundVehicleMobility::new(equator(), -5.0, 1.0, 0.0).is_err());
        assert!(GroundVehicleMobility::new(equator(), 0.0, 1.0, 0.0)
            .unwrap()
            .with_precision(SimTime::seconds(-2))
            .is_err());
    }

    #[test]
    fn test_mobility_dispatch() {
        let orbit = OrbitDescriptor::from_degrees(550.0, 53.0, 1, 1).unwrap();
        let slot = SlotAssignment {
            plane: 0,
            slot: 0,
            plane_angle: 0.0,
            slot_angle: 0.0,
        };
        let mut nodes: Vec<Mobility> = vec![
            CircularOrbitMobility::new(&orbit, slot).into(),
            ConstantPosition::at(equator()).into(),
            GroundVehicleMobility::new(equator(), 0.0, 10.0, 90.0).unwrap().into(),
        ];
        assert!(nodes[0].is_orbit());
        assert!(!nodes[1].is_orbit());
        let radii: Vec<f64> = nodes
            .iter_mut()
            .map(|m| m.position(SimTime::seconds(30)).norm())
            .collect();
        assert!((radii[0] - orbit.radius_m()).abs() < 1e-6);
        assert!((radii[1] - EARTH_RADIUS_M).abs() < 1e-6);
        assert!((radii[2] - EARTH_RADIUS_M).abs() < 1e-6);
    }

    proptest! {
        #![proptest_config(quick(128))]

        #[test]
        fn fuzz_vehicle_stays_at_altitude(
            lat in latitude_deg(),
            lon in longitude_deg(),
            az in azimuth_deg(),
            speed in vehicle_speed(),
            secs in elapsed_seconds(),
        ) {
            let start = LatLong::new(lat, lon).unwrap();
            let vehicle = GroundVehicleMobility::new(start, 100.0, speed, az).unwrap();
            let k = vehicle.state_at(SimTime::seconds(secs));
            prop_assert!((k.position.norm() - (EARTH_RADIUS_M + 100.0)).abs() < 1e-6 * EARTH_RADIUS_M);
            prop_assert!((k.velocity.norm() - speed).abs() < 1e-6 * speed.max(1.0));
        }
    }
}
