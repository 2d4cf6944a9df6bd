//! Circular Orbit Propagation
//!
//! Two-body circular motion around a spherical earth. A satellite's orbital
//! plane is fixed by its inclination `i` and right-ascension offset `Ω`
//! (the allocator's plane angle); its in-plane angle advances uniformly:
//!
//! ```text
//! θ(t) = θ₀ + ω·t            ω = sqrt(μ / r³)
//! P    = (cos Ω, sin Ω, 0)
//! Q    = (−sin Ω·cos i, cos Ω·cos i, sin i)
//! p(t) = r·(cos θ·P + sin θ·Q)
//! v(t) = ω·r·(−sin θ·P + cos θ·Q)
//! ```

use crate::allocator::SlotAssignment;
use crate::mobility::{check_precision, refresh_for, Kinematics, MobilityModel, Refresh, Sample};
use crate::orbit::OrbitDescriptor;
use crate::time::{as_seconds, SimTime};
use crate::Result;
use nalgebra::Vector3;
use std::f64::consts::TAU;
use tracing::trace;

/// Closed-form circular orbit of one satellite
#[derive(Debug, Clone, PartialEq)]
pub struct CircularOrbit {
    radius_m: f64,
    /// Signed mean motion in rad/s, negative for retrograde travel
    angular_velocity: f64,
    initial_phase: f64,
    p: Vector3<f64>,
    q: Vector3<f64>,
}

impl CircularOrbit {
    pub fn new(orbit: &OrbitDescriptor, assignment: &SlotAssignment) -> Self {
        let (sin_raan, cos_raan) = assignment.plane_angle.sin_cos();
        let (sin_inc, cos_inc) = orbit.inclination_rad().sin_cos();

        Self {
            radius_m: orbit.radius_m(),
            angular_velocity: orbit.angular_velocity(),
            initial_phase: assignment.slot_angle,
            p: Vector3::new(cos_raan, sin_raan, 0.0),
            q: Vector3::new(-sin_raan * cos_inc, cos_raan * cos_inc, sin_inc),
        }
    }

    /// Travel against the prograde direction
    pub fn retrograde(mut self) -> Self {
        self.angular_velocity = -self.angular_velocity;
        self
    }

    pub fn radius_m(&self) -> f64 {
        self.radius_m
    }

    pub fn angular_velocity(&self) -> f64 {
        self.angular_velocity
    }

    /// Tangential speed in m/s
    pub fn speed(&self) -> f64 {
        self.angular_velocity.abs() * self.radius_m
    }

    /// Unit normal of the orbital plane
    pub fn plane_normal(&self) -> Vector3<f64> {
        self.p.cross(&self.q)
    }

    /// In-plane angle θ(t) in [0, 2π)
    pub fn in_plane_angle(&self, t: SimTime) -> f64 {
        (self.initial_phase + self.angular_velocity * as_seconds(t)).rem_euclid(TAU)
    }

    pub fn state_at(&self, t: SimTime) -> Kinematics {
        let (sin_theta, cos_theta) = self.in_plane_angle(t).sin_cos();
        let position = self.radius_m * (cos_theta * self.p + sin_theta * self.q);
        let velocity =
            self.angular_velocity * self.radius_m * (-sin_theta * self.p + cos_theta * self.q);
        Kinematics { position, velocity }
    }
}

/// Cached mobility state owned by one satellite
#[derive(Debug, Clone, PartialEq)]
pub struct SatelliteState {
    last_sample: Option<SimTime>,
    position: Vector3<f64>,
    velocity: Vector3<f64>,
    plane: u16,
    slot: u16,
}

impl SatelliteState {
    pub fn last_sample(&self) -> Option<SimTime> {
        self.last_sample
    }

    pub fn kinematics(&self) -> Kinematics {
        Kinematics {
            position: self.position,
            velocity: self.velocity,
        }
    }

    pub fn plane(&self) -> u16 {
        self.plane
    }

    pub fn slot(&self) -> u16 {
        self.slot
    }

    fn record(&mut self, at: SimTime, kinematics: Kinematics) {
        self.last_sample = Some(at);
        self.position = kinematics.position;
        self.velocity = kinematics.velocity;
    }
}

/// Circular orbit with sampled position updates.
///
/// With a non-zero precision the cached state is refreshed only at multiples
/// of the precision since epoch; queries in between return the last sample.
/// A zero precision evaluates the orbit exactly on every query.
#[derive(Debug, Clone, PartialEq)]
pub struct CircularOrbitMobility {
    orbit: CircularOrbit,
    precision: SimTime,
    state: SatelliteState,
}

impl CircularOrbitMobility {
    /// Default sampling interval
    pub fn default_precision() -> SimTime {
        SimTime::seconds(1)
    }

    pub fn new(orbit: &OrbitDescriptor, assignment: SlotAssignment) -> Self {
        Self::from_orbit(CircularOrbit::new(orbit, &assignment), assignment)
    }

    pub fn from_orbit(orbit: CircularOrbit, assignment: SlotAssignment) -> Self {
        let epoch = SimTime::zero();
        let initial = orbit.state_at(epoch);
        Self {
            orbit,
            precision: Self::default_precision(),
            state: SatelliteState {
                last_sample: Some(epoch),
                position: initial.position,
                velocity: initial.velocity,
                plane: assignment.plane,
                slot: assignment.slot,
            },
        }
    }

    pub fn with_precision(mut self, precision: SimTime) -> Result<Self> {
        self.precision = check_precision(precision)?;
        Ok(self)
    }

    pub fn orbit(&self) -> &CircularOrbit {
        &self.orbit
    }

    pub fn precision(&self) -> SimTime {
        self.precision
    }

    pub fn state(&self) -> &SatelliteState {
        &self.state
    }
}

impl MobilityModel for CircularOrbitMobility {
    fn sample(&mut self, now: SimTime) -> Sample {
        let instant = match refresh_for(now, self.precision, self.state.last_sample) {
            Refresh::Exact => {
                return Sample {
                    kinematics: self.orbit.state_at(now),
                    refreshed: false,
                }
            }
            Refresh::Hold => {
                return Sample {
                    kinematics: self.state.kinematics(),
                    refreshed: false,
                }
            }
            Refresh::At(instant) => instant,
        };

        let kinematics = self.orbit.state_at(instant);
        self.state.record(instant, kinematics);
        trace!(
            plane = self.state.plane,
            slot = self.state.slot,
            "orbit sample at {}s: {:?}",
            as_seconds(instant),
            kinematics.position
        );

        Sample {
            kinematics,
            refreshed: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::{GridAllocator, PositionAllocator};
    use crate::constants::{EARTH_RADIUS_M, SURFACE_ORBITAL_SPEED_M_S};
    use fuzz_harness::generators::{altitude_km, elapsed_seconds, inclination_rad, precision_ms};
    use proptest::prelude::*;

    fn first_slot() -> SlotAssignment {
        SlotAssignment {
            plane: 0,
            slot: 0,
            plane_angle: 0.0,
            slot_angle: 0.0,
        }
    }

    fn mobility(altitude_km: f64, inclination_deg: f64) -> CircularOrbitMobility {
        let orbit = OrbitDescriptor::from_degrees(altitude_km, inclination_deg, 1, 1).unwrap();
        CircularOrbitMobility::new(&orbit, first_slot())
    }

    #[test]
    fn test_speed_at_zero_altitude_is_surface_speed() {
        let mob = mobility(0.0, 0.0);
        assert!((mob.orbit().speed() - SURFACE_ORBITAL_SPEED_M_S).abs() < 0.01);
        assert_eq!(mob.orbit().speed() as u64, 7909);
    }

    #[test]
    fn test_position_on_surface_at_zero_altitude() {
        let mut mob = mobility(0.0, 1.0);
        let pos = mob.position(SimTime::zero());
        assert!((pos.norm() / 1000.0 - EARTH_RADIUS_M / 1000.0).abs() < 0.1);
    }

    #[test]
    fn test_equatorial_orbit_stays_in_plane() {
        let mut mob = mobility(550.0, 0.0).with_precision(SimTime::zero()).unwrap();
        for secs in [0, 60, 1800, 5000] {
            let k = mob.sample(SimTime::seconds(secs)).kinematics;
            assert!(k.position.z.abs() < 1e-6);
            assert!(k.velocity.z.abs() < 1e-9);
        }
    }

    #[test]
    fn test_position_changes_over_time() {
        let mut mob = mobility(0.0, 20.0);
        let start = mob.position(SimTime::zero());
        let later = mob.position(SimTime::seconds(100));
        assert!((later.norm() / 1000.0 - EARTH_RADIUS_M / 1000.0).abs() < 0.001);
        assert_ne!(start.x, later.x);
    }

    #[test]
    fn test_neighboring_planes_have_offset() {
        let orbit = OrbitDescriptor::from_degrees(1000.0, 20.0, 18, 1).unwrap();
        let mut alloc = GridAllocator::for_orbit(&orbit);
        let a = CircularOrbit::new(&orbit, &alloc.next_position()).state_at(SimTime::zero());
        let b = CircularOrbit::new(&orbit, &alloc.next_position()).state_at(SimTime::zero());
        assert_ne!(a.position.x, b.position.x);
        assert!((a.position.norm() - b.position.norm()).abs() < 1e-6);
    }

    #[test]
    fn test_neighboring_slots_have_offset() {
        let orbit = OrbitDescriptor::from_degrees(1000.0, 20.0, 1, 18).unwrap();
        let mut alloc = GridAllocator::for_orbit(&orbit);
        let a = CircularOrbit::new(&orbit, &alloc.next_position()).state_at(SimTime::zero());
        let b = CircularOrbit::new(&orbit, &alloc.next_position()).state_at(SimTime::zero());
        assert_ne!(a.position.x, b.position.x);
        assert!((a.position.norm() - b.position.norm()).abs() < 1e-6);
    }

    #[test]
    fn test_velocity_tangential_with_orbital_speed() {
        let orbit = OrbitDescriptor::from_degrees(780.0, 86.4, 6, 11).unwrap();
        let assignment = GridAllocator::for_orbit(&orbit).nth(13).unwrap();
        let circular = CircularOrbit::new(&orbit, &assignment);
        let k = circular.state_at(SimTime::seconds(321));
        assert!((k.velocity.norm() - orbit.orbital_speed()).abs() < 1e-6);
        assert!(k.position.dot(&k.velocity).abs() / (k.position.norm() * k.velocity.norm()) < 1e-12);
        assert!(circular.plane_normal().dot(&k.position).abs() < 1e-3);
    }

    #[test]
    fn test_velocity_matches_finite_difference() {
        let orbit = OrbitDescriptor::from_degrees(550.0, 53.0, 1, 1).unwrap();
        let circular = CircularOrbit::new(&orbit, &first_slot());
        let t = SimTime::seconds(1000);
        let dt = SimTime::milliseconds(1);
        let numeric = (circular.state_at(t + dt).position - circular.state_at(t - dt).position) / 2e-3;
        let analytic = circular.state_at(t).velocity;
        assert!((numeric - analytic).norm() < 1e-2, "{numeric:?} vs {analytic:?}");
    }

    #[test]
    fn test_retrograde_reverses_direction() {
        let orbit = OrbitDescriptor::from_degrees(550.0, 53.0, 1, 1).unwrap();
        let prograde = CircularOrbit::new(&orbit, &first_slot());
        let retrograde = prograde.clone().retrograde();
        let epoch_a = prograde.state_at(SimTime::zero());
        let epoch_b = retrograde.state_at(SimTime::zero());
        assert_eq!(epoch_a.position, epoch_b.position);
        assert!((epoch_a.velocity + epoch_b.velocity).norm() < 1e-9);

        let t = SimTime::seconds(60);
        let a = prograde.state_at(t);
        let b = retrograde.state_at(t);
        assert!((a.position.z + b.position.z).abs() < 1e-6);
        assert_eq!(retrograde.speed(), prograde.speed());
    }

    #[test]
    fn test_samples_held_between_refreshes() {
        let mut mob = mobility(1000.0, 20.0)
            .with_precision(SimTime::seconds(10))
            .unwrap();

        let at_zero = mob.sample(SimTime::seconds(0));
        assert!(!at_zero.refreshed, "epoch sample is taken at construction");

        let held = mob.sample(SimTime::seconds(9));
        assert!(!held.refreshed);
        assert_eq!(held.kinematics, at_zero.kinematics);

        let refreshed = mob.sample(SimTime::milliseconds(10_500));
        assert!(refreshed.refreshed);
        assert_ne!(refreshed.kinematics.position, at_zero.kinematics.position);
        assert_eq!(mob.state().last_sample(), Some(SimTime::seconds(10)));
        assert_eq!(
            refreshed.kinematics,
            mob.orbit().state_at(SimTime::seconds(10))
        );

        let again = mob.sample(SimTime::seconds(19));
        assert!(!again.refreshed);
        assert_eq!(again.kinematics, refreshed.kinematics);
    }

    #[test]
    fn test_zero_precision_is_exact_and_silent() {
        let mut mob = mobility(1000.0, 20.0).with_precision(SimTime::zero()).unwrap();
        let t = SimTime::milliseconds(4321);
        let sample = mob.sample(t);
        assert!(!sample.refreshed);
        assert_eq!(sample.kinematics, mob.orbit().state_at(t));
    }

    #[test]
    fn test_rejects_negative_precision() {
        assert!(mobility(1000.0, 20.0).with_precision(SimTime::seconds(-1)).is_err());
    }

    #[test]
    fn test_state_keeps_grid_indices() {
        let orbit = OrbitDescriptor::from_degrees(1000.0, 20.0, 3, 4).unwrap();
        let assignment = GridAllocator::for_orbit(&orbit).nth(6).unwrap();
        let mob = CircularOrbitMobility::new(&orbit, assignment);
        assert_eq!((mob.state().plane(), mob.state().slot()), (1, 2));
    }

    proptest! {
        #[test]
        fn fuzz_radius_constant(alt in altitude_km(), inc in inclination_rad(), secs in elapsed_seconds()) {
            let orbit = OrbitDescriptor::new(alt, inc, 1, 1).unwrap();
            let circular = CircularOrbit::new(&orbit, &first_slot());
            let k = circular.state_at(SimTime::seconds(secs));
            prop_assert!((k.position.norm() - orbit.radius_m()).abs() < 1e-6 * orbit.radius_m());
        }

        #[test]
        fn fuzz_angle_advances(alt in altitude_km(), inc in inclination_rad(), t1 in elapsed_seconds(), dt in 1i64..600) {
            let orbit = OrbitDescriptor::new(alt, inc, 1, 1).unwrap();
            let circular = CircularOrbit::new(&orbit, &first_slot());
            let a = circular.in_plane_angle(SimTime::seconds(t1));
            let b = circular.in_plane_angle(SimTime::seconds(t1 + dt));
            prop_assert!((a - b).abs() > 1e-9);
        }

        #[test]
        fn fuzz_sampling_rule(precision in precision_ms(), secs in elapsed_seconds(), extra_ms in 0i64..1000) {
            let mut mob = mobility(550.0, 53.0)
                .with_precision(SimTime::milliseconds(precision))
                .unwrap();
            let now = SimTime::milliseconds(secs * 1000 + extra_ms);
            let sample = mob.sample(now);

            if precision == 0 {
                prop_assert!(!sample.refreshed);
                prop_assert_eq!(sample.kinematics, mob.orbit().state_at(now));
            } else {
                let instant = SimTime::milliseconds(now.num_milliseconds() / precision * precision);
                prop_assert_eq!(sample.refreshed, instant != SimTime::zero());
                prop_assert_eq!(sample.kinematics, mob.orbit().state_at(instant));
                prop_assert_eq!(mob.state().last_sample(), Some(instant));
            }
        }
    }
}
