//! Deterministic position allocators
//!
//! - [`GridAllocator`] hands out orbital plane / in-plane slot pairs
//! - [`PolarGridAllocator`] places ground stations on a latitude/longitude grid
//!
//! Both are infinite round-robin sequences: once every combination has been
//! issued the sequence starts over. Neither draws on a random stream, so
//! placement is identical across runs.

use crate::constants::EARTH_RADIUS_M;
use crate::geo::{spherical_to_cartesian, GroundPosition};
use crate::orbit::OrbitDescriptor;
use crate::{OrbitError, Result};
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};
use tracing::debug;

/// Number of random streams an allocator consumes.
///
/// A count, not a status code: allocators draw nothing, so this is zero and
/// there is no negative "not applicable" marker.
pub const NO_STREAMS_CONSUMED: u64 = 0;

pub trait PositionAllocator {
    type Position;

    /// Issue the next position and advance the cursor
    fn next_position(&mut self) -> Self::Position;

    /// Restart the sequence from its first output
    fn reset(&mut self);

    /// Random stream hookup.
    ///
    /// Allocators here never draw random numbers, so this is a no-op that
    /// reports [`NO_STREAMS_CONSUMED`] regardless of `first_stream`.
    fn assign_streams(&mut self, _first_stream: u64) -> u64 {
        NO_STREAMS_CONSUMED
    }
}

/// Plane/slot pair issued by [`GridAllocator`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlotAssignment {
    pub plane: u16,
    pub slot: u16,
    /// Right-ascension offset of the plane, `2π·plane/planes`
    pub plane_angle: f64,
    /// In-plane phase at epoch, `2π·slot/satellites_per_plane`
    pub slot_angle: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridAllocator {
    planes: u16,
    satellites_per_plane: u16,
    plane: u16,
    slot: u16,
}

impl GridAllocator {
    pub fn new(planes: u16, satellites_per_plane: u16) -> Result<Self> {
        if planes == 0 {
            return Err(OrbitError::EmptyGrid("planes"));
        }
        if satellites_per_plane == 0 {
            return Err(OrbitError::EmptyGrid("satellites_per_plane"));
        }
        Ok(Self {
            planes,
            satellites_per_plane,
            plane: 0,
            slot: 0,
        })
    }

    /// Allocator over the plane/slot grid of an already validated shell
    pub fn for_orbit(orbit: &OrbitDescriptor) -> Self {
        Self {
            planes: orbit.planes(),
            satellites_per_plane: orbit.satellites_per_plane(),
            plane: 0,
            slot: 0,
        }
    }

    /// Number of outputs before the sequence repeats
    pub fn period(&self) -> usize {
        usize::from(self.planes) * usize::from(self.satellites_per_plane)
    }
}

impl PositionAllocator for GridAllocator {
    type Position = SlotAssignment;

    fn next_position(&mut self) -> SlotAssignment {
        let next = SlotAssignment {
            plane: self.plane,
            slot: self.slot,
            plane_angle: TAU * (f64::from(self.plane) / f64::from(self.planes)),
            slot_angle: TAU * (f64::from(self.slot) / f64::from(self.satellites_per_plane)),
        };

        self.slot = (self.slot + 1) % self.satellites_per_plane;
        if self.slot == 0 {
            self.plane = (self.plane + 1) % self.planes;
        }

        next
    }

    fn reset(&mut self) {
        self.plane = 0;
        self.slot = 0;
    }
}

impl Iterator for GridAllocator {
    type Item = SlotAssignment;

    fn next(&mut self) -> Option<SlotAssignment> {
        Some(self.next_position())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolarGridAllocator {
    latitude_rings: u32,
    longitude_divisions: u32,
    radius_m: f64,
    ring: u32,
    division: u32,
}

impl PolarGridAllocator {
    pub fn new(latitude_rings: u32, longitude_divisions: u32) -> Result<Self> {
        if latitude_rings == 0 {
            return Err(OrbitError::EmptyGrid("latitude_rings"));
        }
        if longitude_divisions == 0 {
            return Err(OrbitError::EmptyGrid("longitude_divisions"));
        }
        Ok(Self {
            latitude_rings,
            longitude_divisions,
            radius_m: EARTH_RADIUS_M,
            ring: 0,
            division: 0,
        })
    }

    /// Place the grid on a sphere other than the mean earth surface
    pub fn with_radius(mut self, radius_m: f64) -> Result<Self> {
        if !radius_m.is_finite() || radius_m <= 0.0 {
            return Err(OrbitError::invalid(
                "radius_m",
                format!("{radius_m} is not a positive radius"),
            ));
        }
        self.radius_m = radius_m;
        Ok(self)
    }

    pub fn period(&self) -> usize {
        self.latitude_rings as usize * self.longitude_divisions as usize
    }
}

impl PositionAllocator for PolarGridAllocator {
    type Position = GroundPosition;

    fn next_position(&mut self) -> GroundPosition {
        let colatitude = PI * (f64::from(self.ring) / f64::from(self.latitude_rings));
        let longitude = TAU * (f64::from(self.division) / f64::from(self.longitude_divisions));
        let next = GroundPosition {
            latitude_index: self.ring,
            longitude_index: self.division,
            position: spherical_to_cartesian(self.radius_m, colatitude, longitude),
        };
        debug!(
            ring = self.ring,
            division = self.division,
            "ground station at colatitude {:.4} rad, longitude {:.4} rad",
            colatitude,
            longitude
        );

        self.division = (self.division + 1) % self.longitude_divisions;
        if self.division == 0 {
            self.ring = (self.ring + 1) % self.latitude_rings;
        }

        next
    }

    fn reset(&mut self) {
        self.ring = 0;
        self.division = 0;
    }
}

impl Iterator for PolarGridAllocator {
    type Item = GroundPosition;

    fn next(&mut self) -> Option<GroundPosition> {
        Some(self.next_position())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fuzz_harness::generators::{plane_count, slot_count};
    use proptest::prelude::*;

    #[test]
    fn test_grid_order_slots_first() {
        let mut alloc = GridAllocator::new(2, 3).unwrap();
        let pairs: Vec<(u16, u16)> = alloc.by_ref().take(6).map(|a| (a.plane, a.slot)).collect();
        assert_eq!(pairs, vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]);
    }

    #[test]
    fn test_grid_angles() {
        let mut alloc = GridAllocator::new(4, 8).unwrap();
        let first = alloc.next_position();
        assert_eq!(first.plane_angle, 0.0);
        assert_eq!(first.slot_angle, 0.0);

        let second = alloc.next_position();
        assert!((second.slot_angle - TAU / 8.0).abs() < 1e-12);

        let first_of_plane_one = alloc.nth(6).unwrap();
        assert_eq!((first_of_plane_one.plane, first_of_plane_one.slot), (1, 0));
        assert!((first_of_plane_one.plane_angle - TAU / 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_grid_repeats_after_full_period() {
        let mut alloc = GridAllocator::new(3, 5).unwrap();
        let period = alloc.period();
        let first: Vec<SlotAssignment> = alloc.by_ref().take(period).collect();
        let second: Vec<SlotAssignment> = alloc.by_ref().take(15).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_grid_reset_restarts() {
        let mut alloc = GridAllocator::new(3, 5).unwrap();
        let first = alloc.next_position();
        alloc.by_ref().take(7).for_each(drop);
        alloc.reset();
        assert_eq!(alloc.next_position(), first);
    }

    #[test]
    fn test_grid_rejects_empty() {
        assert_eq!(GridAllocator::new(0, 4).unwrap_err(), OrbitError::EmptyGrid("planes"));
        assert_eq!(
            GridAllocator::new(4, 0).unwrap_err(),
            OrbitError::EmptyGrid("satellites_per_plane")
        );
    }

    #[test]
    fn test_assign_streams_is_noop() {
        let mut grid = GridAllocator::new(2, 2).unwrap();
        let mut polar = PolarGridAllocator::new(2, 2).unwrap();
        let before = grid.clone();
        assert_eq!(grid.assign_streams(42), NO_STREAMS_CONSUMED);
        assert_eq!(polar.assign_streams(7), NO_STREAMS_CONSUMED);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_polar_advances_longitude_first() {
        let mut alloc = PolarGridAllocator::new(2, 3).unwrap();
        let indices: Vec<(u32, u32)> = alloc
            .by_ref()
            .take(7)
            .map(|g| (g.latitude_index, g.longitude_index))
            .collect();
        assert_eq!(
            indices,
            vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2), (0, 0)]
        );
    }

    #[test]
    fn test_polar_positions_on_surface() {
        let mut alloc = PolarGridAllocator::new(4, 6).unwrap();
        let first = alloc.next_position();
        // ring 0 is the north pole
        assert!((first.position.z - EARTH_RADIUS_M).abs() < 1e-6);

        for ground in alloc.take(30) {
            assert!((ground.position.norm() - EARTH_RADIUS_M).abs() < 1e-6);
        }
    }

    #[test]
    fn test_polar_equator_ring() {
        let mut alloc = PolarGridAllocator::new(2, 4).unwrap();
        let equator: Vec<GroundPosition> = alloc.by_ref().skip(4).take(4).collect();
        for ground in &equator {
            assert_eq!(ground.latitude_index, 1);
            assert!(ground.position.z.abs() < 1e-6);
        }
        assert!((equator[1].position.y - EARTH_RADIUS_M).abs() < 1e-6);
    }

    #[test]
    fn test_polar_rejects_empty_and_bad_radius() {
        assert!(PolarGridAllocator::new(0, 3).is_err());
        assert!(PolarGridAllocator::new(3, 0).is_err());
        assert!(PolarGridAllocator::new(3, 3).unwrap().with_radius(-1.0).is_err());
    }

    proptest! {
        #[test]
        fn fuzz_grid_cyclic(planes in plane_count(), sats in slot_count(), extra in 0usize..50) {
            let mut alloc = GridAllocator::new(planes, sats).unwrap();
            let period = alloc.period();
            let first: Vec<SlotAssignment> = alloc.by_ref().take(period + extra).collect();
            for (i, assignment) in first.iter().enumerate().skip(period) {
                prop_assert_eq!(assignment, &first[i - period]);
            }
        }

        #[test]
        fn fuzz_grid_covers_every_pair_once(planes in plane_count(), sats in slot_count()) {
            let mut alloc = GridAllocator::new(planes, sats).unwrap();
            let period = alloc.period();
            let mut seen: Vec<(u16, u16)> = alloc.by_ref().take(period).map(|a| (a.plane, a.slot)).collect();
            seen.sort_unstable();
            seen.dedup();
            prop_assert_eq!(seen.len(), usize::from(planes) * usize::from(sats));
        }
    }
}
