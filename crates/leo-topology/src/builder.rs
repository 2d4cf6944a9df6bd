//! Topology construction
//!
//! Seeds satellites shell by shell through a [`GridAllocator`] and ground
//! stations through a [`PolarGridAllocator`] or explicit coordinates.

use crate::node::{NodeId, NodeKind};
use crate::registry::NodeRegistry;
use crate::{Result, TopologyError};
use leo_orbit::{
    CircularOrbit, CircularOrbitMobility, ConstantPosition, GridAllocator, GroundVehicleMobility,
    LatLong, OrbitDescriptor, PolarGridAllocator, PositionAllocator, SimTime,
};
use tracing::{debug, info};

#[derive(Debug)]
pub struct TopologyBuilder {
    precision: SimTime,
    retrograde: bool,
    shells: u16,
    registry: NodeRegistry,
}

impl Default for TopologyBuilder {
    fn default() -> Self {
        Self {
            precision: CircularOrbitMobility::default_precision(),
            retrograde: false,
            shells: 0,
            registry: NodeRegistry::new(),
        }
    }
}

impl TopologyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sampling interval for every node added afterwards; zero means exact
    pub fn precision(mut self, precision: SimTime) -> Result<Self> {
        if precision < SimTime::zero() {
            return Err(TopologyError::InvalidParameter {
                parameter: "precision",
                reason: format!("{precision} is negative"),
            });
        }
        self.precision = precision;
        Ok(self)
    }

    /// Satellites of shells added afterwards travel retrograde
    pub fn retrograde(mut self, retrograde: bool) -> Self {
        self.retrograde = retrograde;
        self
    }

    /// Add one satellite per plane/slot of `orbit`
    pub fn add_orbit(&mut self, orbit: &OrbitDescriptor) -> Result<Vec<NodeId>> {
        let shell = self.shells;
        let mut alloc = GridAllocator::for_orbit(orbit);
        let mut ids = Vec::with_capacity(alloc.period());

        for _ in 0..alloc.period() {
            let assignment = alloc.next_position();
            let mut circular = CircularOrbit::new(orbit, &assignment);
            if self.retrograde {
                circular = circular.retrograde();
            }
            let mobility =
                CircularOrbitMobility::from_orbit(circular, assignment).with_precision(self.precision)?;
            let kind = NodeKind::Satellite {
                shell,
                plane: assignment.plane,
                slot: assignment.slot,
            };
            ids.push(self.registry.add(kind, mobility));
        }

        self.shells += 1;
        info!(
            shell,
            satellites = ids.len(),
            "added orbit shell {} ({:.1} min period)",
            orbit,
            orbit.period_s() / 60.0
        );
        Ok(ids)
    }

    pub fn add_orbits(&mut self, orbits: &[OrbitDescriptor]) -> Result<Vec<NodeId>> {
        let mut ids = Vec::new();
        for orbit in orbits {
            ids.extend(self.add_orbit(orbit)?);
        }
        Ok(ids)
    }

    /// Add one ground station per ring/division of a polar grid
    pub fn add_ground_grid(&mut self, latitude_rings: u32, longitude_divisions: u32) -> Result<Vec<NodeId>> {
        let mut alloc = PolarGridAllocator::new(latitude_rings, longitude_divisions)?;
        let ids: Vec<NodeId> = (0..alloc.period())
            .map(|_| {
                let ground = alloc.next_position();
                self.registry
                    .add(NodeKind::GroundStation, ConstantPosition::new(ground.position))
            })
            .collect();
        info!(
            stations = ids.len(),
            "added {}x{} ground grid", latitude_rings, longitude_divisions
        );
        Ok(ids)
    }

    pub fn add_ground_station(&mut self, location: LatLong) -> NodeId {
        let id = self
            .registry
            .add(NodeKind::GroundStation, ConstantPosition::at(location));
        debug!(node = id.0, "ground station at {}", location);
        id
    }

    /// Ground node moving along a great circle; `speed` in m/s,
    /// `azimuth_deg` clockwise from north, `altitude_m` above the sphere
    pub fn add_ground_vehicle(
        &mut self,
        start: LatLong,
        altitude_m: f64,
        speed: f64,
        azimuth_deg: f64,
    ) -> Result<NodeId> {
        let mobility = GroundVehicleMobility::new(start, altitude_m, speed, azimuth_deg)?
            .with_precision(self.precision)?;
        let id = self.registry.add(NodeKind::GroundStation, mobility);
        debug!(node = id.0, speed, azimuth_deg, "ground vehicle from {}", start);
        Ok(id)
    }

    pub fn build(self) -> NodeRegistry {
        info!(
            nodes = self.registry.len(),
            satellites = self.registry.satellites().count(),
            ground = self.registry.ground_stations().count(),
            shells = self.shells,
            "topology built"
        );
        self.registry
    }
}
