//! LEO Orbit Library
//!
//! Idealized circular-orbit propagation, orbit-plane/slot allocation and
//! ground-station grids for LEO constellations around a spherical earth.
//!
//! Positions are earth-centered Cartesian metres, velocities m/s. Orbit
//! altitudes are configured in kilometres above the mean earth sphere.

use thiserror::Error;

pub mod allocator;
pub mod constants;
pub mod geo;
pub mod mobility;
pub mod orbit;
pub mod propagator;
pub mod time;

pub use allocator::{GridAllocator, PolarGridAllocator, PositionAllocator, SlotAssignment};
pub use geo::{GroundPosition, LatLong};
pub use mobility::{
    ConstantPosition, GroundVehicleMobility, Kinematics, Mobility, MobilityModel, Sample,
};
pub use orbit::OrbitDescriptor;
pub use propagator::{CircularOrbit, CircularOrbitMobility, SatelliteState};
pub use time::SimTime;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrbitError {
    #[error("Invalid parameter {parameter}: {reason}")]
    InvalidParameter {
        parameter: &'static str,
        reason: String,
    },
    #[error("Invalid grid size {0}: must be at least 1")]
    EmptyGrid(&'static str),
    #[error("Invalid orbit '{0}': expected altitude_km:inclination_deg:planes:satellites")]
    MalformedOrbit(String),
    #[error("Invalid coordinates '{0}': expected latitude:longitude")]
    MalformedLatLong(String),
}

pub type Result<T> = std::result::Result<T, OrbitError>;

impl OrbitError {
    pub(crate) fn invalid(parameter: &'static str, reason: impl Into<String>) -> Self {
        OrbitError::InvalidParameter {
            parameter,
            reason: reason.into(),
        }
    }
}
