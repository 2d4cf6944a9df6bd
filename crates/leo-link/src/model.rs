//! Propagation loss models
//!
//! Both models are stateless: every query is answered from the two endpoint
//! positions and the configured [`LinkBudgetParameters`] alone.
//!
//! The two link types deliberately differ. Inter-satellite links only check
//! earth occlusion and pass the transmit power through unchanged. Ground links
//! check the elevation cutoff and subtract the configured losses.

use crate::elevation::elevation_angle;
use crate::params::LinkBudgetParameters;
use crate::visibility::line_of_sight;
use leo_orbit::allocator::NO_STREAMS_CONSUMED;
use leo_orbit::Kinematics;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One end of a link at the instant of transmission
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkEndpoint {
    pub position: Vector3<f64>,
    pub velocity: Option<Vector3<f64>>,
}

impl LinkEndpoint {
    pub fn distance_to(&self, other: &LinkEndpoint) -> f64 {
        (self.position - other.position).norm()
    }
}

impl From<Vector3<f64>> for LinkEndpoint {
    fn from(position: Vector3<f64>) -> Self {
        Self {
            position,
            velocity: None,
        }
    }
}

impl From<Kinematics> for LinkEndpoint {
    fn from(k: Kinematics) -> Self {
        Self {
            position: k.position,
            velocity: Some(k.velocity),
        }
    }
}

pub trait PropagationLossModel {
    /// Received power in dBm for a transmission from `a` to `b`
    fn received_power(&self, tx_power_dbm: f64, a: &LinkEndpoint, b: &LinkEndpoint) -> f64;

    /// Power reported for a blocked link
    fn occlusion_sentinel_dbm(&self) -> f64;

    fn is_blocked(&self, tx_power_dbm: f64, a: &LinkEndpoint, b: &LinkEndpoint) -> bool {
        self.received_power(tx_power_dbm, a, b) <= self.occlusion_sentinel_dbm()
    }

    /// Random stream hookup; these models draw nothing
    fn assign_streams(&mut self, _first_stream: u64) -> u64 {
        NO_STREAMS_CONSUMED
    }
}

/// Inter-satellite link: earth occlusion only
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IslLossModel {
    pub params: LinkBudgetParameters,
}

impl IslLossModel {
    pub fn new(params: LinkBudgetParameters) -> Self {
        Self { params }
    }
}

impl PropagationLossModel for IslLossModel {
    fn received_power(&self, tx_power_dbm: f64, a: &LinkEndpoint, b: &LinkEndpoint) -> f64 {
        let visibility = line_of_sight(&a.position, &b.position);
        if !visibility.line_of_sight {
            debug!(
                distance = a.distance_to(b),
                "ISL blocked by earth: {:?} -> {:?}", a.position, b.position
            );
            return self.params.occlusion_sentinel_dbm();
        }
        tx_power_dbm
    }

    fn occlusion_sentinel_dbm(&self) -> f64 {
        self.params.occlusion_sentinel_dbm()
    }
}

/// Ground/satellite link: elevation cutoff, then fixed losses
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GroundLinkLossModel {
    pub params: LinkBudgetParameters,
}

impl GroundLinkLossModel {
    pub fn new(params: LinkBudgetParameters) -> Self {
        Self { params }
    }

    /// Elevation of the link seen from the lower endpoint (degrees)
    pub fn elevation_deg(&self, a: &LinkEndpoint, b: &LinkEndpoint) -> f64 {
        elevation_angle(&a.position, &b.position).to_degrees()
    }

    pub fn above_cutoff(&self, a: &LinkEndpoint, b: &LinkEndpoint) -> bool {
        elevation_angle(&a.position, &b.position) >= self.params.elevation_threshold_rad()
    }
}

impl PropagationLossModel for GroundLinkLossModel {
    fn received_power(&self, tx_power_dbm: f64, a: &LinkEndpoint, b: &LinkEndpoint) -> f64 {
        let elevation = elevation_angle(&a.position, &b.position);
        if elevation < self.params.elevation_threshold_rad() {
            debug!(
                elevation_deg = elevation.to_degrees(),
                threshold_deg = self.params.elevation_threshold_deg(),
                distance = a.distance_to(b),
                "ground link below elevation cutoff"
            );
            return self.params.occlusion_sentinel_dbm();
        }

        let rx = tx_power_dbm
            - self.params.free_space_path_loss_db()
            - self.params.atmospheric_loss_db()
            - self.params.link_margin_db();
        debug!(
            elevation_deg = elevation.to_degrees(),
            distance = a.distance_to(b),
            rx_dbm = rx,
            "ground link"
        );
        rx
    }

    fn occlusion_sentinel_dbm(&self) -> f64 {
        self.params.occlusion_sentinel_dbm()
    }
}

/// Either link model, chosen per node pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LinkModel {
    Isl(IslLossModel),
    Ground(GroundLinkLossModel),
}

impl LinkModel {
    pub fn params(&self) -> &LinkBudgetParameters {
        match self {
            LinkModel::Isl(model) => &model.params,
            LinkModel::Ground(model) => &model.params,
        }
    }
}

impl PropagationLossModel for LinkModel {
    fn received_power(&self, tx_power_dbm: f64, a: &LinkEndpoint, b: &LinkEndpoint) -> f64 {
        match self {
            LinkModel::Isl(model) => model.received_power(tx_power_dbm, a, b),
            LinkModel::Ground(model) => model.received_power(tx_power_dbm, a, b),
        }
    }

    fn occlusion_sentinel_dbm(&self) -> f64 {
        self.params().occlusion_sentinel_dbm()
    }
}
