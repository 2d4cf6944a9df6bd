//! Pairwise link queries over a [`NodeRegistry`]
//!
//! Satellite pairs use the inter-satellite model; any pair with a ground node
//! uses the ground link model. Ground-to-ground pairs are not links.

use crate::node::NodeId;
use crate::registry::NodeRegistry;
use crate::Result;
use leo_link::{
    elevation_angle_deg, line_of_sight, GroundLinkLossModel, IslLossModel, LinkBudgetParameters,
    LinkEndpoint, LinkModel, PropagationLossModel,
};
use leo_orbit::{Kinematics, SimTime};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    Isl,
    Ground,
}

/// One candidate link at a simulated instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub a: NodeId,
    pub b: NodeId,
    pub kind: LinkKind,
    pub distance_m: f64,
    /// Elevation seen from the lower endpoint, ground links only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elevation_deg: Option<f64>,
    pub received_power_dbm: f64,
    pub up: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Connectivity {
    pub isl: IslLossModel,
    pub ground_link: GroundLinkLossModel,
}

impl Connectivity {
    pub fn new(isl: LinkBudgetParameters, ground_link: LinkBudgetParameters) -> Self {
        Self {
            isl: IslLossModel::new(isl),
            ground_link: GroundLinkLossModel::new(ground_link),
        }
    }

    /// Model governing the link between `a` and `b`, `None` for two ground nodes
    pub fn model_for(&self, registry: &NodeRegistry, a: NodeId, b: NodeId) -> Result<Option<LinkModel>> {
        let a_sat = registry.get(a)?.is_satellite();
        let b_sat = registry.get(b)?.is_satellite();
        Ok(match (a_sat, b_sat) {
            (true, true) => Some(LinkModel::Isl(self.isl)),
            (false, false) => None,
            _ => Some(LinkModel::Ground(self.ground_link)),
        })
    }

    pub fn is_visible(&self, registry: &mut NodeRegistry, a: NodeId, b: NodeId, now: SimTime) -> Result<bool> {
        let Some(model) = self.model_for(registry, a, b)? else {
            return Ok(false);
        };
        let ka = registry.state(a, now)?;
        let kb = registry.state(b, now)?;
        Ok(match model {
            LinkModel::Isl(_) => line_of_sight(&ka.position, &kb.position).line_of_sight,
            LinkModel::Ground(ground) => ground.above_cutoff(&ka.into(), &kb.into()),
        })
    }

    /// Received power at `b` for `tx_power_dbm` sent from `a`; the occlusion
    /// sentinel for blocked links and for ground-to-ground pairs
    pub fn received_power(
        &self,
        registry: &mut NodeRegistry,
        tx_power_dbm: f64,
        a: NodeId,
        b: NodeId,
        now: SimTime,
    ) -> Result<f64> {
        let Some(model) = self.model_for(registry, a, b)? else {
            return Ok(self.ground_link.occlusion_sentinel_dbm());
        };
        let ka = LinkEndpoint::from(registry.state(a, now)?);
        let kb = LinkEndpoint::from(registry.state(b, now)?);
        Ok(model.received_power(tx_power_dbm, &ka, &kb))
    }

    /// Every satellite/satellite and ground/satellite pair at `now`
    pub fn link_report(
        &self,
        registry: &mut NodeRegistry,
        tx_power_dbm: f64,
        now: SimTime,
    ) -> Vec<LinkRecord> {
        let states = registry.snapshot(now);
        let satellite: Vec<bool> = registry.iter().map(|node| node.is_satellite()).collect();
        let mut records = Vec::new();

        for i in 0..states.len() {
            for j in (i + 1)..states.len() {
                let kind = match (satellite[i], satellite[j]) {
                    (true, true) => LinkKind::Isl,
                    (false, false) => continue,
                    _ => LinkKind::Ground,
                };
                records.push(self.record(
                    kind,
                    (NodeId(i as u32), states[i]),
                    (NodeId(j as u32), states[j]),
                    tx_power_dbm,
                ));
            }
        }

        let up = records.iter().filter(|r| r.up).count();
        info!(
            links = records.len(),
            up,
            "link report at {:.1}s",
            now.num_milliseconds() as f64 / 1000.0
        );
        records
    }

    fn record(
        &self,
        kind: LinkKind,
        (a, ka): (NodeId, Kinematics),
        (b, kb): (NodeId, Kinematics),
        tx_power_dbm: f64,
    ) -> LinkRecord {
        let ea = LinkEndpoint::from(ka);
        let eb = LinkEndpoint::from(kb);
        let (model, elevation_deg): (&dyn PropagationLossModel, Option<f64>) = match kind {
            LinkKind::Isl => (&self.isl, None),
            LinkKind::Ground => (
                &self.ground_link,
                Some(elevation_angle_deg(&ka.position, &kb.position)),
            ),
        };
        let received_power_dbm = model.received_power(tx_power_dbm, &ea, &eb);
        LinkRecord {
            a,
            b,
            kind,
            distance_m: ea.distance_to(&eb),
            elevation_deg,
            received_power_dbm,
            up: received_power_dbm > model.occlusion_sentinel_dbm(),
        }
    }
}
