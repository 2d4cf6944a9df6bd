//! Nodes of a constellation topology

use leo_orbit::Mobility;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a node in its [`NodeRegistry`](crate::NodeRegistry)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    Satellite { shell: u16, plane: u16, slot: u16 },
    GroundStation,
}

impl NodeKind {
    pub fn is_satellite(&self) -> bool {
        matches!(self, NodeKind::Satellite { .. })
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub mobility: Mobility,
}

impl Node {
    pub fn is_satellite(&self) -> bool {
        self.kind.is_satellite()
    }
}
