//! Node container
//!
//! Nodes are stored densely and addressed by [`NodeId`] in insertion order.
//! Lookups past the end are an error, never a wrap-around.

use crate::node::{Node, NodeId, NodeKind};
use crate::observer::CourseChangeObserver;
use crate::{Result, TopologyError};
use leo_orbit::{Kinematics, Mobility, MobilityModel, SimTime};
use std::fmt;
use std::ops::Index;
use tracing::debug;

#[derive(Default)]
pub struct NodeRegistry {
    nodes: Vec<Node>,
    observers: Vec<Box<dyn CourseChangeObserver>>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, kind: NodeKind, mobility: impl Into<Mobility>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            id,
            kind,
            mobility: mobility.into(),
        });
        id
    }

    pub fn get(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id.index()).ok_or(TopologyError::NodeOutOfRange {
            id,
            len: self.nodes.len(),
        })
    }

    fn get_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        let len = self.nodes.len();
        self.nodes
            .get_mut(id.index())
            .ok_or(TopologyError::NodeOutOfRange { id, len })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().map(|node| node.id)
    }

    pub fn satellites(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|node| node.is_satellite())
    }

    pub fn ground_stations(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|node| !node.is_satellite())
    }

    pub fn subscribe(&mut self, observer: Box<dyn CourseChangeObserver>) {
        self.observers.push(observer);
    }

    /// Position and velocity of `id` at `now`.
    ///
    /// Refreshes the node's cached mobility state if `now` falls in a new
    /// sampling interval and notifies observers when it does.
    pub fn state(&mut self, id: NodeId, now: SimTime) -> Result<Kinematics> {
        let sample = self.get_mut(id)?.mobility.sample(now);
        if sample.refreshed {
            for observer in &mut self.observers {
                observer.course_changed(id, now, &sample.kinematics);
            }
        }
        Ok(sample.kinematics)
    }

    /// State of every node at `now`, indexed like the registry
    pub fn snapshot(&mut self, now: SimTime) -> Vec<Kinematics> {
        let mut refreshed = 0usize;
        let mut states = Vec::with_capacity(self.nodes.len());
        for node in &mut self.nodes {
            let sample = node.mobility.sample(now);
            if sample.refreshed {
                refreshed += 1;
                for observer in &mut self.observers {
                    observer.course_changed(node.id, now, &sample.kinematics);
                }
            }
            states.push(sample.kinematics);
        }
        debug!(
            nodes = states.len(),
            refreshed,
            "snapshot at {}ms",
            now.num_milliseconds()
        );
        states
    }
}

impl Index<NodeId> for NodeRegistry {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        match self.nodes.get(id.index()) {
            Some(node) => node,
            None => panic!(
                "node {id} out of range: registry holds {} nodes",
                self.nodes.len()
            ),
        }
    }
}

impl fmt::Debug for NodeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRegistry")
            .field("nodes", &self.nodes.len())
            .field("satellites", &self.satellites().count())
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::CourseChangeLog;
    use leo_orbit::{
        CircularOrbitMobility, ConstantPosition, LatLong, OrbitDescriptor, SlotAssignment,
    };

    fn satellite() -> CircularOrbitMobility {
        let orbit = OrbitDescriptor::from_degrees(550.0, 53.0, 1, 1).unwrap();
        let slot = SlotAssignment {
            plane: 0,
            slot: 0,
            plane_angle: 0.0,
            slot_angle: 0.0,
        };
        CircularOrbitMobility::new(&orbit, slot)
    }

    fn registry() -> NodeRegistry {
        let mut registry = NodeRegistry::new();
        registry.add(
            NodeKind::Satellite {
                shell: 0,
                plane: 0,
                slot: 0,
            },
            satellite(),
        );
        registry.add(
            NodeKind::GroundStation,
            ConstantPosition::at(LatLong::new(10.0, 20.0).unwrap()),
        );
        registry
    }

    #[test]
    fn test_ids_follow_insertion_order() {
        let registry = registry();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.ids().collect::<Vec<_>>(), vec![NodeId(0), NodeId(1)]);
        assert!(registry[NodeId(0)].is_satellite());
        assert!(!registry[NodeId(1)].is_satellite());
        assert_eq!(registry.satellites().count(), 1);
        assert_eq!(registry.ground_stations().count(), 1);
    }

    #[test]
    fn test_out_of_range_lookup_is_error() {
        let mut registry = registry();
        assert!(matches!(
            registry.get(NodeId(2)),
            Err(TopologyError::NodeOutOfRange { id: NodeId(2), len: 2 })
        ));
        assert!(registry.state(NodeId(7), SimTime::zero()).is_err());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_out_of_range_index_panics() {
        let registry = registry();
        let _ = &registry[NodeId(2)];
    }

    #[test]
    fn test_refresh_notifies_observers() {
        let mut registry = registry();
        let log = CourseChangeLog::new();
        registry.subscribe(Box::new(log.clone()));

        registry.state(NodeId(0), SimTime::milliseconds(500)).unwrap();
        assert!(log.is_empty(), "still inside the epoch sample");

        let k = registry.state(NodeId(0), SimTime::milliseconds(1500)).unwrap();
        let changes = log.entries();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].node, NodeId(0));
        assert_eq!(changes[0].kinematics, k);

        // ground stations never move
        registry.state(NodeId(1), SimTime::seconds(100)).unwrap();
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_snapshot_covers_every_node() {
        let mut registry = registry();
        let log = CourseChangeLog::new();
        registry.subscribe(Box::new(log.clone()));
        let states = registry.snapshot(SimTime::seconds(10));
        assert_eq!(states.len(), 2);
        assert_eq!(log.for_node(NodeId(0)).len(), 1);
        assert!(log.for_node(NodeId(1)).is_empty());
    }
}
