//! Course-change notification
//!
//! Registered observers hear about every node whose cached mobility state
//! moved to a new sampling instant.

use crate::node::NodeId;
use leo_orbit::{Kinematics, SimTime};
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::trace;

pub trait CourseChangeObserver: Send {
    fn course_changed(&mut self, node: NodeId, at: SimTime, kinematics: &Kinematics);
}

impl<F> CourseChangeObserver for F
where
    F: FnMut(NodeId, SimTime, &Kinematics) + Send,
{
    fn course_changed(&mut self, node: NodeId, at: SimTime, kinematics: &Kinematics) {
        self(node, at, kinematics)
    }
}

/// Logs every course change at trace level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl CourseChangeObserver for TracingObserver {
    fn course_changed(&mut self, node: NodeId, at: SimTime, kinematics: &Kinematics) {
        trace!(
            node = node.0,
            at_ms = at.num_milliseconds(),
            "course change: position {:?} velocity {:?}",
            kinematics.position,
            kinematics.velocity
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CourseChange {
    pub node: NodeId,
    pub at_ms: i64,
    pub kinematics: Kinematics,
}

/// Shared record of course changes.
///
/// Clones share one buffer, so a clone handed to the registry can be read
/// back through the original.
#[derive(Debug, Default, Clone)]
pub struct CourseChangeLog {
    entries: Arc<Mutex<Vec<CourseChange>>>,
}

impl CourseChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<CourseChange> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    pub fn len(&self) -> usize {
        match self.entries.lock() {
            Ok(entries) => entries.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Changes reported for one node, oldest first
    pub fn for_node(&self, node: NodeId) -> Vec<CourseChange> {
        self.entries()
            .into_iter()
            .filter(|change| change.node == node)
            .collect()
    }
}

impl CourseChangeObserver for CourseChangeLog {
    fn course_changed(&mut self, node: NodeId, at: SimTime, kinematics: &Kinematics) {
        let change = CourseChange {
            node,
            at_ms: at.num_milliseconds(),
            kinematics: *kinematics,
        };
        match self.entries.lock() {
            Ok(mut entries) => entries.push(change),
            Err(poisoned) => poisoned.into_inner().push(change),
        }
    }
}

/// Counts course changes without keeping them.
///
/// Clones share the count, like [`CourseChangeLog`].
#[derive(Debug, Default, Clone)]
pub struct CourseChangeCounter {
    count: Arc<AtomicUsize>,
}

impl CourseChangeCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }
}

impl CourseChangeObserver for CourseChangeCounter {
    fn course_changed(&mut self, _node: NodeId, _at: SimTime, _kinematics: &Kinematics) {
        self.count.fetch_add(1, Ordering::Relaxed);
    }
}
