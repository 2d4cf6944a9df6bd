//! LEO Topology Library
//!
//! Glue that turns orbit shells and ground sites into a set of nodes and
//! answers pairwise link queries at a simulated instant.
//!
//! ```text
//! ScenarioConfig ──▶ TopologyBuilder ──▶ NodeRegistry ──▶ Connectivity
//!                                             ▲
//!                         EventQueue ─────────┘ (periodic refresh)
//! ```

use leo_link::LinkError;
use leo_orbit::{OrbitError, SimTime};
use thiserror::Error;

pub mod builder;
pub mod config;
pub mod connectivity;
pub mod node;
pub mod observer;
pub mod registry;
pub mod scheduler;

pub use builder::TopologyBuilder;
pub use config::{GroundGrid, GroundVehicleConfig, Scenario, ScenarioConfig};
pub use connectivity::{Connectivity, LinkKind, LinkRecord};
pub use node::{Node, NodeId, NodeKind};
pub use observer::{
    CourseChange, CourseChangeCounter, CourseChangeLog, CourseChangeObserver, TracingObserver,
};
pub use registry::NodeRegistry;
pub use scheduler::{EventQueue, Scheduler};

#[derive(Error, Debug)]
pub enum TopologyError {
    #[error("Orbit error: {0}")]
    Orbit(#[from] OrbitError),
    #[error("Link error: {0}")]
    Link(#[from] LinkError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Node {id} out of range: registry holds {len} nodes")]
    NodeOutOfRange { id: NodeId, len: usize },
    #[error("Cannot schedule at {at} before current time {now}")]
    SchedulePast { at: SimTime, now: SimTime },
    #[error("Invalid scenario parameter {parameter}: {reason}")]
    InvalidParameter {
        parameter: &'static str,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, TopologyError>;
