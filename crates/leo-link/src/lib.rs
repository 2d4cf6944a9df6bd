//! LEO Link Library
//!
//! Decides whether two nodes can exchange a signal:
//! - [`visibility`]: is the straight line between two points blocked by the earth
//! - [`elevation`]: angle of a remote point above an observer's local horizon
//! - [`model`]: inter-satellite and ground/satellite received power
//! - [`presets`]: published Ka/Ku-band link budgets for commercial constellations

use thiserror::Error;

pub mod elevation;
pub mod model;
pub mod params;
pub mod presets;
pub mod visibility;

pub use elevation::{elevation_angle, elevation_angle_deg};
pub use model::{GroundLinkLossModel, IslLossModel, LinkEndpoint, LinkModel, PropagationLossModel};
pub use params::{LinkBudgetParameters, DEFAULT_ELEVATION_THRESHOLD_DEG, OCCLUSION_SENTINEL_DBM};
pub use presets::{LinkPreset, PresetProfile};
pub use visibility::{is_visible, line_of_sight, VisibilityResult};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LinkError {
    #[error("Invalid link parameter {parameter}: {reason}")]
    InvalidParameter {
        parameter: &'static str,
        reason: String,
    },
    #[error("Unknown link preset '{0}'")]
    UnknownPreset(String),
}

pub type Result<T> = std::result::Result<T, LinkError>;
