//! Link budget parameters
//!
//! One [`LinkBudgetParameters`] per link type. In configuration it is an
//! object with any subset of the fields, optionally with `"preset": "<name>"`
//! naming a [`LinkPreset`](crate::presets::LinkPreset) as the base that the
//! other fields override.

use crate::presets::LinkPreset;
use crate::{LinkError, Result};
use serde::{Deserialize, Serialize};

/// Received power reported when a link is blocked (dBm)
pub const OCCLUSION_SENTINEL_DBM: f64 = -1000.0;

/// Minimum elevation of a ground link (degrees)
pub const DEFAULT_ELEVATION_THRESHOLD_DEG: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LinkSpec", into = "LinkFields")]
pub struct LinkBudgetParameters {
    elevation_threshold_deg: f64,
    atmospheric_loss_db: f64,
    free_space_path_loss_db: f64,
    link_margin_db: f64,
    occlusion_sentinel_dbm: f64,
}

impl Default for LinkBudgetParameters {
    fn default() -> Self {
        Self {
            elevation_threshold_deg: DEFAULT_ELEVATION_THRESHOLD_DEG,
            atmospheric_loss_db: 0.0,
            free_space_path_loss_db: 0.0,
            link_margin_db: 0.0,
            occlusion_sentinel_dbm: OCCLUSION_SENTINEL_DBM,
        }
    }
}

impl LinkBudgetParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_elevation_threshold_deg(mut self, degrees: f64) -> Result<Self> {
        if !degrees.is_finite() || !(0.0..=90.0).contains(&degrees) {
            return Err(invalid(
                "elevation_threshold_deg",
                format!("{degrees} is outside [0, 90] degrees"),
            ));
        }
        self.elevation_threshold_deg = degrees;
        Ok(self)
    }

    pub fn with_atmospheric_loss_db(mut self, db: f64) -> Result<Self> {
        self.atmospheric_loss_db = finite("atmospheric_loss_db", db)?;
        Ok(self)
    }

    pub fn with_free_space_path_loss_db(mut self, db: f64) -> Result<Self> {
        self.free_space_path_loss_db = finite("free_space_path_loss_db", db)?;
        Ok(self)
    }

    pub fn with_link_margin_db(mut self, db: f64) -> Result<Self> {
        self.link_margin_db = finite("link_margin_db", db)?;
        Ok(self)
    }

    pub fn with_occlusion_sentinel_dbm(mut self, dbm: f64) -> Result<Self> {
        self.occlusion_sentinel_dbm = finite("occlusion_sentinel_dbm", dbm)?;
        Ok(self)
    }

    /// Figures from a published link budget, assumed in range
    pub(crate) fn from_published(
        elevation_threshold_deg: f64,
        atmospheric_loss_db: f64,
        free_space_path_loss_db: f64,
        link_margin_db: f64,
    ) -> Self {
        Self {
            elevation_threshold_deg,
            atmospheric_loss_db,
            free_space_path_loss_db,
            link_margin_db,
            occlusion_sentinel_dbm: OCCLUSION_SENTINEL_DBM,
        }
    }

    pub fn elevation_threshold_deg(&self) -> f64 {
        self.elevation_threshold_deg
    }

    pub fn elevation_threshold_rad(&self) -> f64 {
        self.elevation_threshold_deg.to_radians()
    }

    pub fn atmospheric_loss_db(&self) -> f64 {
        self.atmospheric_loss_db
    }

    pub fn free_space_path_loss_db(&self) -> f64 {
        self.free_space_path_loss_db
    }

    pub fn link_margin_db(&self) -> f64 {
        self.link_margin_db
    }

    pub fn occlusion_sentinel_dbm(&self) -> f64 {
        self.occlusion_sentinel_dbm
    }

    /// Sum of the configured losses (dB)
    pub fn total_loss_db(&self) -> f64 {
        self.free_space_path_loss_db + self.atmospheric_loss_db + self.link_margin_db
    }
}

fn invalid(parameter: &'static str, reason: String) -> LinkError {
    LinkError::InvalidParameter { parameter, reason }
}

fn finite(parameter: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(invalid(parameter, format!("{value} is not finite")))
    }
}

/// Configuration form: an optional preset with per-field overrides
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LinkSpec {
    preset: Option<LinkPreset>,
    elevation_threshold_deg: Option<f64>,
    atmospheric_loss_db: Option<f64>,
    free_space_path_loss_db: Option<f64>,
    link_margin_db: Option<f64>,
    occlusion_sentinel_dbm: Option<f64>,
}

/// Serialized form, always every field
#[derive(Debug, Clone, Serialize)]
struct LinkFields {
    elevation_threshold_deg: f64,
    atmospheric_loss_db: f64,
    free_space_path_loss_db: f64,
    link_margin_db: f64,
    occlusion_sentinel_dbm: f64,
}

impl From<LinkBudgetParameters> for LinkFields {
    fn from(params: LinkBudgetParameters) -> Self {
        Self {
            elevation_threshold_deg: params.elevation_threshold_deg,
            atmospheric_loss_db: params.atmospheric_loss_db,
            free_space_path_loss_db: params.free_space_path_loss_db,
            link_margin_db: params.link_margin_db,
            occlusion_sentinel_dbm: params.occlusion_sentinel_dbm,
        }
    }
}

impl TryFrom<LinkSpec> for LinkBudgetParameters {
    type Error = LinkError;

    fn try_from(spec: LinkSpec) -> Result<Self> {
        let mut params = spec
            .preset
            .map(|preset| preset.parameters())
            .unwrap_or_default();
        if let Some(degrees) = spec.elevation_threshold_deg {
            params = params.with_elevation_threshold_deg(degrees)?;
        }
        if let Some(db) = spec.atmospheric_loss_db {
            params = params.with_atmospheric_loss_db(db)?;
        }
        if let Some(db) = spec.free_space_path_loss_db {
            params = params.with_free_space_path_loss_db(db)?;
        }
        if let Some(db) = spec.link_margin_db {
            params = params.with_link_margin_db(db)?;
        }
        if let Some(dbm) = spec.occlusion_sentinel_dbm {
            params = params.with_occlusion_sentinel_dbm(dbm)?;
        }
        Ok(params)
    }
}
