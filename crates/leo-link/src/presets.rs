//! Published constellation link budgets
//!
//! Ka-band gateway and Ku-band user link figures for Starlink, OneWeb and
//! Telesat as filed with the regulators. EIRP is the transmit power to use
//! with the matching [`LinkBudgetParameters`].

use crate::params::LinkBudgetParameters;
use crate::{LinkError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkPreset {
    StarlinkGateway,
    StarlinkUser,
    OnewebGateway,
    OnewebUser,
    TelesatGateway,
    TelesatUser,
}

/// Figures of one published link
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PresetProfile {
    pub eirp_dbm: f64,
    pub frequency_ghz: f64,
    pub rx_antenna_gain_dbi: f64,
    pub data_rate_mbps: f64,
    pub elevation_threshold_deg: f64,
    pub free_space_path_loss_db: f64,
    pub atmospheric_loss_db: f64,
    pub link_margin_db: f64,
}

impl LinkPreset {
    pub const ALL: [LinkPreset; 6] = [
        LinkPreset::StarlinkGateway,
        LinkPreset::StarlinkUser,
        LinkPreset::OnewebGateway,
        LinkPreset::OnewebUser,
        LinkPreset::TelesatGateway,
        LinkPreset::TelesatUser,
    ];

    pub fn profile(&self) -> PresetProfile {
        match self {
            LinkPreset::StarlinkGateway => PresetProfile {
                eirp_dbm: 98.4,
                frequency_ghz: 28.5,
                rx_antenna_gain_dbi: 40.9,
                data_rate_mbps: 2682.1,
                elevation_threshold_deg: 40.0,
                free_space_path_loss_db: 186.1,
                atmospheric_loss_db: 2.9,
                link_margin_db: 1.02,
            },
            LinkPreset::StarlinkUser => PresetProfile {
                eirp_dbm: 66.7,
                frequency_ghz: 13.5,
                rx_antenna_gain_dbi: 37.7,
                data_rate_mbps: 674.3,
                elevation_threshold_deg: 40.0,
                free_space_path_loss_db: 179.6,
                atmospheric_loss_db: 0.53,
                link_margin_db: 0.82,
            },
            LinkPreset::OnewebGateway => PresetProfile {
                eirp_dbm: 93.2,
                frequency_ghz: 28.5,
                rx_antenna_gain_dbi: 37.8,
                data_rate_mbps: 1341.1,
                elevation_threshold_deg: 55.0,
                free_space_path_loss_db: 185.1,
                atmospheric_loss_db: 2.3,
                link_margin_db: 1.03,
            },
            LinkPreset::OnewebUser => PresetProfile {
                eirp_dbm: 36.0,
                frequency_ghz: 18.5,
                rx_antenna_gain_dbi: 43.5,
                data_rate_mbps: 558.7,
                elevation_threshold_deg: 20.0,
                free_space_path_loss_db: 185.5,
                atmospheric_loss_db: 2.0,
                link_margin_db: 0.85,
            },
            LinkPreset::TelesatGateway => PresetProfile {
                eirp_dbm: 105.9,
                frequency_ghz: 28.5,
                rx_antenna_gain_dbi: 31.8,
                data_rate_mbps: 9857.1,
                elevation_threshold_deg: 20.0,
                free_space_path_loss_db: 189.3,
                atmospheric_loss_db: 4.8,
                link_margin_db: 0.36,
            },
            LinkPreset::TelesatUser => PresetProfile {
                eirp_dbm: 64.6,
                frequency_ghz: 13.5,
                rx_antenna_gain_dbi: 38.3,
                data_rate_mbps: 599.4,
                elevation_threshold_deg: 55.0,
                free_space_path_loss_db: 178.6,
                atmospheric_loss_db: 0.41,
                link_margin_db: 0.76,
            },
        }
    }

    pub fn eirp_dbm(&self) -> f64 {
        self.profile().eirp_dbm
    }

    /// Ground link parameters for this preset
    pub fn parameters(&self) -> LinkBudgetParameters {
        let p = self.profile();
        LinkBudgetParameters::from_published(
            p.elevation_threshold_deg,
            p.atmospheric_loss_db,
            p.free_space_path_loss_db,
            p.link_margin_db,
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            LinkPreset::StarlinkGateway => "starlink-gateway",
            LinkPreset::StarlinkUser => "starlink-user",
            LinkPreset::OnewebGateway => "oneweb-gateway",
            LinkPreset::OnewebUser => "oneweb-user",
            LinkPreset::TelesatGateway => "telesat-gateway",
            LinkPreset::TelesatUser => "telesat-user",
        }
    }
}

impl fmt::Display for LinkPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LinkPreset {
    type Err = LinkError;

    fn from_str(s: &str) -> Result<Self> {
        LinkPreset::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| LinkError::UnknownPreset(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starlink_gateway_figures() {
        let params = LinkPreset::StarlinkGateway.parameters();
        assert_eq!(params.elevation_threshold_deg(), 40.0);
        assert_eq!(params.free_space_path_loss_db(), 186.1);
        assert_eq!(params.atmospheric_loss_db(), 2.9);
        assert_eq!(params.link_margin_db(), 1.02);
        assert_eq!(LinkPreset::StarlinkGateway.eirp_dbm(), 98.4);
    }

    #[test]
    fn test_names_round_trip() {
        for preset in LinkPreset::ALL {
            assert_eq!(preset.to_string().parse::<LinkPreset>().unwrap(), preset);
            let json = serde_json::to_string(&preset).unwrap();
            assert_eq!(json, format!("\"{}\"", preset.name()));
        }
        assert_eq!("Telesat-User".parse::<LinkPreset>().unwrap(), LinkPreset::TelesatUser);
        assert_eq!(
            "iridium".parse::<LinkPreset>().unwrap_err(),
            LinkError::UnknownPreset("iridium".into())
        );
    }

    #[test]
    fn test_every_preset_valid() {
        for preset in LinkPreset::ALL {
            let p = preset.profile();
            assert!((0.0..=90.0).contains(&p.elevation_threshold_deg));
            assert!(p.eirp_dbm - preset.parameters().total_loss_db() < 0.0, "{preset}");
        }
    }
}
