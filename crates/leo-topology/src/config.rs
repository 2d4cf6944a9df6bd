//! Scenario configuration
//!
//! A scenario is a JSON document listing orbit shells, ground sites and link
//! budgets. See `data/scenario.json` for a complete example.

use crate::builder::TopologyBuilder;
use crate::connectivity::Connectivity;
use crate::registry::NodeRegistry;
use crate::{Result, TopologyError};
use leo_link::LinkBudgetParameters;
use leo_orbit::{LatLong, OrbitDescriptor, SimTime};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

fn default_precision_ms() -> u64 {
    1000
}

fn default_tx_power_dbm() -> f64 {
    30.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundGrid {
    pub latitude_rings: u32,
    pub longitude_divisions: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundVehicleConfig {
    pub start: LatLong,
    #[serde(default)]
    pub altitude_m: f64,
    pub speed_m_s: f64,
    pub azimuth_deg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub orbits: Vec<OrbitDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ground_grid: Option<GroundGrid>,
    #[serde(default)]
    pub ground_stations: Vec<LatLong>,
    #[serde(default)]
    pub ground_vehicles: Vec<GroundVehicleConfig>,
    /// Mobility sampling interval, 0 for exact positions
    #[serde(default = "default_precision_ms")]
    pub precision_ms: u64,
    #[serde(default)]
    pub retrograde: bool,
    #[serde(default)]
    pub isl: LinkBudgetParameters,
    #[serde(default)]
    pub ground_link: LinkBudgetParameters,
    #[serde(default = "default_tx_power_dbm")]
    pub tx_power_dbm: f64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            orbits: Vec::new(),
            ground_grid: None,
            ground_stations: Vec::new(),
            ground_vehicles: Vec::new(),
            precision_ms: default_precision_ms(),
            retrograde: false,
            isl: LinkBudgetParameters::default(),
            ground_link: LinkBudgetParameters::default(),
            tx_power_dbm: default_tx_power_dbm(),
        }
    }
}

/// A built scenario ready to be driven by a scheduler
#[derive(Debug)]
pub struct Scenario {
    pub registry: NodeRegistry,
    pub connectivity: Connectivity,
    pub tx_power_dbm: f64,
}

impl ScenarioConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading scenario from {:?}", path);
        let reader = BufReader::new(File::open(path)?);
        let config: ScenarioConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: ScenarioConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_orbit(mut self, orbit: OrbitDescriptor) -> Self {
        self.orbits.push(orbit);
        self
    }

    pub fn with_ground_grid(mut self, latitude_rings: u32, longitude_divisions: u32) -> Self {
        self.ground_grid = Some(GroundGrid {
            latitude_rings,
            longitude_divisions,
        });
        self
    }

    pub fn with_ground_station(mut self, location: LatLong) -> Self {
        self.ground_stations.push(location);
        self
    }

    pub fn with_ground_vehicle(mut self, vehicle: GroundVehicleConfig) -> Self {
        self.ground_vehicles.push(vehicle);
        self
    }

    pub fn with_precision_ms(mut self, precision_ms: u64) -> Self {
        self.precision_ms = precision_ms;
        self
    }

    pub fn with_retrograde(mut self, retrograde: bool) -> Self {
        self.retrograde = retrograde;
        self
    }

    pub fn with_isl(mut self, params: LinkBudgetParameters) -> Self {
        self.isl = params;
        self
    }

    pub fn with_ground_link(mut self, params: LinkBudgetParameters) -> Self {
        self.ground_link = params;
        self
    }

    pub fn with_tx_power_dbm(mut self, dbm: f64) -> Self {
        self.tx_power_dbm = dbm;
        self
    }

    pub fn precision(&self) -> Result<SimTime> {
        let ms = i64::try_from(self.precision_ms).map_err(|_| TopologyError::InvalidParameter {
            parameter: "precision_ms",
            reason: format!("{} does not fit a simulated duration", self.precision_ms),
        })?;
        Ok(SimTime::milliseconds(ms))
    }

    /// Checks that cannot be expressed by the field types alone
    pub fn validate(&self) -> Result<()> {
        if self.orbits.is_empty() {
            return Err(TopologyError::InvalidParameter {
                parameter: "orbits",
                reason: "at least one orbit shell is required".into(),
            });
        }
        if !self.tx_power_dbm.is_finite() {
            return Err(TopologyError::InvalidParameter {
                parameter: "tx_power_dbm",
                reason: format!("{} is not finite", self.tx_power_dbm),
            });
        }
        self.precision()?;
        Ok(())
    }

    pub fn build(&self) -> Result<Scenario> {
        self.validate()?;
        let mut builder = TopologyBuilder::new()
            .precision(self.precision()?)?
            .retrograde(self.retrograde);

        builder.add_orbits(&self.orbits)?;
        if let Some(grid) = self.ground_grid {
            builder.add_ground_grid(grid.latitude_rings, grid.longitude_divisions)?;
        }
        for station in &self.ground_stations {
            builder.add_ground_station(*station);
        }
        for vehicle in &self.ground_vehicles {
            builder.add_ground_vehicle(
                vehicle.start,
                vehicle.altitude_m,
                vehicle.speed_m_s,
                vehicle.azimuth_deg,
            )?;
        }

        Ok(Scenario {
            registry: builder.build(),
            connectivity: Connectivity::new(self.isl, self.ground_link),
            tx_power_dbm: self.tx_power_dbm,
        })
    }
}
