//! Recorded unit topologies.
//!
//! A topology file captures what the descriptor parser and the transfer
//! layer would hand the control engine for one camera: its units, optional
//! cached slot values and the per-device configuration.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uvc_ctrl::{ControlsConfig, DeviceControls, Slot, UnitDescriptor, UnitGraph, discover};

use crate::error::CliError;

/// Raw value cached for one slot of one physical control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotValue {
    pub unit: u8,
    pub bit: u32,
    pub slot: Slot,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    pub units: Vec<UnitDescriptor>,
    #[serde(default)]
    pub values: Vec<SlotValue>,
    #[serde(default)]
    pub config: ControlsConfig,
}

impl Topology {
    /// Load a topology, picking the format from the file extension.
    pub fn load(path: &Path) -> Result<Self> {
        let display = path.display().to_string();
        if !path.exists() {
            return Err(CliError::TopologyNotFound(display).into());
        }

        let text = std::fs::read_to_string(path)
            .map_err(CliError::from)
            .with_context(|| format!("Failed to read topology {display}"))?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let topology: Topology = match extension.as_deref() {
            Some("json") => serde_json::from_str(&text).map_err(CliError::from)?,
            Some("yaml" | "yml") => serde_yaml::from_str(&text).map_err(CliError::from)?,
            _ => return Err(CliError::UnsupportedFormat(display).into()),
        };
        debug!(units = topology.units.len(), values = topology.values.len(), "Loaded topology");
        Ok(topology)
    }

    /// Run discovery only, for inspecting units and their raw controls.
    pub fn discover(&self) -> Result<UnitGraph> {
        let mut graph = UnitGraph::from_descriptors(self.units.iter().cloned());
        discover(&mut graph).context("Control discovery failed")?;
        Ok(graph)
    }

    /// Attach the device and replay the recorded slot values.
    pub fn attach(&self, deny_access: bool) -> Result<DeviceControls> {
        let mut config = self.config.clone();
        if deny_access {
            config.access_allowed = false;
        }

        let device = DeviceControls::attach(self.units.iter().cloned(), config)
            .context("Control discovery failed")?;

        if !self.values.is_empty() {
            let mut guard = device
                .lock()
                .map_err(|err| CliError::from_ctrl(err, "cached values"))?;
            for value in &self.values {
                guard
                    .store_unit_slot(value.unit, value.bit, value.slot, &value.bytes)
                    .map_err(|err| {
                        CliError::InvalidTopology(format!(
                            "value for unit {} bit {}: {err}",
                            value.unit, value.bit
                        ))
                    })?;
            }
            info!(values = self.values.len(), "Replayed cached slot values");
        }

        Ok(device)
    }
}
