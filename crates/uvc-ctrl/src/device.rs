//! Per-device control state behind a single lock.
//!
//! [`DeviceControls`] owns the unit graph of one attached device. Discovery
//! runs once in [`DeviceControls::attach`] before the value is handed out;
//! afterwards every query goes through a [`ControlsGuard`] that holds the
//! device lock for its whole lifetime.

use parking_lot::{Mutex, MutexGuard};
use tracing::debug;

use crate::config::ControlsConfig;
use crate::control::Slot;
use crate::discovery::discover;
use crate::error::{CtrlError, Result};
use crate::lookup::{self, ControlRef, FindMode};
use crate::query::{self, ControlDescription};
use crate::unit::{UnitDescriptor, UnitGraph};

/// Controls of one attached device.
#[derive(Debug)]
pub struct DeviceControls {
    config: ControlsConfig,
    graph: Mutex<UnitGraph>,
}

impl DeviceControls {
    /// Build the unit graph and discover its controls.
    ///
    /// # Errors
    ///
    /// Returns [`CtrlError::OutOfMemory`] if discovery fails. Callers that
    /// want to keep a partially discovered device can run
    /// [`discover`] themselves and use [`DeviceControls::from_graph`].
    pub fn attach(
        units: impl IntoIterator<Item = UnitDescriptor>,
        config: ControlsConfig,
    ) -> Result<Self> {
        let mut graph = UnitGraph::from_descriptors(units);
        discover(&mut graph)?;
        Ok(Self::from_graph(graph, config))
    }

    /// Wrap an already discovered graph.
    pub fn from_graph(graph: UnitGraph, config: ControlsConfig) -> Self {
        Self {
            config,
            graph: Mutex::new(graph),
        }
    }

    pub fn config(&self) -> &ControlsConfig {
        &self.config
    }

    /// Acquire the device lock.
    ///
    /// # Errors
    ///
    /// Returns [`CtrlError::AccessDenied`] when control access is disabled.
    pub fn lock(&self) -> Result<ControlsGuard<'_>> {
        if !self.config.access_allowed {
            return Err(CtrlError::AccessDenied);
        }
        Ok(ControlsGuard {
            graph: self.graph.lock(),
        })
    }

    /// Describe the control named by a raw query id.
    ///
    /// # Errors
    ///
    /// See [`ControlsGuard::query`].
    pub fn query_ctrl(&self, raw_id: u32) -> Result<ControlDescription> {
        self.lock()?.query(raw_id)
    }

    /// Label of one menu entry.
    ///
    /// # Errors
    ///
    /// See [`ControlsGuard::query_menu`].
    pub fn query_menu(&self, id: u32, index: u32) -> Result<String> {
        self.lock()?.query_menu(id, index).map(str::to_owned)
    }

    /// Describe every control in ascending id order.
    ///
    /// # Errors
    ///
    /// Returns [`CtrlError::AccessDenied`] when control access is disabled.
    pub fn enumerate(&self) -> Result<Vec<ControlDescription>> {
        Ok(self.lock()?.enumerate())
    }

    /// Tear the device down, returning the emptied graph.
    pub fn detach(self) -> UnitGraph {
        let mut graph = self.graph.into_inner();
        for unit in graph.units_mut() {
            let unit_id = unit.id();
            for ctrl in unit.controls_mut() {
                for mapping in ctrl.take_mappings() {
                    debug!(unit = unit_id, "Removing mapping '{}'", mapping.name);
                }
            }
            unit.controls.clear();
        }
        graph
    }
}

/// Exclusive access to a device's controls.
pub struct ControlsGuard<'a> {
    graph: MutexGuard<'a, UnitGraph>,
}

impl ControlsGuard<'_> {
    pub fn graph(&self) -> &UnitGraph {
        &self.graph
    }

    pub fn find(&self, id: u32, mode: FindMode) -> Option<ControlRef<'_>> {
        lookup::find(&self.graph, id, mode)
    }

    fn resolve(&self, id: u32, mode: FindMode) -> Result<ControlRef<'_>> {
        self.find(id, mode).ok_or_else(|| {
            debug!("Control {id:#010x} lookup missed ({mode:?})");
            match mode {
                FindMode::Exact => CtrlError::not_found(id),
                FindMode::Next => CtrlError::enumeration_end(id),
            }
        })
    }

    /// Describe a resolved control.
    pub fn describe(&self, found: &ControlRef<'_>) -> ControlDescription {
        query::describe_ref(found)
    }

    /// Describe the control named by a raw query id.
    ///
    /// The [`NEXT_CTRL`](crate::ids::query_flags::NEXT_CTRL) bit selects
    /// next-higher lookup.
    ///
    /// # Errors
    ///
    /// [`CtrlError::NotFound`] for an unknown id and
    /// [`CtrlError::EnumerationEnd`] once a next-higher walk is exhausted.
    pub fn query(&self, raw_id: u32) -> Result<ControlDescription> {
        let (id, mode) = lookup::split_query_id(raw_id);
        let found = self.resolve(id, mode)?;
        Ok(self.describe(&found))
    }

    /// Label of one menu entry.
    ///
    /// # Errors
    ///
    /// [`CtrlError::NotFound`] for an unknown id, otherwise see
    /// [`query::query_menu`].
    pub fn query_menu(&self, id: u32, index: u32) -> Result<&str> {
        let found = self.resolve(id, FindMode::Exact)?;
        query::query_menu(found.control, found.mapping, index)
    }

    /// Walk every control with next-higher lookups starting from id 0.
    pub fn enumerate(&self) -> Vec<ControlDescription> {
        let mut out = Vec::new();
        let mut cursor = 0;
        while let Some(found) = self.find(cursor, FindMode::Next) {
            cursor = found.mapping.id;
            out.push(self.describe(&found));
        }
        out
    }

    /// Cache a raw value for the physical control behind `id`.
    ///
    /// # Errors
    ///
    /// [`CtrlError::NotFound`] for an unknown id, or the errors of
    /// [`PhysicalControl::store_slot`](crate::PhysicalControl::store_slot).
    pub fn store_slot(&mut self, id: u32, slot: Slot, bytes: &[u8]) -> Result<()> {
        let pos = lookup::locate(&self.graph, id, FindMode::Exact)
            .ok_or(CtrlError::not_found(id))?;
        let unit = self
            .graph
            .units_mut()
            .get_mut(pos.unit)
            .ok_or(CtrlError::not_found(id))?;
        let unit_id = unit.id();
        let ctrl = unit
            .controls_mut()
            .get_mut(pos.control)
            .ok_or(CtrlError::not_found(id))?;
        ctrl.store_slot(unit_id, slot, bytes)
    }

    /// Cache a raw value for the control at `bit_index` of unit `unit`.
    ///
    /// # Errors
    ///
    /// [`CtrlError::Uninitialized`] when no such control has storage, or the
    /// errors of [`PhysicalControl::store_slot`](crate::PhysicalControl::store_slot).
    pub fn store_unit_slot(
        &mut self,
        unit: u8,
        bit_index: u32,
        slot: Slot,
        bytes: &[u8],
    ) -> Result<()> {
        let missing = CtrlError::Uninitialized { unit, bit_index };
        let ctrl = self
            .graph
            .unit_mut(unit)
            .and_then(|u| {
                u.controls_mut()
                    .iter_mut()
                    .find(|ctrl| ctrl.bit_index() == bit_index)
            })
            .ok_or(missing)?;
        ctrl.store_slot(unit, slot, bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::cid;
    use crate::unit::EntityType;

    fn hue_device(config: ControlsConfig) -> Result<DeviceControls> {
        DeviceControls::attach(
            [UnitDescriptor::new(2, EntityType::Processing, vec![0b0000_0101])],
            config,
        )
    }

    #[test]
    fn test_denied_access() -> Result<()> {
        let device = hue_device(ControlsConfig::denied())?;
        assert_eq!(device.query_ctrl(cid::HUE), Err(CtrlError::AccessDenied));
        assert_eq!(device.lock().err().map(|e| e.errno()), Some(libc::ENXIO));
        Ok(())
    }

    #[test]
    fn test_query_splits_lookup_misses() -> Result<()> {
        let device = hue_device(ControlsConfig::default())?;
        assert_eq!(
            device.query_ctrl(cid::GAIN),
            Err(CtrlError::not_found(cid::GAIN))
        );
        assert_eq!(
            device.query_ctrl(cid::HUE | crate::ids::query_flags::NEXT_CTRL),
            Err(CtrlError::enumeration_end(cid::HUE))
        );
        Ok(())
    }

    #[test]
    fn test_detach_clears_controls() -> Result<()> {
        let device = hue_device(ControlsConfig::default())?;
        let graph = device.detach();
        assert_eq!(graph.len(), 1);
        assert!(graph.units().iter().all(|u| u.controls().is_empty()));
        Ok(())
    }
}
