//! Control discovery.
//!
//! Walks every unit of a [`UnitGraph`], creates one [`PhysicalControl`] per
//! set bit of the unit's capability bitmap, resolves each against
//! [`catalog::CONTROLS`] and attaches every matching row of
//! [`catalog::MAPPINGS`].
//!
//! Units are processed in order. An allocation failure aborts the walk:
//! units already handled keep their controls, the failing unit gets none,
//! and later units are left untouched.

use tracing::{debug, trace, warn};

use crate::catalog::{self, ControlInfo};
use crate::control::{ControlData, ControlMapping, PhysicalControl};
use crate::error::{CtrlError, Result};
use crate::reserve::{Heap, Reserve};
use crate::unit::{Unit, UnitDescriptor, UnitGraph, UnitKind, entity_matches_guid};

/// Test bit `bit` of a little-endian capability bitmap.
///
/// Bits past the end of the bitmap read as clear.
pub fn test_bit(bitmap: &[u8], bit: usize) -> bool {
    bitmap
        .get(bit / 8)
        .is_some_and(|byte| (byte >> (bit % 8)) & 1 == 1)
}

/// Indices of the set bits of `bitmap`, ascending.
pub fn set_bits(bitmap: &[u8]) -> impl Iterator<Item = usize> + '_ {
    (0..bitmap.len().saturating_mul(8)).filter(move |bit| test_bit(bitmap, *bit))
}

/// Number of set bits in `bitmap`.
pub fn count_controls(bitmap: &[u8]) -> usize {
    bitmap.iter().map(|byte| byte.count_ones() as usize).sum()
}

/// Build the control set of every unit in `graph`.
///
/// # Errors
///
/// Returns [`CtrlError::OutOfMemory`] if any allocation fails. The graph is
/// left partially populated as described in the module docs and the caller
/// decides whether the device is usable.
pub fn discover(graph: &mut UnitGraph) -> Result<()> {
    discover_with(graph, &mut Heap)
}

pub(crate) fn discover_with<A: Reserve>(graph: &mut UnitGraph, alloc: &mut A) -> Result<()> {
    for unit in graph.units_mut() {
        if let Err(err) = init_unit(unit, alloc) {
            warn!(unit = unit.id(), error = %err, "Control discovery aborted");
            return Err(err);
        }
    }
    Ok(())
}

fn init_unit<A: Reserve>(unit: &mut Unit, alloc: &mut A) -> Result<()> {
    if !unit.kind().has_controls() {
        trace!(unit = unit.id(), "Skipping unit without a known control set");
        return Ok(());
    }

    let descriptor = unit.descriptor();
    let bitmap = descriptor.bitmap();
    let count = count_controls(bitmap);
    if count == 0 {
        return Ok(());
    }

    let mut controls: Vec<PhysicalControl> = Vec::new();
    alloc.reserve(&mut controls, count).map_err(|err| {
        debug!(error = %err, "Control array reservation failed");
        CtrlError::out_of_memory(
            descriptor.id,
            count.saturating_mul(size_of::<PhysicalControl>()),
        )
    })?;

    for bit in set_bits(bitmap) {
        let mut ctrl = PhysicalControl::new(u32::try_from(bit).unwrap_or(u32::MAX));
        if unit.kind() != UnitKind::Extension {
            init_control(descriptor, &mut ctrl, alloc)?;
        }
        controls.push(ctrl);
    }

    debug!(
        unit = descriptor.id,
        kind = ?unit.kind(),
        controls = controls.len(),
        "Unit controls discovered"
    );
    unit.controls = controls;
    Ok(())
}

/// First catalog row for this unit's control set at `bit_index`.
pub fn lookup_info(unit: &UnitDescriptor, bit_index: u32) -> Option<&'static ControlInfo> {
    catalog::CONTROLS
        .iter()
        .find(|info| entity_matches_guid(unit, &info.entity) && info.index == bit_index)
}

fn init_control<A: Reserve>(
    unit: &UnitDescriptor,
    ctrl: &mut PhysicalControl,
    alloc: &mut A,
) -> Result<()> {
    let Some(info) = lookup_info(unit, ctrl.bit_index()) else {
        trace!(
            unit = unit.id,
            bit = ctrl.bit_index(),
            "No catalog entry, control stays uninitialized"
        );
        return Ok(());
    };

    let data = ControlData::try_new(info.size, alloc).map_err(|err| {
        debug!(error = %err, "Control storage reservation failed");
        CtrlError::out_of_memory(unit.id, info.size.saturating_mul(6).saturating_add(1))
    })?;
    ctrl.initialize(*info, data);

    for template in catalog::MAPPINGS
        .iter()
        .filter(|m| entity_matches_guid(unit, &m.entity) && m.selector == info.selector)
    {
        debug_assert!(template.fits(info.size), "mapping '{}' overflows", template.name);
        ControlMapping::try_from_template(template, alloc)
            .and_then(|mapping| ctrl.push_mapping(mapping, alloc))
            .map_err(|err| {
                debug!(error = %err, "Mapping reservation failed");
                CtrlError::out_of_memory(unit.id, size_of::<ControlMapping>())
            })?;
        debug!(
            "Adding mapping '{}' to control {}/{}",
            template.name, info.entity, info.selector
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{cid, pu};
    use crate::reserve::FailAfter;
    use crate::unit::EntityType;

    fn processing(id: u8, bitmap: Vec<u8>) -> UnitDescriptor {
        UnitDescriptor::new(id, EntityType::Processing, bitmap)
    }

    #[test]
    fn test_bit_helpers() {
        let bitmap = [0b0000_0101, 0b1000_0000];
        assert!(test_bit(&bitmap, 0));
        assert!(!test_bit(&bitmap, 1));
        assert!(test_bit(&bitmap, 2));
        assert!(test_bit(&bitmap, 15));
        assert!(!test_bit(&bitmap, 16));
        assert_eq!(set_bits(&bitmap).collect::<Vec<_>>(), vec![0, 2, 15]);
        assert_eq!(count_controls(&bitmap), 3);
    }

    #[test]
    fn test_brightness_and_hue() -> Result<()> {
        let mut graph = UnitGraph::from_descriptors([processing(2, vec![0b0000_0101])]);
        discover(&mut graph)?;

        let unit = graph.unit(2).ok_or(CtrlError::not_found(2))?;
        assert_eq!(unit.controls().len(), 2);
        assert!(unit.controls().iter().all(PhysicalControl::is_initialized));

        let hue = unit
            .control_by_selector(pu::HUE_CONTROL)
            .ok_or(CtrlError::not_found(cid::HUE))?;
        assert_eq!(hue.mappings().len(), 1);
        assert_eq!(
            hue.mappings().first().and_then(|m| m.master_id),
            Some(cid::HUE_AUTO)
        );
        Ok(())
    }

    #[test]
    fn test_unknown_bit_stays_uninitialized() -> Result<()> {
        // Bit 20 has no processing-unit catalog entry.
        let mut graph = UnitGraph::from_descriptors([processing(2, vec![0, 0, 0b0001_0000])]);
        discover(&mut graph)?;
        let unit = graph.unit(2).ok_or(CtrlError::not_found(2))?;
        assert_eq!(unit.controls().len(), 1);
        assert!(unit.controls().iter().all(|c| !c.is_initialized()));
        Ok(())
    }

    #[test]
    fn test_failure_keeps_earlier_units() {
        let mut graph = UnitGraph::from_descriptors([
            processing(2, vec![0b0000_0001]),
            processing(3, vec![0b0000_0001]),
            processing(4, vec![0b0000_0001]),
        ]);
        // Unit 2 takes five reservations; the sixth is unit 3's control array.
        let err = discover_with(&mut graph, &mut FailAfter(5));
        assert!(matches!(
            err,
            Err(CtrlError::OutOfMemory { unit: 3, requested })
                if requested == size_of::<PhysicalControl>()
        ));

        let counts: Vec<usize> = graph.units().iter().map(|u| u.controls().len()).collect();
        assert_eq!(counts, vec![1, 0, 0]);
    }

    #[test]
    fn test_immediate_failure_leaves_graph_empty() {
        let mut graph = UnitGraph::from_descriptors([processing(2, vec![0xff])]);
        let err = discover_with(&mut graph, &mut FailAfter(0));
        assert_eq!(err.map_err(|e| e.errno()), Err(libc::ENOMEM));
        assert!(graph.units().iter().all(|u| u.controls().is_empty()));
    }
}
