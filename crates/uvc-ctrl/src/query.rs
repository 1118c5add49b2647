//! Translation of resolved mappings into V4L2-style control descriptions.
//!
//! Nothing here mutates control storage. Values are read from the cached
//! slots the dispatch layer filled in; slots that were never fetched read as
//! zero.

use bitflags::bitflags;
use serde::Serialize;

use crate::catalog::{ControlFlags, ControlType, DataType};
use crate::control::{ControlMapping, PhysicalControl, Slot};
use crate::error::{CtrlError, Result};
use crate::lookup::{ControlRef, find_in_unit};
use crate::unit::Unit;

bitflags! {
    /// `V4L2_CTRL_FLAG_*` bits reported with a description.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
    pub struct DescriptionFlags: u32 {
        const READ_ONLY = 0x0004;
        const INACTIVE = 0x0010;
        const WRITE_ONLY = 0x0040;
    }
}

/// What an application sees for one control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlDescription {
    pub id: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub control_type: ControlType,
    pub minimum: i32,
    pub maximum: i32,
    pub step: i32,
    pub default_value: i32,
    pub flags: DescriptionFlags,
}

/// Read the mapping's field from one slot of the control's storage.
pub fn read_slot(ctrl: &PhysicalControl, mapping: &ControlMapping, slot: Slot) -> i32 {
    ctrl.data()
        .map_or(0, |data| mapping.read_field(data.slot(slot)))
}

fn supports(ctrl: &PhysicalControl, flag: ControlFlags) -> bool {
    ctrl.info().is_some_and(|info| info.flags.contains(flag))
}

/// Describe `mapping` as backed by `ctrl`.
pub fn describe(ctrl: &PhysicalControl, mapping: &ControlMapping) -> ControlDescription {
    let mut flags = DescriptionFlags::empty();
    if !supports(ctrl, ControlFlags::GET_CUR) {
        flags |= DescriptionFlags::WRITE_ONLY;
    }
    if !supports(ctrl, ControlFlags::SET_CUR) {
        flags |= DescriptionFlags::READ_ONLY;
    }

    let raw_default = if supports(ctrl, ControlFlags::GET_DEF) {
        read_slot(ctrl, mapping, Slot::Def)
    } else {
        0
    };

    let mut desc = ControlDescription {
        id: mapping.id,
        name: mapping.name.clone(),
        control_type: mapping.control_type,
        minimum: 0,
        maximum: 0,
        step: 0,
        default_value: raw_default,
        flags,
    };

    match mapping.control_type {
        ControlType::Menu => {
            let count = i32::try_from(mapping.menu.len()).unwrap_or(i32::MAX);
            desc.maximum = count.saturating_sub(1);
            desc.step = 1;
            desc.default_value = mapping
                .menu
                .iter()
                .position(|entry| entry.value.cast_signed() == raw_default)
                .and_then(|index| i32::try_from(index).ok())
                .unwrap_or(0);
        }
        ControlType::Boolean => {
            desc.maximum = 1;
            desc.step = 1;
        }
        ControlType::Button => {
            desc.default_value = 0;
        }
        ControlType::Integer | ControlType::Bitmask => {
            if supports(ctrl, ControlFlags::GET_MIN) {
                desc.minimum = read_slot(ctrl, mapping, Slot::Min);
            }
            if supports(ctrl, ControlFlags::GET_MAX) {
                desc.maximum = read_slot(ctrl, mapping, Slot::Max);
            }
            if supports(ctrl, ControlFlags::GET_RES) {
                desc.step = read_slot(ctrl, mapping, Slot::Res);
            }
        }
    }

    desc
}

/// Whether the master of `mapping` currently holds a non-manual value.
///
/// Only masters in the same unit whose control can report its current value,
/// and whose current value has been fetched, are considered.
pub fn is_inactive(unit: &Unit, mapping: &ControlMapping) -> bool {
    let Some(master_id) = mapping.master_id else {
        return false;
    };
    let Some((master_ctrl, master)) = find_in_unit(unit, master_id) else {
        return false;
    };
    let current_known = supports(master_ctrl, ControlFlags::GET_CUR)
        && master_ctrl
            .data()
            .is_some_and(|data| data.is_loaded(Slot::Current));
    current_known && read_slot(master_ctrl, master, Slot::Current) != mapping.master_manual
}

/// Describe a resolved control, including master/slave state.
pub fn describe_ref(found: &ControlRef<'_>) -> ControlDescription {
    let mut desc = describe(found.control, found.mapping);
    if is_inactive(found.unit, found.mapping) {
        desc.flags |= DescriptionFlags::INACTIVE;
    }
    desc
}

/// Label of menu entry `index` of `mapping`.
///
/// # Errors
///
/// - [`CtrlError::NotAMenu`] if the mapping is not a menu.
/// - [`CtrlError::MenuIndexOutOfRange`] if `index` is past the last entry.
/// - [`CtrlError::MenuEntryUnsupported`] for bitmask menus whose fetched
///   resolution does not advertise the entry's value.
pub fn query_menu<'m>(
    ctrl: &PhysicalControl,
    mapping: &'m ControlMapping,
    index: u32,
) -> Result<&'m str> {
    if mapping.control_type != ControlType::Menu {
        return Err(CtrlError::NotAMenu { id: mapping.id });
    }
    let entry = usize::try_from(index)
        .ok()
        .and_then(|i| mapping.menu.get(i))
        .ok_or(CtrlError::MenuIndexOutOfRange {
            id: mapping.id,
            index,
            count: mapping.menu.len(),
        })?;

    let res_known = supports(ctrl, ControlFlags::GET_RES)
        && ctrl.data().is_some_and(|data| data.is_loaded(Slot::Res));
    if mapping.data_type == DataType::Bitmask && res_known {
        let supported = read_slot(ctrl, mapping, Slot::Res).cast_unsigned();
        if supported & entry.value == 0 {
            return Err(CtrlError::MenuEntryUnsupported {
                id: mapping.id,
                index,
            });
        }
    }

    Ok(&entry.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_flag_values() {
        assert_eq!(DescriptionFlags::READ_ONLY.bits(), 0x0004);
        assert_eq!(DescriptionFlags::INACTIVE.bits(), 0x0010);
        assert_eq!(DescriptionFlags::WRITE_ONLY.bits(), 0x0040);
    }

    #[test]
    fn test_uninitialized_control_reads_zero() {
        let ctrl = PhysicalControl::new(0);
        let mapping = ControlMapping {
            id: 1,
            name: "x".to_owned(),
            bit_width: 16,
            bit_offset: 0,
            control_type: ControlType::Integer,
            data_type: DataType::Signed,
            menu: Vec::new(),
            master_id: None,
            master_manual: 0,
            slave_ids: Vec::new(),
        };
        assert_eq!(read_slot(&ctrl, &mapping, Slot::Max), 0);
        let desc = describe(&ctrl, &mapping);
        assert_eq!(
            desc.flags,
            DescriptionFlags::READ_ONLY | DescriptionFlags::WRITE_ONLY
        );
    }
}
