//! Per-device control state built by discovery.

use std::collections::TryReserveError;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::catalog::{ControlInfo, ControlType, DataType, MappingTemplate};
use crate::error::{CtrlError, Result};
use crate::reserve::Reserve;

/// One of the six cached values kept for every physical control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Current,
    Backup,
    Min,
    Max,
    Res,
    Def,
}

impl Slot {
    pub const ALL: [Slot; 6] = [
        Slot::Current,
        Slot::Backup,
        Slot::Min,
        Slot::Max,
        Slot::Res,
        Slot::Def,
    ];

    const fn position(self) -> usize {
        match self {
            Slot::Current => 0,
            Slot::Backup => 1,
            Slot::Min => 2,
            Slot::Max => 3,
            Slot::Res => 4,
            Slot::Def => 5,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Slot::Current => "current",
            Slot::Backup => "backup",
            Slot::Min => "min",
            Slot::Max => "max",
            Slot::Res => "res",
            Slot::Def => "def",
        }
    }

    /// Parse a slot from its lowercase name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.name() == name)
    }

    const fn loaded_flag(self) -> LoadedSlots {
        match self {
            Slot::Current => LoadedSlots::CURRENT,
            Slot::Backup => LoadedSlots::BACKUP,
            Slot::Min => LoadedSlots::MIN,
            Slot::Max => LoadedSlots::MAX,
            Slot::Res => LoadedSlots::RES,
            Slot::Def => LoadedSlots::DEF,
        }
    }
}

bitflags! {
    /// Slots that hold a value read from the device.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct LoadedSlots: u8 {
        const CURRENT = 1 << 0;
        const BACKUP = 1 << 1;
        const MIN = 1 << 2;
        const MAX = 1 << 3;
        const RES = 1 << 4;
        const DEF = 1 << 5;
    }
}

/// Storage for the six value slots of one physical control.
///
/// The buffer holds `size * 6 + 1` bytes; the trailing byte is scratch
/// space for the transfer layer and is never exposed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlData {
    size: usize,
    buf: Vec<u8>,
    loaded: LoadedSlots,
}

impl ControlData {
    pub(crate) fn try_new<A: Reserve>(
        size: usize,
        alloc: &mut A,
    ) -> std::result::Result<Self, TryReserveError> {
        let len = size.saturating_mul(Slot::ALL.len()).saturating_add(1);
        let mut buf = Vec::new();
        alloc.reserve(&mut buf, len)?;
        buf.resize(len, 0);
        Ok(Self {
            size,
            buf,
            loaded: LoadedSlots::empty(),
        })
    }

    /// Size of one slot in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total bytes held, scratch byte included.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Whether `slot` holds a value fetched from the device. Slots never
    /// fetched read as zero.
    pub fn is_loaded(&self, slot: Slot) -> bool {
        self.loaded.contains(slot.loaded_flag())
    }

    pub fn loaded(&self) -> LoadedSlots {
        self.loaded
    }

    pub fn mark_loaded(&mut self, slot: Slot) {
        self.loaded |= slot.loaded_flag();
    }

    /// Forget every fetched value, e.g. after a device reset.
    pub fn clear_loaded(&mut self) {
        self.loaded = LoadedSlots::empty();
    }

    fn range(&self, slot: Slot) -> std::ops::Range<usize> {
        let start = slot.position().saturating_mul(self.size);
        start..start.saturating_add(self.size)
    }

    pub fn slot(&self, slot: Slot) -> &[u8] {
        self.buf.get(self.range(slot)).unwrap_or_default()
    }

    pub fn slot_mut(&mut self, slot: Slot) -> &mut [u8] {
        let range = self.range(slot);
        self.buf.get_mut(range).unwrap_or_default()
    }
}

/// One V4L2 control projected onto a bit range of a physical control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlMapping {
    pub id: u32,
    pub name: String,
    pub bit_width: u32,
    pub bit_offset: u32,
    pub control_type: ControlType,
    pub data_type: DataType,
    pub menu: Vec<MenuEntry>,
    pub master_id: Option<u32>,
    pub master_manual: i32,
    pub slave_ids: Vec<u32>,
}

/// Menu entry owned by a mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuEntry {
    pub value: u32,
    pub name: String,
}

impl ControlMapping {
    /// Copy a catalog template into a device-owned mapping.
    pub(crate) fn try_from_template<A: Reserve>(
        template: &MappingTemplate,
        alloc: &mut A,
    ) -> std::result::Result<Self, TryReserveError> {
        let mut menu = Vec::new();
        alloc.reserve(&mut menu, template.menu.len())?;
        menu.extend(template.menu.iter().map(|entry| MenuEntry {
            value: entry.value,
            name: entry.name.to_owned(),
        }));

        let mut slave_ids = Vec::new();
        alloc.reserve(&mut slave_ids, template.slave_ids.len())?;
        slave_ids.extend_from_slice(template.slave_ids);

        Ok(Self {
            id: template.id,
            name: template.name.to_owned(),
            bit_width: template.bits,
            bit_offset: template.offset,
            control_type: template.control_type,
            data_type: template.data_type,
            menu,
            master_id: template.master_id,
            master_manual: template.master_manual,
            slave_ids,
        })
    }

    /// Whether another control can force this one inactive.
    pub fn is_gated(&self) -> bool {
        self.master_id.is_some()
    }

    pub fn is_master(&self) -> bool {
        !self.slave_ids.is_empty()
    }

    /// Extract this mapping's field from a raw little-endian value.
    ///
    /// Bits past the end of `data` read as zero. Signed fields are sign
    /// extended from their top bit.
    pub fn read_field(&self, data: &[u8]) -> i32 {
        let bits = self.bit_width.min(32);
        if bits == 0 {
            return 0;
        }
        let first = (self.bit_offset / 8) as usize;
        let shift = self.bit_offset % 8;

        let mut raw = 0u64;
        for (i, byte) in data.iter().skip(first).take(5).enumerate() {
            raw |= u64::from(*byte) << (8 * i);
        }
        let mask = (1u64 << bits) - 1;
        let value = ((raw >> shift) & mask) as u32;

        match self.data_type {
            DataType::Signed if bits < 32 => {
                let sign = 1u32 << (bits - 1);
                (value ^ sign).wrapping_sub(sign).cast_signed()
            }
            _ => value.cast_signed(),
        }
    }

    /// Store `value` into this mapping's field, leaving other bits intact.
    pub fn write_field(&self, value: i32, data: &mut [u8]) {
        let bits = self.bit_width.min(32);
        if bits == 0 {
            return;
        }
        let first = (self.bit_offset / 8) as usize;
        let shift = self.bit_offset % 8;

        let mask = ((1u64 << bits) - 1) << shift;
        let bits_in = (u64::from(value.cast_unsigned()) << shift) & mask;
        for (i, byte) in data.iter_mut().skip(first).take(5).enumerate() {
            let byte_mask = (mask >> (8 * i)) as u8;
            let byte_bits = (bits_in >> (8 * i)) as u8;
            *byte = (*byte & !byte_mask) | byte_bits;
        }
    }
}

/// One set bit of a unit's capability bitmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhysicalControl {
    bit_index: u32,
    info: Option<ControlInfo>,
    data: Option<ControlData>,
    mappings: Vec<ControlMapping>,
}

impl PhysicalControl {
    pub(crate) fn new(bit_index: u32) -> Self {
        Self {
            bit_index,
            info: None,
            data: None,
            mappings: Vec::new(),
        }
    }

    pub(crate) fn initialize(&mut self, info: ControlInfo, data: ControlData) {
        self.info = Some(info);
        self.data = Some(data);
    }

    pub(crate) fn push_mapping<A: Reserve>(
        &mut self,
        mapping: ControlMapping,
        alloc: &mut A,
    ) -> std::result::Result<(), TryReserveError> {
        alloc.reserve(&mut self.mappings, 1)?;
        self.mappings.push(mapping);
        Ok(())
    }

    pub(crate) fn take_mappings(&mut self) -> Vec<ControlMapping> {
        std::mem::take(&mut self.mappings)
    }

    pub fn bit_index(&self) -> u32 {
        self.bit_index
    }

    /// Catalog row, present once the control is initialized.
    pub fn info(&self) -> Option<&ControlInfo> {
        self.info.as_ref()
    }

    pub fn data(&self) -> Option<&ControlData> {
        self.data.as_ref()
    }

    pub fn data_mut(&mut self) -> Option<&mut ControlData> {
        self.data.as_mut()
    }

    pub fn is_initialized(&self) -> bool {
        self.info.is_some()
    }

    pub fn mappings(&self) -> &[ControlMapping] {
        &self.mappings
    }

    pub fn selector(&self) -> Option<u8> {
        self.info.map(|info| info.selector)
    }

    /// Cache a raw value read from the device.
    ///
    /// # Errors
    ///
    /// Returns [`CtrlError::Uninitialized`] when the control has no storage
    /// and [`CtrlError::InvalidSlotData`] when `bytes` is not exactly one
    /// slot long.
    pub fn store_slot(&mut self, unit: u8, slot: Slot, bytes: &[u8]) -> Result<()> {
        let bit_index = self.bit_index;
        let (Some(info), Some(data)) = (self.info.as_ref(), self.data.as_mut()) else {
            return Err(CtrlError::Uninitialized { unit, bit_index });
        };
        if bytes.len() != data.size() {
            return Err(CtrlError::InvalidSlotData {
                selector: info.selector,
                slot: slot.name(),
                expected: data.size(),
                actual: bytes.len(),
            });
        }
        data.slot_mut(slot).copy_from_slice(bytes);
        data.mark_loaded(slot);
        Ok(())
    }
}
