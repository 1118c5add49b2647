//! Static control catalogs.
//!
//! Two flat, read-only tables drive discovery:
//!
//! - [`CONTROLS`]: one row per physical control the engine understands, keyed
//!   by entity GUID and bit index in the unit's `bmControls` bitmap.
//! - [`MAPPINGS`]: one row per V4L2 control, keyed by entity GUID and
//!   selector. Several rows may share a selector when they project onto
//!   disjoint bit ranges of the same register (pan/tilt, red/blue balance).
//!
//! Both tables are scanned linearly in declaration order; order is part of
//! the contract because mappings are attached in catalog order.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::guid::Guid;
use crate::ids::{cid, ct, guids, pu};

bitflags! {
    /// Requests a physical control supports.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct ControlFlags: u32 {
        const SET_CUR = 1 << 0;
        const GET_CUR = 1 << 1;
        const GET_MIN = 1 << 2;
        const GET_MAX = 1 << 3;
        const GET_RES = 1 << 4;
        const GET_DEF = 1 << 5;
        /// Value is restored after resume.
        const RESTORE = 1 << 6;
        /// Device may change the value on its own.
        const AUTO_UPDATE = 1 << 7;
        const GET_RANGE = Self::GET_CUR.bits()
            | Self::GET_MIN.bits()
            | Self::GET_MAX.bits()
            | Self::GET_RES.bits()
            | Self::GET_DEF.bits();
    }
}

/// Catalog row describing one physical control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ControlInfo {
    /// GUID of the entity kind the control lives on.
    pub entity: Guid,
    /// UVC control selector.
    pub selector: u8,
    /// Bit index in `bmControls`; the join key against discovered bits.
    pub index: u32,
    /// Size of one value in bytes.
    pub size: usize,
    pub flags: ControlFlags,
}

/// Externally visible control type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlType {
    Integer,
    Boolean,
    Menu,
    Button,
    Bitmask,
}

impl ControlType {
    /// `V4L2_CTRL_TYPE_*` value.
    pub const fn v4l2_type(self) -> u32 {
        match self {
            ControlType::Integer => 1,
            ControlType::Boolean => 2,
            ControlType::Menu => 3,
            ControlType::Button => 4,
            ControlType::Bitmask => 8,
        }
    }
}

/// Interpretation of the raw bits backing a mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    Raw,
    Signed,
    Unsigned,
    Boolean,
    Enum,
    Bitmask,
}

/// Catalog menu entry: raw device value and its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuInfo {
    pub value: u32,
    pub name: &'static str,
}

/// Catalog row describing one V4L2 control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappingTemplate {
    pub id: u32,
    pub name: &'static str,
    pub entity: Guid,
    pub selector: u8,
    /// Width of the field in bits.
    pub bits: u32,
    /// Offset of the field in bits from the start of the value.
    pub offset: u32,
    pub control_type: ControlType,
    pub data_type: DataType,
    pub menu: &'static [MenuInfo],
    /// Control that must hold `master_manual` for this one to be writable.
    pub master_id: Option<u32>,
    pub master_manual: i32,
    /// Controls gated by this one while it selects automatic mode.
    pub slave_ids: &'static [u32],
}

impl MappingTemplate {
    const BLANK: Self = Self {
        id: 0,
        name: "",
        entity: Guid::from_bytes([0; 16]),
        selector: 0,
        bits: 0,
        offset: 0,
        control_type: ControlType::Integer,
        data_type: DataType::Unsigned,
        menu: &[],
        master_id: None,
        master_manual: 0,
        slave_ids: &[],
    };

    /// Check that the field lies inside a value of `size` bytes.
    pub fn fits(&self, size: usize) -> bool {
        let end = u64::from(self.offset) + u64::from(self.bits);
        u64::try_from(size)
            .ok()
            .and_then(|size| size.checked_mul(8))
            .is_some_and(|available| end <= available)
    }
}

const RANGE_RESTORE: ControlFlags = ControlFlags::SET_CUR
    .union(ControlFlags::GET_RANGE)
    .union(ControlFlags::RESTORE);
const RANGE_RESTORE_AUTO: ControlFlags = RANGE_RESTORE.union(ControlFlags::AUTO_UPDATE);
const CUR_DEF_RESTORE: ControlFlags = ControlFlags::SET_CUR
    .union(ControlFlags::GET_CUR)
    .union(ControlFlags::GET_DEF)
    .union(ControlFlags::RESTORE);
const RELATIVE_AUTO: ControlFlags = ControlFlags::SET_CUR
    .union(ControlFlags::GET_MIN)
    .union(ControlFlags::GET_MAX)
    .union(ControlFlags::GET_RES)
    .union(ControlFlags::GET_DEF)
    .union(ControlFlags::AUTO_UPDATE);

const fn info(
    entity: Guid,
    selector: u8,
    index: u32,
    size: usize,
    flags: ControlFlags,
) -> ControlInfo {
    ControlInfo {
        entity,
        selector,
        index,
        size,
        flags,
    }
}

/// Physical controls known to the engine.
pub static CONTROLS: &[ControlInfo] = &[
    info(guids::PROCESSING, pu::BRIGHTNESS_CONTROL, 0, 2, RANGE_RESTORE),
    info(guids::PROCESSING, pu::CONTRAST_CONTROL, 1, 2, RANGE_RESTORE),
    info(guids::PROCESSING, pu::HUE_CONTROL, 2, 2, RANGE_RESTORE_AUTO),
    info(guids::PROCESSING, pu::SATURATION_CONTROL, 3, 2, RANGE_RESTORE),
    info(guids::PROCESSING, pu::SHARPNESS_CONTROL, 4, 2, RANGE_RESTORE),
    info(guids::PROCESSING, pu::GAMMA_CONTROL, 5, 2, RANGE_RESTORE),
    info(guids::PROCESSING, pu::WHITE_BALANCE_TEMPERATURE_CONTROL, 6, 2, RANGE_RESTORE_AUTO),
    info(guids::PROCESSING, pu::WHITE_BALANCE_COMPONENT_CONTROL, 7, 4, RANGE_RESTORE_AUTO),
    info(guids::PROCESSING, pu::BACKLIGHT_COMPENSATION_CONTROL, 8, 2, RANGE_RESTORE),
    info(guids::PROCESSING, pu::GAIN_CONTROL, 9, 2, RANGE_RESTORE),
    info(guids::PROCESSING, pu::POWER_LINE_FREQUENCY_CONTROL, 10, 1, CUR_DEF_RESTORE),
    info(guids::PROCESSING, pu::HUE_AUTO_CONTROL, 11, 1, CUR_DEF_RESTORE),
    info(guids::PROCESSING, pu::WHITE_BALANCE_TEMPERATURE_AUTO_CONTROL, 12, 1, CUR_DEF_RESTORE),
    info(guids::PROCESSING, pu::WHITE_BALANCE_COMPONENT_AUTO_CONTROL, 13, 1, CUR_DEF_RESTORE),
    info(guids::PROCESSING, pu::DIGITAL_MULTIPLIER_CONTROL, 14, 2, RANGE_RESTORE),
    info(guids::PROCESSING, pu::DIGITAL_MULTIPLIER_LIMIT_CONTROL, 15, 2, RANGE_RESTORE),
    info(guids::PROCESSING, pu::ANALOG_VIDEO_STANDARD_CONTROL, 16, 1, ControlFlags::GET_CUR),
    info(guids::PROCESSING, pu::ANALOG_LOCK_STATUS_CONTROL, 17, 1, ControlFlags::GET_CUR),
    info(
        guids::CAMERA,
        ct::SCANNING_MODE_CONTROL,
        0,
        1,
        ControlFlags::SET_CUR
            .union(ControlFlags::GET_CUR)
            .union(ControlFlags::RESTORE),
    ),
    info(
        guids::CAMERA,
        ct::AE_MODE_CONTROL,
        1,
        1,
        CUR_DEF_RESTORE.union(ControlFlags::GET_RES),
    ),
    info(
        guids::CAMERA,
        ct::AE_PRIORITY_CONTROL,
        2,
        1,
        ControlFlags::SET_CUR
            .union(ControlFlags::GET_CUR)
            .union(ControlFlags::RESTORE),
    ),
    info(guids::CAMERA, ct::EXPOSURE_TIME_ABSOLUTE_CONTROL, 3, 4, RANGE_RESTORE_AUTO),
    info(
        guids::CAMERA,
        ct::EXPOSURE_TIME_RELATIVE_CONTROL,
        4,
        1,
        ControlFlags::SET_CUR.union(ControlFlags::RESTORE),
    ),
    info(guids::CAMERA, ct::FOCUS_ABSOLUTE_CONTROL, 5, 2, RANGE_RESTORE_AUTO),
    info(guids::CAMERA, ct::FOCUS_RELATIVE_CONTROL, 6, 2, RELATIVE_AUTO),
    info(guids::CAMERA, ct::IRIS_ABSOLUTE_CONTROL, 7, 2, RANGE_RESTORE_AUTO),
    info(
        guids::CAMERA,
        ct::IRIS_RELATIVE_CONTROL,
        8,
        1,
        ControlFlags::SET_CUR.union(ControlFlags::AUTO_UPDATE),
    ),
    info(guids::CAMERA, ct::ZOOM_ABSOLUTE_CONTROL, 9, 2, RANGE_RESTORE_AUTO),
    info(guids::CAMERA, ct::ZOOM_RELATIVE_CONTROL, 10, 3, RELATIVE_AUTO),
    info(guids::CAMERA, ct::PANTILT_ABSOLUTE_CONTROL, 11, 8, RANGE_RESTORE_AUTO),
    info(
        guids::CAMERA,
        ct::PANTILT_RELATIVE_CONTROL,
        12,
        4,
        ControlFlags::SET_CUR
            .union(ControlFlags::GET_RANGE)
            .union(ControlFlags::AUTO_UPDATE),
    ),
    info(guids::CAMERA, ct::ROLL_ABSOLUTE_CONTROL, 13, 2, RANGE_RESTORE_AUTO),
    info(guids::CAMERA, ct::ROLL_RELATIVE_CONTROL, 14, 2, RELATIVE_AUTO),
    info(guids::CAMERA, ct::FOCUS_AUTO_CONTROL, 17, 1, CUR_DEF_RESTORE),
    info(
        guids::CAMERA,
        ct::PRIVACY_CONTROL,
        18,
        1,
        ControlFlags::SET_CUR
            .union(ControlFlags::GET_CUR)
            .union(ControlFlags::RESTORE)
            .union(ControlFlags::AUTO_UPDATE),
    ),
];

static POWER_LINE_FREQUENCY_MENU: &[MenuInfo] = &[
    MenuInfo { value: 0, name: "Disabled" },
    MenuInfo { value: 1, name: "50 Hz" },
    MenuInfo { value: 2, name: "60 Hz" },
];

// Raw values are the UVC AE mode bits, not V4L2 menu indices.
static EXPOSURE_AUTO_MENU: &[MenuInfo] = &[
    MenuInfo { value: 2, name: "Auto Mode" },
    MenuInfo { value: 1, name: "Manual Mode" },
    MenuInfo { value: 4, name: "Shutter Priority Mode" },
    MenuInfo { value: 8, name: "Aperture Priority Mode" },
];

/// V4L2 controls known to the engine.
pub static MAPPINGS: &[MappingTemplate] = &[
    MappingTemplate {
        id: cid::BRIGHTNESS,
        name: "Brightness",
        entity: guids::PROCESSING,
        selector: pu::BRIGHTNESS_CONTROL,
        bits: 16,
        data_type: DataType::Signed,
        ..MappingTemplate::BLANK
    },
    MappingTemplate {
        id: cid::CONTRAST,
        name: "Contrast",
        entity: guids::PROCESSING,
        selector: pu::CONTRAST_CONTROL,
        bits: 16,
        ..MappingTemplate::BLANK
    },
    MappingTemplate {
        id: cid::HUE,
        name: "Hue",
        entity: guids::PROCESSING,
        selector: pu::HUE_CONTROL,
        bits: 16,
        data_type: DataType::Signed,
        master_id: Some(cid::HUE_AUTO),
        master_manual: 0,
        ..MappingTemplate::BLANK
    },
    MappingTemplate {
        id: cid::SATURATION,
        name: "Saturation",
        entity: guids::PROCESSING,
        selector: pu::SATURATION_CONTROL,
        bits: 16,
        ..MappingTemplate::BLANK
    },
    MappingTemplate {
        id: cid::SHARPNESS,
        name: "Sharpness",
        entity: guids::PROCESSING,
        selector: pu::SHARPNESS_CONTROL,
        bits: 16,
        ..MappingTemplate::BLANK
    },
    MappingTemplate {
        id: cid::GAMMA,
        name: "Gamma",
        entity: guids::PROCESSING,
        selector: pu::GAMMA_CONTROL,
        bits: 16,
        ..MappingTemplate::BLANK
    },
    MappingTemplate {
        id: cid::BACKLIGHT_COMPENSATION,
        name: "Backlight Compensation",
        entity: guids::PROCESSING,
        selector: pu::BACKLIGHT_COMPENSATION_CONTROL,
        bits: 16,
        ..MappingTemplate::BLANK
    },
    MappingTemplate {
        id: cid::GAIN,
        name: "Gain",
        entity: guids::PROCESSING,
        selector: pu::GAIN_CONTROL,
        bits: 16,
        ..MappingTemplate::BLANK
    },
    MappingTemplate {
        id: cid::POWER_LINE_FREQUENCY,
        name: "Power Line Frequency",
        entity: guids::PROCESSING,
        selector: pu::POWER_LINE_FREQUENCY_CONTROL,
        bits: 2,
        control_type: ControlType::Menu,
        data_type: DataType::Enum,
        menu: POWER_LINE_FREQUENCY_MENU,
        ..MappingTemplate::BLANK
    },
    MappingTemplate {
        id: cid::HUE_AUTO,
        name: "Hue, Auto",
        entity: guids::PROCESSING,
        selector: pu::HUE_AUTO_CONTROL,
        bits: 1,
        control_type: ControlType::Boolean,
        data_type: DataType::Boolean,
        slave_ids: &[cid::HUE],
        ..MappingTemplate::BLANK
    },
    MappingTemplate {
        id: cid::EXPOSURE_AUTO,
        name: "Exposure, Auto",
        entity: guids::CAMERA,
        selector: ct::AE_MODE_CONTROL,
        bits: 4,
        control_type: ControlType::Menu,
        data_type: DataType::Bitmask,
        menu: EXPOSURE_AUTO_MENU,
        slave_ids: &[cid::EXPOSURE_ABSOLUTE],
        ..MappingTemplate::BLANK
    },
    MappingTemplate {
        id: cid::EXPOSURE_AUTO_PRIORITY,
        name: "Exposure, Auto Priority",
        entity: guids::CAMERA,
        selector: ct::AE_PRIORITY_CONTROL,
        bits: 1,
        control_type: ControlType::Boolean,
        data_type: DataType::Boolean,
        ..MappingTemplate::BLANK
    },
    MappingTemplate {
        id: cid::EXPOSURE_ABSOLUTE,
        name: "Exposure (Absolute)",
        entity: guids::CAMERA,
        selector: ct::EXPOSURE_TIME_ABSOLUTE_CONTROL,
        bits: 32,
        master_id: Some(cid::EXPOSURE_AUTO),
        master_manual: cid::EXPOSURE_MANUAL,
        ..MappingTemplate::BLANK
    },
    MappingTemplate {
        id: cid::AUTO_WHITE_BALANCE,
        name: "White Balance Temperature, Auto",
        entity: guids::PROCESSING,
        selector: pu::WHITE_BALANCE_TEMPERATURE_AUTO_CONTROL,
        bits: 1,
        control_type: ControlType::Boolean,
        data_type: DataType::Boolean,
        slave_ids: &[cid::WHITE_BALANCE_TEMPERATURE],
        ..MappingTemplate::BLANK
    },
    MappingTemplate {
        id: cid::WHITE_BALANCE_TEMPERATURE,
        name: "White Balance Temperature",
        entity: guids::PROCESSING,
        selector: pu::WHITE_BALANCE_TEMPERATURE_CONTROL,
        bits: 16,
        master_id: Some(cid::AUTO_WHITE_BALANCE),
        master_manual: 0,
        ..MappingTemplate::BLANK
    },
    MappingTemplate {
        id: cid::AUTO_WHITE_BALANCE,
        name: "White Balance Component, Auto",
        entity: guids::PROCESSING,
        selector: pu::WHITE_BALANCE_COMPONENT_AUTO_CONTROL,
        bits: 1,
        control_type: ControlType::Boolean,
        data_type: DataType::Boolean,
        slave_ids: &[cid::BLUE_BALANCE, cid::RED_BALANCE],
        ..MappingTemplate::BLANK
    },
    MappingTemplate {
        id: cid::BLUE_BALANCE,
        name: "White Balance Blue Component",
        entity: guids::PROCESSING,
        selector: pu::WHITE_BALANCE_COMPONENT_CONTROL,
        bits: 16,
        data_type: DataType::Signed,
        master_id: Some(cid::AUTO_WHITE_BALANCE),
        master_manual: 0,
        ..MappingTemplate::BLANK
    },
    MappingTemplate {
        id: cid::RED_BALANCE,
        name: "White Balance Red Component",
        entity: guids::PROCESSING,
        selector: pu::WHITE_BALANCE_COMPONENT_CONTROL,
        bits: 16,
        offset: 16,
        data_type: DataType::Signed,
        master_id: Some(cid::AUTO_WHITE_BALANCE),
        master_manual: 0,
        ..MappingTemplate::BLANK
    },
    MappingTemplate {
        id: cid::FOCUS_ABSOLUTE,
        name: "Focus (absolute)",
        entity: guids::CAMERA,
        selector: ct::FOCUS_ABSOLUTE_CONTROL,
        bits: 16,
        master_id: Some(cid::FOCUS_AUTO),
        master_manual: 0,
        ..MappingTemplate::BLANK
    },
    MappingTemplate {
        id: cid::FOCUS_AUTO,
        name: "Focus, Auto",
        entity: guids::CAMERA,
        selector: ct::FOCUS_AUTO_CONTROL,
        bits: 1,
        control_type: ControlType::Boolean,
        data_type: DataType::Boolean,
        slave_ids: &[cid::FOCUS_ABSOLUTE],
        ..MappingTemplate::BLANK
    },
    MappingTemplate {
        id: cid::IRIS_ABSOLUTE,
        name: "Iris, Absolute",
        entity: guids::CAMERA,
        selector: ct::IRIS_ABSOLUTE_CONTROL,
        bits: 16,
        ..MappingTemplate::BLANK
    },
    MappingTemplate {
        id: cid::IRIS_RELATIVE,
        name: "Iris, Relative",
        entity: guids::CAMERA,
        selector: ct::IRIS_RELATIVE_CONTROL,
        bits: 8,
        data_type: DataType::Signed,
        ..MappingTemplate::BLANK
    },
    MappingTemplate {
        id: cid::ZOOM_ABSOLUTE,
        name: "Zoom, Absolute",
        entity: guids::CAMERA,
        selector: ct::ZOOM_ABSOLUTE_CONTROL,
        bits: 16,
        ..MappingTemplate::BLANK
    },
    // Continuous zoom packs direction and speed into two bytes that need a
    // dedicated codec; until it exists the field is zero-width.
    MappingTemplate {
        id: cid::ZOOM_CONTINUOUS,
        name: "Zoom, Continuous",
        entity: guids::CAMERA,
        selector: ct::ZOOM_RELATIVE_CONTROL,
        bits: 0,
        data_type: DataType::Signed,
        ..MappingTemplate::BLANK
    },
    MappingTemplate {
        id: cid::PAN_ABSOLUTE,
        name: "Pan (Absolute)",
        entity: guids::CAMERA,
        selector: ct::PANTILT_ABSOLUTE_CONTROL,
        bits: 32,
        data_type: DataType::Signed,
        ..MappingTemplate::BLANK
    },
    MappingTemplate {
        id: cid::TILT_ABSOLUTE,
        name: "Tilt (Absolute)",
        entity: guids::CAMERA,
        selector: ct::PANTILT_ABSOLUTE_CONTROL,
        bits: 32,
        offset: 32,
        data_type: DataType::Signed,
        ..MappingTemplate::BLANK
    },
    MappingTemplate {
        id: cid::PAN_SPEED,
        name: "Pan (Speed)",
        entity: guids::CAMERA,
        selector: ct::PANTILT_RELATIVE_CONTROL,
        bits: 16,
        data_type: DataType::Signed,
        ..MappingTemplate::BLANK
    },
    MappingTemplate {
        id: cid::TILT_SPEED,
        name: "Tilt (Speed)",
        entity: guids::CAMERA,
        selector: ct::PANTILT_RELATIVE_CONTROL,
        bits: 16,
        offset: 16,
        data_type: DataType::Signed,
        ..MappingTemplate::BLANK
    },
    MappingTemplate {
        id: cid::PRIVACY,
        name: "Privacy",
        entity: guids::CAMERA,
        selector: ct::PRIVACY_CONTROL,
        bits: 1,
        control_type: ControlType::Boolean,
        data_type: DataType::Boolean,
        ..MappingTemplate::BLANK
    },
];
