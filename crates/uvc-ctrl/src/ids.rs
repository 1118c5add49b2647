//! UVC and V4L2 numeric constants.
//!
//! ## Sources
//!
//! | Group | Source |
//! |-------|--------|
//! | Entity GUIDs | Linux `drivers/media/usb/uvc/uvcvideo.h` (`UVC_GUID_UVC_*`) |
//! | Terminal types / subtypes | USB Video Class 1.5, tables A-5, B-1, B-2 |
//! | Camera terminal selectors | USB Video Class 1.5, table A-12 |
//! | Processing unit selectors | USB Video Class 1.5, table A-13 |
//! | V4L2 control ids / types / flags | Linux `include/uapi/linux/v4l2-controls.h`, `videodev2.h` |
//!
//! Entity GUIDs are kept in wire byte order; see [`crate::Guid`].

use crate::guid::Guid;

/// Well-known entity GUIDs used by the catalogs.
pub mod guids {
    use super::Guid;

    /// Camera input terminal.
    pub const CAMERA: Guid = Guid::from_bytes([
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x01,
    ]);

    /// Media transport input terminal.
    pub const MEDIA_TRANSPORT_INPUT: Guid = Guid::from_bytes([
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x03,
    ]);

    /// Processing unit.
    pub const PROCESSING: Guid = Guid::from_bytes([
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01,
        0x01,
    ]);
}

/// Entity type codes as reported by the class-specific descriptors.
pub mod entity_types {
    /// Input terminal type: camera sensor.
    pub const ITT_CAMERA: u16 = 0x0201;
    /// Input terminal type: sequential media transport.
    pub const ITT_MEDIA_TRANSPORT_INPUT: u16 = 0x0202;
    /// VideoControl interface descriptor subtype: processing unit.
    pub const VC_PROCESSING_UNIT: u16 = 0x05;
    /// VideoControl interface descriptor subtype: extension unit.
    pub const VC_EXTENSION_UNIT: u16 = 0x06;
}

/// Camera terminal control selectors.
pub mod ct {
    pub const SCANNING_MODE_CONTROL: u8 = 0x01;
    pub const AE_MODE_CONTROL: u8 = 0x02;
    pub const AE_PRIORITY_CONTROL: u8 = 0x03;
    pub const EXPOSURE_TIME_ABSOLUTE_CONTROL: u8 = 0x04;
    pub const EXPOSURE_TIME_RELATIVE_CONTROL: u8 = 0x05;
    pub const FOCUS_ABSOLUTE_CONTROL: u8 = 0x06;
    pub const FOCUS_RELATIVE_CONTROL: u8 = 0x07;
    pub const FOCUS_AUTO_CONTROL: u8 = 0x08;
    pub const IRIS_ABSOLUTE_CONTROL: u8 = 0x09;
    pub const IRIS_RELATIVE_CONTROL: u8 = 0x0A;
    pub const ZOOM_ABSOLUTE_CONTROL: u8 = 0x0B;
    pub const ZOOM_RELATIVE_CONTROL: u8 = 0x0C;
    pub const PANTILT_ABSOLUTE_CONTROL: u8 = 0x0D;
    pub const PANTILT_RELATIVE_CONTROL: u8 = 0x0E;
    pub const ROLL_ABSOLUTE_CONTROL: u8 = 0x0F;
    pub const ROLL_RELATIVE_CONTROL: u8 = 0x10;
    pub const PRIVACY_CONTROL: u8 = 0x11;
}

/// Processing unit control selectors.
pub mod pu {
    pub const BACKLIGHT_COMPENSATION_CONTROL: u8 = 0x01;
    pub const BRIGHTNESS_CONTROL: u8 = 0x02;
    pub const CONTRAST_CONTROL: u8 = 0x03;
    pub const GAIN_CONTROL: u8 = 0x04;
    pub const POWER_LINE_FREQUENCY_CONTROL: u8 = 0x05;
    pub const HUE_CONTROL: u8 = 0x06;
    pub const SATURATION_CONTROL: u8 = 0x07;
    pub const SHARPNESS_CONTROL: u8 = 0x08;
    pub const GAMMA_CONTROL: u8 = 0x09;
    pub const WHITE_BALANCE_TEMPERATURE_CONTROL: u8 = 0x0A;
    pub const WHITE_BALANCE_TEMPERATURE_AUTO_CONTROL: u8 = 0x0B;
    pub const WHITE_BALANCE_COMPONENT_CONTROL: u8 = 0x0C;
    pub const WHITE_BALANCE_COMPONENT_AUTO_CONTROL: u8 = 0x0D;
    pub const DIGITAL_MULTIPLIER_CONTROL: u8 = 0x0E;
    pub const DIGITAL_MULTIPLIER_LIMIT_CONTROL: u8 = 0x0F;
    pub const HUE_AUTO_CONTROL: u8 = 0x10;
    pub const ANALOG_VIDEO_STANDARD_CONTROL: u8 = 0x11;
    pub const ANALOG_LOCK_STATUS_CONTROL: u8 = 0x12;
}

/// V4L2 control ids exposed to applications.
pub mod cid {
    const CTRL_CLASS_USER: u32 = 0x0098_0000;
    const CTRL_CLASS_CAMERA: u32 = 0x009a_0000;

    /// First id of the user control class.
    pub const BASE: u32 = CTRL_CLASS_USER | 0x900;
    /// First id of the camera control class.
    pub const CAMERA_CLASS_BASE: u32 = CTRL_CLASS_CAMERA | 0x900;

    pub const BRIGHTNESS: u32 = BASE;
    pub const CONTRAST: u32 = BASE + 1;
    pub const SATURATION: u32 = BASE + 2;
    pub const HUE: u32 = BASE + 3;
    pub const AUTO_WHITE_BALANCE: u32 = BASE + 12;
    pub const RED_BALANCE: u32 = BASE + 14;
    pub const BLUE_BALANCE: u32 = BASE + 15;
    pub const GAMMA: u32 = BASE + 16;
    pub const GAIN: u32 = BASE + 19;
    pub const POWER_LINE_FREQUENCY: u32 = BASE + 24;
    pub const HUE_AUTO: u32 = BASE + 25;
    pub const WHITE_BALANCE_TEMPERATURE: u32 = BASE + 26;
    pub const SHARPNESS: u32 = BASE + 27;
    pub const BACKLIGHT_COMPENSATION: u32 = BASE + 28;

    pub const EXPOSURE_AUTO: u32 = CAMERA_CLASS_BASE + 1;
    pub const EXPOSURE_ABSOLUTE: u32 = CAMERA_CLASS_BASE + 2;
    pub const EXPOSURE_AUTO_PRIORITY: u32 = CAMERA_CLASS_BASE + 3;
    pub const PAN_ABSOLUTE: u32 = CAMERA_CLASS_BASE + 8;
    pub const TILT_ABSOLUTE: u32 = CAMERA_CLASS_BASE + 9;
    pub const FOCUS_ABSOLUTE: u32 = CAMERA_CLASS_BASE + 10;
    pub const FOCUS_AUTO: u32 = CAMERA_CLASS_BASE + 12;
    pub const ZOOM_ABSOLUTE: u32 = CAMERA_CLASS_BASE + 13;
    pub const ZOOM_CONTINUOUS: u32 = CAMERA_CLASS_BASE + 15;
    pub const PRIVACY: u32 = CAMERA_CLASS_BASE + 16;
    pub const IRIS_ABSOLUTE: u32 = CAMERA_CLASS_BASE + 17;
    pub const IRIS_RELATIVE: u32 = CAMERA_CLASS_BASE + 18;
    pub const PAN_SPEED: u32 = CAMERA_CLASS_BASE + 32;
    pub const TILT_SPEED: u32 = CAMERA_CLASS_BASE + 33;

    /// `V4L2_EXPOSURE_MANUAL`: manual exposure time, manual iris.
    pub const EXPOSURE_MANUAL: i32 = 1;
}

/// Query flags carried in the upper bits of a V4L2 control id.
pub mod query_flags {
    /// Ask for the next control after the given id.
    pub const NEXT_CTRL: u32 = 0x8000_0000;
    /// Bits of a query id that name the control.
    pub const ID_MASK: u32 = 0x0fff_ffff;
}
