//! Fuzzes control discovery over device-reported unit descriptors.
//!
//! Each unit is a 4-byte header (entity kind, unit id, bitmap length,
//! control size) followed by its bitmap. Discovery, enumeration and menu
//! queries must never panic.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_discovery
#![no_main]
use libfuzzer_sys::fuzz_target;
use uvc_ctrl::{ControlsConfig, DeviceControls, EntityType, Guid, UnitDescriptor};

fn entity(code: u8) -> EntityType {
    match code % 5 {
        0 => EntityType::Camera,
        1 => EntityType::Processing,
        2 => EntityType::MediaTransportInput,
        3 => EntityType::Extension,
        _ => EntityType::Other(u16::from(code)),
    }
}

fuzz_target!(|data: &[u8]| {
    let mut units = Vec::new();
    let mut rest = data;
    while let [kind, id, len, size, tail @ ..] = rest {
        let len = usize::from(*len % 8).min(tail.len());
        let (bitmap, next) = tail.split_at(len);
        let mut unit = UnitDescriptor::new(*id, entity(*kind), bitmap.to_vec());
        if size & 0x80 != 0 {
            unit = unit.with_control_size(size & 0x7f);
        }
        if unit.entity_type == EntityType::Extension && size & 0x40 != 0 {
            unit = unit.with_extension_code(Guid::from_bytes([*size; 16]));
        }
        units.push(unit);
        rest = next;
    }

    let Ok(device) = DeviceControls::attach(units, ControlsConfig::default()) else {
        return;
    };
    if let Ok(controls) = device.enumerate() {
        for control in controls {
            for index in 0..4 {
                let _ = device.query_menu(control.id, index);
            }
        }
    }
    let _ = device.detach();
});
