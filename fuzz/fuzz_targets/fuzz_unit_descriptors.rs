//! Fuzzes unit descriptor deserialization from JSON and YAML.
//!
//! Must never panic, whatever the descriptors claim.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_unit_descriptors
#![no_main]
use libfuzzer_sys::fuzz_target;
use uvc_ctrl::{ControlsConfig, DeviceControls, UnitDescriptor};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let parsed = serde_json::from_str::<Vec<UnitDescriptor>>(text)
        .ok()
        .or_else(|| serde_yaml::from_str::<Vec<UnitDescriptor>>(text).ok());

    if let Some(units) = parsed
        && let Ok(device) = DeviceControls::attach(units, ControlsConfig::default())
    {
        let _ = device.enumerate();
    }
});
