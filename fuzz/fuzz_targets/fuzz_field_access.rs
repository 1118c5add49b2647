//! Fuzzes bit-field reads and writes on arbitrary control buffers.
//!
//! Field geometry comes from the first three bytes, the rest is the buffer.
//! Must never panic.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_field_access
#![no_main]
use libfuzzer_sys::fuzz_target;
use uvc_ctrl::{ControlMapping, ControlType, DataType};

fuzz_target!(|data: &[u8]| {
    let [bits, offset, signed, tail @ ..] = data else {
        return;
    };

    let mapping = ControlMapping {
        id: 1,
        name: String::from("fuzz"),
        bit_width: u32::from(*bits),
        bit_offset: u32::from(*offset),
        control_type: ControlType::Integer,
        data_type: if signed & 1 == 1 {
            DataType::Signed
        } else {
            DataType::Unsigned
        },
        menu: Vec::new(),
        master_id: None,
        master_manual: 0,
        slave_ids: Vec::new(),
    };

    let value = mapping.read_field(tail);
    let mut buf = tail.to_vec();
    mapping.write_field(value, &mut buf);
});
