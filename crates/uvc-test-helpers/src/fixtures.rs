//! Unit descriptor builders and sample device topologies.

use uvc_ctrl::{EntityType, Guid, UnitDescriptor};

/// Vendor GUID used by the sample extension unit.
pub const VENDOR_XU_GUID: Guid = Guid::from_bytes([
    0xc7, 0x73, 0x10, 0x96, 0xf7, 0x49, 0xf2, 0x44, 0xab, 0x42, 0xe9, 0x40, 0x40, 0x59, 0x40, 0xc2,
]);

/// Build a little-endian capability bitmap with the given bits set.
///
/// The bitmap is just long enough to hold the highest bit.
pub fn bitmap_from_bits(bits: &[usize]) -> Vec<u8> {
    let len = bits.iter().max().map_or(0, |max| max / 8 + 1);
    let mut bitmap = vec![0u8; len];
    for bit in bits {
        if let Some(byte) = bitmap.get_mut(bit / 8) {
            *byte |= 1 << (bit % 8);
        }
    }
    bitmap
}

pub fn processing_unit(id: u8, bits: &[usize]) -> UnitDescriptor {
    UnitDescriptor::new(id, EntityType::Processing, bitmap_from_bits(bits))
        .with_name("Processing Unit")
}

pub fn camera_terminal(id: u8, bits: &[usize]) -> UnitDescriptor {
    UnitDescriptor::new(id, EntityType::Camera, bitmap_from_bits(bits)).with_name("Camera")
}

pub fn media_transport_input(id: u8, bits: &[usize]) -> UnitDescriptor {
    UnitDescriptor::new(id, EntityType::MediaTransportInput, bitmap_from_bits(bits))
        .with_name("Media Transport Input")
}

pub fn extension_unit(id: u8, code: Guid, bits: &[usize]) -> UnitDescriptor {
    UnitDescriptor::new(id, EntityType::Extension, bitmap_from_bits(bits))
        .with_name("Extension Unit")
        .with_extension_code(code)
}

/// Camera terminal bits of the sample webcam: AE mode, AE priority,
/// exposure, focus, zoom, pan/tilt, auto focus, privacy.
pub const WEBCAM_CAMERA_BITS: &[usize] = &[1, 2, 3, 5, 9, 11, 17, 18];

/// Processing unit bits of the sample webcam: everything up to the white
/// balance component auto control.
pub const WEBCAM_PROCESSING_BITS: &[usize] = &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13];

/// A typical webcam: camera terminal, processing unit, a vendor extension
/// unit and an output terminal.
pub fn generic_webcam() -> Vec<UnitDescriptor> {
    vec![
        camera_terminal(1, WEBCAM_CAMERA_BITS),
        processing_unit(2, WEBCAM_PROCESSING_BITS),
        extension_unit(3, VENDOR_XU_GUID, &[0, 1, 2, 3]),
        UnitDescriptor::new(4, EntityType::Other(0x0101), vec![0xff]).with_name("USB Streaming"),
    ]
}
