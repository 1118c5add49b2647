//! Convenience re-exports for common test utilities.
//!
//! ```rust,ignore
//! use uvc_test_helpers::prelude::*;
//! ```

pub use crate::must::{must, must_err, must_some, must_with};

#[cfg(feature = "fixtures")]
pub use crate::fixtures::{
    VENDOR_XU_GUID, bitmap_from_bits, camera_terminal, extension_unit, generic_webcam,
    media_transport_input, processing_unit,
};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;
