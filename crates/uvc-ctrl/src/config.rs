//! Per-device control configuration.

use serde::{Deserialize, Serialize};

/// Settings injected when a device's controls are attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    /// When false every control query is refused with
    /// [`CtrlError::AccessDenied`](crate::CtrlError::AccessDenied).
    pub access_allowed: bool,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            access_allowed: true,
        }
    }
}

impl ControlsConfig {
    /// Configuration that refuses all control access.
    pub fn denied() -> Self {
        Self {
            access_allowed: false,
        }
    }
}
