//! Error types for uvcctl CLI

use thiserror::Error;
use uvc_ctrl::CtrlError;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Control not found: {0}")]
    ControlNotFound(String),

    #[error("Invalid control id: {0}")]
    InvalidControlId(String),

    #[error("Topology not found: {0}")]
    TopologyNotFound(String),

    #[error("Invalid topology: {0}")]
    InvalidTopology(String),

    #[error("Unsupported topology format: {0} (expected .json, .yaml or .yml)")]
    UnsupportedFormat(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Control error: {0}")]
    Control(#[from] CtrlError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map an engine error onto the CLI error the user should see.
    pub fn from_ctrl(err: CtrlError, control: &str) -> Self {
        match err {
            CtrlError::NotFound { .. } | CtrlError::EnumerationEnd { .. } => {
                CliError::ControlNotFound(control.to_string())
            }
            CtrlError::AccessDenied => {
                CliError::PermissionDenied("control access is disabled".to_string())
            }
            other => CliError::Control(other),
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::ControlNotFound(_) | CliError::InvalidControlId(_) => 2,
            CliError::TopologyNotFound(_) => 3,
            CliError::InvalidTopology(_)
            | CliError::UnsupportedFormat(_)
            | CliError::JsonError(_)
            | CliError::YamlError(_) => 4,
            CliError::Control(_) => 5,
            CliError::PermissionDenied(_) => 6,
            CliError::IoError(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_misses_become_control_not_found() {
        let err = CliError::from_ctrl(CtrlError::not_found(0x0098_0900), "Brightness");
        assert!(matches!(err, CliError::ControlNotFound(ref name) if name == "Brightness"));
        assert_eq!(err.exit_code(), 2);

        let err = CliError::from_ctrl(CtrlError::enumeration_end(0x0098_0900), "next");
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_access_denied_exit_code() {
        let err = CliError::from_ctrl(CtrlError::AccessDenied, "Hue");
        assert_eq!(err.exit_code(), 6);
    }

    #[test]
    fn test_menu_errors_keep_engine_message() {
        let err = CliError::from_ctrl(CtrlError::NotAMenu { id: 0x0098_0900 }, "Brightness");
        insta::assert_snapshot!(
            err.to_string(),
            @"Control error: Control 0x00980900 is not a menu control"
        );
    }
}
