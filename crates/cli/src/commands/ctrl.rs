//! Control query commands

use anyhow::Result;
use serde::Serialize;
use tracing::debug;
use uvc_ctrl::catalog::MAPPINGS;
use uvc_ctrl::ids::query_flags;
use uvc_ctrl::{CtrlError, DeviceControls};

use crate::commands::CtrlCommands;
use crate::error::CliError;
use crate::output;
use crate::topology::Topology;

/// One printable menu entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuLine {
    pub index: u32,
    pub name: String,
}

/// Execute control command
pub fn execute(cmd: &CtrlCommands, topology: &Topology, deny_access: bool, json: bool) -> Result<()> {
    let device = topology.attach(deny_access)?;

    match cmd {
        CtrlCommands::List { detailed } => list_controls(&device, json, *detailed),
        CtrlCommands::Query { control, next } => query_control(&device, control, *next, json),
        CtrlCommands::Menu { control, index } => show_menu(&device, control, *index, json),
    }
}

/// Resolve a control argument: decimal, `0x` hex or a catalog name.
pub fn parse_control_id(text: &str) -> Result<u32, CliError> {
    let trimmed = text.trim();
    if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        return u32::from_str_radix(hex, 16)
            .map_err(|err| CliError::InvalidControlId(format!("{text}: {err}")));
    }
    if trimmed.starts_with(|c: char| c.is_ascii_digit()) {
        return trimmed
            .parse()
            .map_err(|err| CliError::InvalidControlId(format!("{text}: {err}")));
    }

    MAPPINGS
        .iter()
        .find(|template| template.name.eq_ignore_ascii_case(trimmed))
        .map(|template| template.id)
        .ok_or_else(|| CliError::ControlNotFound(text.to_string()))
}

fn list_controls(device: &DeviceControls, json: bool, detailed: bool) -> Result<()> {
    let controls = device
        .enumerate()
        .map_err(|err| CliError::from_ctrl(err, "all controls"))?;
    output::print_control_list(&controls, json, detailed);
    Ok(())
}

fn query_control(device: &DeviceControls, control: &str, next: bool, json: bool) -> Result<()> {
    let id = parse_control_id(control)?;
    let raw = if next {
        id | query_flags::NEXT_CTRL
    } else {
        id
    };
    debug!("Querying control {raw:#010x}");

    let description = device
        .query_ctrl(raw)
        .map_err(|err| CliError::from_ctrl(err, control))?;
    output::print_control(&description, json);
    Ok(())
}

fn show_menu(device: &DeviceControls, control: &str, index: Option<u32>, json: bool) -> Result<()> {
    let id = parse_control_id(control)?;
    let guard = device
        .lock()
        .map_err(|err| CliError::from_ctrl(err, control))?;

    let entries = match index {
        Some(index) => {
            let name = guard
                .query_menu(id, index)
                .map_err(|err| CliError::from_ctrl(err, control))?;
            vec![MenuLine {
                index,
                name: name.to_string(),
            }]
        }
        None => {
            let mut entries = Vec::new();
            for index in 0.. {
                match guard.query_menu(id, index) {
                    Ok(name) => entries.push(MenuLine {
                        index,
                        name: name.to_string(),
                    }),
                    Err(CtrlError::MenuEntryUnsupported { .. }) => {
                        debug!("Skipping unsupported menu entry {index} of {id:#010x}");
                    }
                    Err(CtrlError::MenuIndexOutOfRange { .. }) => break,
                    Err(err) => return Err(CliError::from_ctrl(err, control).into()),
                }
            }
            entries
        }
    };

    output::print_menu(id, &entries, json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uvc_ctrl::ids::cid;

    #[test]
    fn test_parse_numeric_ids() -> Result<(), CliError> {
        assert_eq!(parse_control_id("0x00980900")?, cid::BRIGHTNESS);
        assert_eq!(parse_control_id("0X980903")?, cid::HUE);
        assert_eq!(parse_control_id("9963776")?, cid::BRIGHTNESS);
        Ok(())
    }

    #[test]
    fn test_parse_names_ignore_case() -> Result<(), CliError> {
        assert_eq!(parse_control_id("hue")?, cid::HUE);
        assert_eq!(parse_control_id("Power Line Frequency")?, cid::POWER_LINE_FREQUENCY);
        Ok(())
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_control_id("0xzz"),
            Err(CliError::InvalidControlId(_))
        ));
        assert!(matches!(
            parse_control_id("12ab"),
            Err(CliError::InvalidControlId(_))
        ));
        assert!(matches!(
            parse_control_id("Warp Drive"),
            Err(CliError::ControlNotFound(_))
        ));
    }
}
