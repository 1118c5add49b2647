//! Static catalog listing

use anyhow::Result;
use uvc_ctrl::catalog::{CONTROLS, MAPPINGS};

use crate::output;

/// Print the built-in mapping table, or the physical control table with
/// `physical` set.
pub fn execute(physical: bool, json: bool) -> Result<()> {
    if physical {
        output::print_control_infos(CONTROLS, json);
    } else {
        output::print_templates(MAPPINGS, json);
    }
    Ok(())
}
