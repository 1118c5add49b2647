//! Unit inspection commands

use anyhow::Result;

use crate::commands::UnitCommands;
use crate::output;
use crate::topology::Topology;

/// Execute unit command
pub fn execute(cmd: &UnitCommands, topology: &Topology, json: bool) -> Result<()> {
    match cmd {
        UnitCommands::List { detailed } => {
            let graph = topology.discover()?;
            output::print_unit_list(&graph, json, *detailed);
            Ok(())
        }
    }
}
