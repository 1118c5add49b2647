//! Output formatting for CLI responses

use anyhow::Error;
use colored::*;
use serde_json::{Value, json};
use uvc_ctrl::{
    ControlDescription, ControlInfo, ControlType, DescriptionFlags, MappingTemplate, Unit,
    UnitGraph, UnitKind,
};

use crate::commands::ctrl::MenuLine;
use crate::error::CliError;

fn print_json(value: &Value, what: &str) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Failed to format {} as JSON: {}", what, e),
    }
}

/// Print error in JSON format
pub fn print_error_json(error: &Error) {
    let error_json = json!({
        "success": false,
        "error": {
            "message": error.to_string(),
            "type": error_type_name(error)
        }
    });
    print_json(&error_json, "error");
}

/// Print error in human-readable format
pub fn print_error_human(error: &Error) {
    eprintln!("{} {}", "Error:".red().bold(), error);

    // Print error chain if available
    let mut source = error.source();
    while let Some(err) = source {
        eprintln!("  {} {}", "Caused by:".yellow(), err);
        source = err.source();
    }
}

/// Print discovered units in specified format
pub fn print_unit_list(graph: &UnitGraph, json: bool, detailed: bool) {
    if json {
        let units: Vec<Value> = graph.units().iter().map(unit_json).collect();
        print_json(&json!({ "success": true, "units": units }), "unit list");
        return;
    }

    if graph.is_empty() {
        println!("{}", "No units found".yellow());
        return;
    }

    println!("{}", "Units:".bold());
    for unit in graph.units() {
        print_unit_human(unit, detailed);
    }
}

fn unit_json(unit: &Unit) -> Value {
    let controls: Vec<Value> = unit
        .controls()
        .iter()
        .map(|ctrl| {
            json!({
                "bit": ctrl.bit_index(),
                "selector": ctrl.selector(),
                "size": ctrl.info().map(|info| info.size),
                "mappings": ctrl.mappings().iter().map(|m| m.name.as_str()).collect::<Vec<_>>(),
            })
        })
        .collect();

    json!({
        "id": unit.id(),
        "name": unit.descriptor().name,
        "kind": unit.kind(),
        "guid": unit.guid().map(|guid| guid.to_string()),
        "controls": controls,
    })
}

fn print_unit_human(unit: &Unit, detailed: bool) {
    let marker = if unit.kind() == UnitKind::Unknown {
        "○".dimmed()
    } else {
        "●".green()
    };
    let name = if unit.descriptor().name.is_empty() {
        format!("Unit {}", unit.id())
    } else {
        unit.descriptor().name.clone()
    };
    let initialized = unit
        .controls()
        .iter()
        .filter(|ctrl| ctrl.is_initialized())
        .count();

    println!(
        "  {} {} ({:?}, id {}) {} controls, {} known",
        marker,
        name.bold(),
        unit.kind(),
        unit.id(),
        unit.controls().len(),
        initialized
    );

    if !detailed {
        return;
    }
    if let Some(guid) = unit.guid() {
        println!("    GUID: {}", guid.to_string().dimmed());
    }
    for ctrl in unit.controls() {
        match ctrl.info() {
            Some(info) => {
                let names: Vec<&str> = ctrl.mappings().iter().map(|m| m.name.as_str()).collect();
                println!(
                    "    bit {:>2}  selector {:#04x}  {} bytes  {}",
                    ctrl.bit_index(),
                    info.selector,
                    info.size,
                    names.join(", ")
                );
            }
            None => println!("    bit {:>2}  {}", ctrl.bit_index(), "unknown".dimmed()),
        }
    }
}

/// Print control descriptions in id order
pub fn print_control_list(controls: &[ControlDescription], json: bool, detailed: bool) {
    if json {
        print_json(
            &json!({ "success": true, "controls": controls }),
            "control list",
        );
        return;
    }

    if controls.is_empty() {
        println!("{}", "No controls found".yellow());
        return;
    }

    println!("{}", "Controls:".bold());
    for control in controls {
        print_control_line(control, detailed);
    }
}

/// Print a single control description
pub fn print_control(control: &ControlDescription, json: bool) {
    if json {
        print_json(&json!({ "success": true, "control": control }), "control");
    } else {
        print_control_line(control, true);
    }
}

fn print_control_line(control: &ControlDescription, detailed: bool) {
    let name = if control.flags.contains(DescriptionFlags::INACTIVE) {
        control.name.dimmed()
    } else {
        control.name.bold()
    };
    println!(
        "  {} {:<32} {}",
        format!("{:#010x}", control.id).cyan(),
        name,
        type_name(control.control_type)
    );

    if detailed {
        println!(
            "    min {} max {} step {} default {}",
            control.minimum, control.maximum, control.step, control.default_value
        );
        let flags = format_flags(control.flags);
        if !flags.is_empty() {
            println!("    flags: {}", flags.yellow());
        }
    }
}

fn type_name(control_type: ControlType) -> &'static str {
    match control_type {
        ControlType::Integer => "int",
        ControlType::Boolean => "bool",
        ControlType::Menu => "menu",
        ControlType::Button => "button",
        ControlType::Bitmask => "bitmask",
    }
}

fn format_flags(flags: DescriptionFlags) -> String {
    let mut names = Vec::new();
    if flags.contains(DescriptionFlags::READ_ONLY) {
        names.push("read-only");
    }
    if flags.contains(DescriptionFlags::WRITE_ONLY) {
        names.push("write-only");
    }
    if flags.contains(DescriptionFlags::INACTIVE) {
        names.push("inactive");
    }
    names.join(", ")
}

/// Print menu entries of one control
pub fn print_menu(id: u32, entries: &[MenuLine], json: bool) {
    if json {
        print_json(
            &json!({ "success": true, "control": id, "entries": entries }),
            "menu",
        );
        return;
    }

    if entries.is_empty() {
        println!("{}", "No supported menu entries".yellow());
        return;
    }
    for entry in entries {
        println!("  {:>2}: {}", entry.index, entry.name);
    }
}

/// Print the built-in mapping table
pub fn print_templates(templates: &[MappingTemplate], json: bool) {
    if json {
        let rows: Vec<Value> = templates
            .iter()
            .map(|t| {
                json!({
                    "id": t.id,
                    "name": t.name,
                    "entity": t.entity.to_string(),
                    "selector": t.selector,
                    "bits": t.bits,
                    "offset": t.offset,
                    "type": t.control_type,
                    "data_type": t.data_type,
                    "menu": t.menu.iter().map(|m| m.name).collect::<Vec<_>>(),
                    "master_id": t.master_id,
                    "slave_ids": t.slave_ids,
                })
            })
            .collect();
        print_json(&json!({ "success": true, "mappings": rows }), "mappings");
        return;
    }

    for t in templates {
        println!(
            "  {} {:<32} sel {:#04x}  {:>2} bits @ {:<2} {}",
            format!("{:#010x}", t.id).cyan(),
            t.name,
            t.selector,
            t.bits,
            t.offset,
            type_name(t.control_type)
        );
    }
}

/// Print the built-in physical control table
pub fn print_control_infos(infos: &[ControlInfo], json: bool) {
    if json {
        print_json(&json!({ "success": true, "controls": infos }), "controls");
        return;
    }

    for info in infos {
        println!(
            "  {}  bit {:>2}  sel {:#04x}  {} bytes",
            info.entity.to_string().dimmed(),
            info.index,
            info.selector,
            info.size
        );
    }
}

/// Get error type name for JSON output
fn error_type_name(error: &Error) -> String {
    let Some(cli_error) = error.downcast_ref::<CliError>() else {
        return "Error".to_string();
    };
    // Debug output starts with the variant name
    format!("{:?}", cli_error)
        .split(['(', ' ', '{'])
        .next()
        .unwrap_or("Unknown")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_type_name_uses_variant() {
        let err = Error::from(CliError::ControlNotFound("Hue".to_string()));
        assert_eq!(error_type_name(&err), "ControlNotFound");

        let err = anyhow::anyhow!("plain failure");
        assert_eq!(error_type_name(&err), "Error");
    }

    #[test]
    fn test_format_flags() {
        assert_eq!(format_flags(DescriptionFlags::empty()), "");
        assert_eq!(
            format_flags(DescriptionFlags::READ_ONLY | DescriptionFlags::INACTIVE),
            "read-only, inactive"
        );
    }
}
