//! Discovery over realistic unit topologies.

use uvc_ctrl::ids::{cid, ct, guids, pu};
use uvc_ctrl::{
    ControlFlags, CtrlError, EntityType, PhysicalControl, UnitDescriptor, UnitGraph, UnitKind,
    discover, set_bits,
};
use uvc_test_helpers::prelude::*;

fn discovered(units: Vec<UnitDescriptor>) -> UnitGraph {
    let mut graph = UnitGraph::from_descriptors(units);
    must(discover(&mut graph));
    graph
}

fn mapping_ids(ctrl: &PhysicalControl) -> Vec<u32> {
    ctrl.mappings().iter().map(|m| m.id).collect()
}

#[test]
fn test_processing_unit_brightness_and_hue() -> TestResult {
    let graph = discovered(vec![processing_unit(2, &[0, 2])]);
    let unit = graph.unit(2).ok_or("unit 2 missing")?;

    assert_eq!(unit.kind(), UnitKind::Processing);
    assert_eq!(unit.controls().len(), 2);
    let bits: Vec<u32> = unit.controls().iter().map(PhysicalControl::bit_index).collect();
    assert_eq!(bits, vec![0, 2]);

    let brightness = unit
        .control_by_selector(pu::BRIGHTNESS_CONTROL)
        .ok_or("brightness missing")?;
    assert_eq!(mapping_ids(brightness), vec![cid::BRIGHTNESS]);

    let hue = unit.control_by_selector(pu::HUE_CONTROL).ok_or("hue missing")?;
    let hue_mapping = hue.mappings().first().ok_or("hue mapping missing")?;
    assert_eq!(hue.mappings().len(), 1);
    assert_eq!(hue_mapping.id, cid::HUE);
    assert_eq!(hue_mapping.master_id, Some(cid::HUE_AUTO));
    assert!(hue_mapping.is_gated());
    Ok(())
}

#[test]
fn test_storage_is_six_slots_plus_scratch() -> TestResult {
    let graph = discovered(vec![camera_terminal(1, &[11])]);
    let unit = graph.unit(1).ok_or("camera missing")?;
    let pantilt = unit
        .control_by_selector(ct::PANTILT_ABSOLUTE_CONTROL)
        .ok_or("pan/tilt missing")?;

    let info = pantilt.info().ok_or("pan/tilt not initialized")?;
    let data = pantilt.data().ok_or("pan/tilt has no storage")?;
    assert_eq!(info.size, 8);
    assert_eq!(data.len(), 8 * 6 + 1);
    assert!(data.loaded().is_empty());
    assert_eq!(
        mapping_ids(pantilt),
        vec![cid::PAN_ABSOLUTE, cid::TILT_ABSOLUTE]
    );
    Ok(())
}

#[test]
fn test_shared_register_keeps_catalog_order() -> TestResult {
    let graph = discovered(vec![processing_unit(2, &[7])]);
    let unit = graph.unit(2).ok_or("unit 2 missing")?;
    let component = unit
        .control_by_selector(pu::WHITE_BALANCE_COMPONENT_CONTROL)
        .ok_or("white balance component missing")?;
    assert_eq!(
        mapping_ids(component),
        vec![cid::BLUE_BALANCE, cid::RED_BALANCE]
    );
    let offsets: Vec<u32> = component.mappings().iter().map(|m| m.bit_offset).collect();
    assert_eq!(offsets, vec![0, 16]);
    Ok(())
}

#[test]
fn test_extension_unit_controls_are_never_resolved() -> TestResult {
    // Bits 0 and 2 would be brightness and hue on a processing unit.
    let xu = extension_unit(3, guids::PROCESSING, &[0, 2]);
    let graph = discovered(vec![xu]);
    let unit = graph.unit(3).ok_or("xu missing")?;

    assert_eq!(unit.kind(), UnitKind::Extension);
    assert_eq!(unit.controls().len(), 2);
    for ctrl in unit.controls() {
        assert!(!ctrl.is_initialized());
        assert!(ctrl.data().is_none());
        assert!(ctrl.mappings().is_empty());
    }
    Ok(())
}

#[test]
fn test_webcam_vendor_extension_keeps_its_guid() -> TestResult {
    let mut graph = UnitGraph::from_descriptors(generic_webcam());
    must_with(discover(&mut graph), "webcam discovery");

    let xu = graph.unit(3).ok_or("vendor xu missing")?;
    assert_eq!(xu.kind(), UnitKind::Extension);
    assert_eq!(xu.guid(), Some(VENDOR_XU_GUID));
    assert_eq!(
        VENDOR_XU_GUID.to_string(),
        "961073c7-49f7-44f2-ab42-e940405940c2"
    );
    assert_eq!(xu.controls().len(), 4);
    assert!(xu.controls().iter().all(|ctrl| !ctrl.is_initialized()));
    Ok(())
}

#[test]
fn test_unknown_entities_get_no_controls() -> TestResult {
    let ot = UnitDescriptor::new(4, EntityType::Other(0x0301), vec![0xff, 0xff]);
    let bare_xu = UnitDescriptor::new(5, EntityType::Extension, vec![0xff]);
    let graph = discovered(vec![ot, bare_xu]);
    assert!(graph.units().iter().all(|u| u.controls().is_empty()));
    assert!(graph.units().iter().all(|u| u.kind() == UnitKind::Unknown));
    Ok(())
}

#[test]
fn test_media_transport_input_is_walked() -> TestResult {
    // No catalog rows exist for this entity, so bits stay uninitialized.
    let graph = discovered(vec![media_transport_input(7, &[0, 1, 2])]);
    let unit = graph.unit(7).ok_or("mti missing")?;
    assert_eq!(unit.kind(), UnitKind::MediaTransportInput);
    assert_eq!(unit.controls().len(), 3);
    assert!(unit.controls().iter().all(|c| !c.is_initialized()));
    Ok(())
}

#[test]
fn test_control_size_limits_the_bitmap() -> TestResult {
    let desc = processing_unit(2, &[0, 9]).with_control_size(1);
    let graph = discovered(vec![desc]);
    let unit = graph.unit(2).ok_or("unit 2 missing")?;
    assert_eq!(unit.controls().len(), 1);
    Ok(())
}

#[test]
fn test_generic_webcam() -> TestResult {
    let graph = discovered(generic_webcam());

    let counts: Vec<usize> = graph.units().iter().map(|u| u.controls().len()).collect();
    assert_eq!(counts, vec![8, 14, 4, 0]);

    let mappings: usize = graph
        .units()
        .iter()
        .flat_map(|u| u.controls())
        .map(|c| c.mappings().len())
        .sum();
    assert_eq!(mappings, 24);

    let camera = graph.unit(1).ok_or("camera missing")?;
    let ae_mode = camera
        .control_by_selector(ct::AE_MODE_CONTROL)
        .ok_or("ae mode missing")?;
    let flags = ae_mode.info().map(|i| i.flags).ok_or("ae mode uninitialized")?;
    assert!(flags.contains(ControlFlags::GET_RES));
    assert!(!flags.contains(ControlFlags::GET_MIN));
    Ok(())
}

#[test]
fn test_discovered_bits_match_bitmap() {
    let graph = discovered(generic_webcam());
    for unit in graph.units().iter().filter(|u| u.kind().has_controls()) {
        let expected: Vec<u32> = set_bits(unit.descriptor().bitmap())
            .map(|b| must(u32::try_from(b)))
            .collect();
        let actual: Vec<u32> = unit.controls().iter().map(PhysicalControl::bit_index).collect();
        assert_eq!(actual, expected, "unit {}", unit.id());
    }
}

#[test]
fn test_out_of_memory_errno() {
    assert_eq!(CtrlError::out_of_memory(2, 13).errno(), libc::ENOMEM);
}
