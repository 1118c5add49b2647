//! Control lookup by V4L2 id.

use crate::control::{ControlMapping, PhysicalControl};
use crate::ids::query_flags;
use crate::unit::{Unit, UnitGraph};

/// How a requested id is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FindMode {
    /// The mapping whose id equals the request.
    Exact,
    /// The mapping with the smallest id strictly greater than the request.
    Next,
}

/// Split a raw query id into the control id and the lookup mode.
pub fn split_query_id(raw: u32) -> (u32, FindMode) {
    let mode = if raw & query_flags::NEXT_CTRL != 0 {
        FindMode::Next
    } else {
        FindMode::Exact
    };
    (raw & query_flags::ID_MASK, mode)
}

/// A resolved lookup: the mapping and the control and unit that own it.
#[derive(Debug, Clone, Copy)]
pub struct ControlRef<'a> {
    pub unit: &'a Unit,
    pub control: &'a PhysicalControl,
    pub mapping: &'a ControlMapping,
}

/// Position of a mapping inside a [`UnitGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Position {
    pub unit: usize,
    pub control: usize,
    pub mapping: usize,
}

fn initialized(unit: &Unit) -> impl Iterator<Item = (usize, &PhysicalControl)> {
    unit.controls()
        .iter()
        .enumerate()
        .filter(|(_, ctrl)| ctrl.is_initialized())
}

pub(crate) fn locate(graph: &UnitGraph, id: u32, mode: FindMode) -> Option<Position> {
    let mut best: Option<(u32, Position)> = None;

    for (u, unit) in graph.units().iter().enumerate() {
        for (c, ctrl) in initialized(unit) {
            for (m, mapping) in ctrl.mappings().iter().enumerate() {
                let pos = Position {
                    unit: u,
                    control: c,
                    mapping: m,
                };
                match mode {
                    FindMode::Exact if mapping.id == id => return Some(pos),
                    FindMode::Exact => {}
                    FindMode::Next => {
                        let better = best.is_none_or(|(best_id, _)| mapping.id < best_id);
                        if mapping.id > id && better {
                            best = Some((mapping.id, pos));
                        }
                    }
                }
            }
        }
    }

    best.map(|(_, pos)| pos)
}

pub(crate) fn resolve(graph: &UnitGraph, pos: Position) -> Option<ControlRef<'_>> {
    let unit = graph.units().get(pos.unit)?;
    let control = unit.controls().get(pos.control)?;
    let mapping = control.mappings().get(pos.mapping)?;
    Some(ControlRef {
        unit,
        control,
        mapping,
    })
}

/// Find a mapping across every unit of the device.
///
/// Units are searched in order, then controls, then mappings. In
/// [`FindMode::Exact`] the first match wins. In [`FindMode::Next`] the
/// smallest id above `id` wins, and among equal ids the first one found.
/// Uninitialized controls are skipped.
pub fn find(graph: &UnitGraph, id: u32, mode: FindMode) -> Option<ControlRef<'_>> {
    locate(graph, id, mode).and_then(|pos| resolve(graph, pos))
}

/// Find a mapping with exactly `id` inside one unit.
pub fn find_in_unit(unit: &Unit, id: u32) -> Option<(&PhysicalControl, &ControlMapping)> {
    initialized(unit).find_map(|(_, ctrl)| {
        ctrl.mappings()
            .iter()
            .find(|mapping| mapping.id == id)
            .map(|mapping| (ctrl, mapping))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_query_id() {
        assert_eq!(split_query_id(0x0098_0900), (0x0098_0900, FindMode::Exact));
        assert_eq!(
            split_query_id(0x8098_0900),
            (0x0098_0900, FindMode::Next)
        );
        // Reserved bits between the flag and the id are dropped.
        assert_eq!(split_query_id(0x7000_0001), (1, FindMode::Exact));
    }

    #[test]
    fn test_find_in_empty_graph() {
        let graph = UnitGraph::new();
        assert!(find(&graph, 0, FindMode::Next).is_none());
        assert!(find(&graph, 0x0098_0900, FindMode::Exact).is_none());
    }
}
