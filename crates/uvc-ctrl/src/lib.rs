//! USB Video Class control discovery and V4L2 control mapping.
//!
//! This crate is I/O-free. It takes the units a descriptor parser found on a
//! camera, works out which controls each unit advertises in its
//! `bmControls` bitmap, and exposes them as V4L2 controls: ids, names,
//! types, bounds, menus and auto/manual gating.
//!
//! ## Flow
//!
//! 1. The descriptor parser hands over [`UnitDescriptor`]s.
//! 2. [`discover`] builds one [`PhysicalControl`] per set capability bit,
//!    resolves it against [`catalog::CONTROLS`] and attaches every matching
//!    [`catalog::MAPPINGS`] row as an owned [`ControlMapping`].
//! 3. The dispatch layer resolves ids with [`find`] (exact or next-higher)
//!    and turns them into [`ControlDescription`]s with [`describe`].
//!
//! [`DeviceControls`] wraps all of this behind the per-device lock.
//!
//! ```
//! use uvc_ctrl::{ControlsConfig, DeviceControls, EntityType, UnitDescriptor, ids::cid};
//!
//! let pu = UnitDescriptor::new(2, EntityType::Processing, vec![0b0000_0101]);
//! let device = DeviceControls::attach([pu], ControlsConfig::default())?;
//! let hue = device.query_ctrl(cid::HUE)?;
//! assert_eq!(hue.name, "Hue");
//! # Ok::<(), uvc_ctrl::CtrlError>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(static_mut_refs)]
#![deny(clippy::unwrap_used)]

pub mod catalog;
pub mod config;
pub mod control;
pub mod device;
pub mod discovery;
pub mod error;
pub mod guid;
pub mod ids;
pub mod lookup;
pub mod query;
mod reserve;
pub mod unit;

pub use catalog::{ControlFlags, ControlInfo, ControlType, DataType, MappingTemplate, MenuInfo};
pub use config::ControlsConfig;
pub use control::{ControlData, ControlMapping, LoadedSlots, MenuEntry, PhysicalControl, Slot};
pub use device::{ControlsGuard, DeviceControls};
pub use discovery::{count_controls, discover, lookup_info, set_bits, test_bit};
pub use error::{CtrlError, ErrorSeverity, Result};
pub use guid::Guid;
pub use lookup::{ControlRef, FindMode, find, find_in_unit, split_query_id};
pub use query::{
    ControlDescription, DescriptionFlags, describe, describe_ref, is_inactive, query_menu,
    read_slot,
};
pub use unit::{
    EntityType, Unit, UnitDescriptor, UnitGraph, UnitKind, classify, entity_matches_guid,
};
