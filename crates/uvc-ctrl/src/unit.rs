//! Units and terminals of a video function.

use serde::{Deserialize, Serialize};

use crate::control::PhysicalControl;
use crate::guid::Guid;
use crate::ids::{entity_types, guids};

/// Entity type as reported by the device descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Camera,
    MediaTransportInput,
    Processing,
    Extension,
    /// Any other terminal or unit type code.
    Other(u16),
}

impl EntityType {
    /// Decode a raw terminal type or unit subtype.
    pub fn from_code(code: u16) -> Self {
        match code {
            entity_types::ITT_CAMERA => EntityType::Camera,
            entity_types::ITT_MEDIA_TRANSPORT_INPUT => EntityType::MediaTransportInput,
            entity_types::VC_PROCESSING_UNIT => EntityType::Processing,
            entity_types::VC_EXTENSION_UNIT => EntityType::Extension,
            other => EntityType::Other(other),
        }
    }

    pub fn code(self) -> u16 {
        match self {
            EntityType::Camera => entity_types::ITT_CAMERA,
            EntityType::MediaTransportInput => entity_types::ITT_MEDIA_TRANSPORT_INPUT,
            EntityType::Processing => entity_types::VC_PROCESSING_UNIT,
            EntityType::Extension => entity_types::VC_EXTENSION_UNIT,
            EntityType::Other(code) => code,
        }
    }
}

/// What the descriptor parser knows about a unit before discovery.
///
/// Everything here comes from the device and is untrusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitDescriptor {
    pub id: u8,
    #[serde(default)]
    pub name: String,
    pub entity_type: EntityType,
    /// `guidExtensionCode`, only meaningful for extension units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension_code: Option<Guid>,
    /// `bmControls` capability bitmap, bit 0 is the LSB of byte 0.
    #[serde(default)]
    pub bm_controls: Vec<u8>,
    /// `bControlSize`; defaults to the bitmap length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_size: Option<u8>,
}

impl UnitDescriptor {
    pub fn new(id: u8, entity_type: EntityType, bm_controls: Vec<u8>) -> Self {
        Self {
            id,
            name: String::new(),
            entity_type,
            extension_code: None,
            bm_controls,
            control_size: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_extension_code(mut self, code: Guid) -> Self {
        self.extension_code = Some(code);
        self
    }

    #[must_use]
    pub fn with_control_size(mut self, size: u8) -> Self {
        self.control_size = Some(size);
        self
    }

    /// The part of the bitmap covered by the declared control size.
    pub fn bitmap(&self) -> &[u8] {
        let declared = self
            .control_size
            .map_or(self.bm_controls.len(), usize::from);
        self.bm_controls
            .get(..declared)
            .unwrap_or(&self.bm_controls)
    }

    /// GUID identifying the entity's control set.
    pub fn guid(&self) -> Option<Guid> {
        match self.entity_type {
            EntityType::Camera => Some(guids::CAMERA),
            EntityType::MediaTransportInput => Some(guids::MEDIA_TRANSPORT_INPUT),
            EntityType::Processing => Some(guids::PROCESSING),
            EntityType::Extension => self.extension_code,
            EntityType::Other(_) => None,
        }
    }
}

/// Classification of a unit for catalog matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    CameraTerminal,
    MediaTransportInput,
    Processing,
    Extension,
    Unknown,
}

impl UnitKind {
    /// Whether discovery creates controls for this kind.
    pub fn has_controls(self) -> bool {
        self != UnitKind::Unknown
    }
}

/// Check whether `guid` names the control set of `unit`.
///
/// Standard terminals and units match their class GUID; an extension unit
/// matches only its own reported extension code.
pub fn entity_matches_guid(unit: &UnitDescriptor, guid: &Guid) -> bool {
    unit.guid().is_some_and(|own| own == *guid)
}

/// Classify a unit by comparing its code against the well-known GUIDs.
pub fn classify(unit: &UnitDescriptor) -> UnitKind {
    match unit.entity_type {
        EntityType::Extension if unit.extension_code.is_some() => UnitKind::Extension,
        EntityType::Extension | EntityType::Other(_) => UnitKind::Unknown,
        _ if entity_matches_guid(unit, &guids::CAMERA) => UnitKind::CameraTerminal,
        _ if entity_matches_guid(unit, &guids::PROCESSING) => UnitKind::Processing,
        _ if entity_matches_guid(unit, &guids::MEDIA_TRANSPORT_INPUT) => {
            UnitKind::MediaTransportInput
        }
        _ => UnitKind::Unknown,
    }
}

/// A unit together with the controls discovery built for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    descriptor: UnitDescriptor,
    kind: UnitKind,
    pub(crate) controls: Vec<PhysicalControl>,
}

impl Unit {
    pub fn new(descriptor: UnitDescriptor) -> Self {
        let kind = classify(&descriptor);
        Self {
            descriptor,
            kind,
            controls: Vec::new(),
        }
    }

    pub fn id(&self) -> u8 {
        self.descriptor.id
    }

    pub fn descriptor(&self) -> &UnitDescriptor {
        &self.descriptor
    }

    pub fn kind(&self) -> UnitKind {
        self.kind
    }

    pub fn guid(&self) -> Option<Guid> {
        self.descriptor.guid()
    }

    pub fn controls(&self) -> &[PhysicalControl] {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut [PhysicalControl] {
        &mut self.controls
    }

    /// Physical control for a selector, if one was initialized.
    pub fn control_by_selector(&self, selector: u8) -> Option<&PhysicalControl> {
        self.controls
            .iter()
            .find(|ctrl| ctrl.selector() == Some(selector))
    }
}

/// All units of one video function, in descriptor order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitGraph {
    units: Vec<Unit>,
}

impl UnitGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_descriptors(descriptors: impl IntoIterator<Item = UnitDescriptor>) -> Self {
        Self {
            units: descriptors.into_iter().map(Unit::new).collect(),
        }
    }

    pub fn push(&mut self, descriptor: UnitDescriptor) {
        self.units.push(Unit::new(descriptor));
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn units_mut(&mut self) -> &mut [Unit] {
        &mut self.units
    }

    pub fn unit(&self, id: u8) -> Option<&Unit> {
        self.units.iter().find(|unit| unit.id() == id)
    }

    pub fn unit_mut(&mut self, id: u8) -> Option<&mut Unit> {
        self.units.iter_mut().find(|unit| unit.id() == id)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}
