//! Error types for control discovery and control queries.
//!
//! Every variant maps onto the errno the ioctl dispatch layer hands back to
//! user space (see [`CtrlError::errno`]). Lookup misses and enumeration
//! exhaustion are kept apart here even though both surface as `EINVAL`.

use core::fmt;

/// Errors produced by the control engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CtrlError {
    /// Allocation failed while building the controls of a unit
    #[error("Out of memory while allocating {requested} bytes for unit {unit}")]
    OutOfMemory {
        /// Unit id whose setup was aborted
        unit: u8,
        /// Bytes requested by the failed allocation
        requested: usize,
    },

    /// No mapping with this control id exists on the device
    #[error("Control {id:#010x} not found")]
    NotFound {
        /// Requested control id
        id: u32,
    },

    /// Next-higher enumeration ran past the highest known control id
    #[error("No control after {after:#010x}")]
    EnumerationEnd {
        /// Control id the enumeration continued from
        after: u32,
    },

    /// Menu lookup on a control that is not a menu
    #[error("Control {id:#010x} is not a menu control")]
    NotAMenu {
        /// Requested control id
        id: u32,
    },

    /// Menu index past the last entry
    #[error("Menu index {index} out of range for control {id:#010x} ({count} entries)")]
    MenuIndexOutOfRange {
        /// Requested control id
        id: u32,
        /// Requested menu index
        index: u32,
        /// Number of menu entries
        count: usize,
    },

    /// Bitmask menu entry not advertised by the device resolution bitmap
    #[error("Menu entry {index} of control {id:#010x} is not supported by the device")]
    MenuEntryUnsupported {
        /// Requested control id
        id: u32,
        /// Requested menu index
        index: u32,
    },

    /// Cached slot value has the wrong length for its control
    #[error("Invalid {slot} data for control {selector:#04x}: expected {expected} bytes, got {actual}")]
    InvalidSlotData {
        /// Selector of the physical control
        selector: u8,
        /// Name of the slot being written
        slot: &'static str,
        /// Storage size declared by the catalog
        expected: usize,
        /// Length of the supplied value
        actual: usize,
    },

    /// The physical control has no catalog entry and therefore no storage
    #[error("Control at bit {bit_index} of unit {unit} is not initialized")]
    Uninitialized {
        /// Unit id
        unit: u8,
        /// Bit index in the unit capability bitmap
        bit_index: u32,
    },

    /// Control access is disabled by configuration
    #[error("Control access denied by configuration")]
    AccessDenied,
}

impl CtrlError {
    /// Get the error severity.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CtrlError::OutOfMemory { .. } => ErrorSeverity::Critical,
            CtrlError::NotFound { .. } => ErrorSeverity::Info,
            CtrlError::EnumerationEnd { .. } => ErrorSeverity::Info,
            CtrlError::NotAMenu { .. } => ErrorSeverity::Warning,
            CtrlError::MenuIndexOutOfRange { .. } => ErrorSeverity::Info,
            CtrlError::MenuEntryUnsupported { .. } => ErrorSeverity::Info,
            CtrlError::InvalidSlotData { .. } => ErrorSeverity::Error,
            CtrlError::Uninitialized { .. } => ErrorSeverity::Warning,
            CtrlError::AccessDenied => ErrorSeverity::Warning,
        }
    }

    /// errno value reported to user space by the dispatch layer.
    pub fn errno(&self) -> i32 {
        match self {
            CtrlError::OutOfMemory { .. } => libc::ENOMEM,
            CtrlError::AccessDenied => libc::ENXIO,
            CtrlError::NotFound { .. }
            | CtrlError::EnumerationEnd { .. }
            | CtrlError::NotAMenu { .. }
            | CtrlError::MenuIndexOutOfRange { .. }
            | CtrlError::MenuEntryUnsupported { .. }
            | CtrlError::InvalidSlotData { .. }
            | CtrlError::Uninitialized { .. } => libc::EINVAL,
        }
    }

    /// Check if this error only reports that a lookup came back empty.
    ///
    /// Both an unknown id and the end of a next-higher walk qualify.
    pub fn is_lookup_miss(&self) -> bool {
        matches!(
            self,
            CtrlError::NotFound { .. } | CtrlError::EnumerationEnd { .. }
        )
    }

    /// Create a not found error.
    pub fn not_found(id: u32) -> Self {
        CtrlError::NotFound { id }
    }

    /// Create an enumeration end error.
    pub fn enumeration_end(after: u32) -> Self {
        CtrlError::EnumerationEnd { after }
    }

    /// Create an out of memory error.
    pub fn out_of_memory(unit: u8, requested: usize) -> Self {
        CtrlError::OutOfMemory { unit, requested }
    }
}

/// Error severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ErrorSeverity {
    /// Expected outcome, no action required
    Info = 0,
    /// Caller misuse, may require attention
    Warning = 1,
    /// Operation failed
    Error = 2,
    /// Device setup is incomplete
    Critical = 3,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// A specialized `Result` type for control engine operations.
pub type Result<T> = std::result::Result<T, CtrlError>;
