//! Fault-list entries

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One entry of the heat pump's fault list
///
/// Produced by the fault-list read operations; a read-only result value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultEntry {
    /// Position of the entry inside the device's fault list.
    pub index: u32,
    /// Manufacturer-defined error code.
    pub error_code: u32,
    /// When the fault occurred, in device-local time.
    pub timestamp: NaiveDateTime,
    /// Error message text, e.g. `EQ_Spreizung`.
    pub message: String,
}

impl fmt::Display for FaultEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} (code {}) [{}]: {}",
            self.index,
            self.error_code,
            self.timestamp.format("%Y-%m-%dT%H:%M:%S"),
            self.message
        )
    }
}
