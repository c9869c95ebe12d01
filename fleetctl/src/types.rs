//! Common type definitions.
//!
//! # ID Types
//!
//! All entity IDs are `BIGSERIAL` primary keys wrapped in type aliases:
//!
//! - [`MachineId`]: Machine record identifier
//! - [`GroupId`]: Machine group identifier
//! - [`BrandId`]: Brand identifier
//! - [`MachineTypeId`]: Machine type identifier
//!
//! # Utility Functions
//!
//! - [`parse_id`]: Parse an identifier received from the request boundary

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Type aliases for IDs
pub type MachineId = i64;
pub type GroupId = i64;
pub type BrandId = i64;
pub type MachineTypeId = i64;

/// Parse an opaque numeric identifier as submitted by a browser.
///
/// Returns `None` for absent, empty or non-numeric input. Surrounding whitespace is ignored.
pub fn parse_id(raw: Option<&str>) -> Option<i64> {
    raw.map(str::trim).filter(|s| !s.is_empty()).and_then(|s| s.parse().ok())
}

/// Operational status of a machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MachineStatus {
    #[default]
    Active,
    Inactive,
    Maintenance,
    Reserved,
}

impl MachineStatus {
    pub const ALL: [MachineStatus; 4] = [
        MachineStatus::Active,
        MachineStatus::Inactive,
        MachineStatus::Maintenance,
        MachineStatus::Reserved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MachineStatus::Active => "Active",
            MachineStatus::Inactive => "Inactive",
            MachineStatus::Maintenance => "Maintenance",
            MachineStatus::Reserved => "Reserved",
        }
    }
}

impl fmt::Display for MachineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown machine status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for MachineStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MachineStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}
