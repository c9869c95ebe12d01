//! Database models for machines.

use crate::types::{BrandId, MachineId, MachineStatus, MachineTypeId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Database request for creating a new machine.
///
/// Optional fields left as `None` are stored as `NULL`.
#[derive(Debug, Clone)]
pub struct MachineCreateDBRequest {
    pub machine_number: String,
    pub brand_id: Option<BrandId>,
    pub model: String,
    pub type_id: MachineTypeId,
    pub credit_value: Decimal,
    pub manufacturing_year: Option<i32>,
    pub ip_address: Option<String>,
    pub mac_address: Option<String>,
    pub serial_number: Option<String>,
    pub status: MachineStatus,
}

/// Database response for a machine
#[derive(Debug, Clone)]
pub struct MachineDBResponse {
    pub id: MachineId,
    pub machine_number: String,
    pub brand_id: Option<BrandId>,
    pub model: String,
    pub type_id: MachineTypeId,
    pub credit_value: Decimal,
    pub manufacturing_year: Option<i32>,
    pub ip_address: Option<String>,
    pub mac_address: Option<String>,
    pub serial_number: Option<String>,
    pub status: MachineStatus,
    pub created_at: DateTime<Utc>,
}

/// A machine with its brand and type names resolved, for listings and selection inputs
#[derive(Debug, Clone)]
pub struct MachineListingDBResponse {
    pub id: MachineId,
    pub machine_number: String,
    pub model: String,
    pub status: MachineStatus,
    pub brand_name: Option<String>,
    pub type_name: Option<String>,
}
