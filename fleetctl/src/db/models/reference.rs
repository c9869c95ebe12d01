//! Database models for read-only reference data (brands, machine types).

/// A brand or machine type row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceDBResponse {
    pub id: i64,
    pub name: String,
}
