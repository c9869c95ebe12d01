//! Database models for machine groups and their memberships.

use crate::types::GroupId;
use chrono::{DateTime, Utc};

/// Database request for updating a group's attributes
#[derive(Debug, Clone)]
pub struct GroupUpdateDBRequest {
    pub name: String,
    /// `None` clears the description
    pub description: Option<String>,
}

/// Database response for a group
#[derive(Debug, Clone)]
pub struct GroupDBResponse {
    pub id: GroupId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A group together with the number of machines in it, for listings
#[derive(Debug, Clone)]
pub struct GroupSummaryDBResponse {
    pub id: GroupId,
    pub name: String,
    pub description: Option<String>,
    pub member_count: i64,
}
