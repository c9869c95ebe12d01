//! Database models for the audit log.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct AuditEntryDBResponse {
    pub id: i64,
    pub action: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}
