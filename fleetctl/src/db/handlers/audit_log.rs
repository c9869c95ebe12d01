//! Database repository for the audit log.

use crate::db::{errors::Result, models::audit::AuditEntryDBResponse};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection};
use tracing::instrument;

#[derive(Debug, Clone, FromRow)]
struct AuditEntry {
    pub id: i64,
    pub action: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl From<AuditEntry> for AuditEntryDBResponse {
    fn from(entry: AuditEntry) -> Self {
        Self {
            id: entry.id,
            action: entry.action,
            description: entry.description,
            created_at: entry.created_at,
        }
    }
}

pub struct AuditEntries<'c> {
    db: &'c mut PgConnection,
}

impl<'c> AuditEntries<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self, description), fields(action = action), err)]
    pub async fn insert(&mut self, action: &str, description: &str) -> Result<AuditEntryDBResponse> {
        let entry = sqlx::query_as::<_, AuditEntry>("INSERT INTO audit_log (action, description) VALUES ($1, $2) RETURNING *")
            .bind(action)
            .bind(description)
            .fetch_one(&mut *self.db)
            .await?;

        Ok(AuditEntryDBResponse::from(entry))
    }

    /// Most recent entries first
    #[instrument(skip(self), err)]
    pub async fn list_recent(&mut self, limit: i64) -> Result<Vec<AuditEntryDBResponse>> {
        let entries = sqlx::query_as::<_, AuditEntry>("SELECT * FROM audit_log ORDER BY created_at DESC, id DESC LIMIT $1")
            .bind(limit)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(entries.into_iter().map(AuditEntryDBResponse::from).collect())
    }
}
