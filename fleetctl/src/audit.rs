//! Audit logging of mutations.
//!
//! An [`AuditLog`] receives one entry per successful mutation: an action tag such as
//! `create_machine` and a free-text description. Recording is fire-and-forget; a sink that
//! fails reports the failure in the application log and the request carries on.

use crate::db::handlers::AuditEntries;
use sqlx::PgPool;

#[async_trait::async_trait]
pub trait AuditLog: Send + Sync {
    async fn record(&self, action: &str, description: &str);
}

/// Writes audit entries to the `audit_log` table.
#[derive(Debug, Clone)]
pub struct PgAuditLog {
    db: PgPool,
}

impl PgAuditLog {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl AuditLog for PgAuditLog {
    async fn record(&self, action: &str, description: &str) {
        let mut conn = match self.db.acquire().await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!(action, "Failed to acquire connection for audit entry: {}", e);
                return;
            }
        };

        if let Err(e) = AuditEntries::new(&mut conn).insert(action, description).await {
            tracing::warn!(action, "Failed to record audit entry: {}", e);
        }
    }
}

/// Emits audit entries as tracing events on the `audit` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditLog;

#[async_trait::async_trait]
impl AuditLog for TracingAuditLog {
    async fn record(&self, action: &str, description: &str) {
        tracing::info!(target: "audit", action, "{}", description);
    }
}
