//! Test utilities for repository, editor and HTTP tests.

use crate::audit::AuditLog;
use crate::config::{AuditSink, Config, PoolSettings};
use crate::db::handlers::Machines;
use crate::db::models::machines::MachineCreateDBRequest;
use crate::types::{BrandId, GroupId, MachineId, MachineStatus, MachineTypeId};
use axum_test::TestServer;
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::sync::Mutex;

pub async fn create_test_server(pool: PgPool) -> TestServer {
    let app = crate::Application::new_with_pool(create_test_config(), Some(pool))
        .await
        .expect("Failed to create application");

    app.into_test_server()
}

pub fn create_test_config() -> Config {
    let mut config = Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        ..Default::default()
    };
    config.database.pool = PoolSettings {
        max_connections: 1,
        min_connections: 1,
        ..Default::default()
    };
    config.audit.sink = AuditSink::Database;
    config
}

pub async fn create_test_machine_type(pool: &PgPool, name: &str) -> MachineTypeId {
    sqlx::query_scalar("INSERT INTO machine_types (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
        .expect("Failed to create test machine type")
}

pub async fn create_test_brand(pool: &PgPool, name: &str) -> BrandId {
    sqlx::query_scalar("INSERT INTO brands (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
        .expect("Failed to create test brand")
}

/// Create `count` machines numbered `T-001`, `T-002`, ... Ids are returned in ascending order.
pub async fn create_test_machines(pool: &PgPool, count: usize) -> Vec<MachineId> {
    let type_id = create_test_machine_type(pool, "Test Type").await;
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    let mut repo = Machines::new(&mut conn);

    let mut ids = Vec::with_capacity(count);
    for n in 1..=count {
        let machine = repo
            .create(&MachineCreateDBRequest {
                machine_number: format!("T-{n:03}"),
                brand_id: None,
                model: "Test Model".to_string(),
                type_id,
                credit_value: Decimal::new(1, 2),
                manufacturing_year: None,
                ip_address: None,
                mac_address: None,
                serial_number: None,
                status: MachineStatus::Active,
            })
            .await
            .expect("Failed to create test machine");
        ids.push(machine.id);
    }
    ids
}

pub async fn create_test_group(pool: &PgPool, name: &str, description: Option<&str>, members: &[MachineId]) -> GroupId {
    let group_id: GroupId = sqlx::query_scalar("INSERT INTO machine_groups (name, description) VALUES ($1, $2) RETURNING id")
        .bind(name)
        .bind(description)
        .fetch_one(pool)
        .await
        .expect("Failed to create test group");

    for machine_id in members {
        sqlx::query("INSERT INTO machine_group_members (group_id, machine_id) VALUES ($1, $2)")
            .bind(group_id)
            .bind(machine_id)
            .execute(pool)
            .await
            .expect("Failed to add test group member");
    }

    group_id
}

/// Records audit entries in memory
#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    entries: Mutex<Vec<(String, String)>>,
}

impl MemoryAuditLog {
    pub fn entries(&self) -> Vec<(String, String)> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl AuditLog for MemoryAuditLog {
    async fn record(&self, action: &str, description: &str) {
        self.entries
            .lock()
            .unwrap()
            .push((action.to_string(), description.to_string()));
    }
}
