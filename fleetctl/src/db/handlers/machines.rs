//! Database repository for machine records.

use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::machines::{MachineCreateDBRequest, MachineDBResponse, MachineListingDBResponse},
};
use crate::types::{BrandId, MachineId, MachineStatus, MachineTypeId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgConnection};
use tracing::instrument;

/// Filter for listing machines
#[derive(Debug, Clone)]
pub struct MachineFilter {
    pub skip: i64,
    pub limit: i64,
}

impl MachineFilter {
    pub fn new(skip: i64, limit: i64) -> Self {
        Self { skip, limit }
    }
}

// Database entity model
#[derive(Debug, Clone, FromRow)]
struct Machine {
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
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
struct MachineListing {
    pub id: MachineId,
    pub machine_number: String,
    pub model: String,
    pub status: String,
    pub brand_name: Option<String>,
    pub type_name: Option<String>,
}

fn parse_status(status: &str) -> Result<MachineStatus> {
    status.parse().map_err(|e| DbError::Other(anyhow::Error::from(e)))
}

impl TryFrom<Machine> for MachineDBResponse {
    type Error = DbError;

    fn try_from(machine: Machine) -> Result<Self> {
        Ok(Self {
            status: parse_status(&machine.status)?,
            id: machine.id,
            machine_number: machine.machine_number,
            brand_id: machine.brand_id,
            model: machine.model,
            type_id: machine.type_id,
            credit_value: machine.credit_value,
            manufacturing_year: machine.manufacturing_year,
            ip_address: machine.ip_address,
            mac_address: machine.mac_address,
            serial_number: machine.serial_number,
            created_at: machine.created_at,
        })
    }
}

impl TryFrom<MachineListing> for MachineListingDBResponse {
    type Error = DbError;

    fn try_from(row: MachineListing) -> Result<Self> {
        Ok(Self {
            status: parse_status(&row.status)?,
            id: row.id,
            machine_number: row.machine_number,
            model: row.model,
            brand_name: row.brand_name,
            type_name: row.type_name,
        })
    }
}

pub struct Machines<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Machines<'c> {
    type Response = MachineDBResponse;
    type Id = MachineId;
    type Filter = MachineFilter;

    #[instrument(skip(self), fields(machine_id = id), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let machine = sqlx::query_as::<_, Machine>("SELECT * FROM machines WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        machine.map(MachineDBResponse::try_from).transpose()
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let machines = sqlx::query_as::<_, Machine>("SELECT * FROM machines ORDER BY machine_number LIMIT $1 OFFSET $2")
            .bind(filter.limit)
            .bind(filter.skip)
            .fetch_all(&mut *self.db)
            .await?;

        machines.into_iter().map(MachineDBResponse::try_from).collect()
    }
}

impl<'c> Machines<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request), fields(machine_number = %request.machine_number), err)]
    pub async fn create(&mut self, request: &MachineCreateDBRequest) -> Result<MachineDBResponse> {
        // created_at uses database DEFAULT NOW()
        let machine = sqlx::query_as::<_, Machine>(
            r#"
            INSERT INTO machines (machine_number, brand_id, model, type_id, credit_value,
                manufacturing_year, ip_address, mac_address, serial_number, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(&request.machine_number)
        .bind(request.brand_id)
        .bind(&request.model)
        .bind(request.type_id)
        .bind(request.credit_value)
        .bind(request.manufacturing_year)
        .bind(&request.ip_address)
        .bind(&request.mac_address)
        .bind(&request.serial_number)
        .bind(request.status.as_str())
        .fetch_one(&mut *self.db)
        .await?;

        MachineDBResponse::try_from(machine)
    }

    #[instrument(skip(self), err)]
    pub async fn machine_number_exists(&mut self, machine_number: &str) -> Result<bool> {
        let existing: Option<MachineId> = sqlx::query_scalar("SELECT id FROM machines WHERE machine_number = $1 LIMIT 1")
            .bind(machine_number)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(existing.is_some())
    }

    #[instrument(skip(self), err)]
    pub async fn serial_number_exists(&mut self, serial_number: &str) -> Result<bool> {
        let existing: Option<MachineId> = sqlx::query_scalar("SELECT id FROM machines WHERE serial_number = $1 LIMIT 1")
            .bind(serial_number)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(existing.is_some())
    }

    /// Every machine with its brand and type names, ordered by machine number
    #[instrument(skip(self), err)]
    pub async fn list_with_names(&mut self) -> Result<Vec<MachineListingDBResponse>> {
        let rows = sqlx::query_as::<_, MachineListing>(
            r#"
            SELECT m.id, m.machine_number, m.model, m.status,
                   b.name AS brand_name, mt.name AS type_name
            FROM machines m
            LEFT JOIN brands b ON m.brand_id = b.id
            LEFT JOIN machine_types mt ON m.type_id = mt.id
            ORDER BY m.machine_number
            "#,
        )
        .fetch_all(&mut *self.db)
        .await?;

        rows.into_iter().map(MachineListingDBResponse::try_from).collect()
    }
}
