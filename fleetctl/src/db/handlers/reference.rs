//! Read-only repositories for reference data used to populate selection inputs.

use crate::db::{errors::Result, handlers::repository::Repository, models::reference::ReferenceDBResponse};
use crate::types::{BrandId, MachineTypeId};
use sqlx::{FromRow, PgConnection};
use tracing::instrument;

#[derive(Debug, Clone, FromRow)]
struct ReferenceRow {
    pub id: i64,
    pub name: String,
}

impl From<ReferenceRow> for ReferenceDBResponse {
    fn from(row: ReferenceRow) -> Self {
        Self { id: row.id, name: row.name }
    }
}

pub struct Brands<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Brands<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Brands<'c> {
    type Response = ReferenceDBResponse;
    type Id = BrandId;
    type Filter = ();

    #[instrument(skip(self), fields(brand_id = id), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let row = sqlx::query_as::<_, ReferenceRow>("SELECT id, name FROM brands WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;
        Ok(row.map(ReferenceDBResponse::from))
    }

    /// All brands ordered by name
    #[instrument(skip_all, err)]
    async fn list(&mut self, _filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let rows = sqlx::query_as::<_, ReferenceRow>("SELECT id, name FROM brands ORDER BY name")
            .fetch_all(&mut *self.db)
            .await?;
        Ok(rows.into_iter().map(ReferenceDBResponse::from).collect())
    }
}

pub struct MachineTypes<'c> {
    db: &'c mut PgConnection,
}

impl<'c> MachineTypes<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl<'c> Repository for MachineTypes<'c> {
    type Response = ReferenceDBResponse;
    type Id = MachineTypeId;
    type Filter = ();

    #[instrument(skip(self), fields(type_id = id), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let row = sqlx::query_as::<_, ReferenceRow>("SELECT id, name FROM machine_types WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;
        Ok(row.map(ReferenceDBResponse::from))
    }

    /// All machine types ordered by name
    #[instrument(skip_all, err)]
    async fn list(&mut self, _filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let rows = sqlx::query_as::<_, ReferenceRow>("SELECT id, name FROM machine_types ORDER BY name")
            .fetch_all(&mut *self.db)
            .await?;
        Ok(rows.into_iter().map(ReferenceDBResponse::from).collect())
    }
}
