//! Database repository for machine groups and memberships.

use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::groups::{GroupDBResponse, GroupUpdateDBRequest},
};
use crate::types::{GroupId, MachineId};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection};
use std::collections::HashMap;
use tracing::instrument;

/// Filter for listing groups
#[derive(Debug, Clone)]
pub struct GroupFilter {
    pub skip: i64,
    pub limit: i64,
}

impl GroupFilter {
    pub fn new(skip: i64, limit: i64) -> Self {
        Self { skip, limit }
    }
}

// Database entity model
#[derive(Debug, Clone, FromRow)]
struct Group {
    pub id: GroupId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Group> for GroupDBResponse {
    fn from(group: Group) -> Self {
        Self {
            id: group.id,
            name: group.name,
            description: group.description,
            created_at: group.created_at,
            updated_at: group.updated_at,
        }
    }
}

pub struct Groups<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Groups<'c> {
    type Response = GroupDBResponse;
    type Id = GroupId;
    type Filter = GroupFilter;

    #[instrument(skip(self), fields(group_id = id), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let group = sqlx::query_as::<_, Group>("SELECT * FROM machine_groups WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(group.map(GroupDBResponse::from))
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let groups = sqlx::query_as::<_, Group>("SELECT * FROM machine_groups ORDER BY name LIMIT $1 OFFSET $2")
            .bind(filter.limit)
            .bind(filter.skip)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(groups.into_iter().map(GroupDBResponse::from).collect())
    }
}

impl<'c> Groups<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Update a group's name and description. A `None` description clears it.
    #[instrument(skip(self, request), fields(group_id = id, name = %request.name), err)]
    pub async fn update(&mut self, id: GroupId, request: &GroupUpdateDBRequest) -> Result<GroupDBResponse> {
        let group = sqlx::query_as::<_, Group>(
            r#"
            UPDATE machine_groups SET
                name = $2,
                description = $3,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.name)
        .bind(&request.description)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(GroupDBResponse::from(group))
    }

    /// Whether any group other than `exclude` already uses `name` (exact, case-sensitive match)
    #[instrument(skip(self, name), fields(exclude = exclude), err)]
    pub async fn name_taken_by_other(&mut self, name: &str, exclude: GroupId) -> Result<bool> {
        let existing: Option<GroupId> = sqlx::query_scalar("SELECT id FROM machine_groups WHERE name = $1 AND id != $2 LIMIT 1")
            .bind(name)
            .bind(exclude)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(existing.is_some())
    }

    #[instrument(skip(self), fields(group_id = group_id), err)]
    pub async fn get_member_ids(&mut self, group_id: GroupId) -> Result<Vec<MachineId>> {
        let ids: Vec<MachineId> = sqlx::query_scalar("SELECT machine_id FROM machine_group_members WHERE group_id = $1 ORDER BY machine_id")
            .bind(group_id)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(ids)
    }

    /// Discard every membership row of the group and insert one row per machine id.
    ///
    /// Callers must run this on a transaction: on its own it is not atomic, and a failure part
    /// way through leaves the group with a partial member list until the transaction is rolled
    /// back. Returns the number of rows inserted.
    #[instrument(skip(self, machine_ids), fields(group_id = group_id, count = machine_ids.len()), err)]
    pub async fn replace_members(&mut self, group_id: GroupId, machine_ids: &[MachineId]) -> Result<u64> {
        sqlx::query("DELETE FROM machine_group_members WHERE group_id = $1")
            .bind(group_id)
            .execute(&mut *self.db)
            .await?;

        let mut inserted = 0;
        for machine_id in machine_ids {
            let result = sqlx::query("INSERT INTO machine_group_members (group_id, machine_id) VALUES ($1, $2)")
                .bind(group_id)
                .bind(machine_id)
                .execute(&mut *self.db)
                .await?;
            inserted += result.rows_affected();
        }

        Ok(inserted)
    }

    // Bulk relationship fetching to avoid N+1 queries on the listing page

    #[instrument(skip(self, group_ids), fields(count = group_ids.len()), err)]
    pub async fn get_member_counts_bulk(&mut self, group_ids: &[GroupId]) -> Result<HashMap<GroupId, i64>> {
        if group_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(GroupId, i64)> = sqlx::query_as(
            "SELECT group_id, COUNT(*) FROM machine_group_members WHERE group_id = ANY($1) GROUP BY group_id",
        )
        .bind(group_ids)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(rows.into_iter().collect())
    }
}
