//! Machine group editor: update a group's name and description and replace its member set.

use crate::audit::AuditLog;
use crate::db::{
    errors::{DbError, Result as DbResult},
    handlers::{Groups, Machines, Repository},
    models::{
        groups::{GroupDBResponse, GroupUpdateDBRequest},
        machines::MachineListingDBResponse,
    },
};
use crate::editors::{Choices, FormOutcome, database_error};
use crate::sanitize::Sanitizer;
use crate::types::{GroupId, MachineId, parse_id};
use sqlx::{PgConnection, PgPool};
use std::collections::HashSet;
use std::hash::Hash;
use tracing::instrument;

/// Where the editor sends the browser when it is done
pub const GROUPS_PAGE: &str = "/machine_groups";

/// A group must always keep at least this many machines
pub const MIN_GROUP_MEMBERS: usize = 2;

/// Values the edit form is (re-)rendered with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupFormValues {
    pub name: String,
    pub description: String,
    pub machine_ids: Vec<MachineId>,
}

/// A submission as received from the browser, before sanitizing
#[derive(Debug, Clone, Default)]
pub struct GroupSubmission {
    pub name: Option<String>,
    pub description: Option<String>,
    pub machine_ids: Vec<String>,
}

/// A group as persisted when the request started
#[derive(Debug, Clone)]
pub struct LoadedGroup {
    pub group: GroupDBResponse,
    pub member_ids: Vec<MachineId>,
}

pub struct GroupMembershipEditor<'a> {
    db: &'a PgPool,
    sanitizer: &'a dyn Sanitizer,
    audit: &'a dyn AuditLog,
}

impl<'a> GroupMembershipEditor<'a> {
    pub fn new(db: &'a PgPool, sanitizer: &'a dyn Sanitizer, audit: &'a dyn AuditLog) -> Self {
        Self { db, sanitizer, audit }
    }

    /// Resolve the group named by a raw request identifier.
    ///
    /// Fails straight to the group list when the identifier is not numeric, when the group does
    /// not exist, or when it cannot be read.
    #[instrument(skip(self))]
    pub async fn load(&self, raw_id: Option<&str>) -> Result<LoadedGroup, FormOutcome<GroupFormValues>> {
        let Some(group_id) = parse_id(raw_id) else {
            return Err(FormOutcome::Failure {
                to: GROUPS_PAGE.to_string(),
                error: None,
            });
        };

        match self.fetch(group_id).await {
            Ok(Some(loaded)) => Ok(loaded),
            Ok(None) => Err(FormOutcome::Failure {
                to: GROUPS_PAGE.to_string(),
                error: Some("Group not found".to_string()),
            }),
            Err(e) => {
                tracing::error!(group_id, "Failed to load machine group: {}", e);
                Err(FormOutcome::Failure {
                    to: GROUPS_PAGE.to_string(),
                    error: Some("Database error".to_string()),
                })
            }
        }
    }

    async fn fetch(&self, group_id: GroupId) -> DbResult<Option<LoadedGroup>> {
        let mut conn = self.db.acquire().await?;
        let mut repo = Groups::new(&mut conn);

        let Some(group) = repo.get_by_id(group_id).await? else {
            return Ok(None);
        };
        let member_ids = repo.get_member_ids(group_id).await?;

        Ok(Some(LoadedGroup { group, member_ids }))
    }

    /// The form pre-populated with the persisted values
    pub fn show(&self, loaded: &LoadedGroup) -> FormOutcome<GroupFormValues> {
        FormOutcome::render(GroupFormValues {
            name: loaded.group.name.clone(),
            description: loaded.group.description.clone().unwrap_or_default(),
            machine_ids: loaded.member_ids.clone(),
        })
    }

    /// Validate a submission and, if it passes, replace the group's attributes and members in
    /// one transaction.
    #[instrument(skip(self, loaded, submission), fields(group_id = loaded.group.id))]
    pub async fn submit(&self, loaded: &LoadedGroup, submission: GroupSubmission) -> FormOutcome<GroupFormValues> {
        let group_id = loaded.group.id;
        let name = self.sanitizer.sanitize(submission.name.as_deref().unwrap_or_default());
        let description = self.sanitizer.sanitize(submission.description.as_deref().unwrap_or_default());

        let raw_ids: Vec<String> = submission.machine_ids.iter().map(|id| self.sanitizer.sanitize(id)).collect();
        let parsed: Vec<Option<MachineId>> = dedup(raw_ids.iter().map(|id| parse_id(Some(id.as_str()))).collect());

        let values = GroupFormValues {
            name,
            description,
            machine_ids: parsed.iter().flatten().copied().collect(),
        };

        if values.name.is_empty() {
            return FormOutcome::reject(values, "Group name is required.");
        }
        if parsed.len() < MIN_GROUP_MEMBERS {
            return FormOutcome::reject(values, format!("A group must contain at least {MIN_GROUP_MEMBERS} machines."));
        }
        if parsed.iter().any(Option::is_none) {
            return FormOutcome::reject(values, "Invalid machine selection.");
        }

        match self.name_taken(&values.name, group_id).await {
            Ok(true) => return FormOutcome::reject(values, "A group with this name already exists."),
            Ok(false) => {}
            Err(e) => {
                tracing::error!(group_id, "Failed to check group name: {}", e);
                let message = database_error(&e);
                return FormOutcome::reject(values, message);
            }
        }

        if let Err(e) = self.replace(group_id, &values).await {
            tracing::error!(group_id, "Failed to update machine group: {}", e);
            let message = database_error(&e);
            return FormOutcome::reject(values, message);
        }

        self.audit
            .record(
                "update_machine_group",
                &format!("Updated machine group: {} with {} machines", values.name, values.machine_ids.len()),
            )
            .await;

        FormOutcome::Redirect {
            to: GROUPS_PAGE.to_string(),
            message: "Machine group updated successfully".to_string(),
        }
    }

    async fn name_taken(&self, name: &str, group_id: GroupId) -> DbResult<bool> {
        let mut conn = self.db.acquire().await?;
        Groups::new(&mut conn).name_taken_by_other(name, group_id).await
    }

    /// Update, delete and reinsert under one transaction. Any failure rolls back explicitly
    /// before the error is returned; an early exit that drops `tx` rolls back too.
    async fn replace(&self, group_id: GroupId, values: &GroupFormValues) -> DbResult<()> {
        let mut tx = self.db.begin().await?;

        match apply(&mut tx, group_id, values).await {
            Ok(()) => {
                tx.commit().await?;
                Ok(())
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::warn!(group_id, "Rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }

    /// All machines for the selection grid
    pub async fn machine_choices(&self) -> Choices<MachineListingDBResponse> {
        Choices::from_result(self.list_machines().await)
    }

    async fn list_machines(&self) -> DbResult<Vec<MachineListingDBResponse>> {
        let mut conn = self.db.acquire().await?;
        Machines::new(&mut conn).list_with_names().await
    }
}

async fn apply(conn: &mut PgConnection, group_id: GroupId, values: &GroupFormValues) -> DbResult<()> {
    let mut repo = Groups::new(conn);
    let request = GroupUpdateDBRequest {
        name: values.name.clone(),
        description: Some(values.description.clone()).filter(|d| !d.is_empty()),
    };

    repo.update(group_id, &request).await?;
    let inserted = repo.replace_members(group_id, &values.machine_ids).await?;
    if inserted as usize != values.machine_ids.len() {
        return Err(DbError::Other(anyhow::anyhow!(
            "inserted {inserted} of {} membership rows",
            values.machine_ids.len()
        )));
    }
    Ok(())
}

/// Drop repeated entries, keeping the first occurrence
fn dedup<T: Eq + Hash + Clone>(items: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::with_capacity(items.len());
    items.into_iter().filter(|item| seen.insert(item.clone())).collect()
}
