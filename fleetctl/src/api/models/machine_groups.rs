//! Form and page models for machine groups.

use crate::api::models::listing::Flash;
use crate::db::models::{groups::GroupSummaryDBResponse, machines::MachineListingDBResponse};
use crate::editors::group_membership::{GroupFormValues, GroupSubmission};
use crate::types::{GroupId, MachineId, MachineStatus};
use serde::Serialize;

/// Field name browsers use for the repeated machine checkbox
pub const MACHINE_IDS_FIELD: &str = "machine_ids[]";

/// Build a submission from the raw form pairs. Repeated `machine_ids[]` keys are kept in order;
/// a bare `machine_ids` key is accepted too.
pub fn group_submission_from_pairs(pairs: Vec<(String, String)>) -> GroupSubmission {
    let mut submission = GroupSubmission::default();
    for (key, value) in pairs {
        match key.as_str() {
            "name" => submission.name = Some(value),
            "description" => submission.description = Some(value),
            MACHINE_IDS_FIELD | "machine_ids" => submission.machine_ids.push(value),
            _ => {}
        }
    }
    submission
}

/// One checkbox in the machine selection grid
#[derive(Debug, Clone, Serialize)]
pub struct MachineOption {
    pub id: MachineId,
    pub machine_number: String,
    pub model: String,
    pub brand_name: Option<String>,
    pub type_name: Option<String>,
    pub status: MachineStatus,
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupEditPage {
    pub group_id: GroupId,
    pub name: String,
    pub description: String,
    pub selected_count: usize,
    pub machines: Vec<MachineOption>,
    pub error: Option<String>,
}

impl GroupEditPage {
    pub fn new(group_id: GroupId, values: GroupFormValues, machines: Vec<MachineListingDBResponse>, error: Option<String>) -> Self {
        let machines = machines
            .into_iter()
            .map(|m| MachineOption {
                selected: values.machine_ids.contains(&m.id),
                id: m.id,
                machine_number: m.machine_number,
                model: m.model,
                brand_name: m.brand_name,
                type_name: m.type_name,
                status: m.status,
            })
            .collect();

        Self {
            group_id,
            name: values.name,
            description: values.description,
            selected_count: values.machine_ids.len(),
            machines,
            error,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupRow {
    pub id: GroupId,
    pub name: String,
    pub description: Option<String>,
    pub member_count: i64,
}

impl From<GroupSummaryDBResponse> for GroupRow {
    fn from(group: GroupSummaryDBResponse) -> Self {
        Self {
            id: group.id,
            name: group.name,
            description: group.description,
            member_count: group.member_count,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupListPage {
    pub flash: Flash,
    pub groups: Vec<GroupRow>,
    pub skip: i64,
    pub limit: i64,
}
