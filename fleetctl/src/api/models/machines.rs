//! Form and page models for machines.

use crate::api::models::listing::Flash;
use crate::db::models::{machines::MachineListingDBResponse, reference::ReferenceDBResponse};
use crate::editors::machine_records::{MachineFormValues, MachineSubmission, ReferenceChoices};
use crate::types::{MachineId, MachineStatus};
use serde::{Deserialize, Serialize};

/// Body of `POST /machines/create`
#[derive(Debug, Default, Deserialize)]
pub struct MachineCreateForm {
    pub machine_number: Option<String>,
    pub brand_id: Option<String>,
    pub model: Option<String>,
    pub type_id: Option<String>,
    pub credit_value: Option<String>,
    pub manufacturing_year: Option<String>,
    pub ip_address: Option<String>,
    pub mac_address: Option<String>,
    pub serial_number: Option<String>,
    pub status: Option<String>,
}

impl From<MachineCreateForm> for MachineSubmission {
    fn from(form: MachineCreateForm) -> Self {
        Self {
            machine_number: form.machine_number,
            brand_id: form.brand_id,
            model: form.model,
            type_id: form.type_id,
            credit_value: form.credit_value,
            manufacturing_year: form.manufacturing_year,
            ip_address: form.ip_address,
            mac_address: form.mac_address,
            serial_number: form.serial_number,
            status: form.status,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

fn reference_options(items: Vec<ReferenceDBResponse>, current: &str) -> Vec<SelectOption> {
    items
        .into_iter()
        .map(|item| {
            let value = item.id.to_string();
            SelectOption {
                selected: value == current,
                value,
                label: item.name,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct MachineCreatePage {
    pub values: MachineFormView,
    pub brands: Vec<SelectOption>,
    pub machine_types: Vec<SelectOption>,
    pub statuses: Vec<SelectOption>,
    pub error: Option<String>,
}

/// Form values echoed back into the inputs
#[derive(Debug, Clone, Serialize)]
pub struct MachineFormView {
    pub machine_number: String,
    pub model: String,
    pub credit_value: String,
    pub manufacturing_year: String,
    pub ip_address: String,
    pub mac_address: String,
    pub serial_number: String,
}

impl MachineCreatePage {
    /// A failed option lookup takes precedence over the form's own error.
    pub fn new(values: MachineFormValues, error: Option<String>, choices: ReferenceChoices) -> Self {
        let error = choices
            .machine_types
            .error
            .or(choices.brands.error)
            .or(error);

        let statuses = MachineStatus::ALL
            .iter()
            .map(|status| SelectOption {
                value: status.to_string(),
                label: status.to_string(),
                selected: status.as_str() == values.status,
            })
            .collect();

        Self {
            brands: reference_options(choices.brands.items, &values.brand_id),
            machine_types: reference_options(choices.machine_types.items, &values.type_id),
            statuses,
            error,
            values: MachineFormView {
                machine_number: values.machine_number,
                model: values.model,
                credit_value: values.credit_value,
                manufacturing_year: values.manufacturing_year,
                ip_address: values.ip_address,
                mac_address: values.mac_address,
                serial_number: values.serial_number,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MachineRow {
    pub id: MachineId,
    pub machine_number: String,
    pub model: String,
    pub brand_name: Option<String>,
    pub type_name: Option<String>,
    pub status: MachineStatus,
}

impl From<MachineListingDBResponse> for MachineRow {
    fn from(machine: MachineListingDBResponse) -> Self {
        Self {
            id: machine.id,
            machine_number: machine.machine_number,
            model: machine.model,
            brand_name: machine.brand_name,
            type_name: machine.type_name,
            status: machine.status,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MachineListPage {
    pub flash: Flash,
    pub machines: Vec<MachineRow>,
}
