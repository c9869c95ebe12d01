//! Machine record creator: validate a full attribute set and insert one machine row.

use crate::audit::AuditLog;
use crate::db::{
    errors::Result as DbResult,
    handlers::{Brands, MachineTypes, Machines, Repository},
    models::{machines::MachineCreateDBRequest, reference::ReferenceDBResponse},
};
use crate::editors::{Choices, FormOutcome, database_error};
use crate::sanitize::Sanitizer;
use crate::types::{MachineStatus, parse_id};
use crate::validation::{is_valid_ip, is_valid_mac, parse_credit_value, parse_manufacturing_year};
use sqlx::PgPool;
use tracing::instrument;

pub const MACHINES_PAGE: &str = "/machines";

/// Raw form fields. Every field is text so a rejected form can be shown exactly as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MachineFormValues {
    pub machine_number: String,
    pub brand_id: String,
    pub model: String,
    pub type_id: String,
    pub credit_value: String,
    pub manufacturing_year: String,
    pub ip_address: String,
    pub mac_address: String,
    pub serial_number: String,
    pub status: String,
}

/// A submission as received from the browser; absent fields are `None`
#[derive(Debug, Clone, Default)]
pub struct MachineSubmission {
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

/// Brand and machine type options for the create form
#[derive(Debug, Clone)]
pub struct ReferenceChoices {
    pub brands: Choices<ReferenceDBResponse>,
    pub machine_types: Choices<ReferenceDBResponse>,
}

pub struct MachineRecordCreator<'a> {
    db: &'a PgPool,
    sanitizer: &'a dyn Sanitizer,
    audit: &'a dyn AuditLog,
}

impl<'a> MachineRecordCreator<'a> {
    pub fn new(db: &'a PgPool, sanitizer: &'a dyn Sanitizer, audit: &'a dyn AuditLog) -> Self {
        Self { db, sanitizer, audit }
    }

    pub fn blank(&self) -> FormOutcome<MachineFormValues> {
        FormOutcome::render(MachineFormValues {
            status: MachineStatus::default().to_string(),
            ..Default::default()
        })
    }

    fn clean(&self, raw: Option<String>) -> String {
        raw.map(|value| self.sanitizer.sanitize(&value)).unwrap_or_default()
    }

    #[instrument(skip(self, submission))]
    pub async fn submit(&self, submission: MachineSubmission) -> FormOutcome<MachineFormValues> {
        let mut values = MachineFormValues {
            machine_number: self.clean(submission.machine_number),
            brand_id: self.clean(submission.brand_id),
            model: self.clean(submission.model),
            type_id: self.clean(submission.type_id),
            credit_value: self.clean(submission.credit_value),
            manufacturing_year: self.clean(submission.manufacturing_year),
            ip_address: self.clean(submission.ip_address),
            mac_address: self.clean(submission.mac_address),
            serial_number: self.clean(submission.serial_number),
            status: self.clean(submission.status),
        };
        if values.status.is_empty() {
            values.status = MachineStatus::default().to_string();
        }

        let request = match self.validate(&values) {
            Ok(request) => request,
            Err(message) => return FormOutcome::reject(values, message),
        };

        match self.duplicate_check(&request).await {
            Ok(Some(message)) => return FormOutcome::reject(values, message),
            Ok(None) => {}
            Err(e) => {
                tracing::error!("Failed to check machine uniqueness: {}", e);
                let message = database_error(&e);
                return FormOutcome::reject(values, message);
            }
        }

        if let Err(e) = self.insert(&request).await {
            tracing::error!(machine_number = %request.machine_number, "Failed to create machine: {}", e);
            let message = database_error(&e);
            return FormOutcome::reject(values, message);
        }

        self.audit
            .record("create_machine", &format!("Created machine: {}", request.machine_number))
            .await;

        FormOutcome::Redirect {
            to: MACHINES_PAGE.to_string(),
            message: "Machine created successfully".to_string(),
        }
    }

    /// Presence, format and type checks, in the order the operator sees them
    fn validate(&self, values: &MachineFormValues) -> Result<MachineCreateDBRequest, &'static str> {
        let required = [&values.machine_number, &values.model, &values.type_id, &values.credit_value];
        if required.iter().any(|field| field.is_empty()) {
            return Err("Please fill out all required fields.");
        }

        if !values.ip_address.is_empty() && !is_valid_ip(&values.ip_address) {
            return Err("Please enter a valid IP address.");
        }
        if !values.mac_address.is_empty() && !is_valid_mac(&values.mac_address) {
            return Err("Please enter a valid MAC address (e.g., 00:1A:2B:3C:4D:5E).");
        }

        let type_id = parse_id(Some(values.type_id.as_str())).ok_or("Please select a valid machine type.")?;
        let brand_id = match optional(&values.brand_id) {
            Some(raw) => Some(parse_id(Some(raw)).ok_or("Please select a valid brand.")?),
            None => None,
        };
        let credit_value = parse_credit_value(&values.credit_value).ok_or("Please enter a valid credit value.")?;
        let manufacturing_year = match optional(&values.manufacturing_year) {
            Some(raw) => Some(parse_manufacturing_year(raw).ok_or("Please enter a valid manufacturing year.")?),
            None => None,
        };
        let status: MachineStatus = values.status.parse().map_err(|_| "Please select a valid status.")?;

        Ok(MachineCreateDBRequest {
            machine_number: values.machine_number.clone(),
            brand_id,
            model: values.model.clone(),
            type_id,
            credit_value,
            manufacturing_year,
            ip_address: optional(&values.ip_address).map(str::to_string),
            mac_address: optional(&values.mac_address).map(str::to_string),
            serial_number: optional(&values.serial_number).map(str::to_string),
            status,
        })
    }

    async fn duplicate_check(&self, request: &MachineCreateDBRequest) -> DbResult<Option<&'static str>> {
        let mut conn = self.db.acquire().await?;
        let mut repo = Machines::new(&mut conn);

        if repo.machine_number_exists(&request.machine_number).await? {
            return Ok(Some("A machine with this number already exists."));
        }
        if let Some(serial) = &request.serial_number
            && repo.serial_number_exists(serial).await?
        {
            return Ok(Some("A machine with this serial number already exists."));
        }
        Ok(None)
    }

    async fn insert(&self, request: &MachineCreateDBRequest) -> DbResult<()> {
        let mut conn = self.db.acquire().await?;
        Machines::new(&mut conn).create(request).await?;
        Ok(())
    }

    pub async fn reference_choices(&self) -> ReferenceChoices {
        ReferenceChoices {
            brands: Choices::from_result(self.list_brands().await),
            machine_types: Choices::from_result(self.list_machine_types().await),
        }
    }

    async fn list_brands(&self) -> DbResult<Vec<ReferenceDBResponse>> {
        let mut conn = self.db.acquire().await?;
        Brands::new(&mut conn).list(&()).await
    }

    async fn list_machine_types(&self) -> DbResult<Vec<ReferenceDBResponse>> {
        let mut conn = self.db.acquire().await?;
        MachineTypes::new(&mut conn).list(&()).await
    }
}

fn optional(value: &str) -> Option<&str> {
    Some(value).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::handlers::machines::MachineFilter;
    use crate::db::models::machines::MachineDBResponse;
    use crate::sanitize::TrimSanitizer;
    use crate::test_utils::*;
    use rust_decimal::Decimal;

    fn valid_submission(type_id: i64) -> MachineSubmission {
        MachineSubmission {
            machine_number: Some("M-100".to_string()),
            model: Some("Dragon Link".to_string()),
            type_id: Some(type_id.to_string()),
            credit_value: Some("0.25".to_string()),
            ..Default::default()
        }
    }

    async fn all_machines(pool: &PgPool) -> Vec<MachineDBResponse> {
        let mut conn = pool.acquire().await.unwrap();
        Machines::new(&mut conn).list(&MachineFilter::new(0, 100)).await.unwrap()
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_blank_form_defaults_to_active(pool: PgPool) {
        let audit = MemoryAuditLog::default();
        let creator = MachineRecordCreator::new(&pool, &TrimSanitizer, &audit);

        match creator.blank() {
            FormOutcome::Render { values, error } => {
                assert_eq!(values.status, "Active");
                assert!(values.machine_number.is_empty());
                assert!(error.is_none());
            }
            other => panic!("expected render, got {other:?}"),
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_valid_submission_creates_machine(pool: PgPool) {
        let type_id = create_test_machine_type(&pool, "Video Slot").await;
        let brand_id = create_test_brand(&pool, "Aristocrat").await;
        let audit = MemoryAuditLog::default();
        let creator = MachineRecordCreator::new(&pool, &TrimSanitizer, &audit);

        let mut input = valid_submission(type_id);
        input.machine_number = Some("  M-100 ".to_string());
        input.brand_id = Some(brand_id.to_string());
        input.manufacturing_year = Some("2018".to_string());
        input.ip_address = Some("10.0.0.12".to_string());
        input.mac_address = Some("00:1A:2B:3C:4D:5E".to_string());
        input.serial_number = Some("SN-100".to_string());
        input.status = Some("Maintenance".to_string());

        let outcome = creator.submit(input).await;
        assert_eq!(
            outcome,
            FormOutcome::Redirect {
                to: MACHINES_PAGE.to_string(),
                message: "Machine created successfully".to_string(),
            }
        );

        let machines = all_machines(&pool).await;
        assert_eq!(machines.len(), 1);
        let machine = &machines[0];
        assert_eq!(machine.machine_number, "M-100");
        assert_eq!(machine.brand_id, Some(brand_id));
        assert_eq!(machine.credit_value, Decimal::new(25, 2));
        assert_eq!(machine.manufacturing_year, Some(2018));
        assert_eq!(machine.ip_address.as_deref(), Some("10.0.0.12"));
        assert_eq!(machine.status, MachineStatus::Maintenance);

        assert_eq!(
            audit.entries(),
            vec![("create_machine".to_string(), "Created machine: M-100".to_string())]
        );
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_optional_fields_stored_as_null(pool: PgPool) {
        let type_id = create_test_machine_type(&pool, "Video Slot").await;
        let audit = MemoryAuditLog::default();
        let creator = MachineRecordCreator::new(&pool, &TrimSanitizer, &audit);

        let mut input = valid_submission(type_id);
        input.credit_value = Some("0".to_string());
        input.serial_number = Some("   ".to_string());
        input.brand_id = Some(String::new());

        let outcome = creator.submit(input).await;
        assert!(matches!(outcome, FormOutcome::Redirect { .. }), "unexpected outcome {outcome:?}");

        let machine = &all_machines(&pool).await[0];
        assert!(machine.brand_id.is_none());
        assert!(machine.serial_number.is_none());
        assert!(machine.manufacturing_year.is_none());
        assert_eq!(machine.credit_value, Decimal::ZERO);
        assert_eq!(machine.status, MachineStatus::Active);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_validation_messages(pool: PgPool) {
        let type_id = create_test_machine_type(&pool, "Video Slot").await;
        let audit = MemoryAuditLog::default();
        let creator = MachineRecordCreator::new(&pool, &TrimSanitizer, &audit);

        let with = |edit: fn(&mut MachineSubmission)| {
            let mut input = valid_submission(type_id);
            edit(&mut input);
            input
        };

        let cases: Vec<(MachineSubmission, &str)> = vec![
            (with(|i| i.model = None), "Please fill out all required fields."),
            (with(|i| i.credit_value = Some(" ".to_string())), "Please fill out all required fields."),
            // Presence is checked before format
            (
                with(|i| {
                    i.machine_number = None;
                    i.ip_address = Some("nope".to_string());
                }),
                "Please fill out all required fields.",
            ),
            (with(|i| i.ip_address = Some("999.1.1.1".to_string())), "Please enter a valid IP address."),
            (
                with(|i| {
                    i.ip_address = Some("bad".to_string());
                    i.mac_address = Some("bad".to_string());
                }),
                "Please enter a valid IP address.",
            ),
            (
                with(|i| i.mac_address = Some("00-1A-2B-3C-4D-5E".to_string())),
                "Please enter a valid MAC address (e.g., 00:1A:2B:3C:4D:5E).",
            ),
            (with(|i| i.type_id = Some("slot".to_string())), "Please select a valid machine type."),
            (with(|i| i.brand_id = Some("x".to_string())), "Please select a valid brand."),
            (with(|i| i.credit_value = Some("-1".to_string())), "Please enter a valid credit value."),
            (with(|i| i.credit_value = Some("abc".to_string())), "Please enter a valid credit value."),
            (with(|i| i.credit_value = Some("100000000".to_string())), "Please enter a valid credit value."),
            (with(|i| i.credit_value = Some("0.125".to_string())), "Please enter a valid credit value."),
            (with(|i| i.credit_value = Some("1_000".to_string())), "Please enter a valid credit value."),
            (with(|i| i.manufacturing_year = Some("1850".to_string())), "Please enter a valid manufacturing year."),
            (with(|i| i.manufacturing_year = Some("3000".to_string())), "Please enter a valid manufacturing year."),
            (with(|i| i.status = Some("Retired".to_string())), "Please select a valid status."),
        ];

        for (input, expected) in cases {
            let outcome = creator.submit(input).await;
            assert_eq!(outcome.error(), Some(expected));
        }

        assert!(all_machines(&pool).await.is_empty());
        assert!(audit.entries().is_empty());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_duplicates_rejected(pool: PgPool) {
        let type_id = create_test_machine_type(&pool, "Video Slot").await;
        let audit = MemoryAuditLog::default();
        let creator = MachineRecordCreator::new(&pool, &TrimSanitizer, &audit);

        let mut first = valid_submission(type_id);
        first.serial_number = Some("SN-1".to_string());
        assert!(matches!(creator.submit(first).await, FormOutcome::Redirect { .. }));

        let outcome = creator.submit(valid_submission(type_id)).await;
        assert_eq!(outcome.error(), Some("A machine with this number already exists."));

        let mut same_serial = valid_submission(type_id);
        same_serial.machine_number = Some("M-200".to_string());
        same_serial.serial_number = Some("SN-1".to_string());
        let outcome = creator.submit(same_serial).await;
        assert_eq!(outcome.error(), Some("A machine with this serial number already exists."));

        assert_eq!(all_machines(&pool).await.len(), 1);
        assert_eq!(audit.entries().len(), 1);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_absent_serial_numbers_never_collide(pool: PgPool) {
        let type_id = create_test_machine_type(&pool, "Video Slot").await;
        let audit = MemoryAuditLog::default();
        let creator = MachineRecordCreator::new(&pool, &TrimSanitizer, &audit);

        for number in ["M-1", "M-2"] {
            let mut input = valid_submission(type_id);
            input.machine_number = Some(number.to_string());
            let outcome = creator.submit(input).await;
            assert!(matches!(outcome, FormOutcome::Redirect { .. }), "unexpected outcome {outcome:?}");
        }

        assert_eq!(all_machines(&pool).await.len(), 2);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_address_formats(pool: PgPool) {
        let type_id = create_test_machine_type(&pool, "Video Slot").await;
        let audit = MemoryAuditLog::default();
        let creator = MachineRecordCreator::new(&pool, &TrimSanitizer, &audit);

        let mut bad_ip = valid_submission(type_id);
        bad_ip.ip_address = Some("999.999.999.999".to_string());
        assert_eq!(creator.submit(bad_ip).await.error(), Some("Please enter a valid IP address."));

        let mut short_mac = valid_submission(type_id);
        short_mac.mac_address = Some("00:1A:2B".to_string());
        assert_eq!(
            creator.submit(short_mac).await.error(),
            Some("Please enter a valid MAC address (e.g., 00:1A:2B:3C:4D:5E).")
        );
        assert!(all_machines(&pool).await.is_empty());

        let mut good = valid_submission(type_id);
        good.ip_address = Some("192.168.1.10".to_string());
        good.mac_address = Some("00:1A:2B:3C:4D:5E".to_string());
        assert!(matches!(creator.submit(good).await, FormOutcome::Redirect { .. }));

        let machine = &all_machines(&pool).await[0];
        assert_eq!(machine.ip_address.as_deref(), Some("192.168.1.10"));
        assert_eq!(machine.mac_address.as_deref(), Some("00:1A:2B:3C:4D:5E"));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_database_error_rerenders_submitted_values(pool: PgPool) {
        create_test_machine_type(&pool, "Video Slot").await;
        let audit = MemoryAuditLog::default();
        let creator = MachineRecordCreator::new(&pool, &TrimSanitizer, &audit);

        // Numeric but unknown machine type fails on the foreign key
        let outcome = creator.submit(valid_submission(424_242)).await;

        match outcome {
            FormOutcome::Render { values, error } => {
                assert_eq!(values.machine_number, "M-100");
                assert_eq!(values.type_id, "424242");
                assert_eq!(values.status, "Active");
                let error = error.expect("should carry an error");
                assert!(error.starts_with("Database error: "), "unexpected message {error}");
            }
            other => panic!("expected re-render, got {other:?}"),
        }
        assert!(audit.entries().is_empty());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_reference_choices_sorted(pool: PgPool) {
        create_test_brand(&pool, "Novomatic").await;
        create_test_brand(&pool, "IGT").await;
        create_test_machine_type(&pool, "Video Slot").await;
        let audit = MemoryAuditLog::default();
        let creator = MachineRecordCreator::new(&pool, &TrimSanitizer, &audit);

        let choices = creator.reference_choices().await;
        assert!(choices.brands.error.is_none());
        let brands: Vec<_> = choices.brands.items.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(brands, vec!["IGT", "Novomatic"]);
        assert_eq!(choices.machine_types.items.len(), 1);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_reference_choices_degrade_on_error(pool: PgPool) {
        let audit = MemoryAuditLog::default();
        pool.close().await;
        let creator = MachineRecordCreator::new(&pool, &TrimSanitizer, &audit);

        let choices = creator.reference_choices().await;
        assert!(choices.brands.items.is_empty());
        assert!(choices.brands.error.as_deref().is_some_and(|e| e.starts_with("Database error: ")));
        assert!(choices.machine_types.error.is_some());
    }
}
