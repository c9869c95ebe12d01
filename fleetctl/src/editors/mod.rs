//! Server-side form editors.
//!
//! Each editor owns one page's behaviour: what the form shows on GET, how a submission is
//! sanitized and validated, and which side effect runs when it is accepted. Editors know
//! nothing about HTTP; they answer with a [`FormOutcome`] which the handlers in
//! [`crate::api::handlers`] turn into a redirect or a rendered page.
//!
//! - [`group_membership`]: edit a machine group's attributes and replace its members
//! - [`machine_records`]: create a machine record

pub mod group_membership;
pub mod machine_records;

use crate::db::errors::DbError;

/// What the caller should do after an editor has run.
#[derive(Debug, Clone, PartialEq)]
pub enum FormOutcome<V> {
    /// The mutation succeeded; redirect to `to` with a confirmation message.
    Redirect { to: String, message: String },
    /// The form cannot be shown at all (e.g. the record does not exist); redirect to `to`.
    Failure { to: String, error: Option<String> },
    /// Show the form again with these values and, if present, an error message.
    Render { values: V, error: Option<String> },
}

impl<V> FormOutcome<V> {
    pub fn render(values: V) -> Self {
        FormOutcome::Render { values, error: None }
    }

    pub fn reject(values: V, error: impl Into<String>) -> Self {
        FormOutcome::Render {
            values,
            error: Some(error.into()),
        }
    }

    /// The error message carried by a re-render or hard failure
    pub fn error(&self) -> Option<&str> {
        match self {
            FormOutcome::Render { error, .. } | FormOutcome::Failure { error, .. } => error.as_deref(),
            FormOutcome::Redirect { .. } => None,
        }
    }
}

/// Options for a selection input. A failed lookup leaves `items` empty and sets `error`.
#[derive(Debug, Clone)]
pub struct Choices<T> {
    pub items: Vec<T>,
    pub error: Option<String>,
}

impl<T> Choices<T> {
    pub fn from_result(result: Result<Vec<T>, DbError>) -> Self {
        match result {
            Ok(items) => Self { items, error: None },
            Err(e) => {
                tracing::error!("Failed to load selection options: {}", e);
                Self {
                    items: Vec::new(),
                    error: Some(database_error(&e)),
                }
            }
        }
    }
}

/// The one message that carries low-level error text to the operator
pub fn database_error(err: &DbError) -> String {
    format!("Database error: {err}")
}
