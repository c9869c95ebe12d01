//! HTTP request handlers.
//!
//! - [`machines`]: machine list and the create form
//! - [`machine_groups`]: group list and the edit form
//!
//! Outcome messages travel to the list pages as URL-encoded `message` and `error` query
//! parameters on a `303 See Other` redirect.

pub mod machine_groups;
pub mod machines;

use crate::editors::FormOutcome;
use axum::response::Redirect;
use url::form_urlencoded;

/// Redirect to `to`, carrying `value` under `key` when present
pub(crate) fn redirect_with(to: &str, key: &str, value: Option<&str>) -> Redirect {
    match value {
        Some(value) => {
            let query = form_urlencoded::Serializer::new(String::new()).append_pair(key, value).finish();
            Redirect::to(&format!("{to}?{query}"))
        }
        None => Redirect::to(to),
    }
}

/// The redirect an outcome asks for, or the values and error to render the form with
pub(crate) fn into_redirect<V>(outcome: FormOutcome<V>) -> Result<Redirect, (V, Option<String>)> {
    match outcome {
        FormOutcome::Redirect { to, message } => Ok(redirect_with(&to, "message", Some(&message))),
        FormOutcome::Failure { to, error } => Ok(redirect_with(&to, "error", error.as_deref())),
        FormOutcome::Render { values, error } => Err((values, error)),
    }
}
