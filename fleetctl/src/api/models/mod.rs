//! Request and page models for the HTTP layer.
//!
//! Form models are deserialized from `application/x-www-form-urlencoded` bodies and converted
//! into editor submissions. Page models are the serializable contexts handed to templates.

pub mod listing;
pub mod machine_groups;
pub mod machines;
