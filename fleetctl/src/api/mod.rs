//! HTTP layer: server-rendered pages for machines and machine groups.
//!
//! - **[`handlers`]**: Axum route handlers
//! - **[`models`]**: Form bodies, query parameters and template contexts
//!
//! Handlers stay thin. Form behaviour lives in [`crate::editors`]; a handler builds the editor,
//! feeds it the request and turns the resulting [`crate::editors::FormOutcome`] into a `303 See
//! Other` redirect or a rendered page.

pub mod handlers;
pub mod models;
