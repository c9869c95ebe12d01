//! Database record models matching table schemas.
//!
//! This module contains struct definitions that directly correspond to database
//! table rows. These models are used by repositories to return query results
//! and accept insertion/update data.
//!
//! # Design Principles
//!
//! - **Schema Mapping**: Each model struct matches a database table schema
//! - **Separation**: Database models are distinct from form/page models to allow
//!   independent evolution of storage and presentation
//!
//! # Model Categories
//!
//! - [`machines`]: Machine records
//! - [`groups`]: Machine groups and memberships
//! - [`reference`]: Brands and machine types
//! - [`audit`]: Audit log entries

pub mod audit;
pub mod groups;
pub mod machines;
pub mod reference;
