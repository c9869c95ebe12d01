//! Repository implementations for database access.
//!
//! This module provides repository structs for each entity in the system.
//! Repositories follow a consistent pattern and implement the [`Repository`] trait.
//!
//! # Design Pattern
//!
//! Each repository:
//! - Wraps a SQLx connection or transaction
//! - Provides strongly-typed operations
//! - Handles query construction and parameter binding
//! - Returns domain models from [`crate::db::models`]
//!
//! # Available Repositories
//!
//! - [`Machines`]: Machine records and uniqueness lookups
//! - [`Groups`]: Machine groups and their memberships
//! - [`Brands`], [`MachineTypes`]: Read-only reference data
//! - [`AuditEntries`]: Audit log rows
//!
//! # Common Pattern
//!
//! ```ignore
//! use fleetctl::db::handlers::{Groups, Repository};
//!
//! async fn example(pool: &sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
//!     let mut tx = pool.begin().await?;
//!     let mut repo = Groups::new(&mut tx);
//!
//!     repo.replace_members(group_id, &[1, 2, 3]).await?;
//!
//!     tx.commit().await?;
//!     Ok(())
//! }
//! ```

pub mod audit_log;
pub mod groups;
pub mod machines;
pub mod reference;
pub mod repository;

pub use audit_log::AuditEntries;
pub use groups::Groups;
pub use machines::Machines;
pub use reference::{Brands, MachineTypes};
pub use repository::Repository;
