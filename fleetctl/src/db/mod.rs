//! Database layer for data persistence and access.
//!
//! This module implements the data access layer using SQLx with PostgreSQL.
//! It follows the Repository pattern to provide clean abstractions over database operations.
//!
//! # Modules
//!
//! - [`handlers`]: Repository implementations
//! - [`models`]: Database record structures matching table schemas
//! - [`errors`]: Database-specific error types
//!
//! # Transactions
//!
//! Multi-statement writes (replacing a group's members) run on a transaction so that readers
//! never observe a half-applied change:
//!
//! ```ignore
//! let mut tx = pool.begin().await?;
//! let mut repo = Groups::new(&mut tx);
//! repo.update(group_id, &request).await?;
//! repo.replace_members(group_id, &machine_ids).await?;
//! tx.commit().await?;
//! ```
//!
//! Read-only pages acquire a plain connection from the pool.
//!
//! # Migrations
//!
//! Database migrations are managed by SQLx and located in the `migrations/` directory.
//! The [`crate::migrator`] function provides access to the migrator.

pub mod errors;
pub mod handlers;
pub mod models;
