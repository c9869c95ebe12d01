//! Base repository trait for database operations.

/// Contains the Repository trait.
///
/// A repository is basically a data access layer for a postgres table. It provides methods for
/// reading entities by ID and listing them with simple filters. Mutations are entity-specific
/// (machines are created, groups are updated) and live on the concrete repositories.
use crate::db::errors::Result;

/// Base repository trait providing common read operations
#[async_trait::async_trait]
pub trait Repository {
    /// The response/DTO type returned by operations
    type Response;

    /// The identifier type for lookups
    type Id: Send + Sync;

    /// The filter type for list operations
    type Filter: Send + Sync;

    /// Get an entity by ID
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>>;

    /// List entities with filtering and pagination
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>>;
}
