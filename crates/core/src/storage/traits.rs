use async_trait::async_trait;

use super::{Result, StoredEntity};

/// CRUD access to one entity type within a partition.
#[async_trait]
pub trait Repository<T: StoredEntity>: Send + Sync {
    /// Gets every entity of this type in the partition, in store order.
    async fn get_all(&self, partition_id: &str) -> Result<Vec<T>>;

    /// Gets one entity by id.
    ///
    /// Fails with a not-found error when no item exists. Callers that want
    /// the zero value instead use `unwrap_or_default()`.
    async fn get(&self, partition_id: &str, id: &str) -> Result<T>;

    /// Stores a new entity, overwriting any item with the same id.
    ///
    /// Returns the entity that was passed in.
    async fn create(&self, partition_id: &str, entity: T) -> Result<T>;

    /// Replaces the payload of an existing entity.
    async fn update(&self, partition_id: &str, entity: &T) -> Result<()>;

    /// Deletes an entity by id. Deleting a missing entity succeeds.
    async fn delete(&self, partition_id: &str, id: &str) -> Result<()>;
}
