//! Per-entity repositories over the single table.

use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use tariffs_core::models::{Contract, Provider, Tariff};
use tariffs_core::storage::{
    CompositeKey, Envelope, Repository, RepositoryError, Result, StoredEntity,
};

use super::client::{ItemUpdate, StoreClient};
use super::codec::{to_attribute, DATA_ATTRIBUTE};
use super::entity::{delete_entity, get_entity, put_entity, query_entities, update_entity};

/// Repository for one entity type, keyed by `T::SORT_KEY_PREFIX`.
///
/// With a timeout set, every operation gets its own deadline of
/// `now + timeout` that bounds all of its store round trips.
pub struct TableRepository<T> {
    client: StoreClient,
    timeout: Option<Duration>,
    _entity: PhantomData<fn() -> T>,
}

pub type ContractRepository = TableRepository<Contract>;
pub type TariffRepository = TableRepository<Tariff>;
pub type ProviderRepository = TableRepository<Provider>;

impl<T> Clone for TableRepository<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            timeout: self.timeout,
            _entity: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for TableRepository<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableRepository")
            .field("client", &self.client)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl<T: StoredEntity> TableRepository<T> {
    pub fn new(client: StoreClient) -> Self {
        Self {
            client,
            timeout: None,
            _entity: PhantomData,
        }
    }

    /// Bounds each operation by `timeout`, measured from its start.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn client(&self) -> StoreClient {
        match self.timeout {
            Some(timeout) => self.client.with_deadline(Instant::now() + timeout),
            None => self.client.clone(),
        }
    }

    fn key(partition_id: &str, id: &str) -> CompositeKey {
        CompositeKey::for_entity::<T>(partition_id, id)
    }
}

#[async_trait]
impl<T: StoredEntity> Repository<T> for TableRepository<T> {
    async fn get_all(&self, partition_id: &str) -> Result<Vec<T>> {
        match query_entities::<T>(&self.client(), partition_id, T::SORT_KEY_PREFIX).await {
            Ok(envelopes) => Ok(envelopes.into_iter().map(Envelope::into_data).collect()),
            Err(err) => {
                tracing::error!(
                    partition_id,
                    collection = T::COLLECTION,
                    error = %err,
                    "Query failed"
                );
                Err(RepositoryError::QueryFailed {
                    collection: T::COLLECTION,
                })
            }
        }
    }

    async fn get(&self, partition_id: &str, id: &str) -> Result<T> {
        get_entity::<T>(&self.client(), &Self::key(partition_id, id)).await
    }

    async fn create(&self, partition_id: &str, entity: T) -> Result<T> {
        let envelope = Envelope::wrap(partition_id, entity);
        put_entity(&self.client(), &envelope).await?;
        Ok(envelope.into_data())
    }

    async fn update(&self, partition_id: &str, entity: &T) -> Result<()> {
        let update = ItemUpdate::set(DATA_ATTRIBUTE, to_attribute(entity)?);
        update_entity(&self.client(), &Self::key(partition_id, entity.id()), update).await
    }

    async fn delete(&self, partition_id: &str, id: &str) -> Result<()> {
        delete_entity(&self.client(), &Self::key(partition_id, id)).await
    }
}
