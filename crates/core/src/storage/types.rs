use serde::{de::DeserializeOwned, Serialize};

use crate::models::{Contract, Provider, Tariff};

use super::keys;

/// Composite primary key of a stored item.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompositeKey {
    pub partition_key: String,
    pub sort_key: String,
}

impl CompositeKey {
    pub fn new(partition_key: impl Into<String>, sort_key: impl Into<String>) -> Self {
        Self {
            partition_key: partition_key.into(),
            sort_key: sort_key.into(),
        }
    }

    /// Key of entity `id` of type `T` within `partition_id`.
    pub fn for_entity<T: StoredEntity>(partition_id: &str, id: &str) -> Self {
        Self::new(partition_id, keys::sort_key(T::SORT_KEY_PREFIX, id))
    }
}

/// A domain payload paired with the key it is stored under.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope<T> {
    pub partition_key: String,
    pub sort_key: String,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(key: CompositeKey, data: T) -> Self {
        Self {
            partition_key: key.partition_key,
            sort_key: key.sort_key,
            data,
        }
    }

    pub fn key(&self) -> CompositeKey {
        CompositeKey::new(self.partition_key.clone(), self.sort_key.clone())
    }

    pub fn into_data(self) -> T {
        self.data
    }
}

impl<T: StoredEntity> Envelope<T> {
    /// Wraps `entity` under `partition_id` using its type prefix and id.
    pub fn wrap(partition_id: &str, entity: T) -> Self {
        let key = CompositeKey::for_entity::<T>(partition_id, entity.id());
        Self::new(key, entity)
    }
}

/// A domain type persisted through the generic single-table repository.
pub trait StoredEntity:
    Serialize + DeserializeOwned + Default + Clone + Send + Sync + 'static
{
    /// Sort key prefix shared by every item of this type.
    const SORT_KEY_PREFIX: &'static str;
    /// Singular name used in error messages.
    const ENTITY_TYPE: &'static str;
    /// Plural name used in error messages and logs.
    const COLLECTION: &'static str;

    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);
}

impl StoredEntity for Contract {
    const SORT_KEY_PREFIX: &'static str = keys::CONTRACT_PREFIX;
    const ENTITY_TYPE: &'static str = "Contract";
    const COLLECTION: &'static str = "contracts";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl StoredEntity for Tariff {
    const SORT_KEY_PREFIX: &'static str = keys::TARIFF_PREFIX;
    const ENTITY_TYPE: &'static str = "Tariff";
    const COLLECTION: &'static str = "tariffs";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl StoredEntity for Provider {
    const SORT_KEY_PREFIX: &'static str = keys::PROVIDER_PREFIX;
    const ENTITY_TYPE: &'static str = "Provider";
    const COLLECTION: &'static str = "providers";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}
