//! Store client: table identity plus the five backing store primitives.
//!
//! The client is the only point of contact with the backing store. It knows
//! the table name and the key attribute names, turns [`CompositeKey`]s into
//! key items, and bounds every round trip by an optional caller deadline.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use tokio::time::Instant;

use tariffs_core::storage::{CompositeKey, StoreError};

/// A stored item: attribute name to attribute value.
pub type Item = HashMap<String, AttributeValue>;

/// Result type for store primitives.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Table name and key attribute names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSchema {
    pub table_name: String,
    pub partition_key: String,
    pub sort_key: String,
}

impl TableSchema {
    pub fn new(
        table_name: impl Into<String>,
        partition_key: impl Into<String>,
        sort_key: impl Into<String>,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            partition_key: partition_key.into(),
            sort_key: sort_key.into(),
        }
    }
}

/// `partition = :value AND begins_with(sort, :prefix)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCondition {
    pub partition_attribute: String,
    pub partition_value: String,
    pub sort_attribute: String,
    pub sort_prefix: String,
}

/// One page request of a key-condition query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub condition: KeyCondition,
    /// Maximum number of items per page; the store default when `None`.
    pub limit: Option<i32>,
    /// Cursor returned by the previous page.
    pub exclusive_start_key: Option<Item>,
}

/// One page of query results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryPage {
    pub items: Vec<Item>,
    /// Continuation cursor; `None` on the last page.
    pub last_evaluated_key: Option<Item>,
}

/// A partial update: `SET name = value, ...`.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemUpdate {
    pub assignments: Vec<(String, AttributeValue)>,
    /// When set, the update only applies if this attribute exists on the
    /// addressed item; otherwise the store fails with
    /// [`StoreError::ConditionalCheckFailed`].
    pub require_attribute: Option<String>,
}

impl ItemUpdate {
    /// `SET name = value`
    pub fn set(name: impl Into<String>, value: AttributeValue) -> Self {
        Self {
            assignments: vec![(name.into(), value)],
            require_attribute: None,
        }
    }

    /// Restricts the update to an existing item.
    pub fn require_existing(mut self, attribute: impl Into<String>) -> Self {
        self.require_attribute = Some(attribute.into());
        self
    }
}

/// Single round trip operations of a key-value backing store.
#[async_trait]
pub trait StoreBackend: Send + Sync {
    /// Returns the item stored under `key`, if any.
    async fn get_item(&self, table: &str, key: Item) -> StoreResult<Option<Item>>;

    /// Stores `item`, replacing any item with the same key.
    async fn put_item(&self, table: &str, item: Item) -> StoreResult<()>;

    /// Applies `update` to the item stored under `key`.
    async fn update_item(&self, table: &str, key: Item, update: ItemUpdate) -> StoreResult<()>;

    /// Removes the item stored under `key`. Removing a missing key succeeds.
    async fn delete_item(&self, table: &str, key: Item) -> StoreResult<()>;

    /// Fetches one page of items matching the key condition.
    async fn query(&self, table: &str, request: QueryRequest) -> StoreResult<QueryPage>;
}

/// Backend of a client built without complete configuration.
///
/// Every primitive fails with [`StoreError::NotConfigured`].
struct Unconfigured {
    missing: String,
}

impl Unconfigured {
    fn error<T>(&self) -> StoreResult<T> {
        Err(StoreError::NotConfigured(self.missing.clone()))
    }
}

#[async_trait]
impl StoreBackend for Unconfigured {
    async fn get_item(&self, _table: &str, _key: Item) -> StoreResult<Option<Item>> {
        self.error()
    }

    async fn put_item(&self, _table: &str, _item: Item) -> StoreResult<()> {
        self.error()
    }

    async fn update_item(&self, _table: &str, _key: Item, _update: ItemUpdate) -> StoreResult<()> {
        self.error()
    }

    async fn delete_item(&self, _table: &str, _key: Item) -> StoreResult<()> {
        self.error()
    }

    async fn query(&self, _table: &str, _request: QueryRequest) -> StoreResult<QueryPage> {
        self.error()
    }
}

/// Handle to one table of a backing store.
///
/// Cheap to clone; clones share the backend connection.
#[derive(Clone)]
pub struct StoreClient {
    backend: Arc<dyn StoreBackend>,
    schema: TableSchema,
    page_size: Option<i32>,
    deadline: Option<Instant>,
}

impl std::fmt::Debug for StoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreClient")
            .field("schema", &self.schema)
            .field("page_size", &self.page_size)
            .field("deadline", &self.deadline)
            .finish_non_exhaustive()
    }
}

impl StoreClient {
    /// Creates a client for `schema` on the given backend.
    pub fn new(backend: Arc<dyn StoreBackend>, schema: TableSchema) -> Self {
        Self {
            backend,
            schema,
            page_size: None,
            deadline: None,
        }
    }

    /// Creates a client that fails every operation because `missing`
    /// configuration was not provided.
    pub fn unconfigured(missing: impl Into<String>) -> Self {
        Self::new(
            Arc::new(Unconfigured {
                missing: missing.into(),
            }),
            TableSchema::default(),
        )
    }

    /// Sets the maximum number of items requested per query page.
    pub fn with_page_size(mut self, page_size: Option<i32>) -> Self {
        self.page_size = page_size;
        self
    }

    /// Returns a client whose operations fail once `deadline` has passed.
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
            ..self.clone()
        }
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Builds the key item for `key` using the configured attribute names.
    pub fn key_item(&self, key: &CompositeKey) -> Item {
        HashMap::from([
            (
                self.schema.partition_key.clone(),
                AttributeValue::S(key.partition_key.clone()),
            ),
            (
                self.schema.sort_key.clone(),
                AttributeValue::S(key.sort_key.clone()),
            ),
        ])
    }

    /// Builds the condition matching every sort key starting with `prefix`
    /// in `partition_key`.
    pub fn key_condition(&self, partition_key: &str, prefix: &str) -> KeyCondition {
        KeyCondition {
            partition_attribute: self.schema.partition_key.clone(),
            partition_value: partition_key.to_string(),
            sort_attribute: self.schema.sort_key.clone(),
            sort_prefix: prefix.to_string(),
        }
    }

    /// True once the caller's deadline has passed.
    pub fn deadline_passed(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    pub async fn get_item(&self, key: &CompositeKey) -> StoreResult<Option<Item>> {
        let key = self.key_item(key);
        self.bounded(self.backend.get_item(&self.schema.table_name, key))
            .await
    }

    pub async fn put_item(&self, item: Item) -> StoreResult<()> {
        self.bounded(self.backend.put_item(&self.schema.table_name, item))
            .await
    }

    pub async fn update_item(&self, key: &CompositeKey, update: ItemUpdate) -> StoreResult<()> {
        let key = self.key_item(key);
        self.bounded(
            self.backend
                .update_item(&self.schema.table_name, key, update),
        )
        .await
    }

    pub async fn delete_item(&self, key: &CompositeKey) -> StoreResult<()> {
        let key = self.key_item(key);
        self.bounded(self.backend.delete_item(&self.schema.table_name, key))
            .await
    }

    /// Fetches one page of `condition`, starting after `cursor`.
    pub async fn query(
        &self,
        condition: &KeyCondition,
        cursor: Option<Item>,
    ) -> StoreResult<QueryPage> {
        let request = QueryRequest {
            condition: condition.clone(),
            limit: self.page_size,
            exclusive_start_key: cursor,
        };
        self.bounded(self.backend.query(&self.schema.table_name, request))
            .await
    }

    async fn bounded<T>(&self, op: impl Future<Output = StoreResult<T>>) -> StoreResult<T> {
        if self.deadline_passed() {
            return Err(StoreError::DeadlineExceeded);
        }
        match self.deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, op)
                .await
                .map_err(|_| StoreError::DeadlineExceeded)?,
            None => op.await,
        }
    }
}
