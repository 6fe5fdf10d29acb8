//! In-memory store implementation.

use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use tokio::sync::RwLock;

use tariffs_core::storage::StoreError;

use crate::storage::client::{
    Item, ItemUpdate, QueryPage, QueryRequest, StoreBackend, StoreResult, TableSchema,
};

/// Page size used when a query does not set a limit.
pub const DEFAULT_PAGE_SIZE: usize = 100;

type TableKey = (String, String);
type Table = BTreeMap<TableKey, Item>;

/// In-memory key-value store with DynamoDB query semantics.
///
/// Data is not persisted and is lost when the store is dropped.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    schema: TableSchema,
    default_page_size: usize,
    tables: Arc<RwLock<HashMap<String, Table>>>,
}

impl InMemoryStore {
    /// Creates an empty store whose items are keyed by the attribute names
    /// of `schema`.
    pub fn new(schema: TableSchema) -> Self {
        Self {
            schema,
            default_page_size: DEFAULT_PAGE_SIZE,
            tables: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Sets the page size used when a query has no limit.
    #[cfg(test)]
    pub fn with_default_page_size(mut self, page_size: usize) -> Self {
        self.default_page_size = page_size.max(1);
        self
    }

    /// Number of items stored in `table`.
    #[cfg(test)]
    pub async fn len(&self, table: &str) -> usize {
        self.tables.read().await.get(table).map_or(0, BTreeMap::len)
    }

    fn table_key(&self, item: &Item) -> StoreResult<TableKey> {
        Ok((
            string_attribute(item, &self.schema.partition_key)?,
            string_attribute(item, &self.schema.sort_key)?,
        ))
    }
}

fn string_attribute(item: &Item, name: &str) -> StoreResult<String> {
    match item.get(name) {
        Some(AttributeValue::S(s)) => Ok(s.clone()),
        _ => Err(StoreError::Validation(format!(
            "missing string key attribute '{name}'"
        ))),
    }
}

#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn get_item(&self, table: &str, key: Item) -> StoreResult<Option<Item>> {
        let key = self.table_key(&key)?;
        let tables = self.tables.read().await;
        Ok(tables.get(table).and_then(|t| t.get(&key)).cloned())
    }

    async fn put_item(&self, table: &str, item: Item) -> StoreResult<()> {
        let key = self.table_key(&item)?;
        let mut tables = self.tables.write().await;
        tables.entry(table.to_string()).or_default().insert(key, item);
        Ok(())
    }

    async fn update_item(&self, table: &str, key: Item, update: ItemUpdate) -> StoreResult<()> {
        let table_key = self.table_key(&key)?;
        let mut tables = self.tables.write().await;
        let rows = tables.entry(table.to_string()).or_default();

        match rows.get_mut(&table_key) {
            Some(existing) => {
                if let Some(attribute) = &update.require_attribute {
                    if !existing.contains_key(attribute) {
                        return Err(StoreError::ConditionalCheckFailed);
                    }
                }
                existing.extend(update.assignments);
            }
            None if update.require_attribute.is_some() => {
                return Err(StoreError::ConditionalCheckFailed);
            }
            None => {
                // Unconditional updates create the item, as DynamoDB does
                let mut item = key;
                item.extend(update.assignments);
                rows.insert(table_key, item);
            }
        }

        Ok(())
    }

    async fn delete_item(&self, table: &str, key: Item) -> StoreResult<()> {
        let key = self.table_key(&key)?;
        let mut tables = self.tables.write().await;
        if let Some(rows) = tables.get_mut(table) {
            rows.remove(&key);
        }
        Ok(())
    }

    async fn query(&self, table: &str, request: QueryRequest) -> StoreResult<QueryPage> {
        let condition = &request.condition;
        let page_size = match request.limit {
            Some(limit) if limit > 0 => limit as usize,
            Some(limit) => {
                return Err(StoreError::Validation(format!(
                    "limit must be positive, got {limit}"
                )))
            }
            None => self.default_page_size,
        };

        let partition = condition.partition_value.clone();
        let lower = match &request.exclusive_start_key {
            Some(start) => Bound::Excluded((partition.clone(), self.table_key(start)?.1)),
            None => Bound::Included((partition.clone(), condition.sort_prefix.clone())),
        };

        let tables = self.tables.read().await;
        let Some(rows) = tables.get(table) else {
            return Ok(QueryPage::default());
        };

        let mut matching = rows
            .range((lower, Bound::Unbounded))
            .take_while(|((pk, sk), _)| *pk == partition && sk.starts_with(&condition.sort_prefix));

        let items: Vec<Item> = matching
            .by_ref()
            .take(page_size)
            .map(|(_, item)| item.clone())
            .collect();

        let has_more = matching.next().is_some();
        let last_evaluated_key = match items.last() {
            Some(last) if has_more => Some(HashMap::from([
                (
                    self.schema.partition_key.clone(),
                    AttributeValue::S(partition.clone()),
                ),
                (
                    self.schema.sort_key.clone(),
                    AttributeValue::S(string_attribute(last, &self.schema.sort_key)?),
                ),
            ])),
            _ => None,
        };

        Ok(QueryPage {
            items,
            last_evaluated_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::client::KeyCondition;

    const TABLE: &str = "tariffs";

    fn schema() -> TableSchema {
        TableSchema::new(TABLE, "PK", "SK")
    }

    fn item(pk: &str, sk: &str) -> Item {
        HashMap::from([
            ("PK".to_string(), AttributeValue::S(pk.to_string())),
            ("SK".to_string(), AttributeValue::S(sk.to_string())),
            ("Data".to_string(), AttributeValue::S(format!("{pk}/{sk}"))),
        ])
    }

    fn key(pk: &str, sk: &str) -> Item {
        let mut item = item(pk, sk);
        item.remove("Data");
        item
    }

    fn request(pk: &str, prefix: &str, start: Option<Item>) -> QueryRequest {
        QueryRequest {
            condition: KeyCondition {
                partition_attribute: "PK".to_string(),
                partition_value: pk.to_string(),
                sort_attribute: "SK".to_string(),
                sort_prefix: prefix.to_string(),
            },
            limit: None,
            exclusive_start_key: start,
        }
    }

    fn sort_keys(page: &QueryPage) -> Vec<String> {
        page.items
            .iter()
            .map(|i| string_attribute(i, "SK").unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_put_get_delete() {
        let store = InMemoryStore::new(schema());

        store.put_item(TABLE, item("p", "contract#1")).await.unwrap();
        let found = store.get_item(TABLE, key("p", "contract#1")).await.unwrap();
        assert_eq!(found, Some(item("p", "contract#1")));
        assert_eq!(store.len(TABLE).await, 1);

        store.delete_item(TABLE, key("p", "contract#1")).await.unwrap();
        assert_eq!(store.get_item(TABLE, key("p", "contract#1")).await.unwrap(), None);

        // Deleting again is fine
        store.delete_item(TABLE, key("p", "contract#1")).await.unwrap();
    }

    #[tokio::test]
    async fn test_put_requires_key_attributes() {
        let store = InMemoryStore::new(schema());
        let mut bad = item("p", "contract#1");
        bad.remove("SK");

        let err = store.put_item(TABLE, bad).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_query_filters_partition_and_prefix_in_sort_order() {
        let store = InMemoryStore::new(schema());
        for (pk, sk) in [
            ("p", "tariff#b"),
            ("p", "contract#2"),
            ("p", "tariff#a"),
            ("q", "tariff#c"),
            ("p", "provider#1"),
        ] {
            store.put_item(TABLE, item(pk, sk)).await.unwrap();
        }

        let page = store.query(TABLE, request("p", "tariff#", None)).await.unwrap();

        assert_eq!(sort_keys(&page), vec!["tariff#a", "tariff#b"]);
        assert_eq!(page.last_evaluated_key, None);
    }

    #[tokio::test]
    async fn test_query_pages_with_cursor() {
        let store = InMemoryStore::new(schema()).with_default_page_size(2);
        for id in ["1", "2", "3", "4", "5"] {
            store
                .put_item(TABLE, item("p", &format!("provider#{id}")))
                .await
                .unwrap();
        }

        let first = store.query(TABLE, request("p", "provider#", None)).await.unwrap();
        assert_eq!(sort_keys(&first), vec!["provider#1", "provider#2"]);
        assert_eq!(first.last_evaluated_key, Some(key("p", "provider#2")));

        let second = store
            .query(TABLE, request("p", "provider#", first.last_evaluated_key))
            .await
            .unwrap();
        assert_eq!(sort_keys(&second), vec!["provider#3", "provider#4"]);

        let third = store
            .query(TABLE, request("p", "provider#", second.last_evaluated_key))
            .await
            .unwrap();
        assert_eq!(sort_keys(&third), vec!["provider#5"]);
        assert_eq!(third.last_evaluated_key, None);
    }

    #[tokio::test]
    async fn test_exact_page_fit_has_no_cursor() {
        let store = InMemoryStore::new(schema()).with_default_page_size(2);
        store.put_item(TABLE, item("p", "tariff#1")).await.unwrap();
        store.put_item(TABLE, item("p", "tariff#2")).await.unwrap();
        store.put_item(TABLE, item("p", "tariffz")).await.unwrap();

        let page = store.query(TABLE, request("p", "tariff#", None)).await.unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.last_evaluated_key, None);
    }

    #[tokio::test]
    async fn test_query_missing_table_is_empty() {
        let store = InMemoryStore::new(schema());
        let page = store.query("other", request("p", "tariff#", None)).await.unwrap();
        assert!(page.items.is_empty());
    }

    #[tokio::test]
    async fn test_query_rejects_non_positive_limit() {
        let store = InMemoryStore::new(schema());
        let mut req = request("p", "tariff#", None);
        req.limit = Some(0);

        assert!(matches!(
            store.query(TABLE, req).await,
            Err(StoreError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_conditional_update() {
        let store = InMemoryStore::new(schema());
        let update = ItemUpdate::set("Data", AttributeValue::S("new".to_string()))
            .require_existing("PK");

        let err = store
            .update_item(TABLE, key("p", "tariff#1"), update.clone())
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::ConditionalCheckFailed);
        assert_eq!(store.len(TABLE).await, 0);

        store.put_item(TABLE, item("p", "tariff#1")).await.unwrap();
        store
            .update_item(TABLE, key("p", "tariff#1"), update)
            .await
            .unwrap();

        let stored = store
            .get_item(TABLE, key("p", "tariff#1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.get("Data"), Some(&AttributeValue::S("new".to_string())));
    }

    #[tokio::test]
    async fn test_unconditional_update_creates_item() {
        let store = InMemoryStore::new(schema());

        store
            .update_item(
                TABLE,
                key("p", "tariff#1"),
                ItemUpdate::set("Data", AttributeValue::Bool(true)),
            )
            .await
            .unwrap();

        assert_eq!(store.len(TABLE).await, 1);
    }
}
