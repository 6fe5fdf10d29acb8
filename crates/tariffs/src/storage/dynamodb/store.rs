//! DynamoDB backend.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;

use crate::config::StoreConfig;
use crate::storage::client::{
    Item, ItemUpdate, QueryPage, QueryRequest, StoreBackend, StoreClient, StoreResult,
};

use super::error::{
    map_delete_item_error, map_get_item_error, map_put_item_error, map_query_error,
    map_update_item_error,
};

/// `StoreBackend` over an `aws_sdk_dynamodb::Client`.
///
/// The SDK client is cheap to clone and safe to share between tasks.
#[derive(Debug, Clone)]
pub struct DynamoDbStore {
    client: Client,
}

impl DynamoDbStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a [`StoreClient`] from configuration.
    ///
    /// Credentials come from the AWS default chain. A missing table name or
    /// key attribute name does not fail here: the returned client fails every
    /// operation with `StoreError::NotConfigured` instead.
    pub async fn connect(config: &StoreConfig) -> StoreClient {
        let schema = match config.schema() {
            Ok(schema) => schema,
            Err(missing) => {
                tracing::warn!(
                    missing,
                    "DynamoDB store is not configured, every request will fail"
                );
                return StoreClient::unconfigured(missing);
            }
        };

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }
        if let Some(endpoint) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        tracing::info!(
            table = %schema.table_name,
            partition_key = %schema.partition_key,
            sort_key = %schema.sort_key,
            endpoint = config.endpoint_url.as_deref().unwrap_or("default"),
            "Connected DynamoDB store"
        );

        StoreClient::new(Arc::new(Self::new(Client::new(&sdk_config))), schema)
            .with_page_size(config.query_page_size)
    }
}

/// Builds `SET #a0 = :v0, #a1 = :v1` with its name and value placeholders.
fn update_expression(
    update: &ItemUpdate,
) -> (String, HashMap<String, String>, HashMap<String, AttributeValue>) {
    let mut clauses = Vec::with_capacity(update.assignments.len());
    let mut names = HashMap::new();
    let mut values = HashMap::new();

    for (i, (name, value)) in update.assignments.iter().enumerate() {
        clauses.push(format!("#a{i} = :v{i}"));
        names.insert(format!("#a{i}"), name.clone());
        values.insert(format!(":v{i}"), value.clone());
    }

    (format!("SET {}", clauses.join(", ")), names, values)
}

#[async_trait]
impl StoreBackend for DynamoDbStore {
    async fn get_item(&self, table: &str, key: Item) -> StoreResult<Option<Item>> {
        let result = self
            .client
            .get_item()
            .table_name(table)
            .set_key(Some(key))
            .send()
            .await
            .map_err(|e| map_get_item_error(e, table))?;

        Ok(result.item)
    }

    async fn put_item(&self, table: &str, item: Item) -> StoreResult<()> {
        self.client
            .put_item()
            .table_name(table)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| map_put_item_error(e, table))?;

        Ok(())
    }

    async fn update_item(&self, table: &str, key: Item, update: ItemUpdate) -> StoreResult<()> {
        let (expression, mut names, values) = update_expression(&update);

        let mut request = self
            .client
            .update_item()
            .table_name(table)
            .set_key(Some(key))
            .update_expression(expression)
            .set_expression_attribute_values(Some(values));

        if let Some(attribute) = update.require_attribute {
            names.insert("#req".to_string(), attribute);
            request = request.condition_expression("attribute_exists(#req)");
        }

        request
            .set_expression_attribute_names(Some(names))
            .send()
            .await
            .map_err(|e| map_update_item_error(e, table))?;

        Ok(())
    }

    async fn delete_item(&self, table: &str, key: Item) -> StoreResult<()> {
        self.client
            .delete_item()
            .table_name(table)
            .set_key(Some(key))
            .send()
            .await
            .map_err(|e| map_delete_item_error(e, table))?;

        Ok(())
    }

    async fn query(&self, table: &str, request: QueryRequest) -> StoreResult<QueryPage> {
        let condition = request.condition;

        let result = self
            .client
            .query()
            .table_name(table)
            .key_condition_expression("#pk = :pk AND begins_with(#sk, :prefix)")
            .expression_attribute_names("#pk", condition.partition_attribute)
            .expression_attribute_names("#sk", condition.sort_attribute)
            .expression_attribute_values(":pk", AttributeValue::S(condition.partition_value))
            .expression_attribute_values(":prefix", AttributeValue::S(condition.sort_prefix))
            .set_limit(request.limit)
            .set_exclusive_start_key(request.exclusive_start_key)
            .send()
            .await
            .map_err(|e| map_query_error(e, table))?;

        Ok(QueryPage {
            items: result.items.unwrap_or_default(),
            last_evaluated_key: result.last_evaluated_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::client::TableSchema;
    use tariffs_core::storage::{CompositeKey, StoreError};

    #[test]
    fn test_update_expression_placeholders() {
        let update = ItemUpdate {
            assignments: vec![
                ("Data".to_string(), AttributeValue::Bool(true)),
                ("Other".to_string(), AttributeValue::N("1".to_string())),
            ],
            require_attribute: None,
        };

        let (expression, names, values) = update_expression(&update);

        assert_eq!(expression, "SET #a0 = :v0, #a1 = :v1");
        assert_eq!(names.get("#a0").map(String::as_str), Some("Data"));
        assert_eq!(names.get("#a1").map(String::as_str), Some("Other"));
        assert_eq!(values.get(":v0"), Some(&AttributeValue::Bool(true)));
    }

    #[tokio::test]
    async fn test_connect_without_table_is_deferred_error() {
        let config = StoreConfig {
            table_name: None,
            partition_key: Some("Partition_Id".to_string()),
            sort_key: Some("Sort_Key".to_string()),
            ..StoreConfig::default()
        };

        let client = DynamoDbStore::connect(&config).await;
        let err = client
            .get_item(&CompositeKey::new("p", "contract#c"))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            StoreError::NotConfigured("DYNAMODB_TABLE_NAME".to_string())
        );
    }

    #[test]
    fn test_schema_from_config() {
        let config = StoreConfig {
            table_name: Some("tariffs".to_string()),
            partition_key: Some("Partition_Id".to_string()),
            sort_key: Some("Sort_Key".to_string()),
            ..StoreConfig::default()
        };

        assert_eq!(
            config.schema(),
            Ok(TableSchema::new("tariffs", "Partition_Id", "Sort_Key"))
        );
    }
}
