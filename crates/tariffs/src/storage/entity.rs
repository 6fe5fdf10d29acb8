//! Generic entity operations over the [`Envelope`].
//!
//! These functions are shared by every repository. They never retry and
//! never translate store errors; see the repository for the one
//! transformation applied on top.

use serde::{de::DeserializeOwned, Serialize};

use tariffs_core::storage::{
    CompositeKey, Envelope, RepositoryError, Result, StoreError, StoredEntity,
};

use super::client::{Item, ItemUpdate, KeyCondition, StoreClient};
use super::codec::{decode_envelope, encode_envelope};

/// Fetches and decodes the payload stored under `key`.
///
/// An absent or empty item fails with [`RepositoryError::NotFound`],
/// carrying the entity id without its sort key prefix.
pub async fn get_entity<T: StoredEntity>(client: &StoreClient, key: &CompositeKey) -> Result<T> {
    let item = client.get_item(key).await?;

    let item = match item {
        Some(item) if !item.is_empty() => item,
        _ => {
            let id = key
                .sort_key
                .strip_prefix(T::SORT_KEY_PREFIX)
                .unwrap_or(&key.sort_key);
            return Err(RepositoryError::NotFound {
                entity_type: T::ENTITY_TYPE,
                id: id.to_string(),
            });
        }
    };

    let envelope: Envelope<T> = decode_envelope(client.schema(), &item)?;
    Ok(envelope.into_data())
}

/// Writes the full envelope, replacing any existing item with the same key.
pub async fn put_entity<T: Serialize>(client: &StoreClient, envelope: &Envelope<T>) -> Result<()> {
    let item = encode_envelope(client.schema(), envelope)?;
    client.put_item(item).await?;
    Ok(())
}

/// Applies `update` to the existing item under `key`.
///
/// The update is conditioned on the item existing; a missing key surfaces
/// as the store's [`StoreError::ConditionalCheckFailed`].
pub async fn update_entity(
    client: &StoreClient,
    key: &CompositeKey,
    update: ItemUpdate,
) -> Result<()> {
    let update = update.require_existing(client.schema().partition_key.clone());
    client.update_item(key, update).await?;
    Ok(())
}

/// Deletes the item under `key`. Deleting a missing key succeeds.
pub async fn delete_entity(client: &StoreClient, key: &CompositeKey) -> Result<()> {
    client.delete_item(key).await?;
    Ok(())
}

/// Returns every envelope in `partition_key` whose sort key begins with
/// `sort_key_prefix`, across all result pages, in store order.
pub async fn query_entities<T: DeserializeOwned>(
    client: &StoreClient,
    partition_key: &str,
    sort_key_prefix: &str,
) -> Result<Vec<Envelope<T>>> {
    let condition = client.key_condition(partition_key, sort_key_prefix);
    query_pages(client, &condition).await
}

/// Follows continuation cursors until a page arrives without one.
///
/// Pages are fetched one after another. Any failure discards what was
/// accumulated so far.
async fn query_pages<T: DeserializeOwned>(
    client: &StoreClient,
    condition: &KeyCondition,
) -> Result<Vec<Envelope<T>>> {
    let mut entities = Vec::new();
    let mut cursor: Option<Item> = None;
    let mut pages = 0usize;

    loop {
        if client.deadline_passed() {
            return Err(StoreError::DeadlineExceeded.into());
        }

        let page = client.query(condition, cursor.take()).await?;
        pages += 1;

        entities.reserve(page.items.len());
        for item in &page.items {
            entities.push(decode_envelope(client.schema(), item)?);
        }

        match page.last_evaluated_key {
            Some(next) if !next.is_empty() => cursor = Some(next),
            _ => break,
        }
    }

    tracing::debug!(
        partition = %condition.partition_value,
        prefix = %condition.sort_prefix,
        pages,
        items = entities.len(),
        "Query completed"
    );

    Ok(entities)
}
