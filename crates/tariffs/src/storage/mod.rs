//! Storage implementations for the single-table layout.
//!
//! Entities live in one table, addressed by a partition id and a sort key of
//! the form `<prefix><id>`. The store itself sits behind the `StoreBackend` trait:
//!
//! - `dynamodb` - DynamoDB through `aws-sdk-dynamodb`
//! - `inmemory` - ordered in-memory tables for development and tests

pub mod client;
mod codec;
pub mod dynamodb;
mod entity;
pub mod inmemory;
mod repository;

pub use client::{StoreClient, TableSchema};
pub use dynamodb::DynamoDbStore;
pub use inmemory::InMemoryStore;
pub use repository::{ContractRepository, ProviderRepository, TariffRepository};
