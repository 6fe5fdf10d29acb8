//! In-memory backing store for development and tests.
//!
//! Implements the same primitives as DynamoDB (ordered sort keys, prefix
//! queries split into pages with a continuation cursor, conditional
//! updates) over `BTreeMap`s wrapped in `Arc<RwLock<_>>`.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! let schema = TableSchema::new("tariffs", "Partition_Id", "Sort_Key");
//! let store = Arc::new(InMemoryStore::new(schema.clone()));
//! let client = StoreClient::new(store, schema);
//! ```

mod store;

pub use store::InMemoryStore;
