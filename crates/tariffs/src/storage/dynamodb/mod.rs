//! DynamoDB storage backend implementation.
//!
//! All entity types share one table. Items are addressed by the configured
//! partition and sort key attributes and carry their payload in `Data`.

mod error;
mod store;

pub use store::DynamoDbStore;
