use std::{env, time::Duration};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Backing store settings.
    pub store: StoreConfig,
    /// Upper bound for a single HTTP request, store round trips included
    /// (default: 30 seconds)
    pub request_timeout_seconds: u64,
    /// Value served by `GET /version` (default: the crate version)
    pub version: String,
    /// Value served by `GET /rest-version` (default: "v1")
    pub rest_api_version: String,
}

/// DynamoDB table and connection settings.
///
/// The table and key attribute names have no defaults. When any of them is
/// missing the store is still built, but fails on first use.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreConfig {
    pub table_name: Option<String>,
    pub partition_key: Option<String>,
    pub sort_key: Option<String>,
    /// Custom endpoint, e.g. DynamoDB Local.
    pub endpoint_url: Option<String>,
    pub region: Option<String>,
    /// `Limit` sent with every query page; DynamoDB decides when unset.
    pub query_page_size: Option<i32>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `DYNAMODB_TABLE_NAME` - Table holding every entity
    /// - `PARTITION_KEY` - Partition key attribute name
    /// - `SORT_KEY` - Sort key attribute name
    /// - `AWS_ENDPOINT_URL` - Custom DynamoDB endpoint (optional)
    /// - `AWS_REGION` - AWS region (optional, default chain otherwise)
    /// - `QUERY_PAGE_SIZE` - Items per query page (optional)
    /// - `REQUEST_TIMEOUT_SECS` - Request timeout in seconds (default: 30)
    /// - `VERSION` - Service version (default: crate version)
    /// - `REST_API_VERSION` - REST API version (default: "v1")
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through `lookup`, treating empty values as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Self {
            store: StoreConfig {
                table_name: var("DYNAMODB_TABLE_NAME"),
                partition_key: var("PARTITION_KEY"),
                sort_key: var("SORT_KEY"),
                endpoint_url: var("AWS_ENDPOINT_URL"),
                region: var("AWS_REGION"),
                query_page_size: var("QUERY_PAGE_SIZE")
                    .and_then(|v| v.parse().ok())
                    .filter(|size: &i32| *size > 0),
            },
            request_timeout_seconds: var("REQUEST_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            version: var("VERSION").unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string()),
            rest_api_version: var("REST_API_VERSION").unwrap_or_else(|| "v1".to_string()),
        }
    }

    /// Get the request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

impl StoreConfig {
    /// Table identity, or the name of the first missing variable.
    pub fn schema(&self) -> Result<crate::storage::TableSchema, &'static str> {
        let table_name = self.table_name.clone().ok_or("DYNAMODB_TABLE_NAME")?;
        let partition_key = self.partition_key.clone().ok_or("PARTITION_KEY")?;
        let sort_key = self.sort_key.clone().ok_or("SORT_KEY")?;

        Ok(crate::storage::TableSchema::new(
            table_name,
            partition_key,
            sort_key,
        ))
    }
}
