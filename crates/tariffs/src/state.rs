//! Application state with repository-based storage.
//!
//! Every repository shares one [`StoreClient`], so the state is cheap to
//! clone into each request handler.

use std::sync::Arc;

use tariffs_core::models::{Contract, Provider, Tariff};
use tariffs_core::storage::Repository;

use crate::config::Config;
use crate::storage::{
    ContractRepository, InMemoryStore, ProviderRepository, StoreClient, TableSchema,
    TariffRepository,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub contracts: Arc<dyn Repository<Contract>>,
    pub tariffs: Arc<dyn Repository<Tariff>>,
    pub providers: Arc<dyn Repository<Provider>>,
    /// Served by `GET /version`.
    pub version: String,
    /// Served by `GET /rest-version`.
    pub rest_api_version: String,
}

impl AppState {
    /// Creates state whose repositories all go through `client`.
    ///
    /// Each repository operation is bounded by the configured request
    /// timeout.
    pub fn new(client: StoreClient, config: &Config) -> Self {
        let timeout = config.request_timeout();
        Self {
            contracts: Arc::new(ContractRepository::new(client.clone()).with_timeout(timeout)),
            tariffs: Arc::new(TariffRepository::new(client.clone()).with_timeout(timeout)),
            providers: Arc::new(ProviderRepository::new(client).with_timeout(timeout)),
            version: config.version.clone(),
            rest_api_version: config.rest_api_version.clone(),
        }
    }

    /// Creates state backed by an empty [`InMemoryStore`].
    ///
    /// Uses the configured table identity when complete, placeholder names
    /// otherwise.
    pub fn in_memory(config: &Config) -> Self {
        let schema = config
            .store
            .schema()
            .unwrap_or_else(|_| TableSchema::new("tariffs", "Partition_Id", "Sort_Key"));
        let store = InMemoryStore::new(schema.clone());
        let client =
            StoreClient::new(Arc::new(store), schema).with_page_size(config.store.query_page_size);

        Self::new(client, config)
    }
}
