use std::time::Duration;

use axum::{
    http::StatusCode,
    middleware::map_response,
    routing::{get, MethodRouter},
    Router,
};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use tariffs_core::models::{Contract, Provider, Tariff};

use crate::{
    handlers::{
        entities::{create, delete, get_one, list, update, Resource},
        error::timeout_body,
        service::{health, rest_version, version},
    },
    state::AppState,
};

/// Every route is scoped to one partition.
pub const BASE_PATH: &str = "/api/v1/partitions/{partition_id}";

/// Which side of the API a process serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Model {
    /// Health, version and GET routes
    Read,
    /// POST, PUT and DELETE routes
    Write,
    /// Both models in one process
    All,
}

impl Model {
    fn reads(self) -> bool {
        matches!(self, Model::Read | Model::All)
    }

    fn writes(self) -> bool {
        matches!(self, Model::Write | Model::All)
    }
}

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState, model: Model, request_timeout: Duration) -> Router {
    let mut api = Router::new()
        .merge(entity_routes::<Contract>(model))
        .merge(entity_routes::<Tariff>(model))
        .merge(entity_routes::<Provider>(model));

    if model.reads() {
        api = api
            .route(&format!("{BASE_PATH}/health"), get(health))
            .route(&format!("{BASE_PATH}/version"), get(version))
            .route(&format!("{BASE_PATH}/rest-version"), get(rest_version));
    }

    api.layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::GATEWAY_TIMEOUT,
            request_timeout,
        ))
        .layer(map_response(timeout_body))
        .with_state(state)
}

/// `/<collection>` and `/<collection>/{id}` for one entity type.
fn entity_routes<T: Resource>(model: Model) -> Router<AppState> {
    let mut collection: MethodRouter<AppState> = MethodRouter::new();
    let mut item: MethodRouter<AppState> = MethodRouter::new();

    if model.reads() {
        collection = collection.get(list::<T>);
        item = item.get(get_one::<T>);
    }
    if model.writes() {
        collection = collection.post(create::<T>);
        item = item.put(update::<T>).delete(delete::<T>);
    }

    Router::new()
        .route(&format!("{BASE_PATH}/{}", T::COLLECTION), collection)
        .route(&format!("{BASE_PATH}/{}/{{id}}", T::COLLECTION), item)
}
