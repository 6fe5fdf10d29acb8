//! CRUD handlers shared by contracts, tariffs and providers.
//!
//! Each handler is generic over the entity type; [`Resource`] picks the
//! repository out of the state and the validation rules for the payload.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use tariffs_core::models::{
    validate_contract, validate_provider, validate_tariff, validate_uuid_v4, Contract, Provider,
    Tariff, ValidationError,
};
use tariffs_core::storage::{Repository, StoredEntity};

use super::ApiError;
use crate::state::AppState;

/// An entity type served under `/<collection>`.
pub trait Resource: StoredEntity {
    fn repository(state: &AppState) -> &Arc<dyn Repository<Self>>;

    fn validate(&self) -> Result<(), ValidationError>;
}

impl Resource for Contract {
    fn repository(state: &AppState) -> &Arc<dyn Repository<Self>> {
        &state.contracts
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_contract(self)
    }
}

impl Resource for Tariff {
    fn repository(state: &AppState) -> &Arc<dyn Repository<Self>> {
        &state.tariffs
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_tariff(self)
    }
}

impl Resource for Provider {
    fn repository(state: &AppState) -> &Arc<dyn Repository<Self>> {
        &state.providers
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_provider(self)
    }
}

fn validate_path(partition_id: &str, id: Option<&str>) -> Result<(), ApiError> {
    validate_uuid_v4("partitionId", partition_id)?;
    if let Some(id) = id {
        validate_uuid_v4("id", id)?;
    }
    Ok(())
}

/// List every entity of the partition (GET /<collection>).
pub async fn list<T: Resource>(
    State(state): State<AppState>,
    Path(partition_id): Path<String>,
) -> Result<Json<Vec<T>>, ApiError> {
    validate_path(&partition_id, None)?;

    let entities = T::repository(&state).get_all(&partition_id).await?;

    Ok(Json(entities))
}

/// Get a single entity (GET /<collection>/{id}).
pub async fn get_one<T: Resource>(
    State(state): State<AppState>,
    Path((partition_id, id)): Path<(String, String)>,
) -> Result<Json<T>, ApiError> {
    validate_path(&partition_id, Some(&id))?;

    let entity = T::repository(&state).get(&partition_id, &id).await?;

    Ok(Json(entity))
}

/// Create an entity under a fresh id (POST /<collection>).
pub async fn create<T: Resource>(
    State(state): State<AppState>,
    Path(partition_id): Path<String>,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<(StatusCode, Json<T>), ApiError> {
    validate_path(&partition_id, None)?;
    let Json(mut entity) = payload?;
    entity.validate()?;

    entity.set_id(Uuid::new_v4().to_string());
    let created = T::repository(&state).create(&partition_id, entity).await?;

    tracing::info!(
        partition_id = %partition_id,
        entity_type = T::ENTITY_TYPE,
        id = %created.id(),
        "Created entity"
    );

    Ok((StatusCode::CREATED, Json(created)))
}

/// Replace the payload of an existing entity (PUT /<collection>/{id}).
///
/// The body may omit its id; one that is present must equal the path id.
pub async fn update<T: Resource>(
    State(state): State<AppState>,
    Path((partition_id, id)): Path<(String, String)>,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    validate_path(&partition_id, Some(&id))?;
    let Json(mut entity) = payload?;
    entity.validate()?;

    if !entity.id().is_empty() {
        validate_uuid_v4("id", entity.id())?;
        if entity.id() != id {
            return Err(
                ValidationError::invalid("id", "does not match the id in the path").into(),
            );
        }
    }
    entity.set_id(id);
    T::repository(&state).update(&partition_id, &entity).await?;

    tracing::info!(
        partition_id = %partition_id,
        entity_type = T::ENTITY_TYPE,
        id = %entity.id(),
        "Updated entity"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// Delete an entity (DELETE /<collection>/{id}).
pub async fn delete<T: Resource>(
    State(state): State<AppState>,
    Path((partition_id, id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    validate_path(&partition_id, Some(&id))?;

    T::repository(&state).delete(&partition_id, &id).await?;

    tracing::info!(
        partition_id = %partition_id,
        entity_type = T::ENTITY_TYPE,
        id = %id,
        "Deleted entity"
    );

    Ok(StatusCode::NO_CONTENT)
}
