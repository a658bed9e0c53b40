//! CRUD routes shared by every [`Resource`] kind.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use uuid::Uuid;

use crate::http::response::ApiError;
use crate::store::{Resource, ResourceStore};

/// `GET/POST {prefix}` and `GET/PUT/DELETE {prefix}/{id}` over `store`.
pub fn resource_router<T: Resource>(prefix: &str, store: ResourceStore<T>) -> Router {
    Router::new()
        .route(prefix, get(list::<T>).post(create::<T>))
        .route(
            &format!("{prefix}/{{id}}"),
            get(fetch::<T>).put(update::<T>).delete(remove::<T>),
        )
        .with_state(store)
}

async fn list<T: Resource>(State(store): State<ResourceStore<T>>) -> Json<Vec<T>> {
    Json(store.list())
}

async fn create<T: Resource>(
    State(store): State<ResourceStore<T>>,
    Json(input): Json<T::Create>,
) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(store.create(input)))
}

async fn fetch<T: Resource>(
    State(store): State<ResourceStore<T>>,
    Path(id): Path<Uuid>,
) -> Result<Json<T>, ApiError> {
    store.get(&id).map(Json).ok_or(ApiError::NotFound(T::KIND))
}

async fn update<T: Resource>(
    State(store): State<ResourceStore<T>>,
    Path(id): Path<Uuid>,
    Json(input): Json<T::Update>,
) -> Result<Json<T>, ApiError> {
    store
        .update(&id, input)
        .map(Json)
        .ok_or(ApiError::NotFound(T::KIND))
}

async fn remove<T: Resource>(
    State(store): State<ResourceStore<T>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    store
        .remove(&id)
        .map(|_| {
            tracing::debug!(kind = T::KIND, id = %id, "Resource deleted");
            StatusCode::NO_CONTENT
        })
        .ok_or(ApiError::NotFound(T::KIND))
}
