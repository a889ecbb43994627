//! Routes for location aggregates.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use workforce_core::id::{Identifier, Version};
use workforce_locations::application::command_handlers::{
    create_location, delete_location, update_location,
};
use workforce_locations::application::query_handlers::{
    LocationListing, get_location, list_locations,
};
use workforce_locations::domain::location::{Location, LocationData, LocationId};

use super::PageQuery;
use crate::error::ApiError;
use crate::state::AppState;

/// Body of `PUT /api/v1/locations/{id}`: the version the caller read and
/// the full replacement data.
#[derive(Debug, Deserialize)]
pub struct UpdateLocationRequest {
    /// Version the edit is based on.
    pub version: Version,
    /// New business data, facilities included.
    pub data: LocationData,
}

/// POST /api/v1/locations
async fn create(
    State(state): State<AppState>,
    Json(data): Json<LocationData>,
) -> Result<(StatusCode, Json<Location>), ApiError> {
    let location = create_location(&state.db, data).await?;
    Ok((StatusCode::CREATED, Json(location)))
}

/// GET /api/v1/locations
async fn list(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<LocationListing>, ApiError> {
    let listing = list_locations(
        &state.db,
        query.search().as_ref(),
        query.limit(),
        query.offset(),
        &query.sort()?,
    )
    .await?;
    Ok(Json(listing))
}

/// GET /api/v1/locations/{id}
async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Location>, ApiError> {
    Ok(Json(get_location(&state.db, LocationId::from_raw(id)).await?))
}

/// PUT /api/v1/locations/{id}
async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateLocationRequest>,
) -> Result<Json<Location>, ApiError> {
    let location = Location::new(LocationId::from_raw(id), request.version, request.data);
    Ok(Json(update_location(&state.db, location).await?))
}

/// DELETE /api/v1/locations/{id}
async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    delete_location(&state.db, LocationId::from_raw(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Returns the router for location aggregates.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_one).put(update).delete(delete))
}
