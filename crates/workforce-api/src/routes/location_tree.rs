//! Routes for the lazily expanded location tree.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use workforce_core::error::DomainError;
use workforce_core::id::Identifier;
use workforce_locations::application::query_handlers::{
    TreeLevel, fetch_children, fetch_country_locations, find_node,
};
use workforce_locations::domain::location::{CountryCode, LocationId};
use workforce_locations::domain::tree::LocationNode;

use super::PageQuery;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/v1/location-tree
async fn countries(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<TreeLevel>, ApiError> {
    let level = fetch_children(
        &state.db,
        None,
        query.search().as_ref(),
        query.limit(),
        query.offset(),
        &query.sort()?,
    )
    .await?;
    Ok(Json(level))
}

/// GET /api/v1/location-tree/countries/{code}
async fn country_locations(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<TreeLevel>, ApiError> {
    let country = CountryCode::new(&code)?;
    let level = fetch_country_locations(
        &state.db,
        &country,
        query.search().as_ref(),
        query.limit(),
        query.offset(),
        &query.sort()?,
    )
    .await?;
    Ok(Json(level))
}

/// GET /api/v1/location-tree/nodes/{id}
async fn node(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<LocationNode>, ApiError> {
    let id = LocationId::from_raw(id);
    let node = find_node(&state.db, id)
        .await?
        .ok_or_else(|| DomainError::not_found(id))?;
    Ok(Json(node))
}

/// Returns the router for the location tree.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(countries))
        .route("/countries/{code}", get(country_locations))
        .route("/nodes/{id}", get(node))
}
