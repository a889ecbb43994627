//! Routes for the HR context.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{post, put};
use axum::{Json, Router};
use serde::Deserialize;
use workforce_core::id::{Identifier, Version};
use workforce_hr::application::command_handlers::{change_employment_status, register_employee};
use workforce_hr::domain::employee::{Employee, EmployeeData, EmployeeId, EmploymentStatus};

use crate::error::ApiError;
use crate::state::AppState;

/// Body of `PUT /api/v1/employees/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct ChangeStatusRequest {
    /// Version the change is based on.
    pub version: Version,
    /// New status.
    pub status: EmploymentStatus,
}

/// POST /api/v1/employees
async fn register(
    State(state): State<AppState>,
    Json(data): Json<EmployeeData>,
) -> Result<(StatusCode, Json<Employee>), ApiError> {
    let employee = register_employee(&state.db, data).await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

/// PUT /api/v1/employees/{id}/status
async fn change_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<ChangeStatusRequest>,
) -> Result<Json<Employee>, ApiError> {
    let employee = change_employment_status(
        &state.db,
        EmployeeId::from_raw(id),
        request.version,
        request.status,
    )
    .await?;
    Ok(Json(employee))
}

/// Returns the router for the HR context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(register))
        .route("/{id}/status", put(change_status))
}
