//! Employee endpoints

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, patch};
use axum::{Extension, Json, Router};
use shared::error::ApiResponse;
use shared::models::{Employee, EmployeeCreate, EmployeeQuery, EmployeeUpdate};

use super::ApiResult;
use super::extract::ValidatedJson;
use crate::auth::Principal;
use crate::db::EmployeeFilter;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/employee", get(list).post(create))
        .route("/employee/{identity_number}", patch(update).delete(delete))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ValidatedJson(data): ValidatedJson<EmployeeCreate>,
) -> ApiResult<(StatusCode, Json<Employee>)> {
    let employee = state.employees.create(principal.id, &data).await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

pub async fn list(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<EmployeeQuery>,
) -> ApiResult<Json<Vec<Employee>>> {
    let filter = EmployeeFilter::from_query(&query)?;
    Ok(Json(state.employees.list(principal.id, &filter).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(identity_number): Path<String>,
    ValidatedJson(data): ValidatedJson<EmployeeUpdate>,
) -> ApiResult<Json<Employee>> {
    Ok(Json(
        state
            .employees
            .update(principal.id, &identity_number, &data)
            .await?,
    ))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(identity_number): Path<String>,
) -> ApiResult<ApiResponse<()>> {
    state.employees.delete(principal.id, &identity_number).await?;
    Ok(ApiResponse::ok("Employee deleted"))
}
