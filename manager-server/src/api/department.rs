//! Department endpoints

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, patch};
use axum::{Extension, Json, Router};
use shared::error::{ApiResponse, AppError};
use shared::models::{Department, DepartmentId, DepartmentQuery, DepartmentRequest};

use super::ApiResult;
use super::extract::ValidatedJson;
use crate::auth::Principal;
use crate::db::DepartmentFilter;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/department", get(list).post(create))
        .route("/department/{department_id}", patch(update).delete(delete))
}

fn parse_id(raw: &str) -> Result<DepartmentId, AppError> {
    raw.parse().map_err(|_| {
        AppError::validation(format!("Invalid department id: {raw}"))
            .with_detail("departmentId", raw)
    })
}

pub async fn create(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ValidatedJson(data): ValidatedJson<DepartmentRequest>,
) -> ApiResult<(StatusCode, Json<Department>)> {
    let department = state.departments.create(principal.id, &data.name).await?;
    Ok((StatusCode::CREATED, Json(department)))
}

pub async fn list(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<DepartmentQuery>,
) -> ApiResult<Json<Vec<Department>>> {
    let filter = DepartmentFilter::from_query(&query);
    Ok(Json(state.departments.list(principal.id, &filter).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(department_id): Path<String>,
    ValidatedJson(data): ValidatedJson<DepartmentRequest>,
) -> ApiResult<Json<Department>> {
    let id = parse_id(&department_id)?;
    Ok(Json(
        state.departments.update(principal.id, id, &data.name).await?,
    ))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(department_id): Path<String>,
) -> ApiResult<ApiResponse<()>> {
    let id = parse_id(&department_id)?;
    state.departments.delete(principal.id, id).await?;
    Ok(ApiResponse::ok("Department deleted"))
}
