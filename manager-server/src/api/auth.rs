//! `POST /auth`: register or sign in

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use shared::models::{AuthRequest, AuthResponse};

use super::ApiResult;
use super::extract::ValidatedJson;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/auth", post(authenticate))
}

pub async fn authenticate(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<AuthRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let session = state.accounts.authenticate(&request).await?;
    Ok(Json(AuthResponse {
        email: session.email,
        token: session.token,
    }))
}
