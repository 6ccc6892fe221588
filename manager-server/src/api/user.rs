//! Profile of the signed-in user

use axum::extract::State;
use axum::routing::get;
use axum::{Extension, Json, Router};
use shared::models::{ProfileUpdate, UserProfile};

use super::ApiResult;
use super::extract::ValidatedJson;
use crate::auth::Principal;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/user", get(get_profile).patch(update_profile))
}

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<UserProfile>> {
    Ok(Json(state.profiles.get(principal.id).await?))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ValidatedJson(update): ValidatedJson<ProfileUpdate>,
) -> ApiResult<Json<UserProfile>> {
    Ok(Json(state.profiles.update(principal.id, &update).await?))
}
