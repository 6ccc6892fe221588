//! `POST /file`: image upload
//!
//! Multipart field `file`. The stored object lands at
//! `<bucket>/<principal email>/<filename>`.

use axum::extract::{Multipart, State};
use axum::routing::post;
use axum::{Extension, Json, Router};
use shared::error::{AppError, ErrorCode};
use shared::models::UploadResponse;

use super::ApiResult;
use crate::auth::Principal;
use crate::state::AppState;

const FILE_FIELD: &str = "file";

pub fn router() -> Router<AppState> {
    Router::new().route("/file", post(upload))
}

pub async fn upload(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::with_message(ErrorCode::InvalidRequest, format!("Multipart error: {e}"))
    })? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(|e| {
            AppError::with_message(ErrorCode::InvalidRequest, format!("Read error: {e}"))
        })?;
        file = Some((filename, bytes.to_vec()));
        break;
    }

    let (filename, bytes) = file.ok_or_else(|| AppError::new(ErrorCode::NoFileProvided))?;

    let uri = state
        .uploads
        .upload(&principal.email, &filename, bytes)
        .await?;
    Ok(Json(UploadResponse { uri }))
}
