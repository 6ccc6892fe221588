//! HTTP API
//!
//! Everything except `/health` and `/api/v1/auth` runs behind
//! [`require_principal`].

pub mod auth;
pub mod department;
pub mod employee;
pub mod extract;
pub mod file;
pub mod health;
pub mod user;

use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Router, middleware};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::auth::require_principal;
use crate::error::ServiceError;
use crate::state::AppState;

pub type ApiResult<T> = Result<T, ServiceError>;

/// Request body ceiling; uploads are validated against a smaller limit later
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Create the application router
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    let protected = Router::new()
        .merge(user::router())
        .merge(department::router())
        .merge(employee::router())
        .merge(file::router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_principal,
        ));

    let v1 = Router::new().merge(auth::router()).merge(protected);

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/v1", v1)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .with_state(state)
}
