//! Unified service-layer error type
//!
//! `ServiceError` bridges the gap between store-layer errors (`StoreError`)
//! and the API-layer error (`AppError`). It enables `?` propagation in the
//! repositories without manual `.map_err(|e| { tracing::error!(...); ... })`.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};

use crate::db::StoreError;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Service-layer error, two variants only.
///
/// - `Db`: store/infrastructure errors (logged with the failing operation, mapped to DatabaseError)
/// - `App`: business-rule errors (transparent pass-through to client)
#[derive(Debug)]
pub enum ServiceError {
    /// Store failure, tagged with the operation that hit it
    Db { op: &'static str, source: BoxError },
    /// Business-rule error (already an AppError with the correct ErrorCode)
    App(AppError),
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict(what) => {
                ServiceError::App(AppError::conflict(format!("{what} already exists")))
            }
            StoreError::Backend { op, cause } => ServiceError::Db { op, source: cause },
        }
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Db { op, source } => {
                tracing::error!(op, error = %source, "Service database error");
                AppError::new(ErrorCode::DatabaseError)
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

/// Convenience type alias for service-layer results
pub type ServiceResult<T> = Result<T, ServiceError>;
