//! Shared types for the org manager service
//!
//! Common types used by the server and its clients: the error system,
//! domain models and the request/response payloads of the HTTP API.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCode, ErrorKind};
