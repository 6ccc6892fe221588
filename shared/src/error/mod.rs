//! Unified error system
//!
//! This module provides:
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorKind`]: The five failure kinds every code collapses into
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ApiResponse`]: Unified API response format
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Account / profile errors
//! - 3xxx: Department errors
//! - 4xxx: Employee errors
//! - 5xxx: Upload errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ErrorKind};
//!
//! let err = AppError::new(ErrorCode::DepartmentNotFound);
//! assert_eq!(err.kind(), ErrorKind::NotFound);
//!
//! let err = AppError::validation("Invalid email format").with_detail("field", "email");
//! assert_eq!(err.kind(), ErrorKind::InvalidInput);
//! ```

mod codes;
mod http;
mod kind;
mod types;

pub use codes::{ErrorCode, InvalidErrorCode};
pub use kind::ErrorKind;
pub use types::{ApiResponse, AppError, AppResult};
