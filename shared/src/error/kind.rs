//! Failure kinds
//!
//! Every [`ErrorCode`] collapses into exactly one [`ErrorKind`]. Clients that
//! only care about the broad outcome (retry? re-login? fix the input?) can
//! branch on the kind instead of enumerating codes.

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Missing, malformed, tampered or expired session token
    Unauthenticated,
    /// Schema, range or enum violation in the request
    InvalidInput,
    /// Entity absent, or owned by another principal
    NotFound,
    /// Duplicate key, or a delete blocked by dependent rows
    Conflict,
    /// Store or storage failure
    Internal,
}

impl ErrorCode {
    /// The failure kind this code belongs to
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotAuthenticated
            | Self::InvalidAuthScheme
            | Self::TokenExpired
            | Self::TokenInvalid => ErrorKind::Unauthenticated,

            Self::NotFound
            | Self::UserNotFound
            | Self::DepartmentNotFound
            | Self::EmployeeNotFound => ErrorKind::NotFound,

            Self::AlreadyExists
            | Self::EmailAlreadyExists
            | Self::DepartmentNameExists
            | Self::DepartmentHasEmployees
            | Self::EmployeeIdentityExists => ErrorKind::Conflict,

            Self::InternalError
            | Self::DatabaseError
            | Self::FileStorageFailed => ErrorKind::Internal,

            // Success never reaches an error path; grouped with input errors
            Self::Success
            | Self::ValidationFailed
            | Self::InvalidRequest
            | Self::PasswordMismatch
            | Self::InvalidAuthAction
            | Self::InvalidGender
            | Self::FileTooLarge
            | Self::UnsupportedFileFormat
            | Self::NoFileProvided
            | Self::EmptyFile => ErrorKind::InvalidInput,
        }
    }
}
