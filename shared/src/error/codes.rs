//! Unified error codes
//!
//! Error codes are organized by range:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Account / profile errors
//! - 3xxx: Department errors
//! - 4xxx: Employee errors
//! - 5xxx: Upload errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,

    // ==================== 1xxx: Auth ====================
    /// Not authenticated
    NotAuthenticated = 1001,
    /// Authorization header has the wrong scheme
    InvalidAuthScheme = 1002,
    /// Token expired
    TokenExpired = 1003,
    /// Token invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Account ====================
    /// No account registered under this email
    UserNotFound = 2001,
    /// Email already registered to another account
    EmailAlreadyExists = 2002,
    /// Password does not match the stored credential
    PasswordMismatch = 2003,
    /// Unknown auth action
    InvalidAuthAction = 2004,

    // ==================== 3xxx: Department ====================
    /// Department not found
    DepartmentNotFound = 3001,
    /// Department name already taken
    DepartmentNameExists = 3002,
    /// Department still has employees
    DepartmentHasEmployees = 3003,

    // ==================== 4xxx: Employee ====================
    /// Employee not found
    EmployeeNotFound = 4001,
    /// Identity number already registered
    EmployeeIdentityExists = 4002,
    /// Gender outside the accepted values
    InvalidGender = 4003,

    // ==================== 5xxx: Upload ====================
    /// File exceeds the size ceiling
    FileTooLarge = 5001,
    /// File extension not in the allow-list
    UnsupportedFileFormat = 5002,
    /// No file part in the multipart body
    NoFileProvided = 5003,
    /// Uploaded file is empty
    EmptyFile = 5004,
    /// Object store rejected the upload
    FileStorageFailed = 5005,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",

            ErrorCode::NotAuthenticated => "Authorization header is required",
            ErrorCode::InvalidAuthScheme => "Invalid authorization format",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",

            ErrorCode::UserNotFound => "Email not found",
            ErrorCode::EmailAlreadyExists => "Email already exists",
            ErrorCode::PasswordMismatch => "Password mismatch",
            ErrorCode::InvalidAuthAction => "Invalid action",

            ErrorCode::DepartmentNotFound => "Department not found",
            ErrorCode::DepartmentNameExists => "Department already exists",
            ErrorCode::DepartmentHasEmployees => "Department still contains employees",

            ErrorCode::EmployeeNotFound => "Employee not found",
            ErrorCode::EmployeeIdentityExists => "Identity number conflict",
            ErrorCode::InvalidGender => "Invalid gender value",

            ErrorCode::FileTooLarge => "File size exceeds the maximum limit of 100 KiB",
            ErrorCode::UnsupportedFileFormat => "Invalid file type. Allowed types: jpeg, jpg, png",
            ErrorCode::NoFileProvided => "No file provided",
            ErrorCode::EmptyFile => "Empty file",
            ErrorCode::FileStorageFailed => "Failed to upload file",

            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidAuthScheme),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),

            // Account
            2001 => Ok(ErrorCode::UserNotFound),
            2002 => Ok(ErrorCode::EmailAlreadyExists),
            2003 => Ok(ErrorCode::PasswordMismatch),
            2004 => Ok(ErrorCode::InvalidAuthAction),

            // Department
            3001 => Ok(ErrorCode::DepartmentNotFound),
            3002 => Ok(ErrorCode::DepartmentNameExists),
            3003 => Ok(ErrorCode::DepartmentHasEmployees),

            // Employee
            4001 => Ok(ErrorCode::EmployeeNotFound),
            4002 => Ok(ErrorCode::EmployeeIdentityExists),
            4003 => Ok(ErrorCode::InvalidGender),

            // Upload
            5001 => Ok(ErrorCode::FileTooLarge),
            5002 => Ok(ErrorCode::UnsupportedFileFormat),
            5003 => Ok(ErrorCode::NoFileProvided),
            5004 => Ok(ErrorCode::EmptyFile),
            5005 => Ok(ErrorCode::FileStorageFailed),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::EmailAlreadyExists.code(), 2002);
        assert_eq!(ErrorCode::DepartmentHasEmployees.code(), 3003);
        assert_eq!(ErrorCode::EmployeeIdentityExists.code(), 4002);
        assert_eq!(ErrorCode::FileTooLarge.code(), 5001);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_try_from_round_trip() {
        for code in [
            ErrorCode::Success,
            ErrorCode::TokenExpired,
            ErrorCode::PasswordMismatch,
            ErrorCode::DepartmentNameExists,
            ErrorCode::InvalidGender,
            ErrorCode::UnsupportedFileFormat,
            ErrorCode::DatabaseError,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_invalid_code() {
        assert_eq!(ErrorCode::try_from(1), Err(InvalidErrorCode(1)));
        assert_eq!(ErrorCode::try_from(7), Err(InvalidErrorCode(7)));
        assert_eq!(ErrorCode::try_from(9004), Err(InvalidErrorCode(9004)));
        assert_eq!(ErrorCode::try_from(65535), Err(InvalidErrorCode(65535)));
    }

    #[test]
    fn test_serde_as_number() {
        let json = serde_json::to_string(&ErrorCode::DepartmentNotFound).unwrap();
        assert_eq!(json, "3001");
        let code: ErrorCode = serde_json::from_str("4002").unwrap();
        assert_eq!(code, ErrorCode::EmployeeIdentityExists);
        assert!(serde_json::from_str::<ErrorCode>("4242").is_err());
    }
}
