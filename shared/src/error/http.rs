//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use super::kind::ErrorKind;
use http::StatusCode;

impl ErrorKind {
    /// HTTP status a handler answers with for this kind
    pub const fn http_status(&self) -> StatusCode {
        match self {
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::InvalidInput => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,
            _ => self.kind().http_status(),
        }
    }
}
