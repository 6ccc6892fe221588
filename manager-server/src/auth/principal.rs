//! Principal resolution
//!
//! Turns an `Authorization` header into an authenticated [`Principal`].
//! Every protected route runs [`require_principal`] before its handler, so
//! no repository call is reachable without a verified identity. Handlers
//! read it back with `Extension<Principal>`.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::error::{AppError, ErrorCode};

use super::token::{TokenError, TokenService};
use crate::state::AppState;

/// Required scheme prefix of the `Authorization` header
pub const BEARER_PREFIX: &str = "Bearer ";

/// Authenticated identity taken from a verified session token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: i64,
    pub email: String,
}

/// Gate between the raw header and the token service
#[derive(Debug, Clone)]
pub struct PrincipalResolver {
    tokens: TokenService,
}

impl PrincipalResolver {
    pub fn new(tokens: TokenService) -> Self {
        Self { tokens }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Resolve a raw `Authorization` header value
    pub fn resolve(&self, header: Option<&str>) -> Result<Principal, AppError> {
        let header = header.ok_or_else(AppError::not_authenticated)?;
        let token = header
            .strip_prefix(BEARER_PREFIX)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::new(ErrorCode::InvalidAuthScheme))?;

        self.tokens.verify(token).map_err(|e| {
            tracing::debug!(error = %e, "Session token rejected");
            match e {
                TokenError::Expired => AppError::token_expired(),
                _ => AppError::invalid_token("Invalid token"),
            }
        })
    }
}

/// Middleware that verifies the bearer token and injects the [`Principal`]
pub async fn require_principal(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let principal = state.resolver.resolve(header).inspect_err(|e| {
        tracing::warn!(uri = %req.uri(), code = %e.code, "Request rejected by auth gate");
    })?;

    req.extensions_mut().insert(principal);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorKind;

    fn resolver() -> PrincipalResolver {
        PrincipalResolver::new(TokenService::new(b"principal-test-secret-32-bytes-long"))
    }

    #[test]
    fn test_missing_header() {
        let err = resolver().resolve(None).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotAuthenticated);
    }

    #[test]
    fn test_wrong_scheme() {
        let resolver = resolver();
        let token = resolver.tokens().issue(1, "a@b.io").unwrap().token;

        for header in [token.clone(), format!("Basic {token}"), "Bearer ".to_string()] {
            let err = resolver.resolve(Some(&header)).unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidAuthScheme);
            assert_eq!(err.kind(), ErrorKind::Unauthenticated);
        }
    }

    #[test]
    fn test_valid_bearer() {
        let resolver = resolver();
        let token = resolver.tokens().issue(7, "seven@b.io").unwrap().token;

        let principal = resolver.resolve(Some(&format!("Bearer {token}"))).unwrap();
        assert_eq!(
            principal,
            Principal {
                id: 7,
                email: "seven@b.io".into()
            }
        );
    }

    #[test]
    fn test_invalid_token() {
        let err = resolver().resolve(Some("Bearer abc.def.ghi")).unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenInvalid);
    }
}
