//! Session token service
//!
//! Issues and verifies HS256-signed session tokens. Expiry is checked against
//! an injected [`Clock`] rather than the wall clock inside `jsonwebtoken`, so
//! tests can mint tokens in the past.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use shared::error::AppError;
use thiserror::Error;

use super::Principal;

/// Session lifetime
pub const TOKEN_TTL_HOURS: i64 = 24;

/// Source of "now" for token issuance and expiry checks
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a fixed instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Claims carried by a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Principal id
    pub sub: String,
    pub email: String,
    /// Issued at (Unix timestamp seconds)
    pub iat: i64,
    /// Expiration (Unix timestamp seconds)
    pub exp: i64,
}

/// A freshly issued token and the claims it encodes
#[derive(Debug, Clone)]
pub struct SessionToken {
    pub token: String,
    pub principal_id: i64,
    pub email: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("invalid signature")]
    InvalidSignature,

    #[error("unexpected signing algorithm")]
    WrongAlgorithm,

    #[error("token expired")]
    Expired,

    #[error("token signing failed: {0}")]
    Signing(String),
}

impl From<TokenError> for AppError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Expired => AppError::token_expired(),
            TokenError::Signing(msg) => AppError::internal(msg),
            other => AppError::invalid_token(other.to_string()),
        }
    }
}

/// Issues and verifies session tokens with a single HMAC secret
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    pub fn new(secret: &[u8]) -> Self {
        Self::with_clock(secret, Arc::new(SystemClock))
    }

    pub fn with_clock(secret: &[u8], clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl: Duration::hours(TOKEN_TTL_HOURS),
            clock,
        }
    }

    /// Sign a token for `principal_id`, valid for 24 hours from now
    pub fn issue(&self, principal_id: i64, email: &str) -> Result<SessionToken, TokenError> {
        let issued_at = self.clock.now();
        let expires_at = issued_at + self.ttl;
        let claims = SessionClaims {
            sub: principal_id.to_string(),
            email: email.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        Ok(SessionToken {
            token,
            principal_id,
            email: claims.email,
            issued_at,
            expires_at,
        })
    }

    /// Check signature, algorithm and expiry, then return the embedded principal
    pub fn verify(&self, token: &str) -> Result<Principal, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["sub", "exp", "iat"]);

        let data =
            decode::<SessionClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                    ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                        TokenError::WrongAlgorithm
                    }
                    _ => TokenError::Malformed(e.to_string()),
                }
            })?;

        let claims = data.claims;
        if claims.exp <= self.clock.now().timestamp() {
            return Err(TokenError::Expired);
        }

        let id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| TokenError::Malformed("subject is not a principal id".into()))?;

        Ok(Principal {
            id,
            email: claims.email,
        })
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
