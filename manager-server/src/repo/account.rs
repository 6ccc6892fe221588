//! Account registration and login

use std::sync::Arc;

use shared::error::{AppError, ErrorCode};
use shared::models::{AuthAction, AuthRequest};

use super::conflict_as;
use crate::auth::{CredentialStore, SessionToken, TokenService};
use crate::db::UserStore;
use crate::error::ServiceResult;

#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserStore>,
    credentials: CredentialStore,
    tokens: TokenService,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserStore>, tokens: TokenService) -> Self {
        Self {
            users,
            credentials: CredentialStore,
            tokens,
        }
    }

    /// Dispatch on `request.action`
    pub async fn authenticate(&self, request: &AuthRequest) -> ServiceResult<SessionToken> {
        let action: AuthAction = request.action.parse().map_err(|_| {
            AppError::new(ErrorCode::InvalidAuthAction).with_detail("action", request.action.as_str())
        })?;

        match action {
            AuthAction::Create => self.register(&request.email, &request.password).await,
            AuthAction::Login => self.login(&request.email, &request.password).await,
        }
    }

    pub async fn register(&self, email: &str, password: &str) -> ServiceResult<SessionToken> {
        if self.users.find_credential(email).await?.is_some() {
            return Err(AppError::new(ErrorCode::EmailAlreadyExists).into());
        }

        let hash = self.credentials.hash(password).map_err(AppError::from)?;
        let credential = self
            .users
            .insert_user(email, &hash)
            .await
            .map_err(conflict_as(ErrorCode::EmailAlreadyExists))?;

        tracing::info!(principal_id = credential.principal_id, "Account registered");
        self.issue(credential.principal_id, &credential.email)
    }

    pub async fn login(&self, email: &str, password: &str) -> ServiceResult<SessionToken> {
        let credential = self
            .users
            .find_credential(email)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

        let matches = self
            .credentials
            .verify(&credential.password_hash, password)
            .map_err(AppError::from)?;
        if !matches {
            tracing::warn!(principal_id = credential.principal_id, "Login rejected: wrong password");
            return Err(AppError::new(ErrorCode::PasswordMismatch).into());
        }

        tracing::info!(principal_id = credential.principal_id, "Login succeeded");
        self.issue(credential.principal_id, &credential.email)
    }

    fn issue(&self, principal_id: i64, email: &str) -> ServiceResult<SessionToken> {
        self.tokens
            .issue(principal_id, email)
            .map_err(|e| AppError::from(e).into())
    }
}
