//! Account authentication payloads

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::Validate;

/// What `POST /auth` should do with the credentials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthAction {
    /// Register a new account
    Create,
    /// Sign in to an existing account
    Login,
}

impl FromStr for AuthAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(AuthAction::Create),
            "login" => Ok(AuthAction::Login),
            other => Err(format!("invalid action: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AuthRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 32))]
    pub password: String,
    pub action: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub email: String,
    pub token: String,
}
