//! User profile model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Profile of the authenticated user
///
/// Everything except `email` is unset until the first update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub email: String,
    pub name: Option<String>,
    pub user_image_uri: Option<String>,
    pub company_name: Option<String>,
    pub company_image_uri: Option<String>,
}

/// `PATCH /user` payload; every field is required
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 4, max = 52))]
    pub name: String,
    #[validate(url)]
    pub user_image_uri: String,
    #[validate(length(min = 4, max = 52))]
    pub company_name: String,
    #[validate(url)]
    pub company_image_uri: String,
}
