//! Employee Model

use super::department::DepartmentId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::{Validate, ValidationError};

/// Accepted gender values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a gender string outside [`Gender`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid gender: {0}")]
pub struct InvalidGender(pub String);

impl FromStr for Gender {
    type Err = InvalidGender;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            other => Err(InvalidGender(other.to_string())),
        }
    }
}

/// Employee entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub identity_number: String,
    pub name: String,
    pub gender: Gender,
    pub department_id: DepartmentId,
    pub employee_image_uri: String,
}

/// Image URIs must point at a jpg/jpeg/png object
pub fn validate_image_uri(uri: &str) -> Result<(), ValidationError> {
    let path = uri.split(['?', '#']).next().unwrap_or_default();
    let ext = path
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg" | "jpeg" | "png") => Ok(()),
        _ => Err(ValidationError::new("image_extension")
            .with_message("must end with .jpg, .jpeg or .png".into())),
    }
}

/// Create employee payload
///
/// `gender` and `departmentId` stay strings so their domain checks produce
/// the dedicated error codes instead of a generic deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeCreate {
    #[validate(length(min = 5, max = 33))]
    pub identity_number: String,
    #[validate(length(min = 4, max = 33))]
    pub name: String,
    #[validate(length(min = 1))]
    pub gender: String,
    #[validate(length(min = 1))]
    pub department_id: String,
    #[validate(url, custom(function = "validate_image_uri"))]
    pub employee_image_uri: String,
}

/// Update employee payload (full replacement of the mutable fields)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeUpdate {
    #[validate(length(min = 4, max = 33))]
    pub name: String,
    #[validate(length(min = 1))]
    pub gender: String,
    #[validate(length(min = 1))]
    pub department_id: String,
    #[validate(url, custom(function = "validate_image_uri"))]
    pub employee_image_uri: String,
}

/// `GET /employee` query string
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeQuery {
    pub identity_number: Option<String>,
    pub name: Option<String>,
    pub gender: Option<String>,
    pub department_id: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}
