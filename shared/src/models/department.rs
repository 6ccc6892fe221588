//! Department Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Department identifier
///
/// Stored as a BIGSERIAL, exchanged as a JSON string (`"departmentId": "42"`).
/// Numbers are accepted on input as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DepartmentId(pub i64);

impl DepartmentId {
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for DepartmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DepartmentId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(DepartmentId)
    }
}

impl Serialize for DepartmentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DepartmentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(i64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(DepartmentId(n)),
            Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Department entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    #[serde(rename = "departmentId")]
    pub id: DepartmentId,
    pub name: String,
    /// Owning principal; never sent to clients
    #[serde(skip_serializing, default)]
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create / rename department payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DepartmentRequest {
    #[validate(length(min = 4, max = 33))]
    pub name: String,
}

/// `GET /department` query string
///
/// Pagination values stay raw strings: unparsable values fall back to the
/// defaults instead of rejecting the request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DepartmentQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
    pub name: Option<String>,
}
