//! Manager server configuration

use std::time::Duration;

use crate::error::BoxError;

/// Minimum HMAC secret length outside development
const MIN_JWT_SECRET_LEN: usize = 32;

/// Manager server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Environment: development | staging | production
    pub environment: String,
    /// HTTP listen port
    pub http_port: u16,
    /// PostgreSQL connection URL
    pub database_url: String,
    /// Pool size
    pub db_max_connections: u32,
    /// HMAC secret for session tokens
    pub jwt_secret: String,
    /// Bucket receiving uploaded images
    pub s3_bucket: String,
    pub aws_region: String,
    /// Custom S3 endpoint (MinIO, LocalStack); path-style addressing when set
    pub s3_endpoint: Option<String>,
    /// Per-request deadline enforced by the HTTP layer
    pub request_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, BoxError> {
        let var = |name: &str| lookup(name).filter(|v| !v.is_empty());
        let environment = var("ENVIRONMENT").unwrap_or_else(|| "development".into());

        let database_url = match var("DATABASE_URL") {
            Some(url) => url,
            None => format!(
                "postgres://{}:{}@{}:{}/{}",
                var("DB_USER").unwrap_or_else(|| "postgres".into()),
                var("DB_PASS").unwrap_or_else(|| "password".into()),
                var("DB_HOST").unwrap_or_else(|| "localhost".into()),
                var("DB_PORT").unwrap_or_else(|| "5432".into()),
                var("DB_NAME").unwrap_or_else(|| "mydb".into()),
            ),
        };

        let jwt_secret = Self::require_secret(var("JWT_SECRET"), "JWT_SECRET", &environment)?;
        if environment != "development" && jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(format!(
                "JWT_SECRET must be at least {MIN_JWT_SECRET_LEN} bytes in {environment} environment"
            )
            .into());
        }

        Ok(Self {
            http_port: var("APP_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            database_url,
            db_max_connections: var("DB_MAX_CONNECTIONS")
                .and_then(|n| n.parse().ok())
                .unwrap_or(10),
            jwt_secret,
            s3_bucket: Self::require_secret(
                var("AWS_S3_BUCKET_NAME"),
                "AWS_S3_BUCKET_NAME",
                &environment,
            )?,
            aws_region: var("AWS_REGION").unwrap_or_else(|| "ap-southeast-1".into()),
            s3_endpoint: var("AWS_S3_ENDPOINT"),
            request_timeout: Duration::from_secs(
                var("REQUEST_TIMEOUT_SECS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
            environment,
        })
    }

    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(
        value: Option<String>,
        name: &str,
        environment: &str,
    ) -> Result<String, BoxError> {
        match value {
            Some(v) => Ok(v),
            None if environment == "development" => Ok(format!("dev-{name}-not-for-production")),
            None => Err(format!("{name} must be set in {environment} environment").into()),
        }
    }
}
