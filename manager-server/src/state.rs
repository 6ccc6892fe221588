//! Application state for the manager server

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;

use crate::auth::{PrincipalResolver, TokenService};
use crate::config::Config;
use crate::db::{PgStore, Store};
use crate::error::BoxError;
use crate::repo::{AccountService, DepartmentRepository, EmployeeRepository, ProfileRepository};
use crate::storage::{ObjectStore, S3ObjectStore, UploadService};

/// Shared application state
///
/// Everything here is cheap to clone: repositories hold `Arc`s to the
/// store and the token service holds its keys by value.
#[derive(Clone)]
pub struct AppState {
    /// Bearer header → principal
    pub resolver: PrincipalResolver,
    pub accounts: AccountService,
    pub profiles: ProfileRepository,
    pub departments: DepartmentRepository,
    pub employees: EmployeeRepository,
    pub uploads: UploadService,
}

impl AppState {
    /// Connect to PostgreSQL, run migrations and build the S3 client
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect(&config.database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        let objects = S3ObjectStore::from_config(config).await;

        Ok(Self::with_store(
            Arc::new(PgStore::new(pool)),
            TokenService::new(config.jwt_secret.as_bytes()),
            Arc::new(objects),
            config.s3_bucket.clone(),
        ))
    }

    /// Assemble state over any store backend
    pub fn with_store<S: Store + 'static>(
        store: Arc<S>,
        tokens: TokenService,
        objects: Arc<dyn ObjectStore>,
        bucket: impl Into<String>,
    ) -> Self {
        Self {
            resolver: PrincipalResolver::new(tokens.clone()),
            accounts: AccountService::new(store.clone(), tokens),
            profiles: ProfileRepository::new(store.clone()),
            departments: DepartmentRepository::new(store.clone()),
            employees: EmployeeRepository::new(store.clone(), store),
            uploads: UploadService::new(objects, bucket),
        }
    }
}
