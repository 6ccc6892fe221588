//! Database access layer
//!
//! Repositories talk to storage through three narrow traits. `PgStore` is the
//! production backend; `MemoryStore` keeps the same semantics in process.
//!
//! Writes that depend on a precondition (ownership, "no employees left",
//! uniqueness) carry that precondition in the write itself. A `None` or a
//! zero row count means the precondition did not hold at write time.

pub mod filter;
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use shared::models::{Department, DepartmentId, Employee, Gender, ProfileUpdate, UserProfile};
use thiserror::Error;

use crate::error::BoxError;
pub use filter::Page;
pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique key is already taken; the payload names the key
    #[error("{0} already exists")]
    Conflict(String),

    #[error("{op} failed: {cause}")]
    Backend { op: &'static str, cause: BoxError },
}

impl StoreError {
    pub fn backend(op: &'static str, cause: impl Into<BoxError>) -> Self {
        StoreError::Backend {
            op,
            cause: cause.into(),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Stored login credential
#[derive(Debug, Clone)]
pub struct Credential {
    pub principal_id: i64,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Default)]
pub struct DepartmentFilter {
    /// Case-insensitive substring of the name
    pub name: Option<String>,
    pub page: Page,
}

#[derive(Debug, Clone, Default)]
pub struct EmployeeFilter {
    /// Prefix of the identity number
    pub identity_number: Option<String>,
    /// Case-insensitive substring of the name
    pub name: Option<String>,
    pub gender: Option<Gender>,
    pub department_id: Option<DepartmentId>,
    pub page: Page,
}

#[async_trait]
pub trait DepartmentStore: Send + Sync {
    /// Insert; `Conflict` when the name is taken
    async fn insert_department(&self, owner_id: i64, name: &str) -> StoreResult<Department>;

    /// Global lookup by exact name, regardless of owner
    async fn department_name_taken(&self, name: &str) -> StoreResult<bool>;

    async fn find_department(
        &self,
        owner_id: i64,
        id: DepartmentId,
    ) -> StoreResult<Option<Department>>;

    /// Owner's departments ordered by id
    async fn list_departments(
        &self,
        owner_id: i64,
        filter: &DepartmentFilter,
    ) -> StoreResult<Vec<Department>>;

    /// Rename if owned by `owner_id`; `None` otherwise
    async fn rename_department(
        &self,
        owner_id: i64,
        id: DepartmentId,
        name: &str,
    ) -> StoreResult<Option<Department>>;

    async fn count_employees(&self, id: DepartmentId) -> StoreResult<i64>;

    /// Delete if owned by `owner_id` and no employee references it.
    /// Returns the number of rows removed.
    async fn delete_department(&self, owner_id: i64, id: DepartmentId) -> StoreResult<u64>;
}

#[async_trait]
pub trait EmployeeStore: Send + Sync {
    async fn identity_taken(&self, identity_number: &str) -> StoreResult<bool>;

    /// Insert if `employee.department_id` is owned by `owner_id`; `None`
    /// otherwise. `Conflict` when the identity number is taken.
    async fn insert_employee(
        &self,
        owner_id: i64,
        employee: &Employee,
    ) -> StoreResult<Option<Employee>>;

    /// Employee visible to `owner_id` through its department
    async fn find_employee(
        &self,
        owner_id: i64,
        identity_number: &str,
    ) -> StoreResult<Option<Employee>>;

    async fn list_employees(
        &self,
        owner_id: i64,
        filter: &EmployeeFilter,
    ) -> StoreResult<Vec<Employee>>;

    /// Replace the mutable fields if the employee is visible to `owner_id`
    /// and the target department is owned by `owner_id`; `None` otherwise.
    async fn update_employee(
        &self,
        owner_id: i64,
        employee: &Employee,
    ) -> StoreResult<Option<Employee>>;

    /// Delete if visible to `owner_id`; returns rows removed
    async fn delete_employee(&self, owner_id: i64, identity_number: &str) -> StoreResult<u64>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new account; `Conflict` when the email is taken
    async fn insert_user(&self, email: &str, password_hash: &str) -> StoreResult<Credential>;

    async fn find_credential(&self, email: &str) -> StoreResult<Option<Credential>>;

    async fn find_profile(&self, user_id: i64) -> StoreResult<Option<UserProfile>>;

    /// Whether an account other than `except_id` holds `email`
    async fn email_taken_by_other(&self, email: &str, except_id: i64) -> StoreResult<bool>;

    /// Full replacement; `Conflict` when the email was taken concurrently
    async fn update_profile(
        &self,
        user_id: i64,
        update: &ProfileUpdate,
    ) -> StoreResult<Option<UserProfile>>;
}

/// Everything a repository set needs from one backend
pub trait Store: DepartmentStore + EmployeeStore + UserStore {}

impl<T: DepartmentStore + EmployeeStore + UserStore> Store for T {}
