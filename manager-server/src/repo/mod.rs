//! Resource repositories
//!
//! Ownership-scoped operations on top of the store traits. Every read and
//! write takes the acting principal's id; a resource owned by someone else
//! is reported exactly like one that does not exist.

pub mod account;
pub mod department;
pub mod employee;
pub mod profile;

pub use account::AccountService;
pub use department::DepartmentRepository;
pub use employee::EmployeeRepository;
pub use profile::ProfileRepository;

use shared::error::{AppError, ErrorCode};

use crate::db::StoreError;
use crate::error::ServiceError;

/// Map a store `Conflict` to a specific error code; pass other failures on
fn conflict_as(code: ErrorCode) -> impl FnOnce(StoreError) -> ServiceError {
    move |e| match e {
        StoreError::Conflict(_) => ServiceError::App(AppError::new(code)),
        other => other.into(),
    }
}
