//! Data models
//!
//! Shared between the server and API clients.
//! JSON keys are camelCase; database ids are `i64` (PostgreSQL BIGSERIAL).

pub mod auth;
pub mod department;
pub mod employee;
pub mod profile;
pub mod upload;

// Re-exports
pub use auth::*;
pub use department::*;
pub use employee::*;
pub use profile::*;
pub use upload::*;
