//! Authentication: session tokens, password hashing and the principal gate

pub mod credential;
pub mod principal;
pub mod token;

pub use credential::{CredentialError, CredentialStore};
pub use principal::{Principal, PrincipalResolver, require_principal};
pub use token::{Clock, FixedClock, SessionToken, SystemClock, TokenError, TokenService};
