//! Authentication core: password hashing, token service, credential
//! verification, and the request-authorization middleware.

pub mod credentials;
pub mod jwt;
pub mod middleware;
#[cfg(test)]
mod middleware_tests;
pub mod password;

pub use jwt::{Claims, TokenError, TokenService};
pub use middleware::{require_auth, AuthError, AuthUser};
pub use password::{hash_password, verify_password};
