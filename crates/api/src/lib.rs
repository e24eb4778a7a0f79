// Test code patterns:
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Roster API Library
//!
//! JWT-authenticated REST backend for user accounts and the student
//! roster. The auth core (password hashing, token service, identity
//! resolution) lives in [`auth`]; request-scoped database sessions in
//! [`db`].

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;

pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use state::AppState;
