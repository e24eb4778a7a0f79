//! Application state

use sqlx::PgPool;

use crate::auth::TokenService;
use crate::config::Config;

/// Shared application state, cloned per request by the router.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub token_service: TokenService,
}

impl AppState {
    pub fn new(pool: PgPool, config: Config) -> Self {
        let token_service =
            TokenService::new(&config.jwt_secret, config.access_token_ttl_minutes);

        Self {
            pool,
            config,
            token_service,
        }
    }
}
