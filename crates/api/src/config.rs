//! Application configuration
//!
//! Loaded once from the environment at startup and passed by value
//! into `AppState`; nothing reads environment variables after boot.

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string.
    pub database_url: String,
    /// Address the HTTP listener binds to.
    pub bind_address: String,
    /// Symmetric secret for signing access tokens.
    pub jwt_secret: String,
    /// Default access token lifetime in minutes.
    pub access_token_ttl_minutes: i64,
    /// Comma-separated list of allowed CORS origins.
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let bind_address =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8000".to_string());

        let jwt_secret = std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters");
        }

        let access_token_ttl_minutes = match std::env::var("ACCESS_TOKEN_TTL_MINUTES") {
            Ok(raw) => raw
                .parse()
                .context("ACCESS_TOKEN_TTL_MINUTES must be an integer")?,
            Err(_) => 30,
        };

        let allowed_origins = parse_origins(
            &std::env::var("ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
        );

        Ok(Self {
            database_url,
            bind_address,
            jwt_secret,
            access_token_ttl_minutes,
            allowed_origins,
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_origins_splits_and_trims() {
        let origins = parse_origins("http://localhost:3000, https://app.example.com ,");
        assert_eq!(
            origins,
            vec![
                "http://localhost:3000".to_string(),
                "https://app.example.com".to_string(),
            ]
        );
    }

    #[test]
    fn parse_origins_empty_input() {
        assert!(parse_origins("").is_empty());
    }
}
