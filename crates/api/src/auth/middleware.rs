//! Authentication middleware for Axum
//!
//! `require_auth` is the sole gate in front of every protected route:
//! it extracts the bearer token, validates it, resolves the subject to
//! an account through a request-scoped session, and inserts both the
//! resolved identity and the session into request extensions before
//! the handler runs.
//! Every auth defect produces the same uniform 401; the specific cause
//! is visible only in logs.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use time::OffsetDateTime;

use crate::db::{RequestSession, SessionCell};
use crate::error::ApiError;
use crate::models::User;
use crate::state::AppState;

use super::credentials;

/// Resolved identity for the current request. The stored password
/// hash is deliberately left behind on the [`User`] row.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
}

impl From<User> for AuthUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

/// Internal authentication failure taxonomy. Variants exist so logs
/// can record what actually went wrong; on the wire all of them
/// collapse to one indistinguishable 401 response.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing authorization header")]
    MissingAuth,
    #[error("invalid or expired token")]
    InvalidToken,
    #[error("token subject has no backing account")]
    UnknownSubject,
    #[error("database error")]
    Database(#[from] ApiError),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            // Infrastructure failures are not auth oracles; surface as 500.
            AuthError::Database(err) => err.into_response(),
            // Everything else: one uniform unauthorized response.
            _ => ApiError::Unauthorized.into_response(),
        }
    }
}

/// Extract the bearer token from the Authorization header.
pub(crate) fn extract_bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
}

/// Validate a bearer token and resolve it to an account through the
/// request's session.
async fn resolve(
    state: &AppState,
    token: &str,
    session: &mut RequestSession,
) -> Result<AuthUser, AuthError> {
    let subject = state.token_service.validate(token).map_err(|err| {
        tracing::debug!(error = %err, "Bearer token rejected");
        AuthError::InvalidToken
    })?;

    let user = credentials::find_by_email(session.conn(), &subject)
        .await
        .map_err(AuthError::Database)?
        .ok_or_else(|| {
            tracing::warn!(subject = %subject, "Valid token for missing account");
            AuthError::UnknownSubject
        })?;

    Ok(AuthUser::from(user))
}

/// Middleware that requires authentication on every request it wraps.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    let Some(token) = extract_bearer_token(&request).map(String::from) else {
        tracing::debug!(path = %path, "Request without bearer token");
        return AuthError::MissingAuth.into_response();
    };

    // One session per request: identity resolution and the handler
    // share this connection.
    let mut session = match RequestSession::acquire(&state.pool).await {
        Ok(session) => session,
        Err(err) => return AuthError::Database(err).into_response(),
    };

    match resolve(&state, &token, &mut session).await {
        Ok(auth_user) => {
            tracing::debug!(path = %path, user_id = %auth_user.id, "Authenticated");
            request.extensions_mut().insert(auth_user);
            request.extensions_mut().insert(SessionCell::new(session));
            next.run(request).await
        }
        Err(err) => {
            tracing::debug!(path = %path, error = %err, "Authentication failed");
            err.into_response()
        }
    }
}
