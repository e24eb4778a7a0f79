//! Request-scoped database sessions
//!
//! Each inbound request gets its own pooled connection, acquired when
//! the request enters and returned to the pool when the session is
//! dropped. Drop runs on every exit path, including handler errors and
//! client disconnects that cancel the request future, so a session can
//! never leak or be shared across requests.
//!
//! The auth middleware acquires the session, resolves the caller's
//! identity through it, and parks it in request extensions; the
//! extractor hands that same session to the handler rather than
//! drawing a second connection.

use std::sync::{Arc, Mutex};

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sqlx::pool::PoolConnection;
use sqlx::{Connection, PgConnection, PgPool, Postgres, Transaction};

use crate::error::ApiError;
use crate::state::AppState;

/// A per-request unit of work backed by one pooled connection.
pub struct RequestSession {
    conn: PoolConnection<Postgres>,
}

impl RequestSession {
    pub async fn acquire(pool: &PgPool) -> Result<Self, ApiError> {
        let conn = pool.acquire().await?;
        Ok(Self { conn })
    }

    /// The session's connection, for read queries.
    pub fn conn(&mut self) -> &mut PgConnection {
        &mut self.conn
    }

    /// Open a transaction on the session's connection. Commit is
    /// explicit; dropping the transaction rolls it back.
    pub async fn begin(&mut self) -> Result<Transaction<'_, Postgres>, ApiError> {
        Ok(self.conn.begin().await?)
    }
}

/// A clonable slot whose value can be taken exactly once. Request
/// extensions require `Clone`, which a pooled connection is not; the
/// cell carries the session across that boundary.
pub struct TakeCell<T>(Arc<Mutex<Option<T>>>);

impl<T> TakeCell<T> {
    pub fn new(value: T) -> Self {
        Self(Arc::new(Mutex::new(Some(value))))
    }

    pub fn take(&self) -> Option<T> {
        self.0.lock().ok().and_then(|mut slot| slot.take())
    }
}

impl<T> Clone for TakeCell<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

/// The session parked by the auth middleware for the handler.
pub type SessionCell = TakeCell<RequestSession>;

impl FromRequestParts<AppState> for RequestSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Protected routes already hold a session from the middleware.
        if let Some(session) = parts
            .extensions
            .get::<SessionCell>()
            .and_then(|cell| cell.take())
        {
            return Ok(session);
        }

        Self::acquire(&state.pool).await
    }
}

#[cfg(test)]
mod tests {
    use super::TakeCell;

    #[test]
    fn take_cell_yields_its_value_once() {
        let cell = TakeCell::new(7);
        assert_eq!(cell.take(), Some(7));
        assert_eq!(cell.take(), None);
    }

    #[test]
    fn take_cell_clones_share_one_slot() {
        let cell = TakeCell::new("session");
        let clone = cell.clone();
        assert_eq!(clone.take(), Some("session"));
        assert_eq!(cell.take(), None);
    }
}
