//! Credential verification against stored accounts

use sqlx::PgConnection;

use crate::error::ApiResult;
use crate::models::User;

use super::password;

/// Look up an account by email.
pub async fn find_by_email(conn: &mut PgConnection, email: &str) -> ApiResult<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(conn)
        .await?;
    Ok(user)
}

/// Verify an email/password pair. Returns the account on success and
/// `None` for both unknown email and wrong password, so callers cannot
/// tell the two apart. Response timing does differ between the two
/// paths (no hash is computed for an unknown email); closing that
/// channel would need a dummy verification here.
pub async fn authenticate(
    conn: &mut PgConnection,
    email: &str,
    password: &str,
) -> ApiResult<Option<User>> {
    let Some(user) = find_by_email(conn, email).await? else {
        tracing::debug!(email = %email, "Login attempt for unknown email");
        return Ok(None);
    };

    if !password::verify_password(password, &user.password_hash) {
        tracing::debug!(user_id = %user.id, "Login attempt with wrong password");
        return Ok(None);
    }

    Ok(Some(user))
}
