//! Login and registration endpoints

use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Form, Json, Router,
};

use crate::auth::{credentials, password};
use crate::db::RequestSession;
use crate::error::{ApiError, ApiResult};
use crate::models::{LoginForm, RegisterRequest, TokenResponse, User, UserResponse};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
}

/// `POST /auth/login` — form-encoded `username` / `password`.
///
/// Wrong password and unknown email are indistinguishable: both map to
/// the uniform 401.
async fn login(
    State(state): State<AppState>,
    mut session: RequestSession,
    Form(form): Form<LoginForm>,
) -> ApiResult<Json<TokenResponse>> {
    let user = credentials::authenticate(session.conn(), &form.username, &form.password)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    let access_token = state
        .token_service
        .issue_default(&user.email)
        .map_err(|_| ApiError::Internal)?;

    tracing::info!(user_id = %user.id, email = %user.email, "Login succeeded");

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer",
    }))
}

/// `POST /auth/register` — create an account.
async fn register(
    mut session: RequestSession,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    if !req.email.contains('@') {
        return Err(ApiError::Validation("email must be a valid address".into()));
    }

    // Hash outside the transaction; bcrypt is CPU-bound, not a DB step.
    let password_hash = password::hash_password(&req.password).map_err(|err| {
        tracing::error!(error = %err, "Password hashing failed");
        ApiError::Internal
    })?;

    let mut tx = session.begin().await?;

    let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(&req.email)
        .fetch_optional(&mut *tx)
        .await?;

    if existing.is_some() {
        return Err(ApiError::Conflict("email already registered".into()));
    }

    let user: User = sqlx::query_as(
        r#"
        INSERT INTO users (email, full_name, password_hash)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(&req.email)
    .bind(&req.full_name)
    .bind(&password_hash)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(user_id = %user.id, email = %user.email, "Account registered");

    Ok((StatusCode::CREATED, Json(user.into())))
}
