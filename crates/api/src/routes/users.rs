//! User account endpoints (all protected)

use axum::{
    extract::{Path, Query},
    routing::{get, put},
    Extension, Json, Router,
};

use crate::auth::{password, AuthUser};
use crate::db::RequestSession;
use crate::error::{ApiError, ApiResult};
use crate::models::{ListParams, User, UserResponse, UserUpdateRequest};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/me", get(me))
        .route("/users/{id}", get(get_user))
        .route("/users/{id}", put(update_user))
}

/// `GET /users/me` — the identity resolved by the middleware.
async fn me(Extension(auth): Extension<AuthUser>) -> Json<UserResponse> {
    Json(UserResponse {
        id: auth.id,
        email: auth.email,
        full_name: auth.full_name,
        is_active: auth.is_active,
        created_at: auth.created_at,
    })
}

async fn get_user(
    Extension(_auth): Extension<AuthUser>,
    Path(user_id): Path<i64>,
    mut session: RequestSession,
) -> ApiResult<Json<UserResponse>> {
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(session.conn())
        .await?;

    let user = user.ok_or(ApiError::NotFound("user"))?;
    Ok(Json(user.into()))
}

async fn list_users(
    Extension(_auth): Extension<AuthUser>,
    Query(params): Query<ListParams>,
    mut session: RequestSession,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let users: Vec<User> =
        sqlx::query_as("SELECT * FROM users ORDER BY id OFFSET $1 LIMIT $2")
            .bind(params.offset())
            .bind(params.limit())
            .fetch_all(session.conn())
            .await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// `PUT /users/{id}` — profile update, self only. Email is the
/// account's natural key and cannot be changed after creation.
async fn update_user(
    Extension(auth): Extension<AuthUser>,
    Path(user_id): Path<i64>,
    mut session: RequestSession,
    Json(req): Json<UserUpdateRequest>,
) -> ApiResult<Json<UserResponse>> {
    if auth.id != user_id {
        tracing::warn!(
            user_id = %auth.id,
            target_id = %user_id,
            "Rejected cross-account profile update"
        );
        return Err(ApiError::Forbidden(
            "cannot update another user's profile".into(),
        ));
    }

    let mut tx = session.begin().await?;

    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;
    let user = user.ok_or(ApiError::NotFound("user"))?;

    if let Some(email) = &req.email {
        if *email != user.email {
            return Err(ApiError::Validation("email is immutable".into()));
        }
    }

    // Explicit null clears the name; an absent field keeps it.
    let full_name = req.full_name.unwrap_or(user.full_name);
    let password_hash = match &req.password {
        Some(new_password) => password::hash_password(new_password).map_err(|err| {
            tracing::error!(error = %err, "Password re-hashing failed");
            ApiError::Internal
        })?,
        None => user.password_hash,
    };

    let updated: User = sqlx::query_as(
        r#"
        UPDATE users SET full_name = $1, password_hash = $2
        WHERE id = $3
        RETURNING *
        "#,
    )
    .bind(&full_name)
    .bind(&password_hash)
    .bind(user_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(user_id = %updated.id, "Profile updated");
    Ok(Json(updated.into()))
}
