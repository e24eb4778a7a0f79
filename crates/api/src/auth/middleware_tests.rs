//! Unit tests for the authentication middleware
//!
//! Tests cover:
//! - Bearer token extraction from request headers
//! - Identity mapping (stored hash never crosses into AuthUser)
//! - The uniform-failure contract: every auth defect yields an
//!   identical wire response
//!
//! Full resolve/require_auth paths need a database and live in
//! integration territory.

#[cfg(test)]
mod tests {
    use super::super::middleware::*;
    use crate::error::ApiError;
    use crate::models::User;
    use axum::body::{to_bytes, Body};
    use axum::extract::Request;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use time::macros::datetime;

    fn request_with_auth(value: &str) -> Request {
        Request::builder()
            .uri("/students")
            .header("Authorization", value)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn extracts_bearer_token() {
        let request = request_with_auth("Bearer abc.def.ghi");
        assert_eq!(extract_bearer_token(&request), Some("abc.def.ghi"));
    }

    #[test]
    fn missing_header_yields_none() {
        let request = Request::builder()
            .uri("/students")
            .body(Body::empty())
            .unwrap();
        assert_eq!(extract_bearer_token(&request), None);
    }

    #[test]
    fn non_bearer_scheme_yields_none() {
        assert_eq!(
            extract_bearer_token(&request_with_auth("Basic dXNlcjpwdw==")),
            None
        );
        // Scheme matching is exact.
        assert_eq!(extract_bearer_token(&request_with_auth("bearer abc")), None);
        assert_eq!(extract_bearer_token(&request_with_auth("Bearer")), None);
    }

    #[test]
    fn auth_user_keeps_identity_fields_only() {
        let user = User {
            id: 7,
            email: "a@x.com".to_string(),
            full_name: None,
            password_hash: "$2b$12$hash".to_string(),
            is_active: true,
            created_at: datetime!(2024-01-01 00:00:00 UTC),
        };

        let auth_user = AuthUser::from(user);
        assert_eq!(auth_user.id, 7);
        assert_eq!(auth_user.email, "a@x.com");
        let debug = format!("{auth_user:?}");
        assert!(!debug.contains("$2b$12$hash"));
    }

    #[tokio::test]
    async fn all_auth_failures_produce_identical_responses() {
        let causes = [
            AuthError::MissingAuth,
            AuthError::InvalidToken,
            AuthError::UnknownSubject,
        ];

        let mut bodies = Vec::new();
        for cause in causes {
            let response = cause.into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            bodies.push(body);
        }

        assert_eq!(bodies[0], bodies[1]);
        assert_eq!(bodies[1], bodies[2]);
    }

    #[tokio::test]
    async fn database_failures_are_not_reported_as_unauthorized() {
        let response =
            AuthError::Database(ApiError::from(sqlx::Error::PoolTimedOut)).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
