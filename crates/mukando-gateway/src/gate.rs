//! The authentication/authorization gate.
//!
//! Runs as middleware in front of the proxy and performs the checks in a
//! fixed order, cheapest first:
//!
//! 1. strip inbound identity headers (clients must not forge them)
//! 2. public-path bypass
//! 3. `Authorization` header present and `Bearer`-shaped
//! 4. token decodes: signature, expiry, claim completeness
//! 5. role allowed for the path per the policy table
//! 6. verified identity written into the trust headers
//!
//! Token failures all answer 401 with the same message so the response
//! does not reveal whether a guessed token was near-valid; the log
//! carries the distinct [`TokenError`] kind. Role denial is the only 403.

use std::sync::Arc;

use anyhow::anyhow;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, header},
    middleware::Next,
    response::Response,
};
use tracing::{error, warn};

use mukando_auth::headers::{X_USERNAME, X_USER_ID, X_USER_ROLE};
use mukando_auth::{Claims, TokenError, decode_access_token};
use mukando_core::AppError;

use crate::state::GatewayState;

pub async fn auth_gate(
    State(state): State<Arc<GatewayState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path().to_string();

    strip_identity_headers(req.headers_mut());

    if state.policy.is_public(&path) {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let Some(auth_header) = auth_header else {
        warn!(path = %path, "missing authorization header");
        return Err(AppError::unauthorized(anyhow!(
            "Missing authorization header"
        )));
    };

    let Some(token) = auth_header.strip_prefix("Bearer ") else {
        warn!(path = %path, "malformed authorization header");
        return Err(AppError::unauthorized(anyhow!(
            "Invalid authorization header format"
        )));
    };

    let claims = match decode_access_token(token, &state.jwt_config) {
        Ok(claims) => claims,
        Err(err) => {
            // One client-facing message for every kind; the log keeps them apart.
            match &err {
                TokenError::Expired => warn!(path = %path, "expired token"),
                TokenError::ClaimsIncomplete => warn!(path = %path, "token claims incomplete"),
                TokenError::Malformed
                | TokenError::InvalidSignature
                | TokenError::UnsupportedAlgorithm => {
                    warn!(path = %path, kind = %err, "rejected token")
                }
                TokenError::Creation(_) => {
                    error!(path = %path, error = %err, "unexpected token failure")
                }
            }
            return Err(AppError::unauthorized(anyhow!("Invalid or expired token")));
        }
    };

    if let Some(allowed) = state.policy.allowed_roles(&path) {
        if !allowed.contains(&claims.role) {
            warn!(
                path = %path,
                username = %claims.username,
                role = %claims.role,
                "role not allowed"
            );
            return Err(AppError::forbidden(anyhow!("Access denied")));
        }
    }

    set_identity_headers(req.headers_mut(), &claims)?;

    Ok(next.run(req).await)
}

fn strip_identity_headers(headers: &mut HeaderMap) {
    headers.remove(X_USER_ID);
    headers.remove(X_USERNAME);
    headers.remove(X_USER_ROLE);
}

fn set_identity_headers(headers: &mut HeaderMap, claims: &Claims) -> Result<(), AppError> {
    let value = |s: &str| {
        HeaderValue::from_str(s)
            .map_err(|_| AppError::internal(anyhow!("claim value is not a valid header value")))
    };

    headers.insert(X_USER_ID, value(&claims.sub)?);
    headers.insert(X_USERNAME, value(&claims.username)?);
    headers.insert(X_USER_ROLE, value(claims.role.as_str())?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        middleware,
        routing::any,
    };
    use chrono::Utc;
    use jsonwebtoken::{EncodingKey, Header};
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use uuid::Uuid;

    use mukando_auth::{Role, create_access_token};
    use mukando_config::{JwtConfig, RouteTable};
    use crate::policy::RolePolicy;

    fn test_jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
            access_token_expiry: 3600,
            refresh_token_expiry: 604800,
        }
    }

    /// A gateway router whose next-in-line handler echoes the identity
    /// headers it received, so tests can observe what crossed the gate.
    fn test_app() -> Router {
        let state = Arc::new(GatewayState::new(
            test_jwt_config(),
            RolePolicy::defaults(),
            RouteTable::parse(""),
        ));

        async fn echo_identity(req: Request) -> Json<Value> {
            let get = |name: &str| {
                req.headers()
                    .get(name)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
            };
            Json(json!({
                "user_id": get(X_USER_ID),
                "username": get(X_USERNAME),
                "role": get(X_USER_ROLE),
            }))
        }

        Router::new()
            .fallback(any(echo_identity))
            .layer(middleware::from_fn_with_state(state.clone(), auth_gate))
            .with_state(state)
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn bearer(token: &str) -> String {
        format!("Bearer {token}")
    }

    #[tokio::test]
    async fn test_protected_path_without_header_is_401() {
        let response = test_app()
            .oneshot(
                HttpRequest::builder()
                    .uri("/users")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Missing authorization header");
    }

    #[tokio::test]
    async fn test_non_bearer_header_is_401() {
        let response = test_app()
            .oneshot(
                HttpRequest::builder()
                    .uri("/users")
                    .header(header::AUTHORIZATION, "Token abc123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Invalid authorization header format");
    }

    #[tokio::test]
    async fn test_garbage_token_is_401_with_generic_message() {
        let response = test_app()
            .oneshot(
                HttpRequest::builder()
                    .uri("/users")
                    .header(header::AUTHORIZATION, bearer("not-a-jwt"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Invalid or expired token");
    }

    #[tokio::test]
    async fn test_expired_token_is_401_with_generic_message() {
        let config = test_jwt_config();
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            username: "tendai".to_string(),
            role: Role::Admin,
            exp: now - 3600,
            iat: now - 7200,
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        let response = test_app()
            .oneshot(
                HttpRequest::builder()
                    .uri("/users")
                    .header(header::AUTHORIZATION, bearer(&token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Invalid or expired token");
    }

    #[tokio::test]
    async fn test_wrong_secret_token_is_401() {
        let other_config = JwtConfig {
            secret: "a-completely-different-signing-secret-42".to_string(),
            access_token_expiry: 3600,
            refresh_token_expiry: 604800,
        };
        let token =
            create_access_token(Uuid::new_v4(), "tendai", Role::Admin, &other_config).unwrap();

        let response = test_app()
            .oneshot(
                HttpRequest::builder()
                    .uri("/users")
                    .header(header::AUTHORIZATION, bearer(&token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_member_denied_on_admin_path() {
        let token =
            create_access_token(Uuid::new_v4(), "tendai", Role::Member, &test_jwt_config())
                .unwrap();

        let response = test_app()
            .oneshot(
                HttpRequest::builder()
                    .uri("/admin/settings")
                    .header(header::AUTHORIZATION, bearer(&token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = body_json(response).await;
        assert_eq!(body["status"], 403);
        assert_eq!(body["error"], "Forbidden");
        assert_eq!(body["message"], "Access denied");
    }

    #[tokio::test]
    async fn test_admin_passes_with_identity_headers() {
        let user_id = Uuid::new_v4();
        let token =
            create_access_token(user_id, "rudo", Role::Admin, &test_jwt_config()).unwrap();

        let response = test_app()
            .oneshot(
                HttpRequest::builder()
                    .uri("/users")
                    .header(header::AUTHORIZATION, bearer(&token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["user_id"], user_id.to_string());
        assert_eq!(body["username"], "rudo");
        assert_eq!(body["role"], "ADMIN");
    }

    #[tokio::test]
    async fn test_authenticated_passthrough_for_unlisted_prefix() {
        let token =
            create_access_token(Uuid::new_v4(), "tendai", Role::Member, &test_jwt_config())
                .unwrap();

        let response = test_app()
            .oneshot(
                HttpRequest::builder()
                    .uri("/savings/goals")
                    .header(header::AUTHORIZATION, bearer(&token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["role"], "MEMBER");
    }

    #[tokio::test]
    async fn test_public_path_passes_without_token() {
        let response = test_app()
            .oneshot(
                HttpRequest::builder()
                    .uri("/auth/login")
                    .method("POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_spoofed_identity_headers_stripped_on_public_path() {
        let response = test_app()
            .oneshot(
                HttpRequest::builder()
                    .uri("/auth/login")
                    .method("POST")
                    .header(X_USER_ID, "forged")
                    .header(X_USER_ROLE, "SUPERADMIN")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["user_id"], Value::Null);
        assert_eq!(body["role"], Value::Null);
    }

    #[tokio::test]
    async fn test_spoofed_identity_headers_replaced_by_verified_claims() {
        let user_id = Uuid::new_v4();
        let token =
            create_access_token(user_id, "rudo", Role::Admin, &test_jwt_config()).unwrap();

        let response = test_app()
            .oneshot(
                HttpRequest::builder()
                    .uri("/users")
                    .header(header::AUTHORIZATION, bearer(&token))
                    .header(X_USER_ID, "forged")
                    .header(X_USERNAME, "mallory")
                    .header(X_USER_ROLE, "SUPERADMIN")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["user_id"], user_id.to_string());
        assert_eq!(body["username"], "rudo");
        assert_eq!(body["role"], "ADMIN");
    }
}
