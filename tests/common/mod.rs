use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::json;
use sqlx::{PgPool, Postgres, Transaction};
use tower::ServiceExt;
use uuid::Uuid;

use mukando::router::init_router;
use mukando::state::AppState;
use mukando::utils::email::EmailService;
use mukando_auth::Role;
use mukando_auth::headers::{X_USER_ID, X_USER_ROLE, X_USERNAME};
use mukando_config::{CorsConfig, EmailConfig, JwtConfig};
use mukando_core::password::hash_password;

pub async fn setup_test_app(pool: PgPool) -> Router {
    dotenvy::dotenv().ok();
    let state = AppState {
        db: pool,
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
        email: EmailService::new(EmailConfig::from_env()),
    };
    init_router(state)
}

#[allow(dead_code)]
pub struct TestUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Inserts a user directly, bypassing the HTTP surface.
pub async fn create_test_user(
    tx: &mut Transaction<'_, Postgres>,
    username: &str,
    email: &str,
    password: &str,
    role: Role,
) -> TestUser {
    let hashed = hash_password(password).unwrap();

    let id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO users (username, email, password, role)
         VALUES ($1, $2, $3, $4)
         RETURNING id",
    )
    .bind(username)
    .bind(email)
    .bind(&hashed)
    .bind(role)
    .fetch_one(&mut **tx)
    .await
    .unwrap();

    TestUser {
        id,
        username: username.to_string(),
        email: email.to_string(),
        password: password.to_string(),
        role,
    }
}

pub fn generate_unique_username() -> String {
    format!("user-{}", Uuid::new_v4())
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

/// Builds a request carrying the identity headers the gateway would set.
#[allow(dead_code)]
pub fn request_as(
    user: &TestUser,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(X_USER_ID, user.id.to_string())
        .header(X_USERNAME, &user.username)
        .header(X_USER_ROLE, user.role.as_str());

    match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&value).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Logs in through the HTTP surface and returns the response body
/// (`access_token`, `refresh_token`, `token_type`, `user`).
#[allow(dead_code)]
pub async fn login(app: &Router, username: &str, password: &str) -> serde_json::Value {
    let request = Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({
                "username": username,
                "password": password
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[allow(dead_code)]
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
