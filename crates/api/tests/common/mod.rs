//! Shared helpers for HTTP-level integration tests.

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use wastewise_api::auth::jwt::{generate_access_token, JwtConfig};
use wastewise_api::config::ServerConfig;
use wastewise_api::router::build_app_router;
use wastewise_api::state::AppState;
use wastewise_classifier::{ClassifierClient, ClassifierConfig};
use wastewise_core::types::DbId;
use wastewise_db::models::user::{CreateUser, User};
use wastewise_db::repositories::UserRepo;

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3001".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// This goes through [`build_app_router`] so integration tests exercise the
/// same middleware stack (CORS, request ID, timeout, tracing, panic
/// recovery) that production uses. The classifier client points at an
/// unroutable address: tests that hit `/reports/verify` expect the upstream
/// to be unavailable, and everything else never touches it.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();

    let classifier = ClassifierClient::new(ClassifierConfig {
        api_key: "test-key".to_string(),
        model: "test-model".to_string(),
        base_url: "http://127.0.0.1:9".to_string(),
        timeout_secs: 1,
    })
    .expect("classifier client should build");

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        classifier: Arc::new(classifier),
    };

    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// User / token helpers
// ---------------------------------------------------------------------------

/// Create a test user directly in the database.
pub async fn create_test_user(pool: &PgPool, email: &str, name: &str) -> User {
    UserRepo::get_or_create(
        pool,
        &CreateUser {
            email: email.to_string(),
            name: name.to_string(),
        },
    )
    .await
    .expect("user creation should succeed")
}

/// Issue an access token for a user, signed with the test JWT secret.
pub fn access_token_for(user_id: DbId) -> String {
    generate_access_token(user_id, &test_config().jwt).expect("token generation should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send an unauthenticated GET request.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("request should build");
    app.oneshot(request).await.expect("request should succeed")
}

/// Send a GET request with a Bearer token.
pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request should build");
    app.oneshot(request).await.expect("request should succeed")
}

/// Send an unauthenticated POST request with a JSON body.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build");
    app.oneshot(request).await.expect("request should succeed")
}

/// Send a POST request with a JSON body and a Bearer token.
pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .expect("request should build");
    app.oneshot(request).await.expect("request should succeed")
}

/// Send a POST request with an empty body and a Bearer token.
pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request should build");
    app.oneshot(request).await.expect("request should succeed")
}

/// Read a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}

/// Assert a response status, panicking with the body for easier debugging.
pub async fn assert_status(response: Response<Body>, expected: StatusCode) -> serde_json::Value {
    let status = response.status();
    let json = body_json(response).await;
    assert_eq!(status, expected, "unexpected status, body: {json}");
    json
}
