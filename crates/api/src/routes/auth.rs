//! Route definitions for the `/auth` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /session -> create_session (public)
/// POST /refresh -> refresh        (public, requires valid refresh token)
/// POST /logout  -> logout         (authenticated)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/session", post(auth::create_session))
        .route("/refresh", post(auth::refresh))
        .route("/logout", post(auth::logout))
}
