//! Route definitions, one module per resource.

use axum::Router;

use crate::state::AppState;

pub mod auth;
pub mod health;
pub mod notification;
pub mod report;
pub mod reward;

/// All versioned API routes, intended to be nested under `/api/v1`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/reports", report::router())
        .nest("/rewards", reward::router())
        .nest("/notifications", notification::router())
}
