//! Route definitions for the `/rewards` resource.
//!
//! All endpoints require authentication.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::reward;
use crate::state::AppState;

/// Routes mounted at `/rewards`.
///
/// ```text
/// GET    /              -> get_rewards
/// GET    /balance       -> get_balance
/// GET    /transactions  -> list_transactions
/// POST   /redeem        -> redeem
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(reward::get_rewards))
        .route("/balance", get(reward::get_balance))
        .route("/transactions", get(reward::list_transactions))
        .route("/redeem", post(reward::redeem))
}
