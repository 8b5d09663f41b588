//! Handlers for the `/rewards` resource: point totals, the transaction
//! ledger, and redemption.
//!
//! All endpoints require authentication via [`AuthUser`].

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use wastewise_core::error::CoreError;
use wastewise_db::repositories::{LedgerRepo, RewardRepo, TransactionRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Maximum page size for transaction listing.
const MAX_LIMIT: i64 = 100;

/// Default page size for transaction listing.
const DEFAULT_LIMIT: i64 = 10;

// ---------------------------------------------------------------------------
// Query / request types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /rewards/transactions`.
#[derive(Debug, Deserialize)]
pub struct TransactionQuery {
    /// Maximum number of results. Defaults to 10, capped at 100.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}

/// Request body for `POST /rewards/redeem`.
#[derive(Debug, Deserialize)]
pub struct RedeemRequest {
    pub points: i32,
    /// Optional description recorded on the ledger entry.
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/rewards
///
/// The authenticated user's current point total. Users who have never
/// earned points get 0, not a 404.
pub async fn get_rewards(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let points = RewardRepo::points_for_user(&state.pool, auth.user_id).await?;

    Ok(Json(serde_json::json!({
        "data": { "points": points }
    })))
}

/// GET /api/v1/rewards/balance
///
/// The authenticated user's balance derived from the full transaction
/// history, floored at zero. Reconciles against the running total in the
/// rewards row.
pub async fn get_balance(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let balance = TransactionRepo::balance_for_user(&state.pool, auth.user_id).await?;

    Ok(Json(serde_json::json!({
        "data": { "balance": balance }
    })))
}

/// GET /api/v1/rewards/transactions
///
/// Page through the authenticated user's ledger entries, newest first.
/// Includes a `total` count so clients can page without summing.
pub async fn list_transactions(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<TransactionQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = params.offset.unwrap_or(0).max(0);

    let transactions =
        TransactionRepo::list_for_user(&state.pool, auth.user_id, limit, offset).await?;
    let total = TransactionRepo::count_for_user(&state.pool, auth.user_id).await?;

    Ok(Json(serde_json::json!({
        "data": {
            "transactions": transactions,
            "total": total,
        }
    })))
}

/// POST /api/v1/rewards/redeem
///
/// Spend points from the authenticated user's balance. Redeeming more than
/// the current balance is a conflict and writes nothing.
pub async fn redeem(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<RedeemRequest>,
) -> AppResult<Json<serde_json::Value>> {
    if input.points <= 0 {
        return Err(AppError::Core(CoreError::Validation(
            "Field `points` must be a positive number".into(),
        )));
    }

    let description = input
        .description
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or("Points redeemed");

    let outcome = LedgerRepo::redeem(&state.pool, auth.user_id, input.points, description).await?;

    tracing::info!(
        user_id = auth.user_id,
        points = input.points,
        "Points redeemed"
    );

    Ok(Json(serde_json::json!({
        "data": {
            "points": outcome.points,
            "transaction": outcome.transaction,
        }
    })))
}
