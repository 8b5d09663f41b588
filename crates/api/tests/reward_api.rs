//! HTTP-level integration tests for the rewards endpoints.
//!
//! Covers point totals, balance derivation, the transaction ledger page,
//! and redemption including the insufficient-points conflict.

mod common;

use axum::http::StatusCode;
use common::{access_token_for, assert_status, create_test_user, get_auth, post_json_auth};
use sqlx::PgPool;
use wastewise_core::ledger::TransactionType;
use wastewise_db::repositories::LedgerRepo;

/// A user who has never earned points reads 0, not a 404.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_fresh_user_has_zero_points(pool: PgPool) {
    let user = create_test_user(&pool, "ada@example.com", "Ada").await;
    let token = access_token_for(user.id);

    let response = get_auth(common::build_test_app(pool.clone()), "/api/v1/rewards", &token).await;
    let json = assert_status(response, StatusCode::OK).await;
    assert_eq!(json["data"]["points"], 0);

    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/rewards/balance",
        &token,
    )
    .await;
    let json = assert_status(response, StatusCode::OK).await;
    assert_eq!(json["data"]["balance"], 0);
}

/// After grants and a redemption, the running total and the derived
/// balance agree.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_points_and_balance_agree(pool: PgPool) {
    let user = create_test_user(&pool, "ada@example.com", "Ada").await;
    let token = access_token_for(user.id);

    LedgerRepo::grant(
        &pool,
        user.id,
        TransactionType::EarnedReport,
        10,
        "Points earned for reporting waste",
        "You've earned 10 points!",
    )
    .await
    .unwrap();
    LedgerRepo::grant(
        &pool,
        user.id,
        TransactionType::EarnedCollect,
        15,
        "Points earned for collecting waste",
        "You've earned 15 points!",
    )
    .await
    .unwrap();
    LedgerRepo::redeem(&pool, user.id, 5, "Points redeemed")
        .await
        .unwrap();

    let response = get_auth(common::build_test_app(pool.clone()), "/api/v1/rewards", &token).await;
    let json = assert_status(response, StatusCode::OK).await;
    assert_eq!(json["data"]["points"], 20);

    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/rewards/balance",
        &token,
    )
    .await;
    let json = assert_status(response, StatusCode::OK).await;
    assert_eq!(json["data"]["balance"], 20);
}

/// The transaction page lists newest first and carries the full count.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_transaction_page(pool: PgPool) {
    let user = create_test_user(&pool, "ada@example.com", "Ada").await;
    let token = access_token_for(user.id);

    for _ in 0..3 {
        LedgerRepo::grant(
            &pool,
            user.id,
            TransactionType::EarnedReport,
            10,
            "Points earned for reporting waste",
            "You've earned 10 points!",
        )
        .await
        .unwrap();
    }

    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/rewards/transactions?limit=2",
        &token,
    )
    .await;
    let json = assert_status(response, StatusCode::OK).await;

    let transactions = json["data"]["transactions"].as_array().unwrap();
    assert_eq!(transactions.len(), 2);
    assert_eq!(json["data"]["total"], 3);
    let first = transactions[0]["id"].as_i64().unwrap();
    let second = transactions[1]["id"].as_i64().unwrap();
    assert!(first > second, "newest entry should come first");
}

/// Redeeming within the balance decrements points and records a ledger
/// entry.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_redeem_success(pool: PgPool) {
    let user = create_test_user(&pool, "ada@example.com", "Ada").await;
    let token = access_token_for(user.id);

    LedgerRepo::grant(
        &pool,
        user.id,
        TransactionType::EarnedReport,
        10,
        "Points earned for reporting waste",
        "You've earned 10 points!",
    )
    .await
    .unwrap();

    let body = serde_json::json!({ "points": 4 });
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/rewards/redeem",
        &token,
        body,
    )
    .await;
    let json = assert_status(response, StatusCode::OK).await;

    assert_eq!(json["data"]["points"], 6);
    assert_eq!(json["data"]["transaction"]["type"], "redeemed");
    assert_eq!(json["data"]["transaction"]["amount"], 4);
}

/// Redeeming beyond the balance is a conflict and writes nothing.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_redeem_beyond_balance_conflicts(pool: PgPool) {
    let user = create_test_user(&pool, "ada@example.com", "Ada").await;
    let token = access_token_for(user.id);

    LedgerRepo::grant(
        &pool,
        user.id,
        TransactionType::EarnedReport,
        10,
        "Points earned for reporting waste",
        "You've earned 10 points!",
    )
    .await
    .unwrap();

    let body = serde_json::json!({ "points": 50 });
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/rewards/redeem",
        &token,
        body,
    )
    .await;
    let json = assert_status(response, StatusCode::CONFLICT).await;
    assert_eq!(json["code"], "INSUFFICIENT_POINTS");

    let points: i32 = sqlx::query_scalar("SELECT points FROM rewards WHERE user_id = $1")
        .bind(user.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(points, 10);

    let redeemed: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM transactions WHERE user_id = $1 AND type = 'redeemed'",
    )
    .bind(user.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(redeemed, 0);
}

/// Zero or negative redemption amounts are rejected.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_redeem_nonpositive_rejected(pool: PgPool) {
    let user = create_test_user(&pool, "ada@example.com", "Ada").await;
    let token = access_token_for(user.id);

    for points in [0, -5] {
        let body = serde_json::json!({ "points": points });
        let response = post_json_auth(
            common::build_test_app(pool.clone()),
            "/api/v1/rewards/redeem",
            &token,
            body,
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
