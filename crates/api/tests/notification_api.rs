//! HTTP-level integration tests for the notification endpoints.
//!
//! Covers listing with the unread filter, counts, per-notification
//! mark-read idempotence, and read-all.

mod common;

use axum::http::StatusCode;
use common::{access_token_for, assert_status, create_test_user, get_auth, post_auth};
use sqlx::PgPool;
use wastewise_db::models::notification::NOTIFICATION_TYPE_REWARD;
use wastewise_db::repositories::NotificationRepo;

/// Listing returns the user's notifications, honouring the unread filter.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_with_unread_filter(pool: PgPool) {
    let user = create_test_user(&pool, "ada@example.com", "Ada").await;
    let other = create_test_user(&pool, "bob@example.com", "Bob").await;
    let token = access_token_for(user.id);

    let first = NotificationRepo::create(&pool, user.id, "First", NOTIFICATION_TYPE_REWARD)
        .await
        .unwrap();
    NotificationRepo::create(&pool, user.id, "Second", NOTIFICATION_TYPE_REWARD)
        .await
        .unwrap();
    NotificationRepo::create(&pool, other.id, "Not yours", NOTIFICATION_TYPE_REWARD)
        .await
        .unwrap();
    NotificationRepo::mark_read(&pool, first.id, user.id)
        .await
        .unwrap();

    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/notifications",
        &token,
    )
    .await;
    let json = assert_status(response, StatusCode::OK).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/notifications?unread_only=true",
        &token,
    )
    .await;
    let json = assert_status(response, StatusCode::OK).await;
    let unread = json["data"].as_array().unwrap();
    assert_eq!(unread.len(), 1);
    assert_eq!(unread[0]["message"], "Second");
}

/// The unread count tracks mark-read operations.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_unread_count(pool: PgPool) {
    let user = create_test_user(&pool, "ada@example.com", "Ada").await;
    let token = access_token_for(user.id);

    for message in ["One", "Two", "Three"] {
        NotificationRepo::create(&pool, user.id, message, NOTIFICATION_TYPE_REWARD)
            .await
            .unwrap();
    }

    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/notifications/unread-count",
        &token,
    )
    .await;
    let json = assert_status(response, StatusCode::OK).await;
    assert_eq!(json["data"]["count"], 3);
}

/// Marking a notification read is idempotent: repeating the call succeeds
/// and the notification stays read.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_mark_read_is_idempotent(pool: PgPool) {
    let user = create_test_user(&pool, "ada@example.com", "Ada").await;
    let token = access_token_for(user.id);

    let notification = NotificationRepo::create(&pool, user.id, "Hi", NOTIFICATION_TYPE_REWARD)
        .await
        .unwrap();
    let uri = format!("/api/v1/notifications/{}/read", notification.id);

    for _ in 0..2 {
        let response = post_auth(common::build_test_app(pool.clone()), &uri, &token).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    let is_read: bool = sqlx::query_scalar("SELECT is_read FROM notifications WHERE id = $1")
        .bind(notification.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert!(is_read);
}

/// Marking another user's notification read is a 404, and the target
/// stays unread.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_mark_read_foreign_notification(pool: PgPool) {
    let user = create_test_user(&pool, "ada@example.com", "Ada").await;
    let other = create_test_user(&pool, "bob@example.com", "Bob").await;
    let token = access_token_for(user.id);

    let notification = NotificationRepo::create(&pool, other.id, "Hi", NOTIFICATION_TYPE_REWARD)
        .await
        .unwrap();

    let response = post_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/notifications/{}/read", notification.id),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let is_read: bool = sqlx::query_scalar("SELECT is_read FROM notifications WHERE id = $1")
        .bind(notification.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert!(!is_read);
}

/// Read-all marks every unread notification and reports how many.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_read_all(pool: PgPool) {
    let user = create_test_user(&pool, "ada@example.com", "Ada").await;
    let token = access_token_for(user.id);

    for message in ["One", "Two"] {
        NotificationRepo::create(&pool, user.id, message, NOTIFICATION_TYPE_REWARD)
            .await
            .unwrap();
    }

    let response = post_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/notifications/read-all",
        &token,
    )
    .await;
    let json = assert_status(response, StatusCode::OK).await;
    assert_eq!(json["data"]["marked_read"], 2);

    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/notifications/unread-count",
        &token,
    )
    .await;
    let json = assert_status(response, StatusCode::OK).await;
    assert_eq!(json["data"]["count"], 0);
}
