//! Notification entity model.

use serde::Serialize;
use sqlx::FromRow;
use wastewise_core::types::{DbId, Timestamp};

/// Notification type for reward point grants.
pub const NOTIFICATION_TYPE_REWARD: &str = "reward";

/// Notification type for point redemptions.
pub const NOTIFICATION_TYPE_REDEMPTION: &str = "redemption";

/// A row from the `notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    pub message: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,
    pub is_read: bool,
    pub created_at: Timestamp,
}
