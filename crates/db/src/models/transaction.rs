//! Transaction entity model.

use serde::Serialize;
use sqlx::FromRow;
use wastewise_core::types::{DbId, Timestamp};

/// A row from the `transactions` table -- one immutable ledger entry.
///
/// `amount` is always positive; whether it adds to or subtracts from the
/// balance is carried by `kind` (stored in the `type` column).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Transaction {
    pub id: DbId,
    pub user_id: DbId,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: i32,
    pub description: String,
    pub created_at: Timestamp,
}
