//! Reward entity model.

use serde::Serialize;
use sqlx::FromRow;
use wastewise_core::types::{DbId, Timestamp};

/// A row from the `rewards` table -- one running point total per user.
///
/// Mutated only inside ledger transactions; never written directly by
/// handlers.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Reward {
    pub id: DbId,
    pub user_id: DbId,
    pub points: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
