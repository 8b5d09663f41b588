//! Repository for the `rewards` table (read side).
//!
//! Writes to `rewards` happen only inside
//! [`LedgerRepo`](crate::repositories::LedgerRepo) transactions.

use sqlx::PgPool;
use wastewise_core::types::DbId;

use crate::models::reward::Reward;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, points, created_at, updated_at";

/// Read access to reward rows.
pub struct RewardRepo;

impl RewardRepo {
    /// Find a user's rewards row. `None` means the user has never been
    /// granted points (the row is provisioned lazily on first grant).
    pub async fn find_by_user(pool: &PgPool, user_id: DbId) -> Result<Option<Reward>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM rewards WHERE user_id = $1");
        sqlx::query_as::<_, Reward>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// A user's current point total, 0 when no rewards row exists.
    pub async fn points_for_user(pool: &PgPool, user_id: DbId) -> Result<i32, sqlx::Error> {
        let points: Option<i32> =
            sqlx::query_scalar("SELECT points FROM rewards WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(pool)
                .await?;
        Ok(points.unwrap_or(0))
    }
}
