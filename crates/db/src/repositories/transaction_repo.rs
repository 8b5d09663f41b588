//! Repository for the `transactions` table.

use sqlx::PgPool;
use wastewise_core::types::DbId;

use crate::models::transaction::Transaction;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, type, amount, description, created_at";

/// Read access to the transaction ledger. Inserts happen only inside
/// [`LedgerRepo`](crate::repositories::LedgerRepo) transactions.
pub struct TransactionRepo;

impl TransactionRepo {
    /// List a user's transactions, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Transaction>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM transactions
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Transaction>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Derive a user's balance from the FULL transaction history:
    /// `SUM(earned_*) - SUM(redeemed)`, floored at zero.
    ///
    /// Deliberately unpaged -- summing only a recent page of transactions
    /// understates or overstates the balance once older entries fall off
    /// the page.
    pub async fn balance_for_user(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let balance: Option<i64> = sqlx::query_scalar(
            "SELECT GREATEST(
                 COALESCE(SUM(CASE WHEN type LIKE 'earned_%' THEN amount
                               ELSE -amount END), 0),
                 0)::BIGINT
             FROM transactions
             WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(balance.unwrap_or(0))
    }

    /// Total number of transactions for a user.
    pub async fn count_for_user(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let count: Option<i64> =
            sqlx::query_scalar("SELECT COUNT(*) FROM transactions WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(pool)
                .await?;
        Ok(count.unwrap_or(0))
    }
}
