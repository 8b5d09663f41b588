//! The reward-ledger unit: point grants and redemptions.
//!
//! Every point change touches three tables -- `rewards` (running total),
//! `transactions` (immutable history), and `notifications` (user-facing
//! message) -- inside ONE database transaction. A failure at any step rolls
//! the whole change back, so the running total and the transaction history
//! can never diverge.

use sqlx::{PgPool, Postgres, Transaction as PgTx};
use wastewise_core::ledger::TransactionType;
use wastewise_core::types::DbId;

use crate::models::notification::{NOTIFICATION_TYPE_REDEMPTION, NOTIFICATION_TYPE_REWARD};
use crate::models::transaction::Transaction;

/// Column list for the `transactions` table.
const TX_COLUMNS: &str = "id, user_id, type, amount, description, created_at";

/// Result of a committed grant or redemption.
#[derive(Debug, Clone)]
pub struct GrantOutcome {
    /// The user's point total after the change.
    pub points: i32,
    /// The ledger entry recording the change.
    pub transaction: Transaction,
}

/// Errors from ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error(transparent)]
    Db(#[from] sqlx::Error),

    /// Redemption exceeds the user's current point total. Nothing was
    /// written.
    #[error("Insufficient points: requested {requested}, available {available}")]
    InsufficientPoints { requested: i32, available: i32 },
}

/// Atomic point grants and redemptions.
pub struct LedgerRepo;

impl LedgerRepo {
    /// Grant points to a user in a single transaction.
    pub async fn grant(
        pool: &PgPool,
        user_id: DbId,
        kind: TransactionType,
        points: i32,
        description: &str,
        message: &str,
    ) -> Result<GrantOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let outcome = Self::grant_in(&mut tx, user_id, kind, points, description, message).await?;
        tx.commit().await?;
        Ok(outcome)
    }

    /// Grant points within an already-open transaction.
    ///
    /// Used by [`ReportRepo`](crate::repositories::ReportRepo) so the report
    /// insert and its reward share one commit.
    pub async fn grant_in(
        tx: &mut PgTx<'_, Postgres>,
        user_id: DbId,
        kind: TransactionType,
        points: i32,
        description: &str,
        message: &str,
    ) -> Result<GrantOutcome, sqlx::Error> {
        debug_assert!(kind.is_earning(), "grants must use an earning type");

        // Lazily provision the rewards row on first grant.
        let new_points: i32 = sqlx::query_scalar(
            "INSERT INTO rewards (user_id, points)
             VALUES ($1, $2)
             ON CONFLICT ON CONSTRAINT uq_rewards_user_id
             DO UPDATE SET points = rewards.points + EXCLUDED.points,
                           updated_at = NOW()
             RETURNING points",
        )
        .bind(user_id)
        .bind(points)
        .fetch_one(&mut **tx)
        .await?;

        let transaction =
            Self::insert_transaction(tx, user_id, kind, points, description).await?;
        Self::insert_notification(tx, user_id, message, NOTIFICATION_TYPE_REWARD).await?;

        tracing::debug!(user_id, points, kind = %kind, "Granted reward points");

        Ok(GrantOutcome {
            points: new_points,
            transaction,
        })
    }

    /// Redeem points from a user's balance in a single transaction.
    ///
    /// The rewards row is locked for the duration of the check-and-decrement
    /// so concurrent redemptions cannot overdraw. Fails with
    /// [`LedgerError::InsufficientPoints`] (writing nothing) when the user
    /// has no rewards row or fewer points than requested.
    pub async fn redeem(
        pool: &PgPool,
        user_id: DbId,
        points: i32,
        description: &str,
    ) -> Result<GrantOutcome, LedgerError> {
        let mut tx = pool.begin().await?;

        let available: Option<i32> =
            sqlx::query_scalar("SELECT points FROM rewards WHERE user_id = $1 FOR UPDATE")
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?;
        let available = available.unwrap_or(0);

        if available < points {
            return Err(LedgerError::InsufficientPoints {
                requested: points,
                available,
            });
        }

        let new_points: i32 = sqlx::query_scalar(
            "UPDATE rewards
             SET points = points - $2, updated_at = NOW()
             WHERE user_id = $1
             RETURNING points",
        )
        .bind(user_id)
        .bind(points)
        .fetch_one(&mut *tx)
        .await?;

        let transaction = Self::insert_transaction(
            &mut tx,
            user_id,
            TransactionType::Redeemed,
            points,
            description,
        )
        .await?;

        let message = format!("You redeemed {points} points");
        Self::insert_notification(&mut tx, user_id, &message, NOTIFICATION_TYPE_REDEMPTION)
            .await?;

        tx.commit().await?;

        tracing::debug!(user_id, points, "Redeemed reward points");

        Ok(GrantOutcome {
            points: new_points,
            transaction,
        })
    }

    async fn insert_transaction(
        tx: &mut PgTx<'_, Postgres>,
        user_id: DbId,
        kind: TransactionType,
        amount: i32,
        description: &str,
    ) -> Result<Transaction, sqlx::Error> {
        let query = format!(
            "INSERT INTO transactions (user_id, type, amount, description)
             VALUES ($1, $2, $3, $4)
             RETURNING {TX_COLUMNS}"
        );
        sqlx::query_as::<_, Transaction>(&query)
            .bind(user_id)
            .bind(kind.as_str())
            .bind(amount)
            .bind(description)
            .fetch_one(&mut **tx)
            .await
    }

    async fn insert_notification(
        tx: &mut PgTx<'_, Postgres>,
        user_id: DbId,
        message: &str,
        kind: &str,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO notifications (user_id, message, type)
             VALUES ($1, $2, $3)
             RETURNING id",
        )
        .bind(user_id)
        .bind(message)
        .bind(kind)
        .fetch_one(&mut **tx)
        .await
    }
}
