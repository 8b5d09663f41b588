//! Repository for the `reports` table.

use sqlx::PgPool;
use wastewise_core::ledger::{
    TransactionType, COLLECT_REWARD_POINTS, REPORT_REWARD_POINTS,
};
use wastewise_core::types::DbId;

use crate::models::report::{CreateReport, Report, REPORT_STATUS_PENDING};
use crate::models::transaction::Transaction;
use crate::repositories::ledger_repo::LedgerRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, location, waste_type, amount, image_url, \
                       verification_result, status, collector_id, created_at";

/// A committed report submission: the new row plus its reward.
#[derive(Debug, Clone)]
pub struct SubmittedReport {
    pub report: Report,
    /// The submitter's point total after the grant.
    pub reward_points: i32,
    pub transaction: Transaction,
}

/// Result of a collection attempt.
#[derive(Debug, Clone)]
pub enum CollectOutcome {
    /// The report was marked collected and the collector rewarded.
    Collected {
        report: Report,
        reward_points: i32,
        transaction: Transaction,
    },
    /// No report with the given ID exists.
    NotFound,
    /// The report was already collected.
    AlreadyCollected,
    /// A user cannot collect their own report.
    OwnReport,
}

/// Provides CRUD operations for reports, including the transactional
/// submit and collect flows.
pub struct ReportRepo;

impl ReportRepo {
    /// Insert a report and grant the submitter the report reward.
    ///
    /// The report insert, the rewards increment, the transaction row, and
    /// the notification commit as one unit -- a failure at any step leaves
    /// no trace of the submission.
    pub async fn submit(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateReport,
    ) -> Result<SubmittedReport, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let insert_query = format!(
            "INSERT INTO reports (user_id, location, waste_type, amount, image_url, verification_result)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let report = sqlx::query_as::<_, Report>(&insert_query)
            .bind(user_id)
            .bind(&input.location)
            .bind(&input.waste_type)
            .bind(&input.amount)
            .bind(&input.image_url)
            .bind(&input.verification_result)
            .fetch_one(&mut *tx)
            .await?;

        let outcome = LedgerRepo::grant_in(
            &mut tx,
            user_id,
            TransactionType::EarnedReport,
            REPORT_REWARD_POINTS,
            "Points earned for reporting waste",
            &format!("You've earned {REPORT_REWARD_POINTS} points for reporting waste!"),
        )
        .await?;

        tx.commit().await?;

        Ok(SubmittedReport {
            report,
            reward_points: outcome.points,
            transaction: outcome.transaction,
        })
    }

    /// Find a report by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Report>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reports WHERE id = $1");
        sqlx::query_as::<_, Report>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List reports ordered by most recently created first.
    pub async fn list_recent(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Report>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reports
             ORDER BY created_at DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Report>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Mark a pending report collected and grant the collector the collect
    /// reward, as one transaction.
    ///
    /// The status transition uses a conditional UPDATE so two concurrent
    /// collectors cannot both claim the same report.
    pub async fn collect(
        pool: &PgPool,
        report_id: DbId,
        collector_id: DbId,
    ) -> Result<CollectOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let update_query = format!(
            "UPDATE reports
             SET status = 'collected', collector_id = $2
             WHERE id = $1 AND status = $3 AND user_id <> $2
             RETURNING {COLUMNS}"
        );
        let report = sqlx::query_as::<_, Report>(&update_query)
            .bind(report_id)
            .bind(collector_id)
            .bind(REPORT_STATUS_PENDING)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(report) = report else {
            // Distinguish why the conditional update matched nothing.
            let existing = sqlx::query_as::<_, Report>(&format!(
                "SELECT {COLUMNS} FROM reports WHERE id = $1"
            ))
            .bind(report_id)
            .fetch_optional(&mut *tx)
            .await?;

            return Ok(match existing {
                None => CollectOutcome::NotFound,
                Some(r) if r.user_id == collector_id => CollectOutcome::OwnReport,
                Some(_) => CollectOutcome::AlreadyCollected,
            });
        };

        let outcome = LedgerRepo::grant_in(
            &mut tx,
            collector_id,
            TransactionType::EarnedCollect,
            COLLECT_REWARD_POINTS,
            "Points earned for collecting waste",
            &format!("You've earned {COLLECT_REWARD_POINTS} points for collecting waste!"),
        )
        .await?;

        tx.commit().await?;

        Ok(CollectOutcome::Collected {
            report,
            reward_points: outcome.points,
            transaction: outcome.transaction,
        })
    }
}
