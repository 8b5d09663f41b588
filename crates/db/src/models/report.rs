//! Report entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use wastewise_core::types::{DbId, Timestamp};

/// A report waiting to be collected.
pub const REPORT_STATUS_PENDING: &str = "pending";

/// A report that has been picked up by a collector.
pub const REPORT_STATUS_COLLECTED: &str = "collected";

/// A row from the `reports` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Report {
    pub id: DbId,
    pub user_id: DbId,
    pub location: String,
    pub waste_type: String,
    pub amount: String,
    pub image_url: Option<String>,
    /// The classification payload the report was verified with.
    pub verification_result: Option<serde_json::Value>,
    pub status: String,
    pub collector_id: Option<DbId>,
    pub created_at: Timestamp,
}

/// DTO for creating a new report. The owning user comes from the session,
/// never from the request body.
#[derive(Debug, Deserialize)]
pub struct CreateReport {
    pub location: String,
    pub waste_type: String,
    pub amount: String,
    pub image_url: Option<String>,
    pub verification_result: serde_json::Value,
}
