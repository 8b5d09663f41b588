//! Handlers for the `/reports` resource: image verification, submission,
//! listing, and collection.
//!
//! All endpoints require authentication via [`AuthUser`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use wastewise_core::error::CoreError;
use wastewise_core::types::DbId;
use wastewise_core::verification::{validate_verification, VerificationResult};
use wastewise_db::models::report::{CreateReport, Report};
use wastewise_db::repositories::{CollectOutcome, ReportRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Maximum page size for report listing.
const MAX_LIMIT: i64 = 100;

/// Default page size for report listing.
const DEFAULT_LIMIT: i64 = 10;

// ---------------------------------------------------------------------------
// Query / request types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /reports`.
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    /// Maximum number of results. Defaults to 10, capped at 100.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}

/// Request body for `POST /reports/verify`.
#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    /// Base64-encoded image bytes. A `data:<mime>;base64,` prefix from a
    /// browser file reader is accepted and stripped.
    pub image: String,
    /// MIME type of the image. Defaults to `image/jpeg`.
    pub mime_type: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/reports/verify
///
/// Send an image to the classification service and return the parsed
/// verification result. The caller submits this result back with the
/// report; nothing is persisted here.
pub async fn verify_image(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<VerifyRequest>,
) -> AppResult<Json<DataResponse<VerificationResult>>> {
    let (mime_type, base64_data) = split_image_payload(&input)?;

    tracing::debug!(user_id = auth.user_id, %mime_type, "Verifying waste image");
    let result = state.classifier.classify(mime_type, base64_data).await?;

    Ok(Json(DataResponse { data: result }))
}

/// POST /api/v1/reports
///
/// Submit a verified waste report. The body must carry the verification
/// payload obtained from `/reports/verify`; a missing or malformed payload
/// rejects the submission before anything is written. On success the
/// submitter is granted the report reward in the same database transaction
/// as the report insert.
pub async fn create_report(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateReport>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    if input.location.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Field `location` must not be empty".into(),
        )));
    }
    if input.waste_type.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Field `waste_type` must not be empty".into(),
        )));
    }
    if input.amount.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Field `amount` must not be empty".into(),
        )));
    }

    // The verification payload must round-trip through the same parser the
    // classifier output goes through. An unverified submission earns nothing.
    let verification: VerificationResult =
        serde_json::from_value(input.verification_result.clone()).map_err(|e| {
            AppError::Core(CoreError::Validation(format!(
                "Report is missing a valid verification result: {e}"
            )))
        })?;
    validate_verification(&verification)
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    let submitted = ReportRepo::submit(&state.pool, auth.user_id, &input).await?;

    tracing::info!(
        user_id = auth.user_id,
        report_id = submitted.report.id,
        "Report submitted"
    );

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "data": {
                "report": submitted.report,
                "reward_points": submitted.reward_points,
                "transaction": submitted.transaction,
            }
        })),
    ))
}

/// GET /api/v1/reports
///
/// List recent reports across all users, newest first.
pub async fn list_reports(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ReportQuery>,
) -> AppResult<Json<DataResponse<Vec<Report>>>> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = params.offset.unwrap_or(0).max(0);

    let reports = ReportRepo::list_recent(&state.pool, limit, offset).await?;

    Ok(Json(DataResponse { data: reports }))
}

/// GET /api/v1/reports/{id}
///
/// Fetch a single report by ID.
pub async fn get_report(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(report_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Report>>> {
    let report = ReportRepo::find_by_id(&state.pool, report_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Report",
            id: report_id,
        }))?;

    Ok(Json(DataResponse { data: report }))
}

/// POST /api/v1/reports/{id}/collect
///
/// Claim a pending report as collected. The collector is granted the
/// collect reward in the same transaction as the status change. Collecting
/// your own report or an already-collected report is a conflict.
pub async fn collect_report(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(report_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let outcome = ReportRepo::collect(&state.pool, report_id, auth.user_id).await?;

    match outcome {
        CollectOutcome::Collected {
            report,
            reward_points,
            transaction,
        } => {
            tracing::info!(
                user_id = auth.user_id,
                report_id = report.id,
                "Report collected"
            );
            Ok(Json(serde_json::json!({
                "data": {
                    "report": report,
                    "reward_points": reward_points,
                    "transaction": transaction,
                }
            })))
        }
        CollectOutcome::NotFound => Err(AppError::Core(CoreError::NotFound {
            entity: "Report",
            id: report_id,
        })),
        CollectOutcome::AlreadyCollected => Err(AppError::Core(CoreError::Conflict(
            "Report has already been collected".into(),
        ))),
        CollectOutcome::OwnReport => Err(AppError::Core(CoreError::Conflict(
            "You cannot collect your own report".into(),
        ))),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Resolve the MIME type and bare base64 payload from a verify request,
/// stripping a `data:<mime>;base64,` prefix when present.
fn split_image_payload(input: &VerifyRequest) -> Result<(&str, &str), AppError> {
    if input.image.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Field `image` must not be empty".into(),
        )));
    }

    if let Some(rest) = input.image.strip_prefix("data:") {
        let (header, data) = rest.split_once(',').ok_or_else(|| {
            AppError::Core(CoreError::Validation("Malformed data URL in `image`".into()))
        })?;
        let mime_type = header.strip_suffix(";base64").ok_or_else(|| {
            AppError::Core(CoreError::Validation(
                "Data URL in `image` must be base64-encoded".into(),
            ))
        })?;
        return Ok((mime_type, data));
    }

    let mime_type = input.mime_type.as_deref().unwrap_or("image/jpeg");
    Ok((mime_type, &input.image))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_plain_base64_defaults_to_jpeg() {
        let input = VerifyRequest {
            image: "aGVsbG8=".into(),
            mime_type: None,
        };
        let (mime, data) = split_image_payload(&input).unwrap();
        assert_eq!(mime, "image/jpeg");
        assert_eq!(data, "aGVsbG8=");
    }

    #[test]
    fn test_split_data_url() {
        let input = VerifyRequest {
            image: "data:image/png;base64,aGVsbG8=".into(),
            mime_type: None,
        };
        let (mime, data) = split_image_payload(&input).unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(data, "aGVsbG8=");
    }

    #[test]
    fn test_split_rejects_non_base64_data_url() {
        let input = VerifyRequest {
            image: "data:image/png,rawbytes".into(),
            mime_type: None,
        };
        assert!(split_image_payload(&input).is_err());
    }

    #[test]
    fn test_split_rejects_empty_image() {
        let input = VerifyRequest {
            image: "   ".into(),
            mime_type: None,
        };
        assert!(split_image_payload(&input).is_err());
    }
}
