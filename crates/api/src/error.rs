use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use wastewise_classifier::ClassifierError;
use wastewise_core::error::CoreError;
use wastewise_db::repositories::LedgerError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
/// Every data-access call propagates through this type; no handler swallows
/// a failed sub-step and continues.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `wastewise-core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A ledger error (database failure or insufficient points).
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// A failure talking to or interpreting the classification service.
    #[error(transparent)]
    Classifier(#[from] ClassifierError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::InsufficientPoints {
                    requested,
                    available,
                } => (
                    StatusCode::CONFLICT,
                    "INSUFFICIENT_POINTS",
                    format!("Insufficient points: requested {requested}, available {available}"),
                ),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- Ledger errors ---
            AppError::Ledger(LedgerError::Db(err)) => classify_sqlx_error(err),
            AppError::Ledger(LedgerError::InsufficientPoints {
                requested,
                available,
            }) => (
                StatusCode::CONFLICT,
                "INSUFFICIENT_POINTS",
                format!("Insufficient points: requested {requested}, available {available}"),
            ),

            // --- Classifier errors ---
            AppError::Classifier(err) => classify_classifier_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}

/// Classify a classifier error into an HTTP status, error code, and message.
///
/// A response the model produced but that does not parse as a verification
/// result is the user-retryable case (422); transport and upstream failures
/// surface as 502.
fn classify_classifier_error(err: &ClassifierError) -> (StatusCode, &'static str, String) {
    match err {
        ClassifierError::Verification(inner) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "CLASSIFICATION_FAILED",
            format!("Image could not be verified: {inner}"),
        ),
        ClassifierError::EmptyResponse => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "CLASSIFICATION_FAILED",
            "Classification service returned no result".to_string(),
        ),
        other => {
            tracing::error!(error = %other, "Classification service failure");
            (
                StatusCode::BAD_GATEWAY,
                "CLASSIFIER_UNAVAILABLE",
                "Classification service is unavailable".to_string(),
            )
        }
    }
}
