//! Route definitions for the `/reports` resource.
//!
//! All endpoints require authentication.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::report;
use crate::state::AppState;

/// Routes mounted at `/reports`.
///
/// ```text
/// POST   /              -> create_report
/// GET    /              -> list_reports
/// POST   /verify        -> verify_image
/// GET    /{id}          -> get_report
/// POST   /{id}/collect  -> collect_report
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(report::create_report).get(report::list_reports))
        .route("/verify", post(report::verify_image))
        .route("/{id}", get(report::get_report))
        .route("/{id}/collect", post(report::collect_report))
}
