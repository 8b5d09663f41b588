//! Handlers for the `/auth` resource (session issue, refresh, logout).
//!
//! There is no password flow: the client authenticates with its wallet
//! provider and presents the resulting email + display name. The server
//! provisions the user row on first sight and issues its own expiring
//! access/refresh token pair, so possession of an email string alone never
//! grants access to the API.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use wastewise_core::error::CoreError;
use wastewise_db::models::user::{CreateUser, User};
use wastewise_db::repositories::{SessionRepo, UserRepo};

use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Display name used when the identity provider supplies none.
const FALLBACK_NAME: &str = "anonymous user";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/session`.
#[derive(Debug, Deserialize)]
pub struct SessionRequest {
    pub email: String,
    /// Optional display name from the identity provider.
    pub name: Option<String>,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Successful authentication response returned by session issue and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: User,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/session
///
/// Exchange a wallet-derived identity (email + optional name) for access
/// and refresh tokens, provisioning the user on first login.
pub async fn create_session(
    State(state): State<AppState>,
    Json(input): Json<SessionRequest>,
) -> AppResult<Json<AuthResponse>> {
    let email = input.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Core(CoreError::Validation(
            "A valid email address is required".into(),
        )));
    }

    let name = match input.name.as_deref().map(str::trim) {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => FALLBACK_NAME.to_string(),
    };

    let user = UserRepo::get_or_create(
        &state.pool,
        &CreateUser {
            email: email.to_string(),
            name,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "Session issued");

    let response = create_auth_response(&state, user).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a valid refresh token for a new access + refresh token pair.
/// The presented token's session is revoked (rotation), so a stolen
/// refresh token stops working the moment its owner uses it.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let token_hash = hash_refresh_token(&input.refresh_token);

    let session = SessionRepo::find_active_by_hash(&state.pool, &token_hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    SessionRepo::revoke(&state.pool, session.id).await?;

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    let response = create_auth_response(&state, user).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/logout
///
/// Revoke all of the authenticated user's sessions. Returns 204.
pub async fn logout(auth: AuthUser, State(state): State<AppState>) -> AppResult<StatusCode> {
    let revoked = SessionRepo::revoke_all_for_user(&state.pool, auth.user_id).await?;
    tracing::info!(user_id = auth.user_id, revoked, "User logged out");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Generate a token pair for a user and persist the refresh session.
async fn create_auth_response(state: &AppState, user: User) -> Result<AuthResponse, AppError> {
    let jwt = &state.config.jwt;

    let access_token = generate_access_token(user.id, jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    let (refresh_token, refresh_hash) = generate_refresh_token();
    let expires_at = Utc::now() + chrono::Duration::days(jwt.refresh_token_expiry_days);

    SessionRepo::create(&state.pool, user.id, &refresh_hash, expires_at).await?;

    Ok(AuthResponse {
        access_token,
        refresh_token,
        expires_in: jwt.access_token_expiry_mins * 60,
        user,
    })
}
