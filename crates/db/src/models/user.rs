//! User entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use wastewise_core::types::{DbId, Timestamp};

/// A row from the `users` table.
///
/// There is no password column: identity comes from the wallet provider,
/// and the server issues its own session tokens against this row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub name: String,
    pub created_at: Timestamp,
}

/// DTO for provisioning a user on first login.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub name: String,
}
