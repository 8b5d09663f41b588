use std::sync::Arc;

use wastewise_classifier::ClassifierClient;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: wastewise_db::DbPool,
    /// Server configuration (JWT secret, CORS, timeouts).
    pub config: Arc<ServerConfig>,
    /// Client for the third-party image classification service.
    pub classifier: Arc<ClassifierClient>,
}
