use std::sync::Arc;

use dermalens_openai::ChatCompletions;
use dermalens_storage::ObjectStorage;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// Cheaply cloneable: inner data is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: dermalens_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Object-storage collaborator (S3 in production).
    pub storage: Arc<dyn ObjectStorage>,
    /// Chat-completion collaborator (OpenAI-compatible in production).
    pub chat: Arc<dyn ChatCompletions>,
}
