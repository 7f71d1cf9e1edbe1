pub mod detection;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /detect/skin-detection    analyze an uploaded image (POST, multipart)
/// /detect/users-activity    the user's records, newest first (GET)
/// /detect/dashboard-stats   aggregate statistics (GET)
/// ```
///
/// Every route under `/detect` requires a Bearer token.
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/detect", detection::router())
}
