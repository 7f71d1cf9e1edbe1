//! Route definitions for the detection resource.
//!
//! All endpoints require authentication via the `AuthUser` extractor on
//! their handlers.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::detection;
use crate::state::AppState;

/// Detection routes mounted at `/detect`.
///
/// ```text
/// POST /skin-detection   -> detect_skin
/// GET  /users-activity   -> users_activity
/// GET  /dashboard-stats  -> dashboard_stats
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/skin-detection", post(detection::detect_skin))
        .route("/users-activity", get(detection::users_activity))
        .route("/dashboard-stats", get(detection::dashboard_stats))
}
