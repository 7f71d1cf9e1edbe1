//! Detection entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;

use dermalens_core::types::{DbId, Timestamp};

/// A row from the `detections` table.
///
/// Serialized field names are camelCase because rows are returned to clients
/// verbatim in the history endpoint.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Detection {
    pub id: DbId,
    pub user_id: DbId,
    pub image_url: String,
    pub image_meta: Option<serde_json::Value>,
    pub description: String,
    pub model_name: String,
    pub completion_id: String,
    /// Parsed model output; `None` when extraction failed. Source of truth
    /// for the flattened fields below.
    pub result: Option<serde_json::Value>,
    pub condition: String,
    pub confidence: Option<f64>,
    pub advice: String,
    pub urgency: String,
    pub medications: Option<serde_json::Value>,
    /// Full unparsed model text, stored even when `result` is `None`.
    pub raw: String,
    pub created_at: Timestamp,
}

/// DTO for inserting a new detection. Built server-side only; there is no
/// update DTO because records are immutable after creation.
#[derive(Debug, Clone)]
pub struct CreateDetection {
    pub user_id: DbId,
    pub image_url: String,
    pub image_meta: Option<serde_json::Value>,
    pub description: String,
    pub model_name: String,
    pub completion_id: String,
    pub result: Option<serde_json::Value>,
    pub condition: String,
    pub confidence: Option<f64>,
    pub advice: String,
    pub urgency: String,
    pub medications: Option<serde_json::Value>,
    pub raw: String,
}
