//! Handlers for the `/detect` resource: skin analysis, per-user history,
//! and dashboard statistics.

use std::path::{Path, PathBuf};

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;

use dermalens_core::assessment::Assessment;
use dermalens_core::extract::extract_json;
use dermalens_core::stats::{self, MonthBucket};
use dermalens_core::types::DbId;
use dermalens_db::models::detection::{CreateDetection, Detection};
use dermalens_db::repositories::DetectionRepo;
use dermalens_openai::prompt;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// How many condition groups the overview chart shows.
const TOP_CONDITIONS_LIMIT: i64 = 5;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Response for `POST /detect/skin-detection`: the stored record's fields.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionOutcome {
    pub status: bool,
    pub user_id: DbId,
    pub image_url: String,
    pub result: Option<serde_json::Value>,
    pub condition: String,
    pub confidence: Option<f64>,
    pub advice: String,
    pub urgency: String,
    pub medications: Option<serde_json::Value>,
    pub model: String,
    pub completion_id: String,
    pub raw: String,
}

/// Response for `GET /detect/users-activity`.
#[derive(Debug, Serialize)]
pub struct ActivityResponse {
    pub status: bool,
    pub msg: String,
    pub data: Vec<Detection>,
}

/// Response for `GET /detect/dashboard-stats`.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub status: bool,
    pub stats: DashboardStats,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_scans: i64,
    pub detected_conditions: i64,
    /// Mean confidence as a percentage string, e.g. `"60.0%"`; `"0%"` when
    /// no record carries a confidence.
    pub accuracy_rate: String,
    /// Exactly twelve buckets; months without scans are explicit zeros.
    pub monthly_scans: Vec<MonthBucket>,
    pub conditions_overview: Vec<ConditionSlice>,
}

/// One slice of the conditions distribution chart.
#[derive(Debug, Serialize)]
pub struct ConditionSlice {
    pub name: String,
    pub value: i64,
}

// ---------------------------------------------------------------------------
// Multipart intake
// ---------------------------------------------------------------------------

/// The image file persisted to a scratch path, plus its declared MIME type.
struct ScratchUpload {
    path: PathBuf,
    content_type: Option<String>,
}

/// Drain the multipart form: the `image` file field lands in a scratch file,
/// the optional `description` text field is collected. A file field under
/// any other name is a client error; unknown text fields are ignored.
async fn read_upload(
    multipart: &mut Multipart,
    scratch_dir: &Path,
) -> Result<(Option<ScratchUpload>, Option<String>), AppError> {
    let mut upload: Option<ScratchUpload> = None;
    let mut description: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let is_file = field.file_name().is_some();

        match name.as_str() {
            "image" => {
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;

                let path = scratch_dir.join(format!("upload-{}", uuid::Uuid::new_v4()));
                tokio::fs::write(&path, &data)
                    .await
                    .map_err(|e| AppError::Internal(format!("Failed to write scratch file: {e}")))?;

                upload = Some(ScratchUpload { path, content_type });
            }
            "description" => {
                description = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))
                    .map(|d| d.trim().to_string())
                    .ok()
                    .filter(|d| !d.is_empty());
            }
            other if is_file => {
                return Err(AppError::BadRequest(format!(
                    "Unexpected field name '{other}'. Please use 'image' as the key for your file upload"
                )));
            }
            _ => {}
        }
    }

    Ok((upload, description))
}

// ---------------------------------------------------------------------------
// POST /detect/skin-detection
// ---------------------------------------------------------------------------

/// POST /api/v1/detect/skin-detection
///
/// Sequential pipeline: scratch file -> object storage -> chat completion ->
/// best-effort extraction -> scratch cleanup -> append record. A failed
/// stage fails the whole request with no retry; an already-uploaded image is
/// left in place when a later stage fails. Unparseable model output is not a
/// failure: the record is stored with a null `result` and the raw text
/// preserved.
pub async fn detect_skin(
    auth: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<DetectionOutcome>> {
    let (upload, description) = read_upload(&mut multipart, &state.config.scratch_dir).await?;
    let Some(upload) = upload else {
        return Err(AppError::BadRequest(
            "No image uploaded. Use form-data with field 'image'".into(),
        ));
    };

    let stored = state
        .storage
        .upload_image(&upload.path, upload.content_type.as_deref())
        .await?;
    tracing::info!(user_id = auth.user_id, image_url = %stored.url, "Image uploaded");

    let messages = prompt::analysis_messages(description.as_deref(), &stored.url);
    let completion = state.chat.complete(&messages).await?;
    let content = completion.content().to_string();

    let result = extract_json(&content);
    if result.is_none() {
        tracing::warn!(
            completion_id = %completion.id,
            "Model output had no recoverable JSON; storing raw text only"
        );
    }
    let assessment = Assessment::project(result.as_ref(), &state.config.stats.confidence_levels);

    // Scratch cleanup happens before the database write; failure only costs
    // disk space, never the request.
    if let Err(err) = tokio::fs::remove_file(&upload.path).await {
        tracing::debug!(path = %upload.path.display(), error = %err, "Failed to remove scratch file");
    }

    let detection = DetectionRepo::create(
        &state.pool,
        &CreateDetection {
            user_id: auth.user_id,
            image_url: stored.url,
            image_meta: serde_json::to_value(&stored.meta).ok(),
            description: description.unwrap_or_default(),
            model_name: completion.model.clone(),
            completion_id: completion.id.clone(),
            result,
            condition: assessment.condition,
            confidence: assessment.confidence,
            advice: assessment.advice,
            urgency: assessment.urgency,
            medications: assessment.medications,
            raw: content,
        },
    )
    .await?;

    Ok(Json(DetectionOutcome {
        status: true,
        user_id: detection.user_id,
        image_url: detection.image_url,
        result: detection.result,
        condition: detection.condition,
        confidence: detection.confidence,
        advice: detection.advice,
        urgency: detection.urgency,
        medications: detection.medications,
        model: detection.model_name,
        completion_id: detection.completion_id,
        raw: detection.raw,
    }))
}

// ---------------------------------------------------------------------------
// GET /detect/users-activity
// ---------------------------------------------------------------------------

/// GET /api/v1/detect/users-activity
///
/// The authenticated user's detection records, newest first.
pub async fn users_activity(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<ActivityResponse>> {
    let data = DetectionRepo::list_by_user(&state.pool, auth.user_id).await?;
    Ok(Json(ActivityResponse {
        status: true,
        msg: "All user activity".to_string(),
        data,
    }))
}

// ---------------------------------------------------------------------------
// GET /detect/dashboard-stats
// ---------------------------------------------------------------------------

/// GET /api/v1/detect/dashboard-stats
///
/// Aggregate statistics over the authenticated user's records, computed on
/// demand -- nothing is maintained incrementally.
pub async fn dashboard_stats(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<StatsResponse>> {
    let pool = &state.pool;
    let user_id = auth.user_id;

    let total_scans = DetectionRepo::count_by_user(pool, user_id).await?;
    let detected_conditions = DetectionRepo::count_distinct_conditions(pool, user_id).await?;
    let avg_confidence = DetectionRepo::avg_confidence(pool, user_id).await?;

    let window = state.config.stats.window;
    let today = chrono::Utc::now().date_naive();
    let since = window
        .start(today)
        .and_hms_opt(0, 0, 0)
        .expect("midnight always exists")
        .and_utc();
    let counts = DetectionRepo::monthly_counts(pool, user_id, since).await?;
    let monthly_scans = stats::monthly_buckets(window, today, &counts);

    let top = DetectionRepo::top_conditions(pool, user_id, TOP_CONDITIONS_LIMIT).await?;
    let conditions_overview = top
        .into_iter()
        .map(|c| ConditionSlice {
            name: stats::condition_label(&c.condition).to_string(),
            value: c.count,
        })
        .collect();

    Ok(Json(StatsResponse {
        status: true,
        stats: DashboardStats {
            total_scans,
            detected_conditions,
            accuracy_rate: stats::format_accuracy_rate(avg_confidence),
            monthly_scans,
            conditions_overview,
        },
    }))
}
