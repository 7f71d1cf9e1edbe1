//! Repository for the `detections` table.

use sqlx::PgPool;

use dermalens_core::stats::MonthCount;
use dermalens_core::types::{DbId, Timestamp};

use crate::models::detection::{CreateDetection, Detection};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, image_url, image_meta, description, model_name, \
     completion_id, result, condition, confidence, advice, urgency, medications, raw, created_at";

/// One `(year, month, count)` group from the histogram query.
#[derive(Debug, sqlx::FromRow)]
struct MonthlyScanRow {
    year: i32,
    month: i32,
    count: i64,
}

/// One `(condition, count)` group from the top-conditions query.
#[derive(Debug, sqlx::FromRow)]
pub struct ConditionCount {
    pub condition: String,
    pub count: i64,
}

/// Provides insert, listing, and aggregate queries for detections.
/// There are no update methods: detections are append-only.
pub struct DetectionRepo;

impl DetectionRepo {
    /// Insert a new detection, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateDetection) -> Result<Detection, sqlx::Error> {
        let query = format!(
            "INSERT INTO detections (user_id, image_url, image_meta, description, model_name, \
                 completion_id, result, condition, confidence, advice, urgency, medications, raw) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Detection>(&query)
            .bind(input.user_id)
            .bind(&input.image_url)
            .bind(&input.image_meta)
            .bind(&input.description)
            .bind(&input.model_name)
            .bind(&input.completion_id)
            .bind(&input.result)
            .bind(&input.condition)
            .bind(input.confidence)
            .bind(&input.advice)
            .bind(&input.urgency)
            .bind(&input.medications)
            .bind(&input.raw)
            .fetch_one(pool)
            .await
    }

    /// List a user's detections, newest first.
    pub async fn list_by_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Detection>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM detections \
             WHERE user_id = $1 \
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Detection>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Total number of detections for a user.
    pub async fn count_by_user(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM detections WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Number of distinct non-empty condition values for a user.
    pub async fn count_distinct_conditions(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(DISTINCT condition) FILTER (WHERE condition <> '') \
             FROM detections WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Mean of the non-null confidence values for a user, or `None` when no
    /// row has a confidence.
    pub async fn avg_confidence(pool: &PgPool, user_id: DbId) -> Result<Option<f64>, sqlx::Error> {
        sqlx::query_scalar("SELECT AVG(confidence) FROM detections WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Detection counts grouped by calendar month, for rows created at or
    /// after `since`. Months without rows are absent; the caller zero-fills.
    pub async fn monthly_counts(
        pool: &PgPool,
        user_id: DbId,
        since: Timestamp,
    ) -> Result<Vec<MonthCount>, sqlx::Error> {
        let rows = sqlx::query_as::<_, MonthlyScanRow>(
            "SELECT CAST(EXTRACT(YEAR FROM created_at) AS INT) AS year, \
                    CAST(EXTRACT(MONTH FROM created_at) AS INT) AS month, \
                    COUNT(*) AS count \
             FROM detections \
             WHERE user_id = $1 AND created_at >= $2 \
             GROUP BY 1, 2 \
             ORDER BY 1, 2",
        )
        .bind(user_id)
        .bind(since)
        .fetch_all(pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| MonthCount {
                year: r.year,
                month: r.month as u32,
                count: r.count,
            })
            .collect())
    }

    /// The user's most frequent condition values (the empty condition
    /// included -- the presentation layer labels it "Unknown"). Ties break
    /// toward the condition seen earliest, which matches insertion order for
    /// this append-only table.
    pub async fn top_conditions(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<ConditionCount>, sqlx::Error> {
        sqlx::query_as::<_, ConditionCount>(
            "SELECT condition, COUNT(*) AS count \
             FROM detections \
             WHERE user_id = $1 \
             GROUP BY condition \
             ORDER BY count DESC, MIN(created_at) ASC \
             LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
