//! Integration tests for the detection repository against a real database:
//! insert, newest-first listing, and the projection round-trip invariant.

use serde_json::json;
use sqlx::PgPool;

use dermalens_core::assessment::{Assessment, ConfidenceLevels};
use dermalens_core::types::DbId;
use dermalens_db::models::detection::CreateDetection;
use dermalens_db::repositories::DetectionRepo;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_detection(user_id: DbId, condition: &str, confidence: Option<f64>) -> CreateDetection {
    CreateDetection {
        user_id,
        image_url: format!("https://cdn.test/skin-detections/{condition}.png"),
        image_meta: Some(json!({"width": 640, "height": 480, "bytes": 12345, "format": "png"})),
        description: String::new(),
        model_name: "gpt-4o-mini".to_string(),
        completion_id: "cmpl-test".to_string(),
        result: Some(json!({"condition": condition, "confidence": confidence})),
        condition: condition.to_string(),
        confidence,
        advice: String::new(),
        urgency: String::new(),
        medications: None,
        raw: json!({"condition": condition, "confidence": confidence}).to_string(),
    }
}

/// Pin a row's created_at so ordering and bucketing tests are deterministic.
async fn backdate(pool: &PgPool, id: DbId, timestamp: &str) {
    sqlx::query("UPDATE detections SET created_at = $1::timestamptz WHERE id = $2")
        .bind(timestamp)
        .bind(id)
        .execute(pool)
        .await
        .expect("backdate should succeed");
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn create_returns_full_row(pool: PgPool) {
    let created = DetectionRepo::create(&pool, &new_detection(1, "Acne", Some(0.8)))
        .await
        .expect("create should succeed");

    assert!(created.id > 0);
    assert_eq!(created.user_id, 1);
    assert_eq!(created.condition, "Acne");
    assert_eq!(created.confidence, Some(0.8));
    assert_eq!(created.model_name, "gpt-4o-mini");
    assert!(created.result.is_some());
}

#[sqlx::test]
async fn list_by_user_is_newest_first_and_scoped(pool: PgPool) {
    let first = DetectionRepo::create(&pool, &new_detection(1, "Acne", None))
        .await
        .unwrap();
    let second = DetectionRepo::create(&pool, &new_detection(1, "Eczema", None))
        .await
        .unwrap();
    let other_user = DetectionRepo::create(&pool, &new_detection(2, "Rosacea", None))
        .await
        .unwrap();

    backdate(&pool, first.id, "2024-01-10T12:00:00Z").await;
    backdate(&pool, second.id, "2024-02-10T12:00:00Z").await;

    let listed = DetectionRepo::list_by_user(&pool, 1).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, second.id, "newest record must come first");
    assert_eq!(listed[1].id, first.id);
    assert!(listed.iter().all(|d| d.id != other_user.id));
}

#[sqlx::test]
async fn parse_failure_row_stores_raw_with_null_result(pool: PgPool) {
    let input = CreateDetection {
        result: None,
        condition: String::new(),
        confidence: None,
        raw: "The model said something unparseable.".to_string(),
        image_url: "https://cdn.test/skin-detections/unparsed.png".to_string(),
        ..new_detection(1, "ignored", None)
    };

    let created = DetectionRepo::create(&pool, &input).await.unwrap();
    assert_eq!(created.result, None);
    assert_eq!(created.condition, "");
    assert_eq!(created.confidence, None);
    assert_eq!(created.raw, "The model said something unparseable.");
}

#[sqlx::test]
async fn flattened_fields_round_trip_byte_identical(pool: PgPool) {
    let result = json!({
        "condition": "Atopic Dermatitis",
        "confidence": 0.72,
        "advice": "Use a fragrance-free emollient.",
        "urgency": "routine",
        "medications": {"otc": ["hydrocortisone 1%"], "prescription": [], "caution": "Ask a clinician."},
    });
    let assessment = Assessment::project(Some(&result), &ConfidenceLevels::default());

    let input = CreateDetection {
        user_id: 7,
        image_url: "https://cdn.test/skin-detections/roundtrip.png".to_string(),
        image_meta: None,
        description: "itchy patch on forearm".to_string(),
        model_name: "gpt-4o-mini".to_string(),
        completion_id: "cmpl-roundtrip".to_string(),
        result: Some(result.clone()),
        condition: assessment.condition.clone(),
        confidence: assessment.confidence,
        advice: assessment.advice.clone(),
        urgency: assessment.urgency.clone(),
        medications: assessment.medications.clone(),
        raw: result.to_string(),
    };
    DetectionRepo::create(&pool, &input).await.unwrap();

    let reloaded = &DetectionRepo::list_by_user(&pool, 7).await.unwrap()[0];

    // Reloading and re-projecting must agree exactly with what was stored.
    let reprojected = Assessment::project(reloaded.result.as_ref(), &ConfidenceLevels::default());
    assert_eq!(reloaded.condition, reprojected.condition);
    assert_eq!(reloaded.confidence, reprojected.confidence);
    assert_eq!(reloaded.advice, reprojected.advice);
    assert_eq!(reloaded.urgency, reprojected.urgency);
    assert_eq!(reloaded.medications, reprojected.medications);
    assert_eq!(reloaded.image_meta, None);
}
