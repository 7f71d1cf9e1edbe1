#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use dermalens_api::auth::jwt::{generate_access_token, JwtConfig};
use dermalens_api::config::{ServerConfig, StatsConfig};
use dermalens_api::router::build_app_router;
use dermalens_api::state::AppState;
use dermalens_core::assessment::ConfidenceLevels;
use dermalens_core::stats::StatsWindow;
use dermalens_core::types::DbId;
use dermalens_openai::{ChatApiError, ChatCompletion, ChatCompletions};
use dermalens_storage::{ImageMeta, ObjectStorage, StorageError, StoredImage};

/// URL every stub upload reports.
pub const STUB_IMAGE_URL: &str = "https://cdn.test/skin-detections/stub-object.png";

/// Default canned model output: a fenced JSON assessment.
pub const STUB_CHAT_CONTENT: &str =
    "```json\n{\"condition\":\"Acne\",\"confidence\":0.9,\"advice\":\"Wash twice daily.\",\"urgency\":\"routine\",\"medications\":{\"otc\":[\"benzoyl peroxide 2.5%\"],\"prescription\":[],\"caution\":\"See a clinician.\"}}\n```";

// ---------------------------------------------------------------------------
// Stub collaborators
// ---------------------------------------------------------------------------

/// Object storage that records nothing and always succeeds.
pub struct StubStorage;

#[async_trait::async_trait]
impl ObjectStorage for StubStorage {
    async fn upload_image(
        &self,
        _path: &Path,
        _content_type: Option<&str>,
    ) -> Result<StoredImage, StorageError> {
        Ok(StoredImage {
            url: STUB_IMAGE_URL.to_string(),
            meta: ImageMeta {
                width: Some(1),
                height: Some(1),
                bytes: Some(68),
                format: Some("png".to_string()),
                key: Some("skin-detections/stub-object.png".to_string()),
                version: Some("stub-version".to_string()),
            },
        })
    }
}

/// Chat collaborator answering every completion with fixed content.
pub struct StubChat {
    pub content: String,
}

impl StubChat {
    pub fn with_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl ChatCompletions for StubChat {
    async fn complete(
        &self,
        _messages: &[serde_json::Value],
    ) -> Result<ChatCompletion, ChatApiError> {
        Ok(serde_json::from_value(serde_json::json!({
            "id": "cmpl-stub",
            "model": "gpt-4o-mini",
            "choices": [{"message": {"content": self.content}}],
        }))
        .expect("stub completion must deserialize"))
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
        },
        stats: StatsConfig {
            window: StatsWindow::CalendarYear,
            confidence_levels: ConfidenceLevels::default(),
        },
        scratch_dir: std::env::temp_dir(),
    }
}

/// Build the full application router with all middleware layers, the given
/// database pool, and stub collaborators.
///
/// This goes through the same `build_app_router` as `main.rs`, so tests
/// exercise the production middleware stack.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_chat(pool, StubChat::with_content(STUB_CHAT_CONTENT))
}

/// Same as [`build_test_app`], but with a custom canned chat collaborator.
pub fn build_test_app_with_chat(pool: PgPool, chat: StubChat) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        storage: Arc::new(StubStorage),
        chat: Arc::new(chat),
    };
    build_app_router(state, &config)
}

/// Mint a Bearer token accepted by the test app's auth gate.
pub fn bearer_token(user_id: DbId) -> String {
    let token = generate_access_token(user_id, 15, &test_config().jwt)
        .expect("token generation should succeed");
    format!("Bearer {token}")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Issue a GET request with no auth header.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Issue a GET request with a Bearer token.
pub async fn get_auth(app: Router, uri: &str, authorization: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .header("Authorization", authorization)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Multipart form builder
// ---------------------------------------------------------------------------

const BOUNDARY: &str = "dermalens-test-boundary";

/// Minimal multipart/form-data body builder for upload tests.
pub struct MultipartForm {
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self { body: Vec::new() }
    }

    /// Append a file part.
    pub fn file(mut self, name: &str, filename: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; \
                 filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// Append a plain text part.
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                .as_bytes(),
        );
        self
    }

    /// Finish the form, returning the Content-Type header value and body.
    pub fn finish(mut self) -> (String, Vec<u8>) {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        (
            format!("multipart/form-data; boundary={BOUNDARY}"),
            self.body,
        )
    }
}

/// Issue a multipart POST with a Bearer token.
pub async fn post_multipart(
    app: Router,
    uri: &str,
    authorization: Option<&str>,
    form: MultipartForm,
) -> Response<Body> {
    let (content_type, body) = form.finish();
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", content_type);
    if let Some(authorization) = authorization {
        builder = builder.header("Authorization", authorization);
    }

    app.oneshot(builder.body(Body::from(body)).unwrap())
        .await
        .unwrap()
}
