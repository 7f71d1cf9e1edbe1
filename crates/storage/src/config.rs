//! Storage configuration loaded from environment variables.

/// S3 connection settings.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Target bucket. Required.
    pub bucket: String,
    /// Bucket region (default: `us-east-1`).
    pub region: String,
    /// Custom endpoint for S3-compatible providers (MinIO, R2, ...).
    pub endpoint: Option<String>,
    /// Base URL for public object links (e.g. a CDN domain). When unset,
    /// the virtual-hosted AWS URL is derived from bucket and region.
    pub public_base_url: Option<String>,
    /// Key prefix ("folder") for uploads (default: `skin-detections`).
    pub key_prefix: String,
}

impl StorageConfig {
    /// Load storage configuration from environment variables.
    ///
    /// | Env Var              | Required | Default           |
    /// |----------------------|----------|-------------------|
    /// | `S3_BUCKET`          | **yes**  | --                |
    /// | `S3_REGION`          | no       | `us-east-1`       |
    /// | `S3_ENDPOINT`        | no       | AWS default       |
    /// | `S3_PUBLIC_BASE_URL` | no       | derived from AWS  |
    /// | `S3_KEY_PREFIX`      | no       | `skin-detections` |
    ///
    /// AWS credentials resolve through the standard provider chain
    /// (environment, shared config, instance metadata).
    ///
    /// # Panics
    ///
    /// Panics if `S3_BUCKET` is not set, so a misconfigured deployment
    /// fails at startup instead of on the first upload.
    pub fn from_env() -> Self {
        let bucket = std::env::var("S3_BUCKET").expect("S3_BUCKET must be set in the environment");

        let region = std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".into());

        let endpoint = std::env::var("S3_ENDPOINT").ok().filter(|s| !s.is_empty());

        let public_base_url = std::env::var("S3_PUBLIC_BASE_URL")
            .ok()
            .filter(|s| !s.is_empty())
            .map(|s| s.trim_end_matches('/').to_string());

        let key_prefix =
            std::env::var("S3_KEY_PREFIX").unwrap_or_else(|_| "skin-detections".into());

        Self {
            bucket,
            region,
            endpoint,
            public_base_url,
            key_prefix,
        }
    }
}
