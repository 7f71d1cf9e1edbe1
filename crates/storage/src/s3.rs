//! S3 implementation of the [`ObjectStorage`] trait.

use std::path::Path;

use aws_sdk_s3::primitives::ByteStream;

use crate::config::StorageConfig;
use crate::probe::probe_file;
use crate::{ImageMeta, ObjectStorage, StorageError, StoredImage};

/// Object storage backed by S3 or an S3-compatible provider.
pub struct S3Storage {
    client: aws_sdk_s3::Client,
    config: StorageConfig,
}

impl S3Storage {
    /// Build a client from the given configuration, resolving AWS
    /// credentials through the standard provider chain.
    pub async fn connect(config: StorageConfig) -> Self {
        let region = aws_config::Region::new(config.region.clone());
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest()).region(region);
        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        Self {
            client: aws_sdk_s3::Client::new(&sdk_config),
            config,
        }
    }

    /// Public URL for an uploaded key: the configured base URL when present,
    /// otherwise the virtual-hosted AWS form.
    fn public_url(&self, key: &str) -> String {
        match &self.config.public_base_url {
            Some(base) => format!("{base}/{key}"),
            None => format!(
                "https://{}.s3.{}.amazonaws.com/{key}",
                self.config.bucket, self.config.region
            ),
        }
    }

    /// Object key for a new upload: `<prefix>/<uuid>.<ext>`.
    fn new_key(&self, extension: &str) -> String {
        format!(
            "{}/{}.{extension}",
            self.config.key_prefix,
            uuid::Uuid::new_v4()
        )
    }
}

#[async_trait::async_trait]
impl ObjectStorage for S3Storage {
    async fn upload_image(
        &self,
        path: &Path,
        content_type: Option<&str>,
    ) -> Result<StoredImage, StorageError> {
        // Header-only probe; runs blocking file IO off the async thread.
        let probe_path = path.to_path_buf();
        let probed = tokio::task::spawn_blocking(move || probe_file(&probe_path))
            .await
            .unwrap_or_default();

        let extension = probed.format.clone().unwrap_or_else(|| "bin".to_string());
        let key = self.new_key(&extension);

        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| StorageError::Upload(format!("Failed to stream {}: {e}", path.display())))?;

        let mut request = self
            .client
            .put_object()
            .bucket(&self.config.bucket)
            .key(&key)
            .body(body);
        if let Some(content_type) = content_type {
            request = request.content_type(content_type);
        }

        let output = request
            .send()
            .await
            .map_err(|e| StorageError::Upload(e.to_string()))?;

        let version = output
            .version_id()
            .map(str::to_string)
            .or_else(|| output.e_tag().map(|t| t.trim_matches('"').to_string()));

        let url = self.public_url(&key);
        tracing::info!(%url, key = %key, "Uploaded image to object storage");

        Ok(StoredImage {
            url,
            meta: ImageMeta {
                key: Some(key),
                version,
                ..probed
            },
        })
    }
}
