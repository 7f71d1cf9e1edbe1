//! Object-storage collaborator: upload a local image file, get back a public
//! URL plus whatever metadata could be read off the upload.
//!
//! The [`ObjectStorage`] trait is the seam handlers depend on; [`S3Storage`]
//! is the production implementation. Image dimensions and format come from a
//! header-only probe of the local file, so an unreadable image degrades to
//! absent metadata rather than a failed upload.

pub mod config;
pub mod probe;
pub mod s3;

use std::path::Path;

use serde::Serialize;

pub use config::StorageConfig;
pub use s3::S3Storage;

/// Metadata captured for an uploaded image. Stored alongside the record as a
/// JSON document; any field may be missing when the probe or the provider
/// response was incomplete.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImageMeta {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub bytes: Option<u64>,
    pub format: Option<String>,
    /// Provider-side object identifier (the S3 key).
    pub key: Option<String>,
    /// Provider-side version or entity tag, when the bucket reports one.
    pub version: Option<String>,
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredImage {
    /// Publicly reachable URL for the uploaded object.
    pub url: String,
    pub meta: ImageMeta,
}

/// Errors from the storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The local scratch file could not be read.
    #[error("Failed to read upload from disk: {0}")]
    Io(#[from] std::io::Error),

    /// The provider rejected or failed the upload.
    #[error("Object upload failed: {0}")]
    Upload(String),
}

/// Uploads image files to an object store.
#[async_trait::async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Upload the file at `path`, returning its public URL and metadata.
    async fn upload_image(
        &self,
        path: &Path,
        content_type: Option<&str>,
    ) -> Result<StoredImage, StorageError>;
}
