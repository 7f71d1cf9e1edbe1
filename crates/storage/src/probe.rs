//! Header-only probing of local image files.

use std::path::Path;

use crate::ImageMeta;

/// Read dimensions and format from the file's header, plus its byte size.
///
/// Best effort: a file the `image` crate cannot identify (or cannot open)
/// yields an [`ImageMeta`] with the unreadable fields absent. The upload
/// itself is never blocked on the probe.
pub fn probe_file(path: &Path) -> ImageMeta {
    let bytes = std::fs::metadata(path).ok().map(|m| m.len());

    let reader = match image::ImageReader::open(path).and_then(|r| r.with_guessed_format()) {
        Ok(reader) => reader,
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "Image probe could not open file");
            return ImageMeta {
                bytes,
                ..ImageMeta::default()
            };
        }
    };

    let format = reader
        .format()
        .map(|f| f.extensions_str().first().copied().unwrap_or("bin").to_string());

    let (width, height) = match reader.into_dimensions() {
        Ok((w, h)) => (Some(w), Some(h)),
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "Image probe could not read dimensions");
            (None, None)
        }
    };

    ImageMeta {
        width,
        height,
        bytes,
        format,
        key: None,
        version: None,
    }
}
