//! Logo loading and inline encoding.
//!
//! The logo is read once at startup and embedded in every page as a base64
//! `data:` URI, so the service never serves image files itself.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

/// MIME type used when magic-byte detection does not recognise an image.
pub const FALLBACK_IMAGE_MIME: &str = "image/webp";

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("asset not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("failed to read asset {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A binary asset encoded for inline embedding. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedAsset {
    pub mime_type: String,
    /// Standard-alphabet, padded base64 of the file bytes.
    pub data: String,
}

impl EncodedAsset {
    /// Encode raw bytes, detecting the image type from magic bytes.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self { mime_type: detect_image_mime(bytes), data: BASE64.encode(bytes) }
    }

    /// `data:` URI suitable for an `img` `src` attribute.
    #[must_use]
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// Read `path` fully and encode it.
///
/// # Errors
///
/// Returns [`AssetError::NotFound`] when the path does not exist and
/// [`AssetError::Io`] for any other read failure.
pub fn load_asset(path: &Path) -> Result<EncodedAsset, AssetError> {
    let bytes = std::fs::read(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => AssetError::NotFound { path: path.to_path_buf() },
        _ => AssetError::Io { path: path.to_path_buf(), source },
    })?;

    let asset = EncodedAsset::from_bytes(&bytes);
    tracing::debug!(path = %path.display(), mime = %asset.mime_type, bytes = bytes.len(), "asset loaded");
    Ok(asset)
}

fn detect_image_mime(bytes: &[u8]) -> String {
    infer::get(bytes)
        .filter(|kind| kind.matcher_type() == infer::MatcherType::Image)
        .map_or_else(|| FALLBACK_IMAGE_MIME.to_owned(), |kind| kind.mime_type().to_owned())
}

#[cfg(test)]
#[path = "assets_test.rs"]
mod tests;
