//! Image decoding with content-based format detection and timeout support.

use image::{DynamicImage, GenericImageView, ImageFormat};
use std::path::Path;

use crate::config::LimitsConfig;
use crate::error::{ClassifyError, ClassifyResult};

use super::timeout::run_blocking;

/// Image decoder with a configurable timeout.
pub struct ImageDecoder {
    limits: LimitsConfig,
}

/// Result of decoding an image.
pub struct DecodedImage {
    /// The decoded image data
    pub image: DynamicImage,
    /// Detected image format
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

impl ImageDecoder {
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Decode an image file on a blocking thread, bounded by
    /// `limits.decode_timeout_ms`.
    pub async fn decode(&self, path: &Path) -> ClassifyResult<DecodedImage> {
        let path_owned = path.to_path_buf();
        run_blocking("decode", self.limits.decode_timeout_ms, move || {
            decode_file(&path_owned)
        })
        .await
    }
}

/// Synchronously read and decode an image file.
///
/// The format is sniffed from the content first and falls back to the file
/// extension.
pub fn decode_file(path: &Path) -> ClassifyResult<DecodedImage> {
    let bytes = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ClassifyError::FileNotFound(path.to_path_buf())
        } else {
            ClassifyError::Decode {
                path: path.to_path_buf(),
                message: format!("Cannot read file: {}", e),
            }
        }
    })?;
    decode_bytes(bytes, path)
}

fn decode_bytes(bytes: Vec<u8>, path: &Path) -> ClassifyResult<DecodedImage> {
    use std::io::Cursor;

    let reader = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ClassifyError::Decode {
            path: path.to_path_buf(),
            message: format!("Cannot detect image format: {}", e),
        })?;
    let format = match reader.format() {
        Some(f) => f,
        None => ImageFormat::from_path(path).map_err(|_| ClassifyError::Decode {
            path: path.to_path_buf(),
            message: format!(
                "Unsupported image format: {}",
                path.extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("unknown")
            ),
        })?,
    };
    let image = reader.decode().map_err(|e| ClassifyError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let (width, height) = image.dimensions();
    Ok(DecodedImage {
        image,
        format,
        width,
        height,
    })
}
