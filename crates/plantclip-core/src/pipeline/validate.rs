//! Input validation before decoding.

use std::io::Read;
use std::path::Path;

use image::ImageFormat;

use crate::config::LimitsConfig;
use crate::error::{ClassifyError, ClassifyResult};

/// Validates image references before they reach the decoder.
pub struct Validator {
    limits: LimitsConfig,
}

impl Validator {
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Quick checks before a full decode:
    /// - the path exists and is a file
    /// - the file size is within limits
    /// - the file starts with a signature the decoder recognizes
    pub fn validate(&self, path: &Path) -> ClassifyResult<()> {
        if !path.is_file() {
            return Err(ClassifyError::FileNotFound(path.to_path_buf()));
        }

        let metadata = std::fs::metadata(path).map_err(|e| ClassifyError::Decode {
            path: path.to_path_buf(),
            message: format!("Cannot read metadata: {}", e),
        })?;

        let max_bytes = self.limits.max_file_size_mb.saturating_mul(1024 * 1024);
        if metadata.len() > max_bytes {
            return Err(ClassifyError::FileTooLarge {
                path: path.to_path_buf(),
                size_mb: metadata.len() / (1024 * 1024),
                max_mb: self.limits.max_file_size_mb,
            });
        }

        self.check_magic_bytes(path)
    }

    fn check_magic_bytes(&self, path: &Path) -> ClassifyResult<()> {
        let mut file = std::fs::File::open(path).map_err(|e| ClassifyError::Decode {
            path: path.to_path_buf(),
            message: format!("Cannot open file: {}", e),
        })?;

        let mut header = [0u8; 16];
        let bytes_read = file.read(&mut header).unwrap_or(0);

        if bytes_read < 4 {
            return Err(ClassifyError::Decode {
                path: path.to_path_buf(),
                message: "File too small to be a valid image".to_string(),
            });
        }

        if !Self::is_recognized_image(&header[..bytes_read], path) {
            return Err(ClassifyError::Decode {
                path: path.to_path_buf(),
                message: "Unrecognized image format (invalid magic bytes)".to_string(),
            });
        }

        Ok(())
    }

    /// Accept anything the decoder can sniff from content. TGA has no
    /// signature, so it is recognized by extension.
    fn is_recognized_image(header: &[u8], path: &Path) -> bool {
        image::guess_format(header).is_ok()
            || matches!(ImageFormat::from_path(path), Ok(ImageFormat::Tga))
    }
}
