//! Image embedding generation.
//!
//! Converts decoded images into unit-length vectors with the BioCLIP vision
//! encoder running locally via ONNX Runtime.
//!
//! # Usage
//!
//! ```rust,ignore
//! use plantclip_core::embedding::ImageEncoder;
//! use plantclip_core::Config;
//!
//! let config = Config::default();
//! let encoder = ImageEncoder::load(&config.model, &config.model_dir())?;
//! let embedding = encoder.embed(&decoded_image)?;
//! ```

pub(crate) mod preprocess;
pub(crate) mod visual;

use std::path::{Path, PathBuf};

use image::DynamicImage;

use crate::config::ModelConfig;
use crate::error::{ClassifyError, ClassifyResult};

pub use self::preprocess::preprocess;
use self::visual::VisualSession;

/// Engine for generating image embeddings.
pub struct ImageEncoder {
    session: VisualSession,
    image_size: u32,
}

impl ImageEncoder {
    /// Load the vision encoder from the model directory.
    pub fn load(config: &ModelConfig, model_dir: &Path) -> ClassifyResult<Self> {
        let model_path = Self::model_path(config, model_dir);

        if !model_path.exists() {
            return Err(ClassifyError::model(format!(
                "Vision encoder not found at {:?}. Check `plantclip models list`.",
                model_path
            )));
        }

        tracing::info!("Loading vision encoder from {:?}", model_path);
        let session = VisualSession::load(&model_path, &config.image_output, config.use_cpu)?;
        tracing::info!("Vision encoder loaded successfully");

        Ok(Self {
            session,
            image_size: config.image_size,
        })
    }

    /// Generate an L2-normalized embedding vector for an image.
    pub fn embed(&self, image: &DynamicImage) -> ClassifyResult<Vec<f32>> {
        let tensor = preprocess(image, self.image_size);
        self.session.embed(&tensor)
    }

    /// Get the expected model file path.
    pub fn model_path(config: &ModelConfig, model_dir: &Path) -> PathBuf {
        model_dir.join(&config.visual_model)
    }
}
