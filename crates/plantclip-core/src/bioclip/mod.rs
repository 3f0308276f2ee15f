//! BioCLIP zero-shot classifier running on ONNX Runtime.
//!
//! At load time every label is rendered into a caption and encoded by the
//! text tower. Each prediction encodes the image with the vision tower and
//! ranks labels by temperature-scaled cosine similarity.

pub mod label_bank;
pub mod scorer;
pub mod text_encoder;

use std::path::{Path, PathBuf};

use image::DynamicImage;

use crate::config::ModelConfig;
use crate::embedding::ImageEncoder;
use crate::error::{ClassifierError, ClassifyResult};
use crate::labels::LabelSet;
use crate::model::{Classifier, ModelInfo};
use crate::pipeline::decode_file;
use crate::prediction::{Classifications, RawPrediction};

use self::label_bank::LabelBank;
use self::scorer::ClipScorer;
use self::text_encoder::TextEncoder;

/// The production classifier.
pub struct BioClipModel {
    encoder: ImageEncoder,
    scorer: ClipScorer,
    device: &'static str,
}

impl BioClipModel {
    /// Load both encoders from `model_dir` and pre-encode one prompt per label.
    pub fn load(config: &ModelConfig, model_dir: &Path, labels: &LabelSet) -> ClassifyResult<Self> {
        let encoder = ImageEncoder::load(config, model_dir)?;

        let text_encoder = TextEncoder::load(
            &model_dir.join(&config.text_model),
            &model_dir.join(&config.tokenizer),
            &config.text_output,
            config.context_length,
            config.embedding_dim,
            config.use_cpu,
        )?;

        let bank = LabelBank::encode_all(labels, &config.prompt_template, &text_encoder)?;

        Ok(Self {
            encoder,
            scorer: ClipScorer::new(bank, config.logit_scale),
            device: crate::runtime::device_name(config.use_cpu),
        })
    }

    /// Paths of every file the model needs, paired with whether it exists.
    pub fn required_files(config: &ModelConfig, model_dir: &Path) -> Vec<(PathBuf, bool)> {
        [&config.visual_model, &config.text_model, &config.tokenizer]
            .into_iter()
            .map(|name| {
                let path = model_dir.join(name);
                let exists = path.exists();
                (path, exists)
            })
            .collect()
    }

    /// Whether every model file is present in `model_dir`.
    pub fn is_installed(config: &ModelConfig, model_dir: &Path) -> bool {
        Self::required_files(config, model_dir)
            .iter()
            .all(|(_, exists)| *exists)
    }
}

impl Classifier for BioClipModel {
    fn predict_path(&self, path: &Path) -> Result<RawPrediction, ClassifierError> {
        let decoded = decode_file(path)?;
        self.predict_image(&decoded.image)
    }

    fn predict_image(&self, image: &DynamicImage) -> Result<RawPrediction, ClassifierError> {
        let embedding = self.encoder.embed(image)?;
        let scores = self.scorer.score(&embedding)?;
        Ok(RawPrediction::Ranked(Box::new(Classifications::from_scores(
            scores,
        ))))
    }

    fn info(&self) -> ModelInfo {
        ModelInfo {
            model_type: "bioclip".to_string(),
            runtime: "onnxruntime".to_string(),
            device: self.device.to_string(),
            label_count: self.scorer.label_count(),
        }
    }
}
