//! Request orchestration shared by every transport.
//!
//! A [`ClassificationService`] owns the lazily loaded model and the label
//! set. Each request is validated, decoded off the async runtime, handed to
//! the classifier on a blocking thread and finally normalized.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::bioclip::BioClipModel;
use crate::config::{ClassifyConfig, Config};
use crate::error::{ClassifyError, ClassifyResult};
use crate::labels::LabelSet;
use crate::model::{Classifier, LazyModel, ModelInfo};
use crate::normalize::{normalize_single, normalize_zero_shot};
use crate::pipeline::{run_blocking, DecodedImage, ImageDecoder, Validator};
use crate::prediction::RawPrediction;
use crate::types::Classification;

/// What the model self-test reports.
#[derive(Debug, Clone, Serialize)]
pub struct ModelReport {
    pub info: ModelInfo,
    pub plant_classes_count: usize,
}

/// Classifies images referenced by path.
pub struct ClassificationService {
    model: LazyModel,
    labels: LabelSet,
    validator: Validator,
    decoder: ImageDecoder,
    classify: ClassifyConfig,
    predict_timeout_ms: u64,
}

impl ClassificationService {
    /// Build a service backed by the BioCLIP model described in `config`.
    ///
    /// Nothing is loaded until the first request needs the model.
    pub fn new(config: &Config) -> Self {
        let labels = LabelSet::plants();
        let model_config = config.model.clone();
        let model_dir = config.model_dir();
        let loader_labels = labels.clone();

        let model = LazyModel::new(move || {
            let model = BioClipModel::load(&model_config, &model_dir, &loader_labels)?;
            Ok(Arc::new(model) as Arc<dyn Classifier>)
        });

        Self::with_model(model, labels, config)
    }

    /// Build a service around an arbitrary model holder.
    pub fn with_model(model: LazyModel, labels: LabelSet, config: &Config) -> Self {
        Self {
            model,
            labels,
            validator: Validator::new(config.limits.clone()),
            decoder: ImageDecoder::new(config.limits.clone()),
            classify: config.classify.clone(),
            predict_timeout_ms: config.limits.predict_timeout_ms,
        }
    }

    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    /// Load the model if needed and report whether it is resident.
    pub async fn health(&self) -> ClassifyResult<bool> {
        self.model.get().await?;
        Ok(self.model.is_loaded())
    }

    /// Classify one image against the full label set.
    pub async fn classify(&self, image_path: &str) -> ClassifyResult<Classification> {
        let (path, model) = self.resolve(image_path).await?;
        tracing::info!("Classifying image: {:?}", path);

        let decoded = self.decoder.decode(&path).await?;
        tracing::debug!(
            "Decoded {:?}: {}x{} {:?}",
            path,
            decoded.width,
            decoded.height,
            decoded.format
        );

        let raw = match self.predict_path(&model, &path).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Prediction from path failed ({e}), retrying with decoded image");
                self.predict_image(&model, decoded).await?
            }
        };

        normalize_single(raw, &self.labels, self.classify.top_k)
    }

    /// Classify one image, keeping only labels listed in `prompts`.
    ///
    /// `None` means every label is a candidate.
    pub async fn classify_zero_shot(
        &self,
        image_path: &str,
        prompts: Option<Vec<String>>,
    ) -> ClassifyResult<Classification> {
        let (path, model) = self.resolve(image_path).await?;
        let prompts = prompts.unwrap_or_else(|| self.labels.as_slice().to_vec());
        tracing::info!(
            "Zero-shot classifying image {:?} against {} prompts",
            path,
            prompts.len()
        );

        let raw = self.predict_path(&model, &path).await?;

        normalize_zero_shot(
            raw,
            &self.labels,
            &prompts,
            self.classify.zero_shot_candidates,
            self.classify.top_k,
        )
    }

    /// Load the model and describe it.
    pub async fn model_report(&self) -> ClassifyResult<ModelReport> {
        let model = self.model.get().await?;
        Ok(ModelReport {
            info: model.info(),
            plant_classes_count: self.labels.len(),
        })
    }

    /// Shared front half of both classify flows: input check, file
    /// validation and model load.
    async fn resolve(&self, image_path: &str) -> ClassifyResult<(PathBuf, Arc<dyn Classifier>)> {
        if image_path.is_empty() {
            return Err(ClassifyError::MissingInput(
                "image_path is required".to_string(),
            ));
        }

        let path = PathBuf::from(image_path);
        self.validator.validate(&path)?;

        let model = self.model.get().await?;
        Ok((path, model))
    }

    async fn predict_path(
        &self,
        model: &Arc<dyn Classifier>,
        path: &Path,
    ) -> ClassifyResult<RawPrediction> {
        let model = Arc::clone(model);
        let path = path.to_path_buf();
        run_blocking("predict", self.predict_timeout_ms, move || {
            model.predict_path(&path)
        })
        .await
    }

    async fn predict_image(
        &self,
        model: &Arc<dyn Classifier>,
        decoded: DecodedImage,
    ) -> ClassifyResult<RawPrediction> {
        let model = Arc::clone(model);
        run_blocking("predict", self.predict_timeout_ms, move || {
            model.predict_image(&decoded.image)
        })
        .await
    }
}
