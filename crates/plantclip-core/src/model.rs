//! Classifier abstraction and the lazily-initialized model holder.
//!
//! The service never constructs a model directly. It owns a [`LazyModel`]
//! that runs the configured loader the first time a request needs the model
//! and shares the resulting instance afterwards.

use std::path::Path;
use std::sync::Arc;

use image::DynamicImage;
use serde::Serialize;
use tokio::sync::OnceCell;

use crate::error::{ClassifierError, ClassifyError, ClassifyResult};
use crate::prediction::RawPrediction;

/// A loaded image classifier.
pub trait Classifier: Send + Sync {
    /// Classify the image stored at `path`.
    fn predict_path(&self, path: &Path) -> Result<RawPrediction, ClassifierError>;

    /// Classify an already decoded image.
    fn predict_image(&self, image: &DynamicImage) -> Result<RawPrediction, ClassifierError>;

    /// Describe the loaded model.
    fn info(&self) -> ModelInfo;
}

/// Static description of a loaded classifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInfo {
    pub model_type: String,
    pub runtime: String,
    pub device: String,
    pub label_count: usize,
}

type Loader = Arc<dyn Fn() -> ClassifyResult<Arc<dyn Classifier>> + Send + Sync>;

/// Holds at most one loaded classifier, created on first use.
///
/// Concurrent first callers wait on the same initialization. A failed load
/// leaves the holder empty so the next call tries again.
pub struct LazyModel {
    loader: Loader,
    cell: OnceCell<Arc<dyn Classifier>>,
}

impl LazyModel {
    /// Create a holder that runs `loader` on first access.
    ///
    /// The loader runs on a blocking thread.
    pub fn new<F>(loader: F) -> Self
    where
        F: Fn() -> ClassifyResult<Arc<dyn Classifier>> + Send + Sync + 'static,
    {
        Self {
            loader: Arc::new(loader),
            cell: OnceCell::new(),
        }
    }

    /// Create a holder around an already loaded classifier.
    pub fn loaded(model: Arc<dyn Classifier>) -> Self {
        let fallback = Arc::clone(&model);
        Self {
            loader: Arc::new(move || Ok(Arc::clone(&fallback))),
            cell: OnceCell::new_with(Some(model)),
        }
    }

    /// Get the classifier, loading it if this is the first call.
    pub async fn get(&self) -> ClassifyResult<Arc<dyn Classifier>> {
        let model = self
            .cell
            .get_or_try_init(|| async {
                tracing::info!("Loading classifier model...");
                let loader = Arc::clone(&self.loader);
                let model = tokio::task::spawn_blocking(move || loader())
                    .await
                    .map_err(|e| ClassifyError::model(format!("Model loader panicked: {e}")))?;

                match &model {
                    Ok(m) => {
                        let info = m.info();
                        tracing::info!(
                            "Model loaded: {} on {} ({} labels)",
                            info.model_type,
                            info.device,
                            info.label_count
                        );
                    }
                    Err(e) => tracing::error!("Failed to load model: {e}"),
                }
                model
            })
            .await?;
        Ok(Arc::clone(model))
    }

    /// Whether the classifier has been loaded.
    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }
}
