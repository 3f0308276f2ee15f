//! Pre-computed prompt embeddings for fast scoring.
//!
//! The label bank stores an N×dim matrix of text embeddings (one row per
//! label, in label order) that is multiplied against image embeddings.

use ndarray::{Array2, ArrayView2};

use crate::error::{ClassifyError, ClassifyResult};
use crate::labels::LabelSet;

use super::text_encoder::TextEncoder;

/// Prompts encoded per ONNX call while building the bank.
const ENCODE_BATCH_SIZE: usize = 16;

/// Pre-computed label embeddings.
#[derive(Clone)]
pub struct LabelBank {
    /// Row `i` is the normalized embedding of label `i`'s prompt.
    matrix: Array2<f32>,
}

impl LabelBank {
    /// Create a label bank from a row-major matrix.
    pub fn from_raw(
        matrix: Vec<f32>,
        embedding_dim: usize,
        label_count: usize,
    ) -> ClassifyResult<Self> {
        let matrix = Array2::from_shape_vec((label_count, embedding_dim), matrix).map_err(|e| {
            ClassifyError::model(format!(
                "Label bank does not match {label_count} labels × {embedding_dim} dims: {e}"
            ))
        })?;
        Ok(Self { matrix })
    }

    /// Render one prompt per label with `template` and encode them all.
    pub fn encode_all(
        labels: &LabelSet,
        template: &str,
        text_encoder: &TextEncoder,
    ) -> ClassifyResult<Self> {
        let prompts = labels.prompts(template);
        let embedding_dim = text_encoder.embedding_dim();
        let mut matrix: Vec<f32> = Vec::with_capacity(prompts.len() * embedding_dim);

        tracing::info!("Encoding {} label prompts...", prompts.len());

        for chunk in prompts.chunks(ENCODE_BATCH_SIZE) {
            for emb in text_encoder.encode_batch(chunk)? {
                matrix.extend_from_slice(&emb);
            }
        }

        let bank = Self::from_raw(matrix, embedding_dim, prompts.len())?;
        tracing::info!(
            "Label bank ready: {} labels x {} dims",
            bank.label_count(),
            bank.embedding_dim()
        );
        Ok(bank)
    }

    pub fn label_count(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn embedding_dim(&self) -> usize {
        self.matrix.ncols()
    }

    pub fn matrix(&self) -> ArrayView2<'_, f32> {
        self.matrix.view()
    }
}
