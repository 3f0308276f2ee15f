//! Scoring of image embeddings against the label bank.
//!
//! Computes cosine similarity between one image embedding and every label
//! embedding, then turns the similarities into a probability distribution
//! with CLIP's temperature-scaled softmax.

use ndarray::ArrayView1;

use crate::error::{ClassifyError, ClassifyResult};
use crate::math::scaled_softmax;

use super::label_bank::LabelBank;

/// Scores images against every label via matrix-vector multiplication.
pub struct ClipScorer {
    label_bank: LabelBank,
    logit_scale: f32,
}

impl ClipScorer {
    pub fn new(label_bank: LabelBank, logit_scale: f32) -> Self {
        Self {
            label_bank,
            logit_scale,
        }
    }

    /// Score an image embedding against all labels.
    ///
    /// Both sides are L2-normalized, so the dot product is the cosine
    /// similarity. Returns one probability per label, in label order.
    pub fn score(&self, image_embedding: &[f32]) -> ClassifyResult<Vec<f32>> {
        let dim = self.label_bank.embedding_dim();
        if image_embedding.len() != dim {
            return Err(ClassifyError::inference(format!(
                "Image embedding has {} dims, label bank expects {}",
                image_embedding.len(),
                dim
            )));
        }

        let cosines = self
            .label_bank
            .matrix()
            .dot(&ArrayView1::from(image_embedding));

        Ok(scaled_softmax(&cosines.to_vec(), self.logit_scale))
    }

    pub fn label_count(&self) -> usize {
        self.label_bank.label_count()
    }
}
