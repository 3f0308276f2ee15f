//! BioCLIP vision encoder session management and inference.
//!
//! Loads the vision tower exported to ONNX format and runs inference to
//! produce image embeddings in the shared image/text space.

use std::path::Path;
use std::sync::Mutex;

use ndarray::Array4;
use ort::session::Session;
use ort::value::Value;

use crate::error::{ClassifyError, ClassifyResult};

/// Wraps an ONNX Runtime session for the vision encoder.
///
/// Uses a `Mutex` because `Session::run` requires `&mut self`.
pub struct VisualSession {
    session: Mutex<Session>,
    /// Name of the input tensor (detected from model metadata).
    input_name: String,
    /// Name of the embedding output to read.
    output_name: String,
}

impl VisualSession {
    /// Load a vision encoder from an ONNX file.
    pub fn load(model_path: &Path, output_name: &str, use_cpu: bool) -> ClassifyResult<Self> {
        let session = crate::runtime::open_session(model_path, use_cpu)?;

        let input_name = session
            .inputs()
            .first()
            .map(|i| i.name().to_string())
            .unwrap_or_else(|| "pixel_values".to_string());

        tracing::debug!(
            "Loaded vision encoder from {:?} (input: {:?}, outputs: {:?})",
            model_path,
            input_name,
            session
                .outputs()
                .iter()
                .map(|o| o.name())
                .collect::<Vec<_>>()
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            output_name: output_name.to_string(),
        })
    }

    /// Run inference on a preprocessed image tensor and return the embedding.
    ///
    /// Input shape: \[1, 3, image_size, image_size\] (NCHW, CLIP-normalized).
    /// Output: L2-normalized embedding vector.
    pub fn embed(&self, preprocessed: &Array4<f32>) -> ClassifyResult<Vec<f32>> {
        let shape: Vec<i64> = preprocessed.shape().iter().map(|&d| d as i64).collect();
        let flat_data: Vec<f32> = preprocessed.iter().copied().collect();

        let input_value = Value::from_array((shape, flat_data)).map_err(|e| {
            ClassifyError::inference(format!("Failed to create input tensor: {e}"))
        })?;

        let inputs = ort::inputs![self.input_name.as_str() => input_value];

        let mut session = self
            .session
            .lock()
            .map_err(|e| ClassifyError::inference(format!("Session lock poisoned: {e}")))?;

        let outputs = session
            .run(inputs)
            .map_err(|e| ClassifyError::inference(format!("ONNX inference failed: {e}")))?;

        let embeds = outputs
            .iter()
            .find(|(name, _)| *name == self.output_name)
            .ok_or_else(|| {
                ClassifyError::inference(format!(
                    "Vision encoder did not produce {}",
                    self.output_name
                ))
            })?;

        let (shape, data) = embeds.1.try_extract_tensor::<f32>().map_err(|e| {
            ClassifyError::inference(format!("Failed to extract {}: {e}", self.output_name))
        })?;

        // [1, dim] for a single image.
        let mut raw = match shape.len() {
            1 => data.to_vec(),
            2 => {
                let dim = shape[1] as usize;
                data[..dim].to_vec()
            }
            _ => {
                return Err(ClassifyError::inference(format!(
                    "Unexpected {} shape: {:?}",
                    self.output_name, shape
                )));
            }
        };

        crate::math::l2_normalize_in_place(&mut raw);
        Ok(raw)
    }
}
