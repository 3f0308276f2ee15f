//! BioCLIP text encoder for generating prompt embeddings.
//!
//! Loads the text tower ONNX model and its tokenizer, and encodes prompts into
//! vectors aligned with the vision encoder's space.

use std::path::Path;
use std::sync::Mutex;

use ort::session::Session;
use ort::value::Value;

use crate::error::{ClassifyError, ClassifyResult};

/// Text encoder wrapper.
///
/// Uses the same `Mutex<Session>` pattern as the vision encoder.
pub struct TextEncoder {
    session: Mutex<Session>,
    tokenizer: tokenizers::Tokenizer,
    output_name: String,
    context_length: usize,
    embedding_dim: usize,
    /// Whether the exported graph declares an `attention_mask` input.
    wants_attention_mask: bool,
}

impl TextEncoder {
    /// Load the text encoder and tokenizer.
    pub fn load(
        model_path: &Path,
        tokenizer_path: &Path,
        output_name: &str,
        context_length: usize,
        embedding_dim: usize,
        use_cpu: bool,
    ) -> ClassifyResult<Self> {
        if !model_path.exists() {
            return Err(ClassifyError::model(format!(
                "Text encoder not found at {:?}. Check `plantclip models list`.",
                model_path
            )));
        }

        if !tokenizer_path.exists() {
            return Err(ClassifyError::model(format!(
                "Tokenizer not found at {:?}. Check `plantclip models list`.",
                tokenizer_path
            )));
        }

        let session = crate::runtime::open_session(model_path, use_cpu)?;

        let tokenizer = tokenizers::Tokenizer::from_file(tokenizer_path)
            .map_err(|e| ClassifyError::model(format!("Failed to load tokenizer: {e}")))?;

        let wants_attention_mask = session
            .inputs()
            .iter()
            .any(|i| i.name() == "attention_mask");

        tracing::debug!(
            "Loaded text encoder (inputs: {:?}, outputs: {:?})",
            session
                .inputs()
                .iter()
                .map(|i| i.name())
                .collect::<Vec<_>>(),
            session
                .outputs()
                .iter()
                .map(|o| o.name())
                .collect::<Vec<_>>()
        );

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            output_name: output_name.to_string(),
            context_length,
            embedding_dim,
            wants_attention_mask,
        })
    }

    /// Encode a batch of prompts to L2-normalized embeddings, one per prompt.
    pub fn encode_batch(&self, texts: &[String]) -> ClassifyResult<Vec<Vec<f32>>> {
        let batch_size = texts.len();
        if batch_size == 0 {
            return Ok(Vec::new());
        }

        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| ClassifyError::model(format!("Tokenization failed: {e}")))?;

        let (input_ids, attention_mask) =
            pack_tokens(encodings.iter().map(|e| e.get_ids()), self.context_length);

        let shape = vec![batch_size as i64, self.context_length as i64];

        let input_ids_value = Value::from_array((shape.clone(), input_ids)).map_err(|e| {
            ClassifyError::inference(format!("Failed to create input tensor: {e}"))
        })?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| ClassifyError::inference(format!("Text encoder lock poisoned: {e}")))?;

        let outputs = if self.wants_attention_mask {
            let mask_value = Value::from_array((shape, attention_mask)).map_err(|e| {
                ClassifyError::inference(format!("Failed to create attention mask: {e}"))
            })?;
            session.run(ort::inputs![
                "input_ids" => input_ids_value,
                "attention_mask" => mask_value
            ])
        } else {
            session.run(ort::inputs!["input_ids" => input_ids_value])
        }
        .map_err(|e| ClassifyError::inference(format!("Text encoder inference failed: {e}")))?;

        let embeds = outputs
            .iter()
            .find(|(name, _)| *name == self.output_name)
            .ok_or_else(|| {
                ClassifyError::inference(format!(
                    "Text encoder did not produce {}",
                    self.output_name
                ))
            })?;

        let (_shape, data) = embeds.1.try_extract_tensor::<f32>().map_err(|e| {
            ClassifyError::inference(format!("Failed to extract {}: {e}", self.output_name))
        })?;

        if data.len() != batch_size * self.embedding_dim {
            return Err(ClassifyError::inference(format!(
                "Text encoder returned {} values for {} prompts of dim {}",
                data.len(),
                batch_size,
                self.embedding_dim
            )));
        }

        Ok(data
            .chunks(self.embedding_dim)
            .map(crate::math::l2_normalize)
            .collect())
    }

    /// Width of each prompt embedding.
    pub fn embedding_dim(&self) -> usize {
        self.embedding_dim
    }
}

/// Pack token id sequences into flat, zero-padded `input_ids` and
/// `attention_mask` buffers of `batch × context_length`.
///
/// Sequences longer than the context are truncated.
fn pack_tokens<'a, I>(sequences: I, context_length: usize) -> (Vec<i64>, Vec<i64>)
where
    I: ExactSizeIterator<Item = &'a [u32]>,
{
    let batch_size = sequences.len();
    let mut input_ids = vec![0i64; batch_size * context_length];
    let mut attention_mask = vec![0i64; batch_size * context_length];

    for (i, ids) in sequences.enumerate() {
        for (j, &id) in ids.iter().take(context_length).enumerate() {
            input_ids[i * context_length + j] = id as i64;
            attention_mask[i * context_length + j] = 1;
        }
    }

    (input_ids, attention_mask)
}
