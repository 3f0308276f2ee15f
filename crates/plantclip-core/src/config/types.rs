//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,

    /// Port to bind
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

impl ServerConfig {
    /// `host:port`, with IPv6 hosts bracketed.
    pub fn address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

/// BioCLIP model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Directory holding the exported encoders and tokenizer
    pub model_dir: PathBuf,

    /// Vision encoder filename inside `model_dir`
    pub visual_model: String,

    /// Text encoder filename inside `model_dir`
    pub text_model: String,

    /// Tokenizer filename inside `model_dir`
    pub tokenizer: String,

    /// Square input size expected by the vision encoder
    pub image_size: u32,

    /// Token sequence length expected by the text encoder
    pub context_length: usize,

    /// Width of the shared image/text embedding space
    pub embedding_dim: usize,

    /// Multiplier applied to cosine similarities before softmax
    pub logit_scale: f32,

    /// Caption rendered for every label; `{}` is replaced by the label
    pub prompt_template: String,

    /// Name of the vision encoder's embedding output
    pub image_output: String,

    /// Name of the text encoder's embedding output
    pub text_output: String,

    /// Keep inference on the CPU even when an accelerator is available
    pub use_cpu: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("~/.plantclip/models/bioclip"),
            visual_model: "visual.onnx".to_string(),
            text_model: "text_model.onnx".to_string(),
            tokenizer: "tokenizer.json".to_string(),
            image_size: 224,
            context_length: 77,
            embedding_dim: 512,
            logit_scale: 100.0,
            prompt_template: "This is a photo of a {}".to_string(),
            image_output: "image_embeds".to_string(),
            text_output: "text_embeds".to_string(),
            use_cpu: true,
        }
    }
}

/// Ranking settings for the classify endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifyConfig {
    /// Number of ranked labels returned per image
    pub top_k: usize,

    /// Number of classes ranked before the zero-shot prompt filter
    pub zero_shot_candidates: usize,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            zero_shot_candidates: 10,
        }
    }
}

/// Resource limits to protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum file size in megabytes
    pub max_file_size_mb: u64,

    /// Decode timeout in milliseconds
    pub decode_timeout_ms: u64,

    /// Prediction timeout in milliseconds
    pub predict_timeout_ms: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 50,
            decode_timeout_ms: 5000,
            predict_timeout_ms: 30000,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server(host: &str) -> ServerConfig {
        ServerConfig {
            host: host.to_string(),
            port: 5000,
        }
    }

    #[test]
    fn test_address_formats() {
        assert_eq!(server("127.0.0.1").address(), "127.0.0.1:5000");
        assert_eq!(server("localhost").address(), "localhost:5000");
        assert_eq!(server("::1").address(), "[::1]:5000");
        assert_eq!(server("[::1]").address(), "[::1]:5000");
    }
}
