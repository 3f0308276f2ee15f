//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be > 0".into(),
            ));
        }
        if self.model.image_size == 0 {
            return Err(ConfigError::ValidationError(
                "model.image_size must be > 0".into(),
            ));
        }
        if self.model.context_length == 0 {
            return Err(ConfigError::ValidationError(
                "model.context_length must be > 0".into(),
            ));
        }
        if self.model.embedding_dim == 0 {
            return Err(ConfigError::ValidationError(
                "model.embedding_dim must be > 0".into(),
            ));
        }
        if !(self.model.logit_scale > 0.0) {
            return Err(ConfigError::ValidationError(
                "model.logit_scale must be > 0".into(),
            ));
        }
        if !self.model.prompt_template.contains("{}") {
            return Err(ConfigError::ValidationError(
                "model.prompt_template must contain a {} placeholder".into(),
            ));
        }
        if self.classify.top_k == 0 {
            return Err(ConfigError::ValidationError(
                "classify.top_k must be > 0".into(),
            ));
        }
        if self.classify.zero_shot_candidates < self.classify.top_k {
            return Err(ConfigError::ValidationError(
                "classify.zero_shot_candidates must be >= classify.top_k".into(),
            ));
        }
        if self.limits.max_file_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_file_size_mb must be > 0".into(),
            ));
        }
        if self.limits.decode_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.decode_timeout_ms must be > 0".into(),
            ));
        }
        if self.limits.predict_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.predict_timeout_ms must be > 0".into(),
            ));
        }
        Ok(())
    }
}
