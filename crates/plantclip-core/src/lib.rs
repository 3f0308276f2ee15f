//! PlantCLIP Core - plant species classification behind a stable contract.
//!
//! The library owns everything between an image path and a normalized
//! [`Classification`]: configuration, input validation, the lazily loaded
//! BioCLIP model and the normalization of whatever result shape the model
//! produces.
//!
//! ```text
//! path → Validate → Decode → Classifier (BioCLIP, ONNX) → Normalize → Classification
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use plantclip_core::{ClassificationService, Config};
//!
//! #[tokio::main]
//! async fn main() -> plantclip_core::Result<()> {
//!     let config = Config::load()?;
//!     let service = ClassificationService::new(&config);
//!
//!     let result = service.classify("./monstera.jpg").await?;
//!     println!("{} ({:.2})", result.prediction, result.confidence);
//!     Ok(())
//! }
//! ```

pub mod bioclip;
pub mod config;
pub mod embedding;
pub mod error;
pub mod labels;
pub mod math;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod prediction;
mod runtime;
pub mod service;
pub mod types;

pub use bioclip::BioClipModel;
pub use config::Config;
pub use error::{
    ClassifierError, ClassifyError, ClassifyResult, ConfigError, PlantClipError, Result,
};
pub use labels::{LabelSet, PLANT_CLASSES};
pub use model::{Classifier, LazyModel, ModelInfo};
pub use prediction::{Classifications, RawPrediction, TopK, TopKSource};
pub use service::{ClassificationService, ModelReport};
pub use types::{Classification, RankedLabel};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
