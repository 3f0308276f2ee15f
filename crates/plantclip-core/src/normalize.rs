//! Turns raw classifier output into a [`Classification`].
//!
//! Every shape in [`RawPrediction`] is handled here. Class indices are
//! bounds-checked against the label set before any label is looked up.

use std::collections::HashSet;

use serde_json::Value;

use crate::error::{ClassifyError, ClassifyResult};
use crate::labels::LabelSet;
use crate::prediction::RawPrediction;
use crate::types::{Classification, RankedLabel};

/// Normalize the result of a single-label classification.
///
/// `k` is clamped to the number of labels. The first ranked entry must name a
/// valid class; later out-of-range entries are dropped from `top_k`.
pub fn normalize_single(
    raw: RawPrediction,
    labels: &LabelSet,
    k: usize,
) -> ClassifyResult<Classification> {
    match raw {
        RawPrediction::Ranked(source) => {
            let pairs = source.top_k(k.min(labels.len()))?.into_pairs();
            tracing::debug!("Top-k pairs: {:?}", pairs);

            let &(top_idx, top_score) = pairs.first().ok_or(ClassifyError::NoPredictions)?;
            let prediction = labels
                .get(top_idx)
                .ok_or(ClassifyError::IndexOutOfRange {
                    index: top_idx,
                    max: labels.len().saturating_sub(1),
                })?
                .to_string();

            let top_k = pairs
                .into_iter()
                .filter_map(|(idx, score)| {
                    labels.get(idx).map(|plant| RankedLabel {
                        plant: plant.to_string(),
                        confidence: score,
                    })
                })
                .collect();

            tracing::info!("Top prediction: {} ({:.4})", prediction, top_score);

            Ok(Classification {
                prediction,
                confidence: top_score,
                top_k,
            })
        }
        RawPrediction::Mapping(map) => {
            let prediction = map
                .get("prediction")
                .and_then(Value::as_str)
                .unwrap_or("Unknown")
                .to_string();
            let confidence = map
                .get("confidence")
                .and_then(Value::as_f64)
                .unwrap_or(0.0) as f32;

            tracing::warn!(
                "Classifier returned a mapping instead of ranked results: {} ({})",
                prediction,
                confidence
            );

            Ok(Classification {
                top_k: vec![RankedLabel {
                    plant: prediction.clone(),
                    confidence,
                }],
                prediction,
                confidence,
            })
        }
        RawPrediction::Unsupported(desc) => {
            tracing::error!("Unexpected results structure: {}", desc);
            Err(ClassifyError::UnexpectedShape(desc))
        }
    }
}

/// Normalize a zero-shot classification restricted to `prompts`.
///
/// Ranks `candidates` classes (clamped to the label count), keeps those whose
/// label is one of `prompts`, and returns at most `k` of them.
pub fn normalize_zero_shot(
    raw: RawPrediction,
    labels: &LabelSet,
    prompts: &[String],
    candidates: usize,
    k: usize,
) -> ClassifyResult<Classification> {
    let source = match raw {
        RawPrediction::Ranked(source) => source,
        other => {
            tracing::warn!("Zero-shot classification needs ranked results, got {:?}", other);
            return Err(ClassifyError::NoMatchingPredictions);
        }
    };

    let wanted: HashSet<&str> = prompts.iter().map(String::as_str).collect();
    let top_k: Vec<RankedLabel> = source
        .top_k(candidates.min(labels.len()))?
        .into_pairs()
        .into_iter()
        .filter_map(|(idx, score)| {
            let plant = labels.get(idx)?;
            wanted.contains(plant).then(|| RankedLabel {
                plant: plant.to_string(),
                confidence: score,
            })
        })
        .take(k)
        .collect();

    Classification::from_ranked(top_k).ok_or(ClassifyError::NoMatchingPredictions)
}
