//! Core data types returned by the classifier.
//!
//! These are the stable wire shapes; the HTTP layer wraps them in its
//! success/error envelopes.

use serde::{Deserialize, Serialize};

/// One ranked plant label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedLabel {
    /// Human-readable label
    pub plant: String,

    /// Confidence score from the model
    pub confidence: f32,
}

/// The normalized outcome of classifying one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Best label
    pub prediction: String,

    /// Confidence of the best label
    pub confidence: f32,

    /// Ranked labels, best first
    pub top_k: Vec<RankedLabel>,
}

impl Classification {
    /// Build a classification whose prediction is the first ranked label.
    ///
    /// Returns `None` when `top_k` is empty.
    pub fn from_ranked(top_k: Vec<RankedLabel>) -> Option<Self> {
        let first = top_k.first()?.clone();
        Some(Self {
            prediction: first.plant,
            confidence: first.confidence,
            top_k,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_serializes_wire_names() {
        let c = Classification::from_ranked(vec![RankedLabel {
            plant: "Tulip".to_string(),
            confidence: 0.5,
        }])
        .unwrap();
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["prediction"], "Tulip");
        assert_eq!(json["confidence"], 0.5);
        assert_eq!(json["top_k"][0]["plant"], "Tulip");
    }

    #[test]
    fn test_from_ranked_empty_is_none() {
        assert!(Classification::from_ranked(vec![]).is_none());
    }
}
