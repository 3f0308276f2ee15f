//! Raw result shapes a classifier backend may return.
//!
//! Backends are not required to agree on one output type. The normalizer in
//! [`crate::normalize`] turns every shape listed here into a
//! [`Classification`](crate::types::Classification).

use std::fmt;

use crate::error::ClassifierError;

/// What a `predict` call handed back.
pub enum RawPrediction {
    /// An object exposing a top-k accessor.
    Ranked(Box<dyn TopKSource>),

    /// A keyed mapping, expected to carry `prediction` and `confidence`.
    Mapping(serde_json::Map<String, serde_json::Value>),

    /// Anything else. The string describes what was received.
    Unsupported(String),
}

impl fmt::Debug for RawPrediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ranked(_) => f.write_str("Ranked(..)"),
            Self::Mapping(map) => f.debug_tuple("Mapping").field(map).finish(),
            Self::Unsupported(desc) => f.debug_tuple("Unsupported").field(desc).finish(),
        }
    }
}

/// Result objects that can rank their own classes.
pub trait TopKSource: Send {
    /// Return up to `k` of the highest-confidence classes.
    fn top_k(&self, k: usize) -> Result<TopK, ClassifierError>;
}

/// The two shapes a top-k accessor may answer with.
#[derive(Debug, Clone, PartialEq)]
pub enum TopK {
    /// Parallel arrays of class indices and confidences.
    Arrays {
        class_ids: Vec<i64>,
        confidences: Vec<f32>,
    },

    /// A list of `(class index, confidence)` pairs.
    Pairs(Vec<(i64, f32)>),
}

impl TopK {
    /// Flatten either shape into `(index, score)` pairs.
    ///
    /// Arrays are zipped, so a trailing surplus in the longer one is dropped.
    pub fn into_pairs(self) -> Vec<(i64, f32)> {
        match self {
            Self::Arrays {
                class_ids,
                confidences,
            } => class_ids.into_iter().zip(confidences).collect(),
            Self::Pairs(pairs) => pairs,
        }
    }
}

/// Per-class confidences for one image.
#[derive(Debug, Clone, PartialEq)]
pub struct Classifications {
    pub class_id: Vec<i64>,
    pub confidence: Vec<f32>,
}

impl Classifications {
    /// One confidence per class, indexed by position.
    pub fn from_scores(scores: Vec<f32>) -> Self {
        Self {
            class_id: (0..scores.len() as i64).collect(),
            confidence: scores,
        }
    }

    pub fn len(&self) -> usize {
        self.class_id.len().min(self.confidence.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TopKSource for Classifications {
    fn top_k(&self, k: usize) -> Result<TopK, ClassifierError> {
        let mut order: Vec<usize> = (0..self.len()).collect();
        // Stable sort keeps class order among equal confidences.
        order.sort_by(|&a, &b| self.confidence[b].total_cmp(&self.confidence[a]));
        order.truncate(k);

        Ok(TopK::Arrays {
            class_ids: order.iter().map(|&i| self.class_id[i]).collect(),
            confidences: order.iter().map(|&i| self.confidence[i]).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_k_sorted_descending() {
        let scores = Classifications::from_scores(vec![0.1, 0.6, 0.05, 0.25]);
        let top = scores.top_k(3).unwrap();
        assert_eq!(
            top,
            TopK::Arrays {
                class_ids: vec![1, 3, 0],
                confidences: vec![0.6, 0.25, 0.1],
            }
        );
    }

    #[test]
    fn test_top_k_larger_than_classes() {
        let scores = Classifications::from_scores(vec![0.3, 0.7]);
        let pairs = scores.top_k(10).unwrap().into_pairs();
        assert_eq!(pairs, vec![(1, 0.7), (0, 0.3)]);
    }

    #[test]
    fn test_top_k_ties_keep_class_order() {
        let scores = Classifications::from_scores(vec![0.5, 0.5, 0.5]);
        let pairs = scores.top_k(3).unwrap().into_pairs();
        let ids: Vec<i64> = pairs.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_arrays_zip_drops_surplus() {
        let top = TopK::Arrays {
            class_ids: vec![4, 2, 9],
            confidences: vec![0.8, 0.1],
        };
        assert_eq!(top.into_pairs(), vec![(4, 0.8), (2, 0.1)]);
    }
}
