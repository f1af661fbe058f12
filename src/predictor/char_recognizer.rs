//! Batched character recognition.
//!
//! The recognizer wraps the trained classifier and the label vocabulary.
//! All patches of a submission go through a single batched inference call,
//! and each probability row is ranked into an ordered top-K candidate list
//! with the class ids decoded back to characters.

use crate::core::batch::Tensor4D;
use crate::core::errors::{OcrError, OcrResult, SimpleError};
use crate::core::inference::CharClassifier;
use crate::processors::label_decode::LabelVocabulary;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Number of ranked label candidates returned per region.
pub const DEFAULT_TOP_K: usize = 20;

/// Ranked label candidates for one character region.
///
/// `labels` and `accuracy` are rank-aligned: `accuracy[i]` is the
/// confidence of `labels[i]`, and confidences are non-increasing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionPrediction {
    /// Candidate characters, best first.
    pub labels: Vec<char>,
    /// Confidence for each candidate, same order as `labels`.
    pub accuracy: Vec<f32>,
}

/// Recognizes characters from normalized patch batches.
#[derive(Debug)]
pub struct Recognizer {
    /// The trained classifier.
    classifier: Arc<dyn CharClassifier>,
    /// The class-id to character mapping.
    vocabulary: LabelVocabulary,
    /// Number of ranked candidates kept per region.
    top_k: usize,
}

impl Recognizer {
    /// Creates a new Recognizer.
    ///
    /// # Arguments
    ///
    /// * `classifier` - The trained classifier.
    /// * `vocabulary` - The label vocabulary.
    /// * `top_k` - Ranked candidates kept per region (default: 20).
    pub fn new(
        classifier: Arc<dyn CharClassifier>,
        vocabulary: LabelVocabulary,
        top_k: Option<usize>,
    ) -> Self {
        Self {
            classifier,
            vocabulary,
            top_k: top_k.unwrap_or(DEFAULT_TOP_K),
        }
    }

    /// Recognizes every patch in a batch.
    ///
    /// Runs exactly one classifier call for the whole batch and ranks each
    /// probability row independently. Row order, and therefore region
    /// order, is preserved.
    ///
    /// # Arguments
    ///
    /// * `batch` - Normalized patches, shape (N, 64, 64, 3).
    ///
    /// # Returns
    ///
    /// One prediction per patch, in batch order.
    pub fn recognize(&self, batch: &Tensor4D) -> OcrResult<Vec<RegionPrediction>> {
        if batch.shape()[0] == 0 {
            return Ok(Vec::new());
        }

        let probabilities = self.classifier.predict(batch)?;

        if probabilities.ncols() != self.vocabulary.len() {
            return Err(OcrError::inference_error(SimpleError::new(format!(
                "classifier emits {} classes but the vocabulary holds {}",
                probabilities.ncols(),
                self.vocabulary.len()
            ))));
        }

        probabilities
            .rows()
            .into_iter()
            .map(|row| self.rank_row(row.iter().copied()))
            .collect()
    }

    /// Ranks one probability row into an ordered candidate list.
    fn rank_row(&self, row: impl Iterator<Item = f32>) -> OcrResult<RegionPrediction> {
        let ranked = row
            .enumerate()
            .sorted_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal))
            .take(self.top_k);

        let mut labels = Vec::with_capacity(self.top_k);
        let mut accuracy = Vec::with_capacity(self.top_k);
        for (class_id, probability) in ranked {
            let label = self.vocabulary.decode(class_id).ok_or_else(|| {
                OcrError::inference_error(SimpleError::new(format!(
                    "class id {} has no label",
                    class_id
                )))
            })?;
            labels.push(label);
            accuracy.push(probability);
        }

        Ok(RegionPrediction { labels, accuracy })
    }
}
