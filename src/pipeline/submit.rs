//! The handwritten-answer submission pipeline.
//!
//! This module provides the public entry point: decode the submitted
//! payload, extract character regions, normalize them into patches, run
//! one batched classification, and assemble ranked candidates per region.
//!
//! The classifier and vocabulary live in a [`RecognitionContext`] that is
//! loaded once and shared read-only across submissions, so independent
//! submissions can run concurrently on separate worker threads.

use crate::core::batch::stack_patches;
use crate::core::config::EngineConfig;
use crate::core::errors::OcrResult;
use crate::core::inference::{CharClassifier, OrtClassifier};
use crate::predictor::{Recognizer, RegionPrediction};
use crate::processors::{LabelVocabulary, PatchNormalizer, RegionExtractor};
use crate::utils::decode_payload;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Process-wide recognition state: the trained classifier and the label
/// vocabulary.
///
/// Loaded once (at startup or lazily on first use by the caller) and
/// read-only afterwards. Cloning shares the underlying classifier.
#[derive(Debug, Clone)]
pub struct RecognitionContext {
    /// The trained classifier.
    classifier: Arc<dyn CharClassifier>,
    /// The class-id to character mapping.
    vocabulary: LabelVocabulary,
}

impl RecognitionContext {
    /// Loads the context from persisted artifacts.
    ///
    /// # Arguments
    ///
    /// * `config` - The engine configuration naming the artifact paths.
    ///
    /// # Errors
    ///
    /// Returns `OcrError::ModelUnavailable` when either artifact cannot be
    /// loaded; submissions must not be accepted until this succeeds.
    pub fn load(config: &EngineConfig) -> OcrResult<Self> {
        config.validate()?;
        let classifier = OrtClassifier::load(&config.model_path)?;
        let vocabulary = LabelVocabulary::from_file(&config.labels_path)?;
        info!(
            model = %config.model_path.display(),
            classes = vocabulary.len(),
            "recognition context loaded"
        );
        Ok(Self {
            classifier: Arc::new(classifier),
            vocabulary,
        })
    }

    /// Builds a context from already-constructed parts.
    ///
    /// This is the injection seam: tests supply a fake classifier and a
    /// small vocabulary instead of a persisted artifact.
    pub fn from_parts(classifier: Arc<dyn CharClassifier>, vocabulary: LabelVocabulary) -> Self {
        Self {
            classifier,
            vocabulary,
        }
    }
}

/// The recognition result for one submission.
///
/// Region indices follow left-to-right reading order. Serialization
/// mirrors the wire shape the study application consumes:
/// `{ "value": ..., "results": { "<idx>": { "labels": [...], "accuracy": [...] } } }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionResult {
    /// Best guess: the top-1 label of each region, concatenated in
    /// reading order.
    pub value: String,
    /// Ranked candidates per region, keyed by region index.
    #[serde(rename = "results")]
    pub regions: BTreeMap<usize, RegionPrediction>,
}

impl RecognitionResult {
    /// The empty-result sentinel returned when no ink regions survive.
    ///
    /// Distinguishable from an error: the submission decoded fine and
    /// simply contained no answer.
    pub fn empty() -> Self {
        Self {
            value: String::new(),
            regions: BTreeMap::new(),
        }
    }

    /// Whether this is the empty-result sentinel.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Assembles a result from per-region predictions in reading order.
    pub fn from_predictions(predictions: Vec<RegionPrediction>) -> Self {
        let value = predictions
            .iter()
            .filter_map(|p| p.labels.first())
            .collect();
        let regions = predictions.into_iter().enumerate().collect();
        Self { value, regions }
    }
}

/// The handwritten-answer submission pipeline.
///
/// Holds no mutable state; a single instance can serve concurrent
/// submissions.
#[derive(Debug)]
pub struct SubmitPipeline {
    /// Region segmentation stage.
    extractor: RegionExtractor,
    /// Patch normalization stage.
    normalizer: PatchNormalizer,
    /// Batched recognition stage.
    recognizer: Recognizer,
}

impl SubmitPipeline {
    /// Creates a pipeline with default stage parameters.
    ///
    /// # Arguments
    ///
    /// * `context` - The loaded recognition context.
    pub fn new(context: RecognitionContext) -> Self {
        Self {
            extractor: RegionExtractor::default(),
            normalizer: PatchNormalizer::default(),
            recognizer: Recognizer::new(context.classifier, context.vocabulary, None),
        }
    }

    /// Creates a pipeline from a configuration, loading the artifacts.
    ///
    /// # Arguments
    ///
    /// * `config` - The engine configuration.
    pub fn from_config(config: &EngineConfig) -> OcrResult<Self> {
        let context = RecognitionContext::load(config)?;
        Ok(Self {
            extractor: RegionExtractor::default(),
            normalizer: PatchNormalizer::new(config.parallel_threshold),
            recognizer: Recognizer::new(
                context.classifier,
                context.vocabulary,
                Some(config.top_k),
            ),
        })
    }

    /// Processes one submitted answer.
    ///
    /// # Arguments
    ///
    /// * `payload` - A base64-encoded bitmap, optionally carrying the PNG
    ///   data-URI header.
    ///
    /// # Returns
    ///
    /// The recognition result; the empty sentinel when no ink regions
    /// survive extraction.
    ///
    /// # Errors
    ///
    /// * `OcrError::BadInput` for undecodable payloads.
    /// * `OcrError::Inference` and friends for classifier failures.
    pub fn submit(&self, payload: &str) -> OcrResult<RecognitionResult> {
        let image = decode_payload(payload)?;
        debug!(
            width = image.width(),
            height = image.height(),
            "payload decoded"
        );

        let regions = self.extractor.extract(&image);
        if regions.is_empty() {
            info!("no ink regions detected, returning empty result");
            return Ok(RecognitionResult::empty());
        }
        debug!(regions = regions.len(), "regions extracted");

        let patches = self.normalizer.normalize_all(&image, &regions);
        if patches.len() < regions.len() {
            warn!(
                dropped = regions.len() - patches.len(),
                "degenerate crops dropped"
            );
        }
        if patches.is_empty() {
            return Ok(RecognitionResult::empty());
        }

        let batch = stack_patches(&patches)?;
        let predictions = self.recognizer.recognize(&batch)?;
        info!(regions = predictions.len(), "submission recognized");

        Ok(RecognitionResult::from_predictions(predictions))
    }
}
