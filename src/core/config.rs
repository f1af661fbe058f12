//! Configuration for the recognition engine.
//!
//! This module provides the configuration consumed when constructing a
//! [`crate::pipeline::SubmitPipeline`]: paths to the classifier artifact
//! and the persisted label list, plus the tunable thresholds the pipeline
//! honors. Configurations can be built in code or deserialized from JSON.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when validating a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration contains an invalid value.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// A message describing the invalid value.
        message: String,
    },
}

/// Configuration for the recognition engine.
///
/// Holds the artifact paths required to load the classifier and label
/// vocabulary, along with optional knobs that default to the values the
/// grading application was built around.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Path to the trained classifier artifact (ONNX).
    pub model_path: PathBuf,
    /// Path to the persisted label list (JSON array of integer codepoints).
    pub labels_path: PathBuf,
    /// Number of ranked label candidates returned per region.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Confidence floor used when grading written answers.
    #[serde(default = "default_minimum_accuracy")]
    pub minimum_accuracy: f32,
    /// Region count above which patch normalization runs in parallel.
    #[serde(default)]
    pub parallel_threshold: Option<usize>,
}

fn default_top_k() -> usize {
    crate::predictor::DEFAULT_TOP_K
}

fn default_minimum_accuracy() -> f32 {
    crate::pipeline::DEFAULT_MINIMUM_ACCURACY
}

impl EngineConfig {
    /// Creates a new EngineConfig with the required artifact paths.
    ///
    /// Optional knobs are initialized to their defaults.
    ///
    /// # Arguments
    ///
    /// * `model_path` - Path to the classifier artifact.
    /// * `labels_path` - Path to the persisted label list.
    pub fn new(model_path: impl Into<PathBuf>, labels_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            labels_path: labels_path.into(),
            top_k: default_top_k(),
            minimum_accuracy: default_minimum_accuracy(),
            parallel_threshold: None,
        }
    }

    /// Loads a configuration from a JSON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, crate::core::OcrError> {
        let file = std::fs::File::open(path.as_ref())?;
        let config: Self = serde_json::from_reader(file).map_err(|e| ConfigError::InvalidConfig {
            message: format!(
                "failed to parse '{}': {}",
                path.as_ref().display(),
                e
            ),
        })?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// * Either artifact path is empty
    /// * `top_k` is zero
    /// * `minimum_accuracy` is outside [0, 1]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidConfig {
                message: "model path must not be empty".to_string(),
            });
        }

        if self.labels_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidConfig {
                message: "labels path must not be empty".to_string(),
            });
        }

        if self.top_k == 0 {
            return Err(ConfigError::InvalidConfig {
                message: "top_k must be greater than 0".to_string(),
            });
        }

        if !(0.0..=1.0).contains(&self.minimum_accuracy) {
            return Err(ConfigError::InvalidConfig {
                message: format!(
                    "minimum_accuracy must be within [0, 1], got {}",
                    self.minimum_accuracy
                ),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = EngineConfig::new("ocr.onnx", "labels.json");
        assert_eq!(config.top_k, 20);
        assert_eq!(config.minimum_accuracy, 0.1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_empty_model_path() {
        let config = EngineConfig::new("", "labels.json");
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_top_k() {
        let mut config = EngineConfig::new("ocr.onnx", "labels.json");
        config.top_k = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_accuracy_floor() {
        let mut config = EngineConfig::new("ocr.onnx", "labels.json");
        config.minimum_accuracy = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn deserializes_with_defaulted_knobs() {
        let config: EngineConfig = serde_json::from_str(
            r#"{ "model_path": "ocr.onnx", "labels_path": "labels.json" }"#,
        )
        .unwrap();
        assert_eq!(config.top_k, 20);
        assert_eq!(config.minimum_accuracy, 0.1);
        assert_eq!(config.parallel_threshold, None);
    }
}
