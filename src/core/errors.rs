//! Error types for the recognition pipeline.
//!
//! This module defines the errors that can occur while processing a
//! submission, from payload decoding through segmentation, normalization,
//! and inference, along with utility constructors for creating them with
//! appropriate context.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type OcrResult<T> = Result<T, OcrError>;

/// Enum representing different stages of processing in the pipeline.
///
/// This enum is used to identify which stage an error occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    /// Error occurred while decoding the submitted payload.
    Decode,
    /// Error occurred during region segmentation.
    Segmentation,
    /// Error occurred during patch normalization.
    Normalization,
    /// Error occurred while assembling the inference batch.
    BatchAssembly,
    /// Error occurred while ranking and decoding model output.
    PostProcessing,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStage::Decode => write!(f, "payload decode"),
            ProcessingStage::Segmentation => write!(f, "segmentation"),
            ProcessingStage::Normalization => write!(f, "normalization"),
            ProcessingStage::BatchAssembly => write!(f, "batch assembly"),
            ProcessingStage::PostProcessing => write!(f, "post-processing"),
        }
    }
}

/// Enum representing the errors that can occur in the recognition pipeline.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The submitted payload could not be understood.
    ///
    /// Covers malformed base64, unexpected data-URI headers, and image
    /// bytes no decoder accepts. Never retried.
    #[error("bad input: {message}")]
    BadInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// The classifier or label vocabulary is not available.
    ///
    /// Raised when the model artifact or the label file cannot be loaded;
    /// the request fails fast and the caller must ensure the artifacts are
    /// in place before accepting submissions.
    #[error("model unavailable: {message}")]
    ModelUnavailable {
        /// A message describing the missing or unusable artifact.
        message: String,
    },

    /// Error occurred during a processing stage.
    #[error("{kind} failed: {context}")]
    Processing {
        /// The stage of processing where the error occurred.
        kind: ProcessingStage,
        /// Additional context about the error.
        context: String,
        /// The underlying error that caused this error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Error occurred during inference.
    #[error("inference")]
    Inference(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Error indicating a configuration problem.
    #[error("configuration: {message}")]
    Config {
        /// A message describing the configuration error.
        message: String,
    },

    /// Error from the ONNX Runtime session.
    #[error(transparent)]
    Session(#[from] ort::Error),

    /// Error from tensor operations.
    #[error("tensor operation")]
    Tensor(#[from] ndarray::ShapeError),

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

impl OcrError {
    /// Creates an OcrError for invalid input.
    ///
    /// # Arguments
    ///
    /// * `message` - A message describing the invalid input.
    pub fn bad_input(message: impl Into<String>) -> Self {
        Self::BadInput {
            message: message.into(),
        }
    }

    /// Creates an OcrError for a missing or unusable model artifact.
    ///
    /// # Arguments
    ///
    /// * `message` - A message describing the missing artifact.
    pub fn model_unavailable(message: impl Into<String>) -> Self {
        Self::ModelUnavailable {
            message: message.into(),
        }
    }

    /// Creates an OcrError for inference operations.
    ///
    /// # Arguments
    ///
    /// * `error` - The underlying error that caused this error.
    pub fn inference_error(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Inference(Box::new(error))
    }

    /// Creates an OcrError for a processing stage.
    ///
    /// # Arguments
    ///
    /// * `kind` - The stage of processing where the error occurred.
    /// * `context` - Additional context about the error.
    /// * `error` - The underlying error that caused this error.
    pub fn processing_error(
        kind: ProcessingStage,
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Processing {
            kind,
            context: context.to_string(),
            source: Box::new(error),
        }
    }

    /// Creates an OcrError for batch assembly operations.
    ///
    /// # Arguments
    ///
    /// * `context` - Additional context about the error.
    /// * `error` - The underlying error that caused this error.
    pub fn batch_assembly(
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Processing {
            kind: ProcessingStage::BatchAssembly,
            context: context.to_string(),
            source: Box::new(error),
        }
    }
}

/// A minimal string-backed error for wrapping plain messages as error
/// sources.
#[derive(Debug)]
pub struct SimpleError {
    message: String,
}

impl SimpleError {
    /// Creates a new SimpleError with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for SimpleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SimpleError {}

impl From<crate::core::config::ConfigError> for OcrError {
    fn from(error: crate::core::config::ConfigError) -> Self {
        Self::Config {
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_input_carries_message() {
        let err = OcrError::bad_input("truncated base64");
        assert_eq!(err.to_string(), "bad input: truncated base64");
    }

    #[test]
    fn processing_error_reports_stage() {
        let err = OcrError::processing_error(
            ProcessingStage::BatchAssembly,
            "patch 2 has the wrong shape",
            SimpleError::new("expected (64, 64, 3)"),
        );
        assert_eq!(
            err.to_string(),
            "batch assembly failed: patch 2 has the wrong shape"
        );
    }
}
