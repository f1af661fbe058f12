//! # Scrawl OCR
//!
//! A Rust library that segments and recognizes handwritten quiz answers.
//! Given a base64-encoded bitmap of a handwritten answer, it detects ink
//! regions, normalizes each region into a fixed-size patch, classifies the
//! patches through a trained ONNX model, and returns ranked character
//! candidates with confidence scores per region.
//!
//! ## Features
//!
//! - Edge detection and contour-based region extraction
//! - Iterative bounding-box merging to reassemble split characters
//! - Fixed 64x64 patch normalization matching the classifier's input contract
//! - Single batched inference call per submission via ONNX Runtime
//! - Ranked top-20 label candidates per character, decoded from a persisted
//!   label vocabulary
//! - Answer grading against an expected string with a confidence floor
//!
//! ## Modules
//!
//! * [`core`] - Error handling, tensors, configuration, and the classifier seam
//! * [`processors`] - Geometry, segmentation, patch normalization, label decoding
//! * [`predictor`] - Batched character recognition
//! * [`pipeline`] - The submission pipeline and answer grading
//! * [`utils`] - Payload decoding helpers
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scrawl_ocr::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = EngineConfig::new("models/classifier.onnx", "models/labels.json");
//! let pipeline = SubmitPipeline::from_config(&config)?;
//!
//! let result = pipeline.submit("data:image/png;base64,iVBORw0KGgo...")?;
//! println!("best guess: {}", result.value);
//!
//! let grader = AnswerGrader::default();
//! let correct = grader.grade_written(&result, "cat");
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod pipeline;
pub mod predictor;
pub mod processors;
pub mod utils;

/// Prelude module for convenient imports.
///
/// Bring the essentials into scope with a single use statement:
///
/// ```rust
/// use scrawl_ocr::prelude::*;
/// ```
///
/// Included items focus on the most common tasks: running submissions
/// (`SubmitPipeline`, `RecognitionContext`, `RecognitionResult`), grading
/// (`AnswerGrader`), configuration (`EngineConfig`), and the essential
/// error types (`OcrError`, `OcrResult`).
pub mod prelude {
    pub use crate::core::{EngineConfig, OcrError, OcrResult};
    pub use crate::pipeline::{
        AnswerGrader, RecognitionContext, RecognitionResult, SubmitPipeline,
    };
    pub use crate::predictor::RegionPrediction;
}
