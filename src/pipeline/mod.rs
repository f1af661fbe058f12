//! The submission pipeline and answer grading.
//!
//! This module combines the processing stages into the public entry point
//! for handwritten-answer submissions, and provides the grading comparison
//! the study application runs on top of the recognition results.

pub mod grading;
pub mod submit;

pub use grading::{AnswerGrader, DEFAULT_MINIMUM_ACCURACY};
pub use submit::{RecognitionContext, RecognitionResult, SubmitPipeline};
