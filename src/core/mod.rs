//! The core module of the recognition pipeline.
//!
//! This module contains the fundamental components shared by the rest of the
//! crate, including:
//! - Error handling
//! - Tensor aliases and patch-batch assembly
//! - Engine configuration
//! - The classifier seam and its ONNX Runtime implementation
//!
//! It also provides re-exports of commonly used types for convenience.

pub mod batch;
pub mod config;
pub mod errors;
pub mod inference;

pub use batch::{PATCH_CHANNELS, PATCH_SIDE, Tensor2D, Tensor3D, Tensor4D, stack_patches};
pub use config::{ConfigError, EngineConfig};
pub use errors::{OcrError, OcrResult, ProcessingStage};
pub use inference::{CharClassifier, OrtClassifier};

/// Initializes the tracing subscriber for logging.
///
/// This function sets up the tracing subscriber with environment filter and
/// formatting layer. It's typically called at the start of an application to
/// enable logging.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
