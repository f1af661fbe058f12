//! The classifier seam and its ONNX Runtime implementation.
//!
//! The pipeline consumes the trained character classifier as an opaque
//! batched prediction function behind the [`CharClassifier`] trait, which
//! keeps the pipeline testable without a loaded artifact. [`OrtClassifier`]
//! is the production implementation backed by an ONNX Runtime session.

use crate::core::batch::{PATCH_CHANNELS, PATCH_SIDE, Tensor2D, Tensor4D};
use crate::core::errors::{OcrError, OcrResult, SimpleError};
use ort::session::Session;
use ort::value::TensorRef;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// A batched character classifier.
///
/// Implementations take a (N, 64, 64, 3) batch of normalized patches and
/// return one probability row per patch over the full label vocabulary.
/// Implementations must be safe to share across worker threads; the
/// pipeline holds them behind an `Arc` and never mutates them after load.
pub trait CharClassifier: std::fmt::Debug + Send + Sync {
    /// Runs one batched prediction.
    ///
    /// # Arguments
    ///
    /// * `batch` - Normalized patches, shape (N, 64, 64, 3), values in [0, 1].
    ///
    /// # Returns
    ///
    /// A (N, C) tensor of class probabilities, row order matching the batch.
    fn predict(&self, batch: &Tensor4D) -> OcrResult<Tensor2D>;
}

/// A character classifier backed by an ONNX Runtime session.
///
/// The session is created once from a persisted artifact and guarded by a
/// mutex so a shared classifier can serve concurrent submissions.
#[derive(Debug)]
pub struct OrtClassifier {
    /// The ONNX Runtime session.
    session: Mutex<Session>,
    /// The name of the input tensor, read from session metadata.
    input_name: String,
    /// The path to the model file for error context.
    model_path: PathBuf,
}

impl OrtClassifier {
    /// Loads a classifier from an ONNX artifact.
    ///
    /// The input tensor name is read from the session metadata rather than
    /// assumed, since exported training graphs name their inputs after the
    /// first layer.
    ///
    /// # Arguments
    ///
    /// * `model_path` - Path to the ONNX model file.
    ///
    /// # Errors
    ///
    /// Returns `OcrError::ModelUnavailable` if the session cannot be
    /// created or the model declares no inputs.
    pub fn load(model_path: impl AsRef<Path>) -> OcrResult<Self> {
        let path = model_path.as_ref();
        let session = Session::builder()
            .and_then(|b| b.commit_from_file(path))
            .map_err(|e| {
                OcrError::model_unavailable(format!(
                    "failed to load classifier from '{}': {}",
                    path.display(),
                    e
                ))
            })?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .ok_or_else(|| {
                OcrError::model_unavailable(format!(
                    "classifier at '{}' declares no input tensors",
                    path.display()
                ))
            })?;

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            model_path: path.to_path_buf(),
        })
    }

    /// Gets the path to the model file.
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }
}

impl CharClassifier for OrtClassifier {
    fn predict(&self, batch: &Tensor4D) -> OcrResult<Tensor2D> {
        let batch_size = batch.shape()[0];
        if batch.shape()[1] != PATCH_SIDE
            || batch.shape()[2] != PATCH_SIDE
            || batch.shape()[3] != PATCH_CHANNELS
        {
            return Err(OcrError::inference_error(SimpleError::new(format!(
                "batch has shape {:?}, expected (N, {}, {}, {})",
                batch.shape(),
                PATCH_SIDE,
                PATCH_SIDE,
                PATCH_CHANNELS
            ))));
        }

        let input_tensor = TensorRef::from_array_view(batch.view())?;
        let inputs = ort::inputs![self.input_name.as_str() => input_tensor];

        let mut session = self.session.lock().map_err(|_| {
            OcrError::inference_error(SimpleError::new("classifier session lock poisoned"))
        })?;

        let output_name = session
            .outputs
            .first()
            .map(|output| output.name.clone())
            .ok_or_else(|| {
                OcrError::inference_error(SimpleError::new(format!(
                    "classifier at '{}' declares no output tensors",
                    self.model_path.display()
                )))
            })?;

        let outputs = session
            .run(inputs)
            .map_err(|e| OcrError::Inference(Box::new(e)))?;

        let (shape, data) = outputs[output_name.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(|e| OcrError::Inference(Box::new(e)))?;

        if shape.len() != 2 {
            return Err(OcrError::inference_error(SimpleError::new(format!(
                "expected 2D probability output, got {}D with shape {:?}",
                shape.len(),
                shape
            ))));
        }

        let rows = shape[0] as usize;
        let classes = shape[1] as usize;
        if rows != batch_size {
            return Err(OcrError::inference_error(SimpleError::new(format!(
                "classifier returned {} rows for a batch of {}",
                rows, batch_size
            ))));
        }

        let view =
            ndarray::ArrayView2::from_shape((rows, classes), data).map_err(OcrError::Tensor)?;
        Ok(view.to_owned())
    }
}
