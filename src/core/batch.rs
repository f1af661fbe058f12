//! Tensor aliases and batch assembly for the recognition pipeline.
//!
//! Normalized patches are stacked into a single batch tensor so the
//! classifier runs once per submission rather than once per region.

use crate::core::errors::{OcrError, OcrResult, SimpleError};
use ndarray::Axis;

/// A 2-dimensional tensor of f32 values.
pub type Tensor2D = ndarray::Array2<f32>;
/// A 3-dimensional tensor of f32 values.
pub type Tensor3D = ndarray::Array3<f32>;
/// A 4-dimensional tensor of f32 values.
pub type Tensor4D = ndarray::Array4<f32>;

/// Side length of a normalized character patch in pixels.
pub const PATCH_SIDE: usize = 64;

/// Channel count of a normalized character patch.
///
/// The classifier was trained on 3-channel inputs even though the source
/// bitmaps are single-channel; see [`crate::processors::PatchNormalizer`].
pub const PATCH_CHANNELS: usize = 3;

/// Stacks normalized patches into a single (N, 64, 64, 3) batch tensor.
///
/// Patch order is preserved: row `i` of the batch is `patches[i]`, which
/// keeps the left-to-right region order intact through inference.
///
/// # Arguments
///
/// * `patches` - Normalized patches, each of shape (64, 64, 3).
///
/// # Returns
///
/// The assembled batch tensor, or an error if any patch has an unexpected
/// shape. An empty slice yields an empty (0, 64, 64, 3) tensor.
pub fn stack_patches(patches: &[Tensor3D]) -> OcrResult<Tensor4D> {
    let mut batch = Tensor4D::zeros((patches.len(), PATCH_SIDE, PATCH_SIDE, PATCH_CHANNELS));

    for (idx, patch) in patches.iter().enumerate() {
        if patch.shape() != [PATCH_SIDE, PATCH_SIDE, PATCH_CHANNELS] {
            return Err(OcrError::batch_assembly(
                &format!(
                    "patch {} has shape {:?}, expected ({}, {}, {})",
                    idx,
                    patch.shape(),
                    PATCH_SIDE,
                    PATCH_SIDE,
                    PATCH_CHANNELS
                ),
                SimpleError::new("patch shape mismatch"),
            ));
        }
        batch.index_axis_mut(Axis(0), idx).assign(patch);
    }

    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stacks_patches_in_order() {
        let mut first = Tensor3D::zeros((PATCH_SIDE, PATCH_SIDE, PATCH_CHANNELS));
        first[[0, 0, 0]] = 0.25;
        let mut second = Tensor3D::zeros((PATCH_SIDE, PATCH_SIDE, PATCH_CHANNELS));
        second[[0, 0, 0]] = 0.75;

        let batch = stack_patches(&[first, second]).unwrap();
        assert_eq!(batch.shape(), [2, PATCH_SIDE, PATCH_SIDE, PATCH_CHANNELS]);
        assert_eq!(batch[[0, 0, 0, 0]], 0.25);
        assert_eq!(batch[[1, 0, 0, 0]], 0.75);
    }

    #[test]
    fn empty_input_yields_empty_batch() {
        let batch = stack_patches(&[]).unwrap();
        assert_eq!(batch.shape(), [0, PATCH_SIDE, PATCH_SIDE, PATCH_CHANNELS]);
    }

    #[test]
    fn rejects_misshapen_patch() {
        let bad = Tensor3D::zeros((32, 32, PATCH_CHANNELS));
        assert!(stack_patches(&[bad]).is_err());
    }
}
