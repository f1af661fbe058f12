//! Patch normalization for the character classifier.
//!
//! Each surviving region is cropped out of the source bitmap, resized to
//! the classifier's fixed input square, and rescaled to unit-range floats.
//! The classifier was trained on 3-channel inputs built by replicating the
//! single gray channel, so normalization reproduces that layout exactly;
//! feeding true single-channel patches would not match the trained
//! weights.

use crate::core::batch::{PATCH_SIDE, Tensor3D};
use crate::processors::geometry::BoundingBox;
use image::{GrayImage, imageops};
use rayon::prelude::*;

/// Region count above which patches are normalized in parallel.
const DEFAULT_PARALLEL_THRESHOLD: usize = 8;

/// Normalizes cropped regions into classifier-ready patches.
///
/// Regions arrive already padded by the extractor; the normalizer clamps
/// them to the image bounds, crops, resizes to 64x64, and scales pixel
/// values into [0, 1].
#[derive(Debug)]
pub struct PatchNormalizer {
    /// Region count above which normalization runs in parallel.
    parallel_threshold: usize,
}

impl PatchNormalizer {
    /// Creates a new PatchNormalizer.
    ///
    /// # Arguments
    ///
    /// * `parallel_threshold` - Region count above which normalization
    ///   runs in parallel (default: 8).
    pub fn new(parallel_threshold: Option<usize>) -> Self {
        Self {
            parallel_threshold: parallel_threshold.unwrap_or(DEFAULT_PARALLEL_THRESHOLD),
        }
    }

    /// Normalizes a single region into a (64, 64, 3) patch.
    ///
    /// # Arguments
    ///
    /// * `image` - The source bitmap.
    /// * `region` - A padded region box from the extractor.
    ///
    /// # Returns
    ///
    /// The normalized patch, or `None` when clamping the box to the image
    /// bounds leaves a zero-area crop. A degenerate crop drops that region
    /// only, never the whole submission.
    pub fn normalize(&self, image: &GrayImage, region: &BoundingBox) -> Option<Tensor3D> {
        let (width, height) = (image.width() as i32, image.height() as i32);

        let x0 = region.x.max(0);
        let y0 = region.y.max(0);
        let x1 = region.right().min(width);
        let y1 = region.bottom().min(height);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }

        let crop = imageops::crop_imm(
            image,
            x0 as u32,
            y0 as u32,
            (x1 - x0) as u32,
            (y1 - y0) as u32,
        )
        .to_image();
        let resized = imageops::resize(
            &crop,
            PATCH_SIDE as u32,
            PATCH_SIDE as u32,
            imageops::FilterType::Triangle,
        );

        let mut patch = Tensor3D::zeros((PATCH_SIDE, PATCH_SIDE, 3));
        for y in 0..PATCH_SIDE {
            for x in 0..PATCH_SIDE {
                let value = resized.get_pixel(x as u32, y as u32)[0] as f32 / 255.0;
                for c in 0..3 {
                    patch[[y, x, c]] = value;
                }
            }
        }
        Some(patch)
    }

    /// Normalizes a sequence of regions, preserving their order.
    ///
    /// Degenerate regions are skipped; the output length may therefore be
    /// smaller than the input length.
    ///
    /// # Arguments
    ///
    /// * `image` - The source bitmap.
    /// * `regions` - Padded region boxes in reading order.
    pub fn normalize_all(&self, image: &GrayImage, regions: &[BoundingBox]) -> Vec<Tensor3D> {
        if regions.len() > self.parallel_threshold {
            regions
                .par_iter()
                .filter_map(|region| self.normalize(image, region))
                .collect()
        } else {
            regions
                .iter()
                .filter_map(|region| self.normalize(image, region))
                .collect()
        }
    }
}

impl Default for PatchNormalizer {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn gradient_image(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, _| Luma([(x % 256) as u8]))
    }

    #[test]
    fn patch_has_unit_range_and_replicated_channels() {
        let image = gradient_image(100, 80);
        let normalizer = PatchNormalizer::default();

        let patch = normalizer
            .normalize(&image, &BoundingBox::new(10, 10, 30, 40))
            .unwrap();

        assert_eq!(patch.shape(), [64, 64, 3]);
        for value in patch.iter() {
            assert!((0.0..=1.0).contains(value));
        }
        for y in 0..PATCH_SIDE {
            for x in 0..PATCH_SIDE {
                assert_eq!(patch[[y, x, 0]], patch[[y, x, 1]]);
                assert_eq!(patch[[y, x, 0]], patch[[y, x, 2]]);
            }
        }
    }

    #[test]
    fn border_region_is_clamped_not_dropped() {
        let image = gradient_image(50, 50);
        let normalizer = PatchNormalizer::default();

        // The extractor's padding pushes border boxes past the origin.
        let patch = normalizer.normalize(&image, &BoundingBox::new(-1, -1, 20, 30));
        assert!(patch.is_some());
    }

    #[test]
    fn degenerate_region_is_skipped() {
        let image = gradient_image(50, 50);
        let normalizer = PatchNormalizer::default();

        assert!(
            normalizer
                .normalize(&image, &BoundingBox::new(60, 10, 10, 10))
                .is_none()
        );
        assert!(
            normalizer
                .normalize(&image, &BoundingBox::new(-20, 10, 10, 10))
                .is_none()
        );
    }

    #[test]
    fn normalize_all_preserves_order_and_drops_degenerates() {
        let image = gradient_image(200, 50);
        let normalizer = PatchNormalizer::default();

        let regions = vec![
            BoundingBox::new(0, 0, 10, 20),
            BoundingBox::new(300, 0, 10, 20),
            BoundingBox::new(120, 0, 40, 20),
        ];
        let patches = normalizer.normalize_all(&image, &regions);

        assert_eq!(patches.len(), 2);
        // Column means follow the source gradient, so the darker (leftmost)
        // region must come first.
        let mean = |t: &Tensor3D| t.iter().sum::<f32>() / t.len() as f32;
        assert!(mean(&patches[0]) < mean(&patches[1]));
    }

    #[test]
    fn parallel_path_matches_serial_path() {
        let image = gradient_image(300, 40);
        let serial = PatchNormalizer::new(Some(usize::MAX));
        let parallel = PatchNormalizer::new(Some(0));

        let regions: Vec<BoundingBox> = (0..12)
            .map(|i| BoundingBox::new(i * 24, 2, 20, 30))
            .collect();

        let a = serial.normalize_all(&image, &regions);
        let b = parallel.normalize_all(&image, &regions);
        assert_eq!(a.len(), b.len());
        for (pa, pb) in a.iter().zip(&b) {
            assert_eq!(pa, pb);
        }
    }
}
