//! Edge-based region segmentation.
//!
//! This module turns a raw grayscale bitmap into an ordered sequence of
//! character regions: edge detection, external contour extraction, box
//! merging, noise filtering, and left-to-right ordering.

use crate::processors::geometry::{BoundingBox, merge_boxes};
use image::GrayImage;
use imageproc::contours::{BorderType, find_contours};
use imageproc::edges::canny;
use tracing::debug;

/// Default low hysteresis threshold for edge detection.
const DEFAULT_LOW_THRESHOLD: f32 = 30.0;
/// Default high hysteresis threshold for edge detection.
const DEFAULT_HIGH_THRESHOLD: f32 = 150.0;

/// Minimum padded width for a region to survive noise filtering.
const MIN_REGION_WIDTH: i32 = 5;
/// Minimum padded height for a region to survive noise filtering.
const MIN_REGION_HEIGHT: i32 = 15;

/// Extracts ordered character regions from a grayscale bitmap.
///
/// The extractor runs Canny edge detection, derives one bounding box per
/// external contour, merges boxes that belong to the same character, drops
/// noise specks by size, and orders the survivors left to right. Each
/// surviving region is returned already padded by one pixel per side;
/// downstream cropping must not pad again.
#[derive(Debug)]
pub struct RegionExtractor {
    /// Low hysteresis threshold for edge detection.
    pub low_threshold: f32,
    /// High hysteresis threshold for edge detection.
    pub high_threshold: f32,
}

impl RegionExtractor {
    /// Creates a new RegionExtractor with optional threshold overrides.
    ///
    /// # Arguments
    ///
    /// * `low_threshold` - Low hysteresis threshold (default: 30).
    /// * `high_threshold` - High hysteresis threshold (default: 150).
    pub fn new(low_threshold: Option<f32>, high_threshold: Option<f32>) -> Self {
        Self {
            low_threshold: low_threshold.unwrap_or(DEFAULT_LOW_THRESHOLD),
            high_threshold: high_threshold.unwrap_or(DEFAULT_HIGH_THRESHOLD),
        }
    }

    /// Extracts character regions from a bitmap.
    ///
    /// # Arguments
    ///
    /// * `image` - The decoded grayscale bitmap.
    ///
    /// # Returns
    ///
    /// Padded region boxes sorted by ascending x-origin. A bitmap with no
    /// detectable edges yields an empty vector, which callers must treat
    /// as an empty answer rather than an error.
    pub fn extract(&self, image: &GrayImage) -> Vec<BoundingBox> {
        if image.width() == 0 || image.height() == 0 {
            return Vec::new();
        }

        let edges = canny(image, self.low_threshold, self.high_threshold);
        let contours = find_contours::<i32>(&edges);

        let mut boxes = Vec::new();
        for contour in &contours {
            // Holes are boundaries inside a stroke; only outer borders
            // describe a candidate region.
            if contour.border_type != BorderType::Outer || contour.points.is_empty() {
                continue;
            }
            boxes.push(enclosing_box(&contour.points));
        }
        debug!(
            contours = contours.len(),
            candidates = boxes.len(),
            "contour extraction complete"
        );

        let mut regions: Vec<BoundingBox> = merge_boxes(boxes)
            .into_iter()
            .map(|b| b.pad(1))
            .filter(|b| b.width >= MIN_REGION_WIDTH && b.height >= MIN_REGION_HEIGHT)
            .collect();

        // Reading order; the sort is stable so equal x-origins keep their
        // discovery order.
        regions.sort_by_key(|b| b.x);
        regions
    }
}

impl Default for RegionExtractor {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Computes the minimal enclosing axis-aligned box of a point set.
fn enclosing_box(points: &[imageproc::point::Point<i32>]) -> BoundingBox {
    let mut min_x = i32::MAX;
    let mut min_y = i32::MAX;
    let mut max_x = i32::MIN;
    let mut max_y = i32::MIN;

    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }

    BoundingBox::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    /// Paints a dark rectangle onto a light background.
    fn paint_blob(image: &mut GrayImage, x: u32, y: u32, width: u32, height: u32) {
        for py in y..(y + height) {
            for px in x..(x + width) {
                image.put_pixel(px, py, Luma([0u8]));
            }
        }
    }

    fn light_canvas(width: u32, height: u32) -> GrayImage {
        GrayImage::from_pixel(width, height, Luma([255u8]))
    }

    #[test]
    fn blank_image_yields_no_regions() {
        let extractor = RegionExtractor::default();
        assert!(extractor.extract(&light_canvas(120, 60)).is_empty());
        assert!(
            extractor
                .extract(&GrayImage::from_pixel(120, 60, Luma([0u8])))
                .is_empty()
        );
    }

    #[test]
    fn three_separated_blobs_yield_three_ordered_regions() {
        let mut image = light_canvas(160, 60);
        paint_blob(&mut image, 110, 12, 10, 30);
        paint_blob(&mut image, 10, 12, 10, 30);
        paint_blob(&mut image, 60, 12, 10, 30);

        let extractor = RegionExtractor::default();
        let regions = extractor.extract(&image);

        assert_eq!(regions.len(), 3);
        assert!(regions[0].x < regions[1].x);
        assert!(regions[1].x < regions[2].x);
        // Left-to-right order matches the known blob positions.
        assert!(regions[0].x < 20);
        assert!((50..70).contains(&regions[1].x));
        assert!(regions[2].x > 100);
    }

    #[test]
    fn short_speck_is_filtered_out() {
        let mut image = light_canvas(120, 60);
        // Tall enough to be a character.
        paint_blob(&mut image, 10, 10, 10, 30);
        // A wide but short smudge; its padded height stays below the floor.
        paint_blob(&mut image, 60, 28, 20, 3);

        let extractor = RegionExtractor::default();
        let regions = extractor.extract(&image);

        assert_eq!(regions.len(), 1);
        assert!(regions[0].x < 20);
    }

    #[test]
    fn crossing_strokes_form_one_region() {
        let mut image = light_canvas(80, 60);
        // Two strokes of a plus sign; their boxes overlap and must be
        // collapsed into a single character region.
        paint_blob(&mut image, 30, 10, 6, 30);
        paint_blob(&mut image, 20, 22, 26, 6);

        let extractor = RegionExtractor::default();
        let regions = extractor.extract(&image);

        assert_eq!(regions.len(), 1);
        assert!(regions[0].width >= 20);
        assert!(regions[0].height >= 25);
    }

    #[test]
    fn enclosing_box_spans_extremes() {
        let points = vec![
            imageproc::point::Point::new(3, 7),
            imageproc::point::Point::new(9, 2),
            imageproc::point::Point::new(5, 11),
        ];
        assert_eq!(enclosing_box(&points), BoundingBox::new(3, 2, 7, 10));
    }
}
