//! Geometric primitives for region segmentation.
//!
//! This module provides the integer bounding box used throughout the
//! pipeline and the iterative merge that collapses nested or overlapping
//! boxes into single character regions.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in image-pixel coordinates, origin top-left.
///
/// Boxes are compared by value: merging removes consumed boxes from the
/// working set and inserts a freshly computed union, so identity is never
/// meaningful. Width and height are kept strictly positive by every
/// constructor path in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    /// X-coordinate of the top-left corner.
    pub x: i32,
    /// Y-coordinate of the top-left corner.
    pub y: i32,
    /// Width of the box in pixels.
    pub width: i32,
    /// Height of the box in pixels.
    pub height: i32,
}

impl BoundingBox {
    /// Creates a new bounding box.
    ///
    /// # Arguments
    ///
    /// * `x` - X-coordinate of the top-left corner.
    /// * `y` - Y-coordinate of the top-left corner.
    /// * `width` - Width in pixels.
    /// * `height` - Height in pixels.
    #[inline]
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The x-coordinate one past the right edge.
    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// The y-coordinate one past the bottom edge.
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Computes the axis-aligned union of two boxes.
    ///
    /// Produces a new box; neither input is mutated.
    pub fn union(&self, other: &Self) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Self {
            x,
            y,
            width: self.right().max(other.right()) - x,
            height: self.bottom().max(other.bottom()) - y,
        }
    }

    /// Grows the box by `margin` pixels on every side.
    ///
    /// The origin may go negative for boxes touching the image border;
    /// cropping clamps to image bounds later.
    pub fn pad(&self, margin: i32) -> Self {
        Self {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + 2 * margin,
            height: self.height + 2 * margin,
        }
    }

    /// The reach radius used by the merge condition.
    ///
    /// Using the larger side rather than the width lets a tall stem reach
    /// the dot of an "i" or a diacritic above it, at the cost of
    /// occasionally over-merging adjacent characters.
    #[inline]
    fn reach(&self) -> i32 {
        self.width.max(self.height)
    }
}

/// Decides whether two boxes belong to the same character region.
///
/// The right box's origin must fall within the left box's reach on the x
/// axis, and the bottom box's origin within the top box's reach on the y
/// axis. Nested boxes always satisfy both conditions.
fn should_merge(a: &BoundingBox, b: &BoundingBox) -> bool {
    let (left, right) = if a.x <= b.x { (a, b) } else { (b, a) };
    let (top, bottom) = if a.y <= b.y { (a, b) } else { (b, a) };

    right.x <= left.x + left.reach() && bottom.y <= top.y + top.reach()
}

/// Collapses a set of boxes until no two remaining boxes overlap or nest.
///
/// Fixed-point iteration: scan every unordered pair, and on the first pair
/// satisfying the merge condition replace both boxes with their union and
/// restart the scan over the mutated set. A full pass with no merge
/// terminates the loop. Each merge removes exactly one box, so the loop
/// always terminates.
///
/// Worst case is cubic in the box count, which is acceptable for the
/// single-digit to low-tens sets a submission produces.
///
/// # Arguments
///
/// * `boxes` - Candidate boxes; duplicates allowed, order irrelevant.
///
/// # Returns
///
/// The merged set, no larger than the input.
pub fn merge_boxes(mut boxes: Vec<BoundingBox>) -> Vec<BoundingBox> {
    let mut merged = true;
    while merged {
        merged = false;
        'scan: for i in 0..boxes.len() {
            for j in (i + 1)..boxes.len() {
                if should_merge(&boxes[i], &boxes[j]) {
                    let union = boxes[i].union(&boxes[j]);
                    // j > i, so removing j first leaves i in place.
                    boxes.swap_remove(j);
                    boxes.swap_remove(i);
                    boxes.push(union);
                    merged = true;
                    break 'scan;
                }
            }
        }
    }
    boxes
}
