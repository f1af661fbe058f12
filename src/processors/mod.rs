//! Image processing for the recognition pipeline.
//!
//! This module contains the processing stages that turn a decoded bitmap
//! into classifier-ready patches:
//! - Geometric primitives and the region merge algorithm
//! - Edge-based region segmentation
//! - Patch cropping and normalization
//! - Label vocabulary decoding

pub mod geometry;
pub mod label_decode;
pub mod patch;
pub mod segmentation;

pub use geometry::{BoundingBox, merge_boxes};
pub use label_decode::LabelVocabulary;
pub use patch::PatchNormalizer;
pub use segmentation::RegionExtractor;
