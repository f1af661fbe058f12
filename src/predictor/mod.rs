//! Character recognition over normalized patch batches.

pub mod char_recognizer;

pub use char_recognizer::{DEFAULT_TOP_K, Recognizer, RegionPrediction};
