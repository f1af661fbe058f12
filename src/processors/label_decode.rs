//! Label vocabulary decoding.
//!
//! The classifier's output classes are defined by a persisted label list:
//! a JSON array of integer-encoded labels, one entry per training sample,
//! where each integer is the Unicode codepoint of the character (the
//! training data derives them from 4-hex-digit directory suffixes). The
//! class index of the model output is the rank of the label among the
//! sorted distinct values, so the vocabulary reproduces that ordering to
//! map class ids back to characters.

use crate::core::errors::{OcrError, OcrResult};
use std::io::Read;
use std::path::Path;

/// A bijective mapping between classifier class ids and character labels.
///
/// Built once from the persisted label list and read-only afterwards.
#[derive(Debug, Clone)]
pub struct LabelVocabulary {
    /// Characters ordered by codepoint; index = class id.
    classes: Vec<char>,
}

impl LabelVocabulary {
    /// Builds a vocabulary from raw integer-encoded labels.
    ///
    /// Duplicates are expected (the persisted list holds one entry per
    /// training sample) and collapse into one class each; classes are
    /// ordered by ascending codepoint to match the encoder the model was
    /// trained against.
    ///
    /// # Arguments
    ///
    /// * `labels` - Integer-encoded labels (Unicode codepoints).
    ///
    /// # Errors
    ///
    /// Returns `OcrError::ModelUnavailable` if the list is empty or an
    /// entry is not a valid codepoint.
    pub fn from_labels(labels: impl IntoIterator<Item = u32>) -> OcrResult<Self> {
        let mut codes: Vec<u32> = labels.into_iter().collect();
        codes.sort_unstable();
        codes.dedup();

        if codes.is_empty() {
            return Err(OcrError::model_unavailable("label list is empty"));
        }

        let classes = codes
            .into_iter()
            .map(|code| {
                char::from_u32(code).ok_or_else(|| {
                    OcrError::model_unavailable(format!(
                        "label {:#x} is not a valid Unicode codepoint",
                        code
                    ))
                })
            })
            .collect::<OcrResult<Vec<char>>>()?;

        Ok(Self { classes })
    }

    /// Builds a vocabulary from a JSON reader.
    ///
    /// # Arguments
    ///
    /// * `reader` - A reader over a JSON array of integer labels.
    pub fn from_json_reader(reader: impl Read) -> OcrResult<Self> {
        let labels: Vec<u32> = serde_json::from_reader(reader)
            .map_err(|e| OcrError::model_unavailable(format!("malformed label file: {}", e)))?;
        Self::from_labels(labels)
    }

    /// Builds a vocabulary from a persisted label file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the JSON label file.
    pub fn from_file(path: impl AsRef<Path>) -> OcrResult<Self> {
        let file = std::fs::File::open(path.as_ref()).map_err(|e| {
            OcrError::model_unavailable(format!(
                "failed to open label file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_json_reader(file)
    }

    /// The number of classes in the vocabulary.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether the vocabulary has no classes.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Decodes a class id to its character label.
    pub fn decode(&self, class_id: usize) -> Option<char> {
        self.classes.get(class_id).copied()
    }

    /// Encodes a character label to its class id.
    pub fn encode(&self, label: char) -> Option<usize> {
        self.classes.binary_search(&label).ok()
    }
}
