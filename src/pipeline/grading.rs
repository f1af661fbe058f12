//! Answer grading against recognition results.
//!
//! The pipeline only supplies ranked candidates; the verdict is computed
//! here, on top of the result, the way the study application grades quiz
//! answers. A written answer is correct when every expected character
//! appears somewhere in the ranked candidate list for its position with a
//! confidence at that rank of at least the minimum-accuracy floor.
//!
//! Note that this accepts a character ranked last in the candidate list as
//! long as its confidence clears the floor. That is the application's
//! grading policy, preserved as-is; tightening it is a product decision,
//! not a bug fix.

use crate::core::config::EngineConfig;
use crate::pipeline::submit::RecognitionResult;

/// Default confidence floor for grading written answers.
pub const DEFAULT_MINIMUM_ACCURACY: f32 = 0.1;

/// Grades answers against recognition results.
#[derive(Debug, Clone)]
pub struct AnswerGrader {
    /// Confidence floor a candidate must clear to count as a match.
    pub minimum_accuracy: f32,
}

impl AnswerGrader {
    /// Creates a new AnswerGrader.
    ///
    /// # Arguments
    ///
    /// * `minimum_accuracy` - Confidence floor (default: 0.1).
    pub fn new(minimum_accuracy: Option<f32>) -> Self {
        Self {
            minimum_accuracy: minimum_accuracy.unwrap_or(DEFAULT_MINIMUM_ACCURACY),
        }
    }

    /// Creates a grader from the engine configuration.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            minimum_accuracy: config.minimum_accuracy,
        }
    }

    /// Grades a written answer.
    ///
    /// # Arguments
    ///
    /// * `result` - The recognition result for the submission.
    /// * `expected` - The expected answer string.
    ///
    /// # Returns
    ///
    /// `true` when the recognized region count matches the expected
    /// character count and every position matches under the confidence
    /// floor.
    pub fn grade_written(&self, result: &RecognitionResult, expected: &str) -> bool {
        let expected: Vec<char> = expected.chars().collect();
        if result.regions.len() != expected.len() {
            return false;
        }

        expected.iter().enumerate().all(|(i, ch)| {
            let Some(prediction) = result.regions.get(&i) else {
                return false;
            };
            let Some(rank) = prediction.labels.iter().position(|label| label == ch) else {
                return false;
            };
            prediction
                .accuracy
                .get(rank)
                .is_some_and(|&confidence| confidence >= self.minimum_accuracy)
        })
    }

    /// Grades a typed answer.
    ///
    /// # Arguments
    ///
    /// * `answer` - The typed answer.
    /// * `expected` - The expected answer string.
    pub fn grade_typed(&self, answer: &str, expected: &str) -> bool {
        answer == expected
    }
}

impl Default for AnswerGrader {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictor::RegionPrediction;

    fn result_for(regions: Vec<(Vec<char>, Vec<f32>)>) -> RecognitionResult {
        RecognitionResult::from_predictions(
            regions
                .into_iter()
                .map(|(labels, accuracy)| RegionPrediction { labels, accuracy })
                .collect(),
        )
    }

    #[test]
    fn exact_top_candidates_grade_correct() {
        let result = result_for(vec![
            (vec!['c', 'e'], vec![0.9, 0.05]),
            (vec!['a', 'o'], vec![0.8, 0.15]),
            (vec!['t', 'f'], vec![0.7, 0.2]),
        ]);
        assert!(AnswerGrader::default().grade_written(&result, "cat"));
    }

    #[test]
    fn length_mismatch_grades_incorrect() {
        let result = result_for(vec![(vec!['c'], vec![0.9]), (vec!['a'], vec![0.9])]);
        assert!(!AnswerGrader::default().grade_written(&result, "cat"));
    }

    #[test]
    fn missing_character_grades_incorrect() {
        let result = result_for(vec![
            (vec!['c', 'e'], vec![0.9, 0.5]),
            (vec!['o', 'u'], vec![0.9, 0.5]),
            (vec!['t', 'f'], vec![0.9, 0.5]),
        ]);
        assert!(!AnswerGrader::default().grade_written(&result, "cat"));
    }

    #[test]
    fn low_ranked_match_above_floor_counts() {
        // The expected character sits at rank 20 but clears the
        // confidence floor; the policy accepts it.
        let labels: Vec<char> = "bcdefghijklmnopqrsta".chars().collect();
        let mut accuracy = vec![0.9; labels.len()];
        accuracy[19] = 0.1;

        let result = result_for(vec![(labels, accuracy)]);
        assert!(AnswerGrader::default().grade_written(&result, "a"));
    }

    #[test]
    fn match_below_floor_grades_incorrect() {
        let result = result_for(vec![(vec!['x', 'a'], vec![0.9, 0.09])]);
        assert!(!AnswerGrader::default().grade_written(&result, "a"));
    }

    #[test]
    fn empty_result_matches_only_empty_answer() {
        let empty = RecognitionResult::empty();
        let grader = AnswerGrader::default();
        assert!(grader.grade_written(&empty, ""));
        assert!(!grader.grade_written(&empty, "cat"));
    }

    #[test]
    fn grader_honors_configured_floor() {
        let mut config = EngineConfig::new("ocr.onnx", "labels.json");
        config.minimum_accuracy = 0.5;
        let grader = AnswerGrader::from_config(&config);

        let result = result_for(vec![(vec!['a'], vec![0.4])]);
        assert!(!grader.grade_written(&result, "a"));
        assert!(AnswerGrader::default().grade_written(&result, "a"));
    }

    #[test]
    fn typed_answers_use_exact_equality() {
        let grader = AnswerGrader::default();
        assert!(grader.grade_typed("cat", "cat"));
        assert!(!grader.grade_typed("Cat", "cat"));
    }
}
