use std::fmt;

use serde::{Deserialize, Serialize};

/// Per-user quiz counters as they are kept on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProgress {
    #[serde(rename = "countQuiz", default)]
    quiz_count: u64,
    #[serde(rename = "correctAnswer", default)]
    correct_count: u64,
}

impl fmt::Display for UserProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "You answered {} of {} questions correctly ({}%).",
            self.correct_count(),
            self.quiz_count(),
            self.accuracy()
        )
    }
}

impl UserProgress {
    pub fn new(quiz_count: u64, correct_count: u64) -> Self {
        Self {
            quiz_count,
            correct_count,
        }
    }

    pub fn quiz_count(&self) -> u64 {
        self.quiz_count
    }

    pub fn correct_count(&self) -> u64 {
        self.correct_count
    }

    /// Share of correct answers as a whole percentage, rounded down.
    pub fn accuracy(&self) -> u64 {
        if self.quiz_count == 0 {
            return 0;
        }
        self.correct_count.min(self.quiz_count) * 100 / self.quiz_count
    }

    pub(crate) fn increment_quiz_count(&mut self) {
        self.quiz_count = self.quiz_count.saturating_add(1);
    }

    pub(crate) fn increment_correct_answer(&mut self) {
        self.correct_count = self.correct_count.saturating_add(1);
    }

    pub(crate) fn record_answer(&mut self, is_correct: bool) {
        self.increment_quiz_count();
        if is_correct {
            self.increment_correct_answer();
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn persists_with_wire_names() {
        let json = serde_json::to_value(UserProgress::new(4, 3)).unwrap();
        assert_eq!(json, serde_json::json!({ "countQuiz": 4, "correctAnswer": 3 }));
    }

    #[test]
    fn missing_keys_read_as_zero() {
        let progress: UserProgress = serde_json::from_str(r#"{ "countQuiz": 2 }"#).unwrap();
        assert_eq!(progress, UserProgress::new(2, 0));
    }

    #[test]
    fn accuracy_of_fresh_record_is_zero() {
        assert_eq!(UserProgress::default().accuracy(), 0);
        assert_eq!(UserProgress::new(3, 2).accuracy(), 66);
    }

    #[test]
    fn record_answer_keeps_correct_within_answered() {
        let mut progress = UserProgress::default();
        for is_correct in [true, false, true, true, false] {
            progress.record_answer(is_correct);
            assert!(progress.correct_count() <= progress.quiz_count());
        }
        assert_eq!(progress, UserProgress::new(5, 3));
    }

    #[test]
    fn summary_mentions_both_counters() {
        assert_eq!(
            UserProgress::new(4, 1).to_string(),
            "You answered 1 of 4 questions correctly (25%)."
        );
    }
}
