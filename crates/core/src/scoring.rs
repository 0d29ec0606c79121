use thiserror::Error;

use crate::model::{AnswerRecord, QuestionSet, QuizResult};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ScoringError {
    #[error("points per question must be > 0")]
    InvalidPointsPerQuestion,
    #[error("pass percent must be in 1..=100, got {provided}")]
    InvalidPassPercent { provided: u8 },
}

//
// ─── POLICY ────────────────────────────────────────────────────────────────────
//

/// Fixed-point scoring with an inclusive pass threshold.
///
/// Every correct answer is worth `points_per_question`; there is no partial
/// credit and no negative marking. A quiz passes when the earned points reach
/// `pass_percent` percent of the total.
///
/// # Examples
///
/// ```
/// # use quiz_core::scoring::ScoringPolicy;
/// let policy = ScoringPolicy::default();
/// assert_eq!(policy.points_per_question(), 10);
/// assert!(policy.is_pass(50, 100));
/// assert!(!policy.is_pass(49, 100));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringPolicy {
    points_per_question: u32,
    pass_percent: u8,
}

impl ScoringPolicy {
    pub const DEFAULT_POINTS_PER_QUESTION: u32 = 10;
    pub const DEFAULT_PASS_PERCENT: u8 = 50;

    /// # Errors
    ///
    /// Returns `ScoringError` if `points_per_question` is zero or
    /// `pass_percent` is outside `1..=100`.
    pub fn new(points_per_question: u32, pass_percent: u8) -> Result<Self, ScoringError> {
        if points_per_question == 0 {
            return Err(ScoringError::InvalidPointsPerQuestion);
        }
        if !(1..=100).contains(&pass_percent) {
            return Err(ScoringError::InvalidPassPercent {
                provided: pass_percent,
            });
        }
        Ok(Self {
            points_per_question,
            pass_percent,
        })
    }

    #[must_use]
    pub fn points_per_question(&self) -> u32 {
        self.points_per_question
    }

    #[must_use]
    pub fn pass_percent(&self) -> u8 {
        self.pass_percent
    }

    /// Inclusive threshold check, computed in integers.
    #[must_use]
    pub fn is_pass(&self, earned: u32, total: u32) -> bool {
        u64::from(earned) * 100 >= u64::from(total) * u64::from(self.pass_percent)
    }

    /// Score `answers` against the answer key in `questions`.
    ///
    /// Answers recorded at positions outside the set are ignored.
    #[must_use]
    pub fn score(&self, questions: &QuestionSet, answers: &AnswerRecord) -> QuizResult {
        let count = |n: usize| u32::try_from(n).unwrap_or(u32::MAX);

        let total_points = count(questions.len()).saturating_mul(self.points_per_question);
        let attempts = count(
            answers
                .iter()
                .filter(|(position, _)| *position < questions.len())
                .count(),
        );
        let correct = answers
            .iter()
            .filter(|(position, option)| {
                questions
                    .get(*position)
                    .is_some_and(|question| question.is_correct(*option))
            })
            .count();
        let earned_points = count(correct).saturating_mul(self.points_per_question);

        QuizResult {
            total_points,
            attempts,
            earned_points,
            passed: self.is_pass(earned_points, total_points),
        }
    }
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            points_per_question: Self::DEFAULT_POINTS_PER_QUESTION,
            pass_percent: Self::DEFAULT_PASS_PERCENT,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
