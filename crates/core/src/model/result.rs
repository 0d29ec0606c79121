use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::session::Username;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ResultRecordError {
    #[error("attempts ({attempts}) do not match answered positions ({answered})")]
    AttemptsMismatch { attempts: u32, answered: u32 },

    #[error("too many answers for a single result: {len}")]
    TooManyAnswers { len: usize },
}

/// Scored outcome of a quiz, derived from questions and answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizResult {
    pub total_points: u32,
    pub attempts: u32,
    pub earned_points: u32,
    pub passed: bool,
}

impl QuizResult {
    /// Label used on the wire and in narration.
    #[must_use]
    pub fn verdict(&self) -> Verdict {
        if self.passed {
            Verdict::Passed
        } else {
            Verdict::Failed
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Passed,
    Failed,
}

impl Verdict {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Verdict::Passed => "Passed",
            Verdict::Failed => "Failed",
        }
    }

    #[must_use]
    pub fn short_label(self) -> &'static str {
        match self {
            Verdict::Passed => "PASS",
            Verdict::Failed => "FAIL",
        }
    }

    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "passed" | "pass" => Some(Verdict::Passed),
            "failed" | "fail" => Some(Verdict::Failed),
            _ => None,
        }
    }
}

/// Published form of a finished quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRecord {
    username: Username,
    answers: Vec<Option<usize>>,
    attempts: u32,
    points: u32,
    verdict: Verdict,
    completed_at: DateTime<Utc>,
}

impl ResultRecord {
    /// Build a record, checking that `attempts` matches the answered positions.
    ///
    /// # Errors
    ///
    /// Returns `ResultRecordError::AttemptsMismatch` if the counts disagree.
    pub fn new(
        username: Username,
        answers: Vec<Option<usize>>,
        attempts: u32,
        points: u32,
        verdict: Verdict,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, ResultRecordError> {
        let answered = answers.iter().filter(|a| a.is_some()).count();
        let answered = u32::try_from(answered)
            .map_err(|_| ResultRecordError::TooManyAnswers { len: answers.len() })?;
        if answered != attempts {
            return Err(ResultRecordError::AttemptsMismatch { attempts, answered });
        }
        Ok(Self {
            username,
            answers,
            attempts,
            points,
            verdict,
            completed_at,
        })
    }

    #[must_use]
    pub fn username(&self) -> &Username {
        &self.username
    }

    #[must_use]
    pub fn answers(&self) -> &[Option<usize>] {
        &self.answers
    }

    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    #[must_use]
    pub fn points(&self) -> u32 {
        self.points
    }

    #[must_use]
    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn record_checks_attempts() {
        let name = Username::new("ada").unwrap();
        let ok = ResultRecord::new(
            name.clone(),
            vec![Some(0), None, Some(2)],
            2,
            10,
            Verdict::Failed,
            fixed_now(),
        );
        assert!(ok.is_ok());

        let err = ResultRecord::new(name, vec![Some(0)], 3, 0, Verdict::Failed, fixed_now())
            .unwrap_err();
        assert_eq!(
            err,
            ResultRecordError::AttemptsMismatch {
                attempts: 3,
                answered: 1
            }
        );
    }

    #[test]
    fn verdict_labels_round_trip() {
        assert_eq!(Verdict::from_label("Passed"), Some(Verdict::Passed));
        assert_eq!(Verdict::from_label("FAIL"), Some(Verdict::Failed));
        assert_eq!(Verdict::from_label("maybe"), None);
        assert_eq!(Verdict::Passed.short_label(), "PASS");
    }
}
