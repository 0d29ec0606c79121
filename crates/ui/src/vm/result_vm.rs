use quiz_core::model::{QuizResult, Username, Verdict};
use services::result_sink::PublishedResult;

use crate::vm::time_fmt::format_datetime;

/// Figures shown on the result view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultSummaryVm {
    pub username: String,
    pub total_points: u32,
    pub question_count: usize,
    pub attempts: u32,
    pub earned_points: u32,
    pub verdict: Verdict,
}

impl ResultSummaryVm {
    #[must_use]
    pub fn new(username: &Username, question_count: usize, result: &QuizResult) -> Self {
        Self {
            username: username.as_str().to_owned(),
            total_points: result.total_points,
            question_count,
            attempts: result.attempts,
            earned_points: result.earned_points,
            verdict: result.verdict(),
        }
    }

    #[must_use]
    pub fn short_verdict(&self) -> &'static str {
        self.verdict.short_label()
    }

    /// Spoken summary read out when the result view opens.
    #[must_use]
    pub fn narration(&self) -> String {
        format!(
            "Quiz Results for {}: Total Quiz Points: {}, Total Questions: {}, \
             Total Attempts: {}, Total Earned Points: {}, Quiz Result: {}.",
            self.username,
            self.total_points,
            self.question_count,
            self.attempts,
            self.earned_points,
            self.verdict.label()
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardRowVm {
    pub username: String,
    pub attempts: u32,
    pub points: u32,
    pub verdict_label: &'static str,
    pub completed_at_str: String,
}

impl From<&PublishedResult> for BoardRowVm {
    fn from(item: &PublishedResult) -> Self {
        Self {
            username: item.username.clone(),
            attempts: item.attempts,
            points: item.points,
            verdict_label: item.verdict.label(),
            completed_at_str: item
                .completed_at
                .map(format_datetime)
                .unwrap_or_default(),
        }
    }
}

#[must_use]
pub fn map_board_rows(items: &[PublishedResult]) -> Vec<BoardRowVm> {
    items.iter().map(BoardRowVm::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narration_lists_every_figure() {
        let result = QuizResult {
            total_points: 100,
            attempts: 7,
            earned_points: 50,
            passed: true,
        };
        let vm = ResultSummaryVm::new(&Username::new("ada").unwrap(), 10, &result);
        assert_eq!(
            vm.narration(),
            "Quiz Results for ada: Total Quiz Points: 100, Total Questions: 10, \
             Total Attempts: 7, Total Earned Points: 50, Quiz Result: Passed."
        );
        assert_eq!(vm.short_verdict(), "PASS");
    }

    #[test]
    fn board_rows_tolerate_missing_timestamps() {
        let rows = map_board_rows(&[PublishedResult {
            username: "bob".into(),
            attempts: 3,
            points: 10,
            verdict: Verdict::Failed,
            completed_at: None,
        }]);
        assert_eq!(rows[0].verdict_label, "Failed");
        assert!(rows[0].completed_at_str.is_empty());
    }
}
