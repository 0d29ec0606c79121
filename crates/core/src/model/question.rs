use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("question needs at least {min} options, got {len}")]
    TooFewOptions { min: usize, len: usize },

    #[error("option {index} is empty")]
    EmptyOption { index: usize },

    #[error("correct option {answer} is out of range for {len} options")]
    AnswerOutOfRange { answer: usize, len: usize },

    #[error("question set cannot be empty")]
    EmptySet,
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single multiple-choice question with its answer key.
///
/// Deserialization goes through [`Question::new`], so decoded questions obey
/// the same rules as constructed ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawQuestion")]
pub struct Question {
    id: QuestionId,
    text: String,
    options: Vec<String>,
    answer: usize,
}

#[derive(Deserialize)]
struct RawQuestion {
    id: QuestionId,
    text: String,
    options: Vec<String>,
    answer: usize,
}

impl TryFrom<RawQuestion> for Question {
    type Error = QuestionError;

    fn try_from(raw: RawQuestion) -> Result<Self, Self::Error> {
        Question::new(raw.id, raw.text, raw.options, raw.answer)
    }
}

impl Question {
    /// Smallest number of options a question may carry.
    pub const MIN_OPTIONS: usize = 2;

    /// Creates a validated question.
    ///
    /// Text and options are trimmed before validation.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the text or an option is empty, there are fewer
    /// than [`Self::MIN_OPTIONS`] options, or `answer` does not index an option.
    pub fn new(
        id: QuestionId,
        text: impl Into<String>,
        options: Vec<String>,
        answer: usize,
    ) -> Result<Self, QuestionError> {
        let text = text.into().trim().to_string();
        if text.is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if options.len() < Self::MIN_OPTIONS {
            return Err(QuestionError::TooFewOptions {
                min: Self::MIN_OPTIONS,
                len: options.len(),
            });
        }
        let options: Vec<String> = options
            .into_iter()
            .map(|option| option.trim().to_string())
            .collect();
        if let Some(index) = options.iter().position(String::is_empty) {
            return Err(QuestionError::EmptyOption { index });
        }
        if answer >= options.len() {
            return Err(QuestionError::AnswerOutOfRange {
                answer,
                len: options.len(),
            });
        }

        Ok(Self {
            id,
            text,
            options,
            answer,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    /// Index of the correct option.
    #[must_use]
    pub fn answer(&self) -> usize {
        self.answer
    }

    #[must_use]
    pub fn is_correct(&self, option: usize) -> bool {
        option == self.answer
    }

    /// Narration text: the question followed by numbered options.
    #[must_use]
    pub fn narration(&self) -> String {
        let mut text = format!("Question: {}. ", self.text);
        for (index, option) in self.options.iter().enumerate() {
            text.push_str(&format!("Option {}: {option}. ", index + 1));
        }
        text.trim_end().to_string()
    }
}

//
// ─── QUESTION SET ──────────────────────────────────────────────────────────────
//

/// Ordered, immutable sequence of questions for one quiz session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSet {
    questions: Vec<Question>,
}

impl QuestionSet {
    /// Wraps an ordered list of questions.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptySet` when no questions are supplied.
    pub fn new(questions: Vec<Question>) -> Result<Self, QuestionError> {
        if questions.is_empty() {
            return Err(QuestionError::EmptySet);
        }
        Ok(Self { questions })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false; kept for API symmetry with slices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn get(&self, position: usize) -> Option<&Question> {
        self.questions.get(position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Question] {
        &self.questions
    }
}

impl<'a> IntoIterator for &'a QuestionSet {
    type Item = &'a Question;
    type IntoIter = std::slice::Iter<'a, Question>;

    fn into_iter(self) -> Self::IntoIter {
        self.questions.iter()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn options(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn new_trims_and_validates() {
        let q = Question::new(
            QuestionId::new(1),
            "  What is 2 + 2?  ",
            options(&[" 3", "4 ", "5"]),
            1,
        )
        .unwrap();
        assert_eq!(q.text(), "What is 2 + 2?");
        assert_eq!(q.options()[0], "3");
        assert!(q.is_correct(1));
        assert!(!q.is_correct(0));
    }

    #[test]
    fn rejects_invalid_questions() {
        let id = QuestionId::new(1);
        assert_eq!(
            Question::new(id, " ", options(&["a", "b"]), 0).unwrap_err(),
            QuestionError::EmptyText
        );
        assert_eq!(
            Question::new(id, "q", options(&["a"]), 0).unwrap_err(),
            QuestionError::TooFewOptions { min: 2, len: 1 }
        );
        assert_eq!(
            Question::new(id, "q", options(&["a", " "]), 0).unwrap_err(),
            QuestionError::EmptyOption { index: 1 }
        );
        assert_eq!(
            Question::new(id, "q", options(&["a", "b", "c"]), 3).unwrap_err(),
            QuestionError::AnswerOutOfRange { answer: 3, len: 3 }
        );
    }

    #[test]
    fn narration_numbers_options_from_one() {
        let q = Question::new(QuestionId::new(7), "Pick one", options(&["A", "B"]), 0).unwrap();
        assert_eq!(q.narration(), "Question: Pick one. Option 1: A. Option 2: B.");
    }

    #[test]
    fn decoding_validates_like_new() {
        let q: Question =
            serde_json::from_str(r#"{"id":3,"text":" Why? ","options":["a","b"],"answer":1}"#)
                .unwrap();
        assert_eq!(q.text(), "Why?");

        let out_of_range =
            serde_json::from_str::<Question>(r#"{"id":3,"text":"q","options":["a","b"],"answer":2}"#);
        assert!(out_of_range.is_err());
        let no_options =
            serde_json::from_str::<Question>(r#"{"id":3,"text":"q","options":[],"answer":0}"#);
        assert!(no_options.is_err());
    }

    #[test]
    fn empty_set_is_rejected() {
        assert_eq!(QuestionSet::new(Vec::new()).unwrap_err(), QuestionError::EmptySet);
    }
}
