use std::collections::BTreeMap;

use thiserror::Error;

use crate::model::question::QuestionSet;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AnswerError {
    #[error("position {position} is outside the question set of {len}")]
    PositionOutOfRange { position: usize, len: usize },

    #[error("option {option} is out of range for {len} options")]
    OptionOutOfRange { option: usize, len: usize },
}

/// Selected option per question position.
///
/// Sparse: unanswered positions have no entry. The last selection for a
/// position wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerRecord {
    selections: BTreeMap<usize, usize>,
}

impl AnswerRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `option` for the question at `position`, replacing any earlier pick.
    ///
    /// # Errors
    ///
    /// Returns `AnswerError` when the position or option is out of range. The
    /// record is left untouched in that case.
    pub fn record(
        &mut self,
        questions: &QuestionSet,
        position: usize,
        option: usize,
    ) -> Result<(), AnswerError> {
        let question = questions
            .get(position)
            .ok_or(AnswerError::PositionOutOfRange {
                position,
                len: questions.len(),
            })?;
        if option >= question.option_count() {
            return Err(AnswerError::OptionOutOfRange {
                option,
                len: question.option_count(),
            });
        }
        self.selections.insert(position, option);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, position: usize) -> Option<usize> {
        self.selections.get(&position).copied()
    }

    /// Number of answered positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.selections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    /// Answered `(position, option)` pairs in position order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.selections.iter().map(|(p, o)| (*p, *o))
    }

    /// Dense view with `None` for unanswered positions, `len` entries long.
    #[must_use]
    pub fn to_dense(&self, len: usize) -> Vec<Option<usize>> {
        (0..len).map(|position| self.get(position)).collect()
    }

    pub fn clear(&mut self) {
        self.selections.clear();
    }
}
