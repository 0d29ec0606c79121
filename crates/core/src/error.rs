use thiserror::Error;

use crate::model::{AnswerError, QuestionError, ResultRecordError, UsernameError};
use crate::scoring::ScoringError;
use crate::store::StoreError;

/// Umbrella error for callers that do not care which domain rule failed.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Answer(#[from] AnswerError),
    #[error(transparent)]
    Username(#[from] UsernameError),
    #[error(transparent)]
    Record(#[from] ResultRecordError),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
