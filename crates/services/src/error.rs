//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::QuestionError;
use quiz_core::scoring::ScoringError;
use quiz_core::store::StoreError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by speech capabilities.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SpeechError {
    #[error("speech is not available on this platform")]
    Unavailable,
    #[error("a transcription is already in progress")]
    Busy,
    #[error("speech engine error: {0}")]
    Engine(String),
}

/// Errors emitted by question sources.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionSourceError {
    #[error("question source responded with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("question payload could not be decoded: {0}")]
    Decode(String),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by result sinks and boards.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ResultSinkError {
    #[error("result endpoint responded with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("result payload could not be decoded: {0}")]
    Decode(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `QuizService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizServiceError {
    #[error("expected {expected} questions, got {actual}")]
    WrongLength { expected: usize, actual: usize },
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Source(#[from] QuestionSourceError),
    #[error(transparent)]
    Sink(#[from] ResultSinkError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error("invalid configuration: {0}")]
    Config(String),
}
