use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::model::{
    Question, QuestionError, QuestionId, ResultId, ResultRecord, ResultRecordError, Username,
    UsernameError, Verdict,
};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<QuestionError> for StorageError {
    fn from(err: QuestionError) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

impl From<ResultRecordError> for StorageError {
    fn from(err: ResultRecordError) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

impl From<UsernameError> for StorageError {
    fn from(err: UsernameError) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Persisted shape of a bank question.
///
/// `position` orders the bank; options are kept as a list so adapters can
/// serialize them however they like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    pub id: QuestionId,
    pub position: u32,
    pub text: String,
    pub options: Vec<String>,
    pub answer: usize,
}

impl QuestionRecord {
    #[must_use]
    pub fn from_question(position: u32, question: &Question) -> Self {
        Self {
            id: question.id(),
            position,
            text: question.text().to_owned(),
            options: question.options().to_vec(),
            answer: question.answer(),
        }
    }

    /// Convert the record back into a domain `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the stored data no longer validates.
    pub fn into_question(self) -> Result<Question, QuestionError> {
        Question::new(self.id, self.text, self.options, self.answer)
    }
}

/// Persisted shape of a published result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub id: ResultId,
    pub record: ResultRecord,
}

impl ResultRow {
    #[must_use]
    pub fn new(id: ResultId, record: ResultRecord) -> Self {
        Self { id, record }
    }
}

/// Rebuild a `ResultRecord` from its stored columns.
///
/// # Errors
///
/// Returns `StorageError::Serialization` when a column fails domain validation.
pub fn result_record_from_parts(
    username: &str,
    answers: Vec<Option<usize>>,
    attempts: u32,
    points: u32,
    passed: bool,
    completed_at: DateTime<Utc>,
) -> Result<ResultRecord, StorageError> {
    let verdict = if passed { Verdict::Passed } else { Verdict::Failed };
    Ok(ResultRecord::new(
        Username::new(username)?,
        answers,
        attempts,
        points,
        verdict,
        completed_at,
    )?)
}

/// Repository contract for the question bank.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Persist or update a question at the given bank position.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the question cannot be stored.
    async fn upsert_question(&self, position: u32, question: &Question)
    -> Result<(), StorageError>;

    /// List bank questions ordered by position.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read or decode failures.
    async fn list_questions(&self, limit: u32) -> Result<Vec<Question>, StorageError>;

    /// Number of questions in the bank.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read failures.
    async fn count_questions(&self) -> Result<u32, StorageError>;
}

/// Repository contract for published results.
#[async_trait]
pub trait ResultRepository: Send + Sync {
    /// Append a result and return its id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the result cannot be stored.
    async fn append_result(&self, record: &ResultRecord) -> Result<ResultId, StorageError>;

    /// Fetch a result by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_result(&self, id: ResultId) -> Result<ResultRecord, StorageError>;

    /// Most recent results first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read or decode failures.
    async fn list_results(&self, limit: u32) -> Result<Vec<ResultRow>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    questions: Arc<Mutex<BTreeMap<u32, Question>>>,
    results: Arc<Mutex<Vec<ResultRecord>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_err<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

fn clamp_limit(limit: u32) -> usize {
    usize::try_from(limit).unwrap_or(usize::MAX)
}

#[async_trait]
impl QuestionRepository for InMemoryRepository {
    async fn upsert_question(
        &self,
        position: u32,
        question: &Question,
    ) -> Result<(), StorageError> {
        let mut guard = self.questions.lock().map_err(lock_err)?;
        if guard
            .iter()
            .any(|(p, q)| *p != position && q.id() == question.id())
        {
            return Err(StorageError::Conflict);
        }
        guard.insert(position, question.clone());
        Ok(())
    }

    async fn list_questions(&self, limit: u32) -> Result<Vec<Question>, StorageError> {
        let guard = self.questions.lock().map_err(lock_err)?;
        Ok(guard.values().take(clamp_limit(limit)).cloned().collect())
    }

    async fn count_questions(&self) -> Result<u32, StorageError> {
        let guard = self.questions.lock().map_err(lock_err)?;
        u32::try_from(guard.len()).map_err(|e| StorageError::Serialization(e.to_string()))
    }
}

#[async_trait]
impl ResultRepository for InMemoryRepository {
    async fn append_result(&self, record: &ResultRecord) -> Result<ResultId, StorageError> {
        let mut guard = self.results.lock().map_err(lock_err)?;
        guard.push(record.clone());
        let id = i64::try_from(guard.len()).map_err(|e| StorageError::Serialization(e.to_string()))?;
        Ok(ResultId::new(id))
    }

    async fn get_result(&self, id: ResultId) -> Result<ResultRecord, StorageError> {
        let guard = self.results.lock().map_err(lock_err)?;
        usize::try_from(id.value())
            .ok()
            .and_then(|index| index.checked_sub(1))
            .and_then(|index| guard.get(index))
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn list_results(&self, limit: u32) -> Result<Vec<ResultRow>, StorageError> {
        let guard = self.results.lock().map_err(lock_err)?;
        let mut rows = Vec::new();
        for (index, record) in guard.iter().enumerate().rev().take(clamp_limit(limit)) {
            let id = i64::try_from(index + 1)
                .map_err(|e| StorageError::Serialization(e.to_string()))?;
            rows.push(ResultRow::new(ResultId::new(id), record.clone()));
        }
        Ok(rows)
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub questions: Arc<dyn QuestionRepository>,
    pub results: Arc<dyn ResultRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let questions: Arc<dyn QuestionRepository> = Arc::new(repo.clone());
        let results: Arc<dyn ResultRepository> = Arc::new(repo);
        Self { questions, results }
    }
}
