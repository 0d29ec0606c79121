use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::model::{ResultRecord, Verdict};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use storage::repository::ResultRepository;

use crate::error::ResultSinkError;

/// Receives finished quiz results.
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// Publish one result. Called once per finished quiz, never retried.
    ///
    /// # Errors
    ///
    /// Returns `ResultSinkError` if the result could not be delivered.
    async fn publish(&self, record: &ResultRecord) -> Result<(), ResultSinkError>;
}

/// Lists previously published results, newest first.
#[async_trait]
pub trait ResultBoard: Send + Sync {
    /// # Errors
    ///
    /// Returns `ResultSinkError` if the listing cannot be read.
    async fn list_results(&self, limit: u32) -> Result<Vec<PublishedResult>, ResultSinkError>;
}

/// A row of the result board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedResult {
    pub username: String,
    pub attempts: u32,
    pub points: u32,
    pub verdict: Verdict,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<&ResultRecord> for PublishedResult {
    fn from(record: &ResultRecord) -> Self {
        Self {
            username: record.username().as_str().to_owned(),
            attempts: record.attempts(),
            points: record.points(),
            verdict: record.verdict(),
            completed_at: Some(record.completed_at()),
        }
    }
}

/// Wire shape of `POST /api/result` and the items of `GET /api/result`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultPayload {
    /// Selected option per question, `null` when unanswered.
    pub result: Vec<Option<usize>>,
    pub username: String,
    pub attempts: u32,
    pub points: u32,
    /// `"Passed"` or `"Failed"`.
    #[serde(rename = "achived")]
    pub achieved: String,
    #[serde(
        default,
        rename = "createdAt",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<&ResultRecord> for ResultPayload {
    fn from(record: &ResultRecord) -> Self {
        Self {
            result: record.answers().to_vec(),
            username: record.username().as_str().to_owned(),
            attempts: record.attempts(),
            points: record.points(),
            achieved: record.verdict().label().to_owned(),
            created_at: None,
        }
    }
}

impl ResultPayload {
    /// # Errors
    ///
    /// Returns `ResultSinkError::Decode` for an unknown verdict label.
    pub fn into_published(self) -> Result<PublishedResult, ResultSinkError> {
        let verdict = Verdict::from_label(&self.achieved).ok_or_else(|| {
            ResultSinkError::Decode(format!("unknown verdict: {}", self.achieved))
        })?;
        Ok(PublishedResult {
            username: self.username,
            attempts: self.attempts,
            points: self.points,
            verdict,
            completed_at: self.created_at,
        })
    }
}

//
// ─── HTTP ──────────────────────────────────────────────────────────────────────
//

/// Publishes to and lists from `{base}/api/result`.
#[derive(Clone)]
pub struct HttpResultSink {
    client: Client,
    base_url: String,
}

impl HttpResultSink {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    #[must_use]
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self) -> String {
        format!("{}/api/result", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ResultSink for HttpResultSink {
    async fn publish(&self, record: &ResultRecord) -> Result<(), ResultSinkError> {
        let payload = ResultPayload::from(record);
        let response = self.client.post(self.url()).json(&payload).send().await?;
        if !response.status().is_success() {
            return Err(ResultSinkError::HttpStatus(response.status()));
        }
        tracing::info!(username = %payload.username, "result published");
        Ok(())
    }
}

#[async_trait]
impl ResultBoard for HttpResultSink {
    async fn list_results(&self, limit: u32) -> Result<Vec<PublishedResult>, ResultSinkError> {
        let response = self.client.get(self.url()).send().await?;
        if !response.status().is_success() {
            return Err(ResultSinkError::HttpStatus(response.status()));
        }
        let body = response.text().await?;
        decode_board(&body, limit)
    }
}

/// Decode a `GET /api/result` body. The server lists oldest first.
///
/// Items that do not decode are skipped with a warning.
///
/// # Errors
///
/// Returns `ResultSinkError::Decode` when the body is not a JSON array.
pub fn decode_board(body: &str, limit: u32) -> Result<Vec<PublishedResult>, ResultSinkError> {
    let items: Vec<serde_json::Value> =
        serde_json::from_str(body).map_err(|e| ResultSinkError::Decode(e.to_string()))?;
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    Ok(items
        .into_iter()
        .rev()
        .filter_map(|item| {
            let decoded = serde_json::from_value::<ResultPayload>(item)
                .map_err(|e| ResultSinkError::Decode(e.to_string()))
                .and_then(ResultPayload::into_published);
            match decoded {
                Ok(row) => Some(row),
                Err(err) => {
                    tracing::warn!(error = %err, "skipping malformed result row");
                    None
                }
            }
        })
        .take(limit)
        .collect())
}

//
// ─── REPOSITORY ────────────────────────────────────────────────────────────────
//

/// Stores results in the local database.
#[derive(Clone)]
pub struct RepositoryResultSink {
    results: Arc<dyn ResultRepository>,
}

impl RepositoryResultSink {
    #[must_use]
    pub fn new(results: Arc<dyn ResultRepository>) -> Self {
        Self { results }
    }
}

#[async_trait]
impl ResultSink for RepositoryResultSink {
    async fn publish(&self, record: &ResultRecord) -> Result<(), ResultSinkError> {
        let id = self.results.append_result(record).await?;
        tracing::info!(result_id = %id, username = %record.username(), "result stored");
        Ok(())
    }
}

#[async_trait]
impl ResultBoard for RepositoryResultSink {
    async fn list_results(&self, limit: u32) -> Result<Vec<PublishedResult>, ResultSinkError> {
        let rows = self.results.list_results(limit).await?;
        Ok(rows
            .iter()
            .map(|row| PublishedResult::from(&row.record))
            .collect())
    }
}
