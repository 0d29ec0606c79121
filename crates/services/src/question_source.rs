use std::sync::Arc;

use async_trait::async_trait;
use quiz_core::model::{Question, QuestionId};
use rand::seq::SliceRandom;
use reqwest::Client;
use serde::Deserialize;
use storage::repository::QuestionRepository;

use crate::error::QuestionSourceError;

/// Supplies the questions for one quiz.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// # Errors
    ///
    /// Returns `QuestionSourceError` if the questions cannot be fetched or decoded.
    async fn fetch_questions(&self) -> Result<Vec<Question>, QuestionSourceError>;
}

//
// ─── HTTP ──────────────────────────────────────────────────────────────────────
//

/// Fetches questions from `GET {base}/api/questions`.
#[derive(Clone)]
pub struct HttpQuestionSource {
    client: Client,
    base_url: String,
}

impl HttpQuestionSource {
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
        format!("{}/api/questions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl QuestionSource for HttpQuestionSource {
    async fn fetch_questions(&self) -> Result<Vec<Question>, QuestionSourceError> {
        let url = self.url();
        tracing::debug!(%url, "fetching questions");
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(QuestionSourceError::HttpStatus(response.status()));
        }
        let body = response.text().await?;
        decode_questions(&body)
    }
}

#[derive(Debug, Deserialize)]
struct KeyedQuestion {
    id: u64,
    question: String,
    options: Vec<String>,
    answer: usize,
}

#[derive(Debug, Deserialize)]
struct BareQuestion {
    id: u64,
    question: String,
    options: Vec<String>,
}

/// Questions and their answer key shipped side by side.
#[derive(Debug, Deserialize)]
struct QuestionBundle {
    questions: Vec<BareQuestion>,
    answers: Vec<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum QuestionPayload {
    Keyed(Vec<KeyedQuestion>),
    Bundles(Vec<QuestionBundle>),
    Bundle(QuestionBundle),
}

/// Decode a question payload in any of the accepted shapes.
///
/// # Errors
///
/// Returns `QuestionSourceError::Decode` for malformed JSON or an answer key
/// whose length does not match, and `QuestionSourceError::Question` for
/// questions that fail validation.
pub fn decode_questions(body: &str) -> Result<Vec<Question>, QuestionSourceError> {
    let payload: QuestionPayload =
        serde_json::from_str(body).map_err(|e| QuestionSourceError::Decode(e.to_string()))?;

    let bundles = match payload {
        QuestionPayload::Keyed(list) => {
            return list
                .into_iter()
                .map(|q| {
                    Question::new(QuestionId::new(q.id), q.question, q.options, q.answer)
                        .map_err(QuestionSourceError::from)
                })
                .collect();
        }
        QuestionPayload::Bundles(bundles) => bundles,
        QuestionPayload::Bundle(bundle) => vec![bundle],
    };

    let mut out = Vec::new();
    for bundle in bundles {
        if bundle.questions.len() != bundle.answers.len() {
            return Err(QuestionSourceError::Decode(format!(
                "{} questions but {} answers",
                bundle.questions.len(),
                bundle.answers.len()
            )));
        }
        for (q, answer) in bundle.questions.into_iter().zip(bundle.answers) {
            out.push(Question::new(
                QuestionId::new(q.id),
                q.question,
                q.options,
                answer,
            )?);
        }
    }
    Ok(out)
}

//
// ─── REPOSITORY ────────────────────────────────────────────────────────────────
//

/// Reads questions from the local bank, optionally shuffled.
#[derive(Clone)]
pub struct RepositoryQuestionSource {
    questions: Arc<dyn QuestionRepository>,
    quiz_length: usize,
    shuffle: bool,
}

impl RepositoryQuestionSource {
    #[must_use]
    pub fn new(questions: Arc<dyn QuestionRepository>, quiz_length: usize) -> Self {
        Self {
            questions,
            quiz_length,
            shuffle: false,
        }
    }

    /// Draw a random selection from the whole bank instead of the first entries.
    #[must_use]
    pub fn shuffled(mut self) -> Self {
        self.shuffle = true;
        self
    }
}

#[async_trait]
impl QuestionSource for RepositoryQuestionSource {
    async fn fetch_questions(&self) -> Result<Vec<Question>, QuestionSourceError> {
        let length = u32::try_from(self.quiz_length).unwrap_or(u32::MAX);
        let mut questions = if self.shuffle {
            let total = self.questions.count_questions().await?;
            let mut all = self.questions.list_questions(total).await?;
            all.shuffle(&mut rand::rng());
            all
        } else {
            self.questions.list_questions(length).await?
        };
        questions.truncate(self.quiz_length);
        Ok(questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::InMemoryRepository;
    use storage::seed_data::seed_if_empty;

    #[test]
    fn decodes_keyed_list() {
        let body = r#"[
            {"id": 1, "question": "2 + 2?", "options": ["3", "4", "5"], "answer": 1}
        ]"#;
        let questions = decode_questions(body).unwrap();
        assert_eq!(questions.len(), 1);
        assert!(questions[0].is_correct(1));
    }

    #[test]
    fn decodes_bundles_with_answer_key() {
        let body = r#"[{
            "questions": [
                {"id": 1, "question": "A?", "options": ["x", "y", "z"]},
                {"id": 2, "question": "B?", "options": ["x", "y", "z"]}
            ],
            "answers": [2, 0]
        }]"#;
        let questions = decode_questions(body).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].answer(), 2);
        assert_eq!(questions[1].id(), QuestionId::new(2));
    }

    #[test]
    fn mismatched_answer_key_is_rejected() {
        let body = r#"{
            "questions": [{"id": 1, "question": "A?", "options": ["x", "y"]}],
            "answers": []
        }"#;
        assert!(matches!(
            decode_questions(body),
            Err(QuestionSourceError::Decode(_))
        ));
    }

    #[test]
    fn invalid_question_is_rejected() {
        let body = r#"[{"id": 1, "question": "A?", "options": ["x", "y"], "answer": 5}]"#;
        assert!(matches!(
            decode_questions(body),
            Err(QuestionSourceError::Question(_))
        ));
    }

    #[tokio::test]
    async fn repository_source_truncates_to_length() {
        let repo = Arc::new(InMemoryRepository::new());
        seed_if_empty(repo.as_ref()).await.unwrap();

        let source = RepositoryQuestionSource::new(repo.clone(), 4);
        let questions = source.fetch_questions().await.unwrap();
        assert_eq!(questions.len(), 4);
        assert_eq!(questions[0].id(), QuestionId::new(1));

        let shuffled = RepositoryQuestionSource::new(repo, 4).shuffled();
        let questions = shuffled.fetch_questions().await.unwrap();
        assert_eq!(questions.len(), 4);
    }
}
