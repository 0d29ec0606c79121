use std::sync::Arc;

use quiz_core::model::{QuestionSet, ResultRecord};
use quiz_core::scoring::ScoringPolicy;
use quiz_core::store::QuizStore;

use crate::Clock;
use crate::error::QuizServiceError;
use crate::question_source::QuestionSource;
use crate::result_sink::{PublishedResult, ResultBoard, ResultSink};

/// Loads question sets and publishes finished quizzes.
#[derive(Clone)]
pub struct QuizService {
    clock: Clock,
    policy: ScoringPolicy,
    quiz_length: usize,
    source: Arc<dyn QuestionSource>,
    sink: Arc<dyn ResultSink>,
    board: Arc<dyn ResultBoard>,
}

impl QuizService {
    #[must_use]
    pub fn new(
        clock: Clock,
        policy: ScoringPolicy,
        quiz_length: usize,
        source: Arc<dyn QuestionSource>,
        sink: Arc<dyn ResultSink>,
        board: Arc<dyn ResultBoard>,
    ) -> Self {
        Self {
            clock,
            policy,
            quiz_length,
            source,
            sink,
            board,
        }
    }

    #[must_use]
    pub fn policy(&self) -> ScoringPolicy {
        self.policy
    }

    #[must_use]
    pub fn quiz_length(&self) -> usize {
        self.quiz_length
    }

    /// Fetch the questions for a new quiz.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::WrongLength` unless exactly `quiz_length`
    /// questions arrive, or the source error.
    pub async fn load_question_set(&self) -> Result<QuestionSet, QuizServiceError> {
        let questions = self.source.fetch_questions().await?;
        if questions.len() != self.quiz_length {
            tracing::warn!(
                expected = self.quiz_length,
                actual = questions.len(),
                "question source returned the wrong number of questions"
            );
            return Err(QuizServiceError::WrongLength {
                expected: self.quiz_length,
                actual: questions.len(),
            });
        }
        tracing::debug!(count = questions.len(), "question set loaded");
        Ok(QuestionSet::new(questions)?)
    }

    /// Build the publishable record for `store`, stamped with the service clock.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Store` if the quiz has not been set up.
    pub fn record_for(&self, store: &QuizStore) -> Result<ResultRecord, QuizServiceError> {
        Ok(store.to_record(&self.policy, self.clock.now())?)
    }

    /// Publish a finished quiz. Failures are logged and returned; callers
    /// treat them as non-fatal.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Sink` if the sink rejected the result.
    pub async fn publish(&self, record: &ResultRecord) -> Result<(), QuizServiceError> {
        if let Err(err) = self.sink.publish(record).await {
            tracing::warn!(error = %err, "publishing result failed");
            return Err(err.into());
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `QuizServiceError::Sink` if the board cannot be read.
    pub async fn recent_results(
        &self,
        limit: u32,
    ) -> Result<Vec<PublishedResult>, QuizServiceError> {
        Ok(self.board.list_results(limit).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{QuestionSourceError, ResultSinkError};
    use crate::result_sink::RepositoryResultSink;
    use async_trait::async_trait;
    use quiz_core::model::{Question, QuestionId, Username};
    use quiz_core::store::QuizAction;
    use quiz_core::time::fixed_clock;
    use storage::repository::InMemoryRepository;

    struct FixedSource(usize);

    #[async_trait]
    impl QuestionSource for FixedSource {
        async fn fetch_questions(&self) -> Result<Vec<Question>, QuestionSourceError> {
            Ok((0..self.0)
                .map(|i| {
                    Question::new(
                        QuestionId::new(i as u64 + 1),
                        format!("Q{i}"),
                        vec!["a".into(), "b".into(), "c".into()],
                        0,
                    )
                    .unwrap()
                })
                .collect())
        }
    }

    struct FailingSink;

    #[async_trait]
    impl ResultSink for FailingSink {
        async fn publish(&self, _record: &ResultRecord) -> Result<(), ResultSinkError> {
            Err(ResultSinkError::Decode("offline".into()))
        }
    }

    fn service(count: usize, sink: Arc<dyn ResultSink>) -> QuizService {
        let repo = Arc::new(InMemoryRepository::new());
        QuizService::new(
            fixed_clock(),
            ScoringPolicy::default(),
            3,
            Arc::new(FixedSource(count)),
            sink,
            Arc::new(RepositoryResultSink::new(repo)),
        )
    }

    #[tokio::test]
    async fn wrong_length_is_rejected() {
        let repo = Arc::new(InMemoryRepository::new());
        let svc = service(2, Arc::new(RepositoryResultSink::new(repo)));
        let err = svc.load_question_set().await.unwrap_err();
        assert!(matches!(
            err,
            QuizServiceError::WrongLength {
                expected: 3,
                actual: 2
            }
        ));
    }

    #[tokio::test]
    async fn finished_quiz_is_published_and_listed() {
        let repo = Arc::new(InMemoryRepository::new());
        let sink = Arc::new(RepositoryResultSink::new(repo.clone()));
        let svc = QuizService::new(
            fixed_clock(),
            ScoringPolicy::default(),
            3,
            Arc::new(FixedSource(3)),
            sink.clone(),
            sink,
        );

        let mut store = QuizStore::new();
        store
            .dispatch(QuizAction::SetUsername(Username::new("ada").unwrap()))
            .unwrap();
        store
            .dispatch(QuizAction::StartExam(svc.load_question_set().await.unwrap()))
            .unwrap();
        store.dispatch(QuizAction::SelectCurrent(0)).unwrap();
        store.dispatch(QuizAction::MoveNext).unwrap();
        store.dispatch(QuizAction::SelectCurrent(0)).unwrap();

        let record = svc.record_for(&store).unwrap();
        assert_eq!(record.points(), 20);
        svc.publish(&record).await.unwrap();

        let rows = svc.recent_results(5).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].username, "ada");
        assert_eq!(rows[0].attempts, 2);
    }

    #[tokio::test]
    async fn publish_failure_is_reported() {
        let svc = service(3, Arc::new(FailingSink));
        let mut store = QuizStore::new();
        store
            .dispatch(QuizAction::SetUsername(Username::new("bob").unwrap()))
            .unwrap();
        store
            .dispatch(QuizAction::StartExam(svc.load_question_set().await.unwrap()))
            .unwrap();
        let record = svc.record_for(&store).unwrap();
        assert!(matches!(
            svc.publish(&record).await,
            Err(QuizServiceError::Sink(_))
        ));
    }

    #[test]
    fn record_requires_a_loaded_quiz() {
        let svc = service(3, Arc::new(FailingSink));
        assert!(matches!(
            svc.record_for(&QuizStore::new()),
            Err(QuizServiceError::Store(_))
        ));
    }
}
