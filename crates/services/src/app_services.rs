use std::sync::Arc;

use storage::repository::Storage;
use storage::seed_data::seed_if_empty;

use crate::Clock;
use crate::config::QuizConfig;
use crate::error::AppServicesError;
use crate::question_source::{HttpQuestionSource, RepositoryQuestionSource};
use crate::quiz_service::QuizService;
use crate::result_sink::{HttpResultSink, RepositoryResultSink};

/// Assembles app-facing services from configuration.
#[derive(Clone)]
pub struct AppServices {
    config: QuizConfig,
    quiz: Arc<QuizService>,
}

impl AppServices {
    /// Use the HTTP service when `config.api_url` is set, `SQLite` otherwise.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails or the
    /// scoring settings are invalid.
    pub async fn from_config(
        db_url: &str,
        clock: Clock,
        config: QuizConfig,
    ) -> Result<Self, AppServicesError> {
        match config.api_url.clone() {
            Some(api_url) => Self::new_http(&api_url, clock, config),
            None => Self::new_sqlite(db_url, clock, config).await,
        }
    }

    /// Build services backed by `SQLite` storage, seeding an empty bank.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or seeding fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        config: QuizConfig,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        tracing::info!(db_url, "using sqlite question bank");
        Self::from_storage(storage, clock, config).await
    }

    /// Build services backed by the in-memory repository.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if seeding fails or the scoring settings are invalid.
    pub async fn in_memory(clock: Clock, config: QuizConfig) -> Result<Self, AppServicesError> {
        Self::from_storage(Storage::in_memory(), clock, config).await
    }

    async fn from_storage(
        storage: Storage,
        clock: Clock,
        config: QuizConfig,
    ) -> Result<Self, AppServicesError> {
        seed_if_empty(storage.questions.as_ref()).await?;

        let source = Arc::new(
            RepositoryQuestionSource::new(Arc::clone(&storage.questions), config.quiz_length)
                .shuffled(),
        );
        let sink = Arc::new(RepositoryResultSink::new(Arc::clone(&storage.results)));
        let quiz = Arc::new(QuizService::new(
            clock,
            config.scoring_policy()?,
            config.quiz_length,
            source,
            sink.clone(),
            sink,
        ));
        Ok(Self { config, quiz })
    }

    /// Build services that talk to the quiz HTTP service.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the URL is blank or the scoring settings are invalid.
    pub fn new_http(
        api_url: &str,
        clock: Clock,
        config: QuizConfig,
    ) -> Result<Self, AppServicesError> {
        if api_url.trim().is_empty() {
            return Err(AppServicesError::Config("api url is empty".into()));
        }
        tracing::info!(api_url, "using http question service");
        let client = reqwest::Client::new();
        let source = Arc::new(HttpQuestionSource::with_client(client.clone(), api_url));
        let sink = Arc::new(HttpResultSink::with_client(client, api_url));
        let quiz = Arc::new(QuizService::new(
            clock,
            config.scoring_policy()?,
            config.quiz_length,
            source,
            sink.clone(),
            sink,
        ));
        Ok(Self { config, quiz })
    }

    #[must_use]
    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    #[must_use]
    pub fn quiz(&self) -> Arc<QuizService> {
        Arc::clone(&self.quiz)
    }
}
