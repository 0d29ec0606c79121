use std::sync::Arc;

use services::{Narrator, QuizConfig, QuizService, Transcriber};

pub trait UiApp: Send + Sync {
    fn config(&self) -> QuizConfig;

    fn quiz_service(&self) -> Arc<QuizService>;
    fn narrator(&self) -> Arc<Narrator>;
    fn transcriber(&self) -> Arc<Transcriber>;
}

#[derive(Clone)]
pub struct AppContext {
    config: QuizConfig,
    quiz: Arc<QuizService>,
    narrator: Arc<Narrator>,
    transcriber: Arc<Transcriber>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            config: app.config(),
            quiz: app.quiz_service(),
            narrator: app.narrator(),
            transcriber: app.transcriber(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    #[must_use]
    pub fn quiz(&self) -> Arc<QuizService> {
        Arc::clone(&self.quiz)
    }

    #[must_use]
    pub fn narrator(&self) -> Arc<Narrator> {
        Arc::clone(&self.narrator)
    }

    #[must_use]
    pub fn transcriber(&self) -> Arc<Transcriber> {
        Arc::clone(&self.transcriber)
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
