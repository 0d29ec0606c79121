use std::env;
use std::str::FromStr;

use quiz_core::scoring::{ScoringError, ScoringPolicy};

/// Which welcome message is spoken on the main view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WelcomeMessage {
    #[default]
    Brief,
    Detailed,
}

impl FromStr for WelcomeMessage {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "brief" => Ok(Self::Brief),
            "detailed" => Ok(Self::Detailed),
            other => Err(format!("unknown welcome message: {other}")),
        }
    }
}

/// Runtime settings for a quiz session.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizConfig {
    pub quiz_length: usize,
    pub points_per_question: u32,
    pub pass_percent: u8,
    pub speech_rate: f32,
    pub speech_locale: String,
    pub welcome: WelcomeMessage,
    /// When set, questions and results go through the HTTP service at this base URL.
    pub api_url: Option<String>,
    pub voice_enabled: bool,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            quiz_length: 10,
            points_per_question: ScoringPolicy::DEFAULT_POINTS_PER_QUESTION,
            pass_percent: ScoringPolicy::DEFAULT_PASS_PERCENT,
            speech_rate: 1.0,
            speech_locale: "en-US".into(),
            welcome: WelcomeMessage::Brief,
            api_url: None,
            voice_enabled: true,
        }
    }
}

impl QuizConfig {
    /// Read `QUIZ_*` environment variables, falling back to defaults for
    /// anything missing or unparsable.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let parsed = |key: &str| lookup(key).map(|v| v.trim().to_owned());

        let quiz_length = parsed("QUIZ_LENGTH")
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(defaults.quiz_length);
        let points_per_question = parsed("QUIZ_POINTS_PER_QUESTION")
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(defaults.points_per_question);
        let pass_percent = parsed("QUIZ_PASS_PERCENT")
            .and_then(|v| v.parse::<u8>().ok())
            .unwrap_or(defaults.pass_percent);
        let speech_rate = parsed("QUIZ_SPEECH_RATE")
            .and_then(|v| v.parse::<f32>().ok())
            .filter(|r| r.is_finite() && *r > 0.0)
            .unwrap_or(defaults.speech_rate);
        let speech_locale = parsed("QUIZ_SPEECH_LOCALE")
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.speech_locale);
        let welcome = parsed("QUIZ_WELCOME")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.welcome);
        let api_url = parsed("QUIZ_API_URL").filter(|v| !v.is_empty());
        let voice_enabled = parsed("QUIZ_VOICE")
            .map_or(defaults.voice_enabled, |v| !v.eq_ignore_ascii_case("off"));

        Self {
            quiz_length,
            points_per_question,
            pass_percent,
            speech_rate,
            speech_locale,
            welcome,
            api_url,
            voice_enabled,
        }
    }

    /// # Errors
    ///
    /// Returns `ScoringError` when the configured points or pass percent are out of range.
    pub fn scoring_policy(&self) -> Result<ScoringPolicy, ScoringError> {
        ScoringPolicy::new(self.points_per_question, self.pass_percent)
    }

    #[must_use]
    pub fn welcome_text(&self) -> String {
        let intro = format!(
            "Welcome to the Quiz Application. You will be asked {} questions one after another.",
            self.quiz_length
        );
        match self.welcome {
            WelcomeMessage::Brief => format!("{intro} Press Enter to start the quiz."),
            WelcomeMessage::Detailed => format!(
                "{intro} {} points is awarded for the correct answer. \
                 Each question has several options. You can choose only one of them. \
                 You can review and change answers before the quiz finishes. \
                 The result will be declared at the end of the quiz. \
                 You can start the quiz by typing your username, or by speaking after \
                 pressing the slash key. Press Enter to start the quiz.",
                self.points_per_question
            ),
        }
    }
}
