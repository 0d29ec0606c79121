//! Text-to-speech and one-shot speech-to-text behind injectable capabilities.
//!
//! Platform engines implement [`SpeechSynthesizer`] and [`SpeechRecognizer`];
//! the rest of the app only talks to [`Narrator`] and [`Transcriber`], which
//! degrade gracefully when the engine is missing.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use crate::config::QuizConfig;
use crate::error::SpeechError;

/// One spoken message.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    /// Rate multiplier, `1.0` is normal speed.
    pub rate: f32,
    pub locale: String,
}

pub trait SpeechSynthesizer: Send + Sync {
    /// Queue `utterance` for playback.
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Engine` when the platform rejects the utterance.
    fn speak(&self, utterance: &Utterance) -> Result<(), SpeechError>;

    /// Stop current playback and drop anything queued.
    fn cancel(&self);
}

#[async_trait(?Send)]
pub trait SpeechRecognizer: Send + Sync {
    /// Listen once and resolve with the best transcript.
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Engine` when recognition fails or is aborted.
    async fn transcribe_once(&self, locale: &str) -> Result<String, SpeechError>;
}

/// A platform capability that may be missing at runtime.
pub enum Capability<T: ?Sized> {
    Available(Arc<T>),
    Unavailable,
}

impl<T: ?Sized> Clone for Capability<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Available(inner) => Self::Available(Arc::clone(inner)),
            Self::Unavailable => Self::Unavailable,
        }
    }
}

impl<T: ?Sized> Capability<T> {
    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    #[must_use]
    pub fn get(&self) -> Option<&Arc<T>> {
        match self {
            Self::Available(inner) => Some(inner),
            Self::Unavailable => None,
        }
    }
}

impl<T: ?Sized> std::fmt::Debug for Capability<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available(_) => f.write_str("Available"),
            Self::Unavailable => f.write_str("Unavailable"),
        }
    }
}

//
// ─── NARRATOR ──────────────────────────────────────────────────────────────────
//

/// Speaks prompts, always cancelling whatever is playing first.
///
/// An engine that reports `SpeechError::Unavailable` is not called again.
pub struct Narrator {
    synth: Capability<dyn SpeechSynthesizer>,
    rate: f32,
    locale: String,
    degraded: AtomicBool,
}

impl Narrator {
    #[must_use]
    pub fn new(synth: Capability<dyn SpeechSynthesizer>, config: &QuizConfig) -> Self {
        Self {
            synth,
            rate: config.speech_rate,
            locale: config.speech_locale.clone(),
            degraded: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn silent() -> Self {
        Self::new(Capability::Unavailable, &QuizConfig::default())
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.synth.is_available() && !self.degraded.load(Ordering::Relaxed)
    }

    fn degrade(&self) {
        if !self.degraded.swap(true, Ordering::Relaxed) {
            tracing::warn!("speech synthesis unavailable, narration disabled");
        }
    }

    pub fn speak(&self, text: &str) {
        let Some(synth) = self.synth.get().filter(|_| self.is_available()) else {
            self.degrade();
            return;
        };
        synth.cancel();
        let utterance = Utterance {
            text: text.to_owned(),
            rate: self.rate,
            locale: self.locale.clone(),
        };
        match synth.speak(&utterance) {
            Ok(()) => {}
            Err(SpeechError::Unavailable) => self.degrade(),
            Err(err) => tracing::warn!(error = %err, "speech synthesis failed"),
        }
    }

    pub fn cancel(&self) {
        if let Some(synth) = self.synth.get() {
            synth.cancel();
        }
    }
}

//
// ─── TRANSCRIBER ───────────────────────────────────────────────────────────────
//

/// One-shot voice capture. At most one transcription runs at a time.
pub struct Transcriber {
    recognizer: Capability<dyn SpeechRecognizer>,
    locale: String,
    pending: AtomicBool,
}

struct PendingGuard<'a>(&'a AtomicBool);

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Transcriber {
    #[must_use]
    pub fn new(recognizer: Capability<dyn SpeechRecognizer>, config: &QuizConfig) -> Self {
        Self {
            recognizer,
            locale: config.speech_locale.clone(),
            pending: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn disabled() -> Self {
        Self::new(Capability::Unavailable, &QuizConfig::default())
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.recognizer.is_available()
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Listen once and return the trimmed transcript.
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Unavailable` without a recognizer,
    /// `SpeechError::Busy` while another transcription is pending, or the
    /// engine's error.
    pub async fn listen(&self) -> Result<String, SpeechError> {
        let Some(recognizer) = self.recognizer.get() else {
            tracing::warn!("speech recognition unavailable");
            return Err(SpeechError::Unavailable);
        };
        if self.pending.swap(true, Ordering::AcqRel) {
            return Err(SpeechError::Busy);
        }
        let _guard = PendingGuard(&self.pending);

        tracing::debug!(locale = %self.locale, "transcription started");
        let transcript = recognizer
            .transcribe_once(&self.locale)
            .await
            .inspect_err(|err| match err {
                SpeechError::Unavailable => tracing::warn!("speech recognition unavailable"),
                other => tracing::warn!(error = %other, "transcription failed"),
            })?;
        Ok(transcript.trim().to_owned())
    }
}
