use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dioxus::document;
use dioxus::prelude::spawn;
use serde::Deserialize;
use services::{SpeechError, SpeechRecognizer, SpeechSynthesizer, Utterance};

use super::scripts::{CANCEL_SCRIPT, recognize_script, speak_script};

/// Speech through the webview's `speechSynthesis` and `SpeechRecognition` APIs.
///
/// Must be used from inside the running Dioxus app. Some webviews (WebKitGTK)
/// ship without `speechSynthesis`; the speak script reports that back and
/// later calls fail with `SpeechError::Unavailable`.
#[derive(Debug, Clone, Default)]
pub struct WebSpeech {
    synthesis_missing: Arc<AtomicBool>,
}

impl WebSpeech {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SpeechSynthesizer for WebSpeech {
    fn speak(&self, utterance: &Utterance) -> Result<(), SpeechError> {
        if self.synthesis_missing.load(Ordering::Relaxed) {
            return Err(SpeechError::Unavailable);
        }
        let js = speak_script(&utterance.text, utterance.rate, &utterance.locale);
        let mut eval = document::eval(&js);
        let missing = Arc::clone(&self.synthesis_missing);
        spawn(async move {
            if let Ok(false) = eval.recv::<bool>().await {
                if !missing.swap(true, Ordering::Relaxed) {
                    tracing::warn!("webview has no speechSynthesis, narration disabled");
                }
            }
        });
        Ok(())
    }

    fn cancel(&self) {
        let _ = document::eval(CANCEL_SCRIPT);
    }
}

#[derive(Debug, Default, Deserialize)]
struct RecognitionMessage {
    #[serde(default)]
    transcript: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    unsupported: bool,
}

impl RecognitionMessage {
    fn into_transcript(self) -> Result<String, SpeechError> {
        if self.unsupported {
            return Err(SpeechError::Unavailable);
        }
        match (self.transcript, self.error) {
            (_, Some(error)) => Err(SpeechError::Engine(error)),
            (Some(transcript), None) => Ok(transcript),
            (None, None) => Ok(String::new()),
        }
    }
}

#[async_trait(?Send)]
impl SpeechRecognizer for WebSpeech {
    async fn transcribe_once(&self, locale: &str) -> Result<String, SpeechError> {
        let mut eval = document::eval(&recognize_script(locale));
        let message: RecognitionMessage = eval
            .recv()
            .await
            .map_err(|err| SpeechError::Engine(format!("{err:?}")))?;
        message.into_transcript()
    }
}
