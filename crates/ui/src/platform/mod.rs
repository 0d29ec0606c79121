use std::sync::Arc;

use services::{Capability, SpeechRecognizer, SpeechSynthesizer};

mod scripts;
mod web_speech;

pub use web_speech::WebSpeech;

/// Speech capabilities for the desktop webview, or none when voice is off.
#[must_use]
pub fn speech_capabilities(
    voice_enabled: bool,
) -> (
    Capability<dyn SpeechSynthesizer>,
    Capability<dyn SpeechRecognizer>,
) {
    if !voice_enabled {
        return (Capability::Unavailable, Capability::Unavailable);
    }
    let speech = Arc::new(WebSpeech::new());
    let synth: Arc<dyn SpeechSynthesizer> = speech.clone();
    let recognizer: Arc<dyn SpeechRecognizer> = speech;
    (
        Capability::Available(synth),
        Capability::Available(recognizer),
    )
}
