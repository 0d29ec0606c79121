//! Username capture and confirmation, gating entry into the quiz.
//!
//! The flow is a pure state machine. Every input returns the ordered list of
//! side effects the caller must perform (speech, input surface updates,
//! transcription, navigation); nothing here touches the outside world.

use crate::keys::QuizKey;
use crate::model::Username;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowPhase {
    Idle,
    Capturing,
    Confirming,
    Started,
}

/// Spoken prompts emitted by the flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    ConfirmUsername(Username),
    ConfirmationCanceled,
    EnterUsernameHint,
    InvalidUsername,
}

impl Prompt {
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Prompt::ConfirmUsername(name) => format!(
                "You entered {name}. Do you want to use this username? \
                 Press Enter to confirm or any other key to cancel."
            ),
            Prompt::ConfirmationCanceled => {
                "Username confirmation canceled. Please enter your username again.".to_string()
            }
            Prompt::EnterUsernameHint => {
                "Please enter your username and press Enter to confirm.".to_string()
            }
            Prompt::InvalidUsername => {
                "Please enter a valid username before starting the quiz.".to_string()
            }
        }
    }
}

/// Visible notices shown next to the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    TranscriptionFailed(String),
    NothingHeard,
}

impl Notice {
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Notice::TranscriptionFailed(reason) => {
                format!("Voice input failed ({reason}). Type your username instead.")
            }
            Notice::NothingHeard => "No username was heard. Try again or type it.".to_string(),
        }
    }
}

/// Side effects requested by the flow, to be executed in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEffect {
    CancelSpeech,
    Speak(Prompt),
    ClearInput,
    SetInput(String),
    /// Start a one-shot transcription; hand its outcome back with the same id.
    StartTranscription(CaptureId),
    Notice(Notice),
    Start(Username),
}

/// Identifies one voice capture so late results can be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CaptureId(u64);

/// Result of a one-shot voice transcription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptOutcome {
    Heard(String),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsernameFlow {
    phase: FlowPhase,
    draft: String,
    candidate: Option<Username>,
    capture: Option<CaptureId>,
    next_capture: u64,
}

impl Default for UsernameFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl UsernameFlow {
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: FlowPhase::Idle,
            draft: String::new(),
            candidate: None,
            capture: None,
            next_capture: 0,
        }
    }

    #[must_use]
    pub fn phase(&self) -> FlowPhase {
        self.phase
    }

    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    #[must_use]
    pub fn candidate(&self) -> Option<&Username> {
        self.candidate.as_ref()
    }

    #[must_use]
    pub fn is_confirming(&self) -> bool {
        self.phase == FlowPhase::Confirming
    }

    /// True while a transcription is pending.
    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.capture.is_some()
    }

    /// The committed username once the flow reached `Started`.
    #[must_use]
    pub fn username(&self) -> Option<&Username> {
        match self.phase {
            FlowPhase::Started => self.candidate.as_ref(),
            _ => None,
        }
    }

    /// Mirror the text currently in the input surface.
    ///
    /// Ignored while confirming (the input is disabled) and after the flow started.
    pub fn set_draft(&mut self, text: impl Into<String>) {
        if matches!(self.phase, FlowPhase::Confirming | FlowPhase::Started) {
            return;
        }
        self.draft = text.into();
        self.phase = if self.draft.is_empty() && self.capture.is_none() {
            FlowPhase::Idle
        } else {
            FlowPhase::Capturing
        };
    }

    /// Handle a key press.
    pub fn on_key(&mut self, key: &QuizKey) -> Vec<FlowEffect> {
        match self.phase {
            FlowPhase::Started => Vec::new(),
            FlowPhase::Confirming => match key {
                QuizKey::Enter => self.commit(),
                _ => self.cancel(),
            },
            FlowPhase::Idle | FlowPhase::Capturing => match key {
                QuizKey::Enter => match Username::new(&self.draft) {
                    Ok(name) => self.enter_confirming(name),
                    Err(_) => vec![FlowEffect::Speak(Prompt::InvalidUsername)],
                },
                QuizKey::Space if self.draft.trim().is_empty() => {
                    vec![FlowEffect::Speak(Prompt::EnterUsernameHint)]
                }
                QuizKey::Slash if self.capture.is_none() => {
                    self.next_capture += 1;
                    let capture = CaptureId(self.next_capture);
                    self.capture = Some(capture);
                    self.phase = FlowPhase::Capturing;
                    vec![FlowEffect::StartTranscription(capture)]
                }
                _ => Vec::new(),
            },
        }
    }

    /// Handle the single resolution of a transcription started by `/`.
    ///
    /// Outcomes for a capture that was abandoned (the user confirmed a typed
    /// name or cancelled in the meantime) are dropped.
    pub fn on_transcript(
        &mut self,
        capture: CaptureId,
        outcome: TranscriptOutcome,
    ) -> Vec<FlowEffect> {
        if self.capture != Some(capture) {
            return Vec::new();
        }
        self.capture = None;
        if !matches!(self.phase, FlowPhase::Idle | FlowPhase::Capturing) {
            return Vec::new();
        }

        match outcome {
            TranscriptOutcome::Heard(text) => match Username::new(&text) {
                Ok(name) => {
                    self.draft = name.as_str().to_string();
                    let mut effects = vec![FlowEffect::SetInput(self.draft.clone())];
                    effects.extend(self.enter_confirming(name));
                    effects
                }
                Err(_) => {
                    self.phase = FlowPhase::Capturing;
                    vec![FlowEffect::Notice(Notice::NothingHeard)]
                }
            },
            TranscriptOutcome::Failed(reason) => {
                self.phase = FlowPhase::Capturing;
                vec![FlowEffect::Notice(Notice::TranscriptionFailed(reason))]
            }
        }
    }

    /// Pointer confirmation ("Start Quiz"); only effective while confirming.
    pub fn confirm(&mut self) -> Vec<FlowEffect> {
        if self.phase == FlowPhase::Confirming {
            self.commit()
        } else {
            Vec::new()
        }
    }

    fn enter_confirming(&mut self, name: Username) -> Vec<FlowEffect> {
        self.capture = None;
        self.phase = FlowPhase::Confirming;
        self.candidate = Some(name.clone());
        vec![
            FlowEffect::CancelSpeech,
            FlowEffect::Speak(Prompt::ConfirmUsername(name)),
        ]
    }

    fn commit(&mut self) -> Vec<FlowEffect> {
        let Some(name) = self.candidate.clone() else {
            return Vec::new();
        };
        self.phase = FlowPhase::Started;
        vec![FlowEffect::CancelSpeech, FlowEffect::Start(name)]
    }

    fn cancel(&mut self) -> Vec<FlowEffect> {
        self.capture = None;
        self.phase = FlowPhase::Idle;
        self.candidate = None;
        self.draft.clear();
        vec![
            FlowEffect::ClearInput,
            FlowEffect::Speak(Prompt::ConfirmationCanceled),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn typed(text: &str) -> UsernameFlow {
        let mut flow = UsernameFlow::new();
        flow.set_draft(text);
        flow
    }

    #[test]
    fn typed_username_is_confirmed_then_started() {
        let mut flow = typed("  ada ");
        assert_eq!(flow.phase(), FlowPhase::Capturing);

        let effects = flow.on_key(&QuizKey::Enter);
        let name = Username::new("ada").unwrap();
        assert_eq!(
            effects,
            vec![
                FlowEffect::CancelSpeech,
                FlowEffect::Speak(Prompt::ConfirmUsername(name.clone())),
            ]
        );
        assert!(flow.is_confirming());

        let effects = flow.on_key(&QuizKey::Enter);
        assert_eq!(
            effects,
            vec![FlowEffect::CancelSpeech, FlowEffect::Start(name.clone())]
        );
        assert_eq!(flow.username(), Some(&name));
    }

    #[test]
    fn empty_username_stays_put() {
        let mut flow = typed("   ");
        let effects = flow.on_key(&QuizKey::Enter);
        assert_eq!(effects, vec![FlowEffect::Speak(Prompt::InvalidUsername)]);
        assert!(!flow.is_confirming());

        flow.set_draft("bob");
        assert_eq!(flow.phase(), FlowPhase::Capturing);
    }

    #[test]
    fn space_without_text_only_speaks_hint() {
        let mut flow = UsernameFlow::new();
        let effects = flow.on_key(&QuizKey::Space);
        assert_eq!(effects, vec![FlowEffect::Speak(Prompt::EnterUsernameHint)]);
        assert_eq!(flow.phase(), FlowPhase::Idle);

        let mut flow = typed("ada");
        assert!(flow.on_key(&QuizKey::Space).is_empty());
    }

    #[test]
    fn confirm_button_requires_confirming() {
        let mut flow = typed("ada");
        assert!(flow.confirm().is_empty());
        assert_eq!(flow.username(), None);

        flow.on_key(&QuizKey::Enter);
        let effects = flow.confirm();
        assert!(matches!(effects.last(), Some(FlowEffect::Start(_))));
    }

    #[test]
    fn draft_is_frozen_while_confirming() {
        let mut flow = typed("ada");
        flow.on_key(&QuizKey::Enter);
        flow.set_draft("eve");
        assert_eq!(flow.draft(), "ada");
    }

    fn start_capture(flow: &mut UsernameFlow) -> CaptureId {
        match flow.on_key(&QuizKey::Slash).as_slice() {
            [FlowEffect::StartTranscription(capture)] => *capture,
            other => panic!("expected a transcription to start, got {other:?}"),
        }
    }

    #[test]
    fn voice_transcript_enters_confirming() {
        let mut flow = UsernameFlow::new();
        let capture = start_capture(&mut flow);
        assert!(flow.is_listening());
        // A second `/` while pending is ignored.
        assert!(flow.on_key(&QuizKey::Slash).is_empty());

        let effects = flow.on_transcript(capture, TranscriptOutcome::Heard(" grace ".into()));
        assert_eq!(effects[0], FlowEffect::SetInput("grace".into()));
        assert!(flow.is_confirming());
        assert_eq!(flow.draft(), "grace");
        assert!(!flow.is_listening());
    }

    #[test]
    fn transcription_failure_keeps_capturing() {
        let mut flow = UsernameFlow::new();
        let capture = start_capture(&mut flow);
        let effects = flow.on_transcript(capture, TranscriptOutcome::Failed("unsupported".into()));
        assert_eq!(
            effects,
            vec![FlowEffect::Notice(Notice::TranscriptionFailed(
                "unsupported".into()
            ))]
        );
        assert_eq!(flow.phase(), FlowPhase::Capturing);
        assert!(!flow.is_listening());

        // The typed path still works afterwards.
        flow.set_draft("ada");
        flow.on_key(&QuizKey::Enter);
        flow.on_key(&QuizKey::Enter);
        assert_eq!(flow.username().map(Username::as_str), Some("ada"));
    }

    #[test]
    fn unsolicited_transcript_is_ignored() {
        let mut flow = UsernameFlow::new();
        assert!(flow
            .on_transcript(CaptureId(1), TranscriptOutcome::Heard("ada".into()))
            .is_empty());
        assert_eq!(flow.phase(), FlowPhase::Idle);
    }

    #[test]
    fn cancelled_confirmation_drops_pending_capture() {
        let mut flow = UsernameFlow::new();
        let capture = start_capture(&mut flow);
        flow.set_draft("ada");
        flow.on_key(&QuizKey::Enter);
        assert!(flow.is_confirming());
        assert!(!flow.is_listening());

        flow.on_key(&QuizKey::Other);
        assert_eq!(flow.phase(), FlowPhase::Idle);
        assert!(!flow.is_listening());

        flow.set_draft("");
        assert_eq!(flow.phase(), FlowPhase::Idle);

        let effects = flow.on_transcript(capture, TranscriptOutcome::Heard("bob".into()));
        assert!(effects.is_empty());
        assert_eq!(flow.phase(), FlowPhase::Idle);
        assert!(flow.candidate().is_none());
    }

    #[test]
    fn late_outcome_of_an_earlier_capture_is_ignored() {
        let mut flow = UsernameFlow::new();
        let first = start_capture(&mut flow);
        flow.set_draft("ada");
        flow.on_key(&QuizKey::Enter);
        flow.on_key(&QuizKey::Other);

        let second = start_capture(&mut flow);
        assert_ne!(first, second);
        assert!(flow
            .on_transcript(first, TranscriptOutcome::Heard("bob".into()))
            .is_empty());
        assert!(flow.is_listening());

        flow.on_transcript(second, TranscriptOutcome::Heard("cy".into()));
        assert_eq!(flow.candidate().map(Username::as_str), Some("cy"));
    }

    #[test]
    fn started_ignores_further_keys() {
        let mut flow = typed("ada");
        flow.on_key(&QuizKey::Enter);
        flow.on_key(&QuizKey::Enter);
        assert!(flow.on_key(&QuizKey::Other).is_empty());
        assert_eq!(flow.phase(), FlowPhase::Started);
    }

    fn non_enter_key() -> impl Strategy<Value = QuizKey> {
        prop_oneof![
            Just(QuizKey::Space),
            Just(QuizKey::Slash),
            Just(QuizKey::Other),
            (1u8..=9).prop_map(QuizKey::Digit),
        ]
    }

    proptest! {
        #[test]
        fn any_trimmed_name_is_committed(name in "[a-zA-Z0-9_]{1,12}", pad in " {0,3}") {
            let mut flow = typed(&format!("{pad}{name}{pad}"));
            flow.on_key(&QuizKey::Enter);
            flow.on_key(&QuizKey::Enter);
            prop_assert_eq!(flow.username().map(Username::as_str), Some(name.as_str()));
        }

        #[test]
        fn non_enter_cancels_confirmation(name in "[a-z]{1,8}", key in non_enter_key()) {
            let mut flow = typed(&name);
            flow.on_key(&QuizKey::Enter);
            let effects = flow.on_key(&key);
            prop_assert_eq!(flow.phase(), FlowPhase::Idle);
            prop_assert!(flow.candidate().is_none());
            prop_assert_eq!(flow.draft(), "");
            prop_assert_eq!(effects[0].clone(), FlowEffect::ClearInput);
        }
    }
}
