use std::sync::Arc;

use dioxus::document::eval;
use dioxus::prelude::*;
use dioxus_router::{Navigator, use_navigator};
use quiz_core::flow::{FlowEffect, Notice, TranscriptOutcome, UsernameFlow};
use quiz_core::keys::QuizKey;
use quiz_core::store::{QuizAction, QuizStore};
use services::{Narrator, Transcriber};

use crate::context::AppContext;
use crate::routes::Route;

/// Executes the side effects requested by the username flow.
#[derive(Clone)]
struct FlowDriver {
    narrator: Arc<Narrator>,
    transcriber: Arc<Transcriber>,
    flow: Signal<UsernameFlow>,
    notice: Signal<Option<Notice>>,
    store: Signal<QuizStore>,
    navigator: Navigator,
}

impl FlowDriver {
    fn apply(&self, effects: Vec<FlowEffect>) {
        let mut notice = self.notice;
        let mut store = self.store;
        for effect in effects {
            tracing::debug!(?effect, "username flow effect");
            match effect {
                FlowEffect::CancelSpeech => self.narrator.cancel(),
                FlowEffect::Speak(prompt) => self.narrator.speak(&prompt.text()),
                // The input is bound to the flow draft, which is already updated.
                FlowEffect::ClearInput | FlowEffect::SetInput(_) => {}
                FlowEffect::StartTranscription(capture) => {
                    notice.set(None);
                    let driver = self.clone();
                    spawn(async move {
                        let outcome = match driver.transcriber.listen().await {
                            Ok(text) => TranscriptOutcome::Heard(text),
                            Err(err) => TranscriptOutcome::Failed(err.to_string()),
                        };
                        let mut flow = driver.flow;
                        let effects = flow.write().on_transcript(capture, outcome);
                        driver.apply(effects);
                    });
                }
                FlowEffect::Notice(message) => notice.set(Some(message)),
                FlowEffect::Start(username) => {
                    if let Err(err) = store.write().dispatch(QuizAction::SetUsername(username)) {
                        tracing::warn!(error = %err, "could not store username");
                        return;
                    }
                    let _ = self.navigator.push(Route::Quiz {});
                }
            }
        }
    }
}

#[component]
pub fn MainView() -> Element {
    let ctx = use_context::<AppContext>();
    let store = use_context::<Signal<QuizStore>>();
    let navigator = use_navigator();
    let mut flow = use_signal(UsernameFlow::new);
    let mut notice = use_signal(|| None::<Notice>);

    let driver = FlowDriver {
        narrator: ctx.narrator(),
        transcriber: ctx.transcriber(),
        flow,
        notice,
        store,
        navigator,
    };

    {
        let narrator = ctx.narrator();
        let welcome = ctx.config().welcome_text();
        use_hook(move || narrator.speak(&welcome));
    }
    {
        let narrator = ctx.narrator();
        use_drop(move || narrator.cancel());
    }

    use_effect(move || {
        // The input is disabled while confirming, so keys must land on the page root.
        let target = if flow.read().is_confirming() {
            "main-root"
        } else {
            "username-input"
        };
        let _ = eval(&format!("document.getElementById({target:?})?.focus();"));
    });

    let on_key = {
        let driver = driver.clone();
        move |evt: KeyboardEvent| {
            let key = QuizKey::from_key_name(&evt.data.key().to_string());
            if matches!(key, QuizKey::Enter | QuizKey::Slash) {
                evt.prevent_default();
            }
            let effects = flow.write().on_key(&key);
            driver.apply(effects);
        }
    };
    let on_start = move |_| {
        let effects = flow.write().confirm();
        driver.apply(effects);
    };

    let config = ctx.config().clone();
    let voice_available = ctx.transcriber().is_available();
    let (draft, confirming, listening, candidate) = {
        let flow = flow.read();
        (
            flow.draft().to_string(),
            flow.is_confirming(),
            flow.is_listening(),
            flow.candidate().map(|name| name.as_str().to_string()),
        )
    };

    rsx! {
        div { class: "main", id: "main-root", tabindex: "0", onkeydown: on_key,
            ol { class: "instructions",
                li { "You will be asked {config.quiz_length} questions one after another." }
                li { "{config.points_per_question} points is awarded for the correct answer." }
                li { "Each question has several options. You can choose only one of them." }
                li { "You can review and change answers before the quiz finishes." }
                li { "The result will be declared at the end of the quiz." }
                if voice_available {
                    li { "Type your username, or press / and speak it. Press Enter to confirm." }
                } else {
                    li { "Type your username and press Enter to confirm." }
                }
            }

            input {
                id: "username-input",
                class: "userid",
                r#type: "text",
                placeholder: "Username*",
                value: "{draft}",
                disabled: confirming,
                oninput: move |evt: FormEvent| {
                    flow.write().set_draft(evt.value());
                    notice.set(None);
                },
            }

            if listening {
                p { class: "listening", "Listening..." }
            }
            if let Some(name) = candidate.filter(|_| confirming) {
                p { class: "confirm",
                    "Use \"{name}\"? Press Enter to confirm or any other key to cancel."
                }
            }
            if let Some(message) = notice.read().as_ref().map(Notice::message) {
                p { class: "notice", "{message}" }
            }

            div { class: "start",
                button { class: "btn", disabled: !confirming, onclick: on_start, "Start Quiz" }
            }
        }
    }
}
