use std::sync::{Arc, Mutex};

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use quiz_core::time::fixed_clock;
use quiz_core::store::QuizStore;
use services::{
    AppServices, Capability, Narrator, QuizConfig, QuizService, SpeechError, SpeechSynthesizer,
    Transcriber, Utterance,
};

use crate::context::{UiApp, build_app_context};
use crate::views::{MainView, QuizView, ResultView};

/// Records every utterance instead of playing it.
#[derive(Default)]
pub struct RecordingSynth {
    spoken: Mutex<Vec<String>>,
}

impl RecordingSynth {
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }
}

impl SpeechSynthesizer for RecordingSynth {
    fn speak(&self, utterance: &Utterance) -> Result<(), SpeechError> {
        self.spoken.lock().unwrap().push(utterance.text.clone());
        Ok(())
    }

    fn cancel(&self) {}
}

#[derive(Clone)]
struct TestApp {
    config: QuizConfig,
    quiz: Arc<QuizService>,
    narrator: Arc<Narrator>,
    transcriber: Arc<Transcriber>,
}

impl UiApp for TestApp {
    fn config(&self) -> QuizConfig {
        self.config.clone()
    }

    fn quiz_service(&self) -> Arc<QuizService> {
        Arc::clone(&self.quiz)
    }

    fn narrator(&self) -> Arc<Narrator> {
        Arc::clone(&self.narrator)
    }

    fn transcriber(&self) -> Arc<Transcriber> {
        Arc::clone(&self.transcriber)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Main,
    Quiz,
    Result,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    store: QuizStore,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    let store = props.store.clone();
    use_context_provider(|| Signal::new(store));
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Main => rsx! { MainView {} },
        ViewKind::Quiz => rsx! { QuizView {} },
        ViewKind::Result => rsx! { ResultView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub quiz: Arc<QuizService>,
    pub synth: Arc<RecordingSynth>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

/// Services backed by the seeded in-memory bank, with recorded narration.
pub async fn test_services(config: QuizConfig) -> (Arc<QuizService>, Arc<RecordingSynth>) {
    let services = AppServices::in_memory(fixed_clock(), config)
        .await
        .expect("services");
    (services.quiz(), Arc::new(RecordingSynth::default()))
}

pub async fn setup_view_harness(view: ViewKind, store: QuizStore) -> ViewHarness {
    setup_view_harness_with_config(view, store, QuizConfig::default()).await
}

pub async fn setup_view_harness_with_config(
    view: ViewKind,
    store: QuizStore,
    config: QuizConfig,
) -> ViewHarness {
    let (quiz, synth) = test_services(config.clone()).await;
    let synth_for_narrator: Arc<dyn SpeechSynthesizer> = synth.clone();
    let app = Arc::new(TestApp {
        narrator: Arc::new(Narrator::new(
            Capability::Available(synth_for_narrator),
            &config,
        )),
        transcriber: Arc::new(Transcriber::new(Capability::Unavailable, &config)),
        quiz: Arc::clone(&quiz),
        config,
    });

    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, view, store });

    ViewHarness { dom, quiz, synth }
}
