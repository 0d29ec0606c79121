use dioxus::document::eval;
use dioxus::prelude::*;
use dioxus_router::use_navigator;
use quiz_core::keys::QuizKey;
use quiz_core::model::Question;
use quiz_core::store::{QuizAction, QuizStore};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};

#[component]
pub fn QuizView() -> Element {
    let ctx = use_context::<AppContext>();
    let mut store = use_context::<Signal<QuizStore>>();
    let navigator = use_navigator();

    use_effect(move || {
        if store.read().username().is_none() {
            let _ = navigator.replace(Route::Main {});
        }
    });

    let quiz = ctx.quiz();
    let mut resource = use_resource(move || {
        let quiz = quiz.clone();
        let mut store = store;
        async move {
            {
                let current = store.peek();
                if current.is_loaded() || current.username().is_none() {
                    return Ok(());
                }
            }
            let questions = quiz.load_question_set().await.map_err(|err| {
                tracing::warn!(error = %err, "loading questions failed");
                ViewError::QuestionsUnavailable
            })?;
            store
                .write()
                .dispatch(QuizAction::StartExam(questions))
                .map_err(|_| ViewError::Unknown)?;
            Ok::<_, ViewError>(())
        }
    });
    let state = view_state_from_resource(&resource);

    // Narrate once per position, not on every selection.
    let narration = use_memo(move || {
        let store = store.read();
        store
            .current_question()
            .map(|question| (store.position(), question.narration()))
    });
    {
        let narrator = ctx.narrator();
        use_effect(move || {
            if let Some((_, text)) = narration() {
                narrator.speak(&text);
            }
        });
    }
    {
        let narrator = ctx.narrator();
        use_drop(move || narrator.cancel());
    }

    use_effect(move || {
        let _ = eval("document.getElementById(\"quiz-root\")?.focus();");
    });

    let on_next = use_callback(move |()| {
        if let Err(err) = store.write().dispatch(QuizAction::MoveNext) {
            tracing::warn!(error = %err, "cannot advance");
            return;
        }
        if store.read().is_finished() {
            let _ = navigator.push(Route::QuizResult {});
        }
    });
    let on_prev = use_callback(move |()| {
        if let Err(err) = store.write().dispatch(QuizAction::MovePrev) {
            tracing::warn!(error = %err, "cannot go back");
        }
    });
    let on_select = use_callback(move |option: usize| {
        if let Err(err) = store.write().dispatch(QuizAction::SelectCurrent(option)) {
            tracing::warn!(error = %err, option, "selection rejected");
        }
    });

    let on_key = move |evt: KeyboardEvent| {
        let key = QuizKey::from_key_name(&evt.data.key().to_string());
        if key == QuizKey::Enter {
            evt.prevent_default();
            on_next.call(());
            return;
        }
        let option_count = store
            .read()
            .current_question()
            .map_or(0, Question::option_count);
        if let Some(option) = key.option_index(option_count) {
            evt.prevent_default();
            on_select.call(option);
        }
    };

    let (current, position, count, selected, is_last) = {
        let store = store.read();
        let position = store.position();
        (
            store.current_question().cloned(),
            position,
            store.question_count(),
            store.selected(position),
            store.is_last_question(),
        )
    };

    rsx! {
        div { class: "quiz", id: "quiz-root", tabindex: "0", onkeydown: on_key,
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { class: "text-light", "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    div { class: "error",
                        p { class: "text-light", "{err.message()}" }
                        button { class: "btn", onclick: move |_| resource.restart(), "Retry" }
                    }
                },
                ViewState::Ready(()) => rsx! {
                    if let Some(question) = current {
                        QuestionCard {
                            question,
                            position,
                            count,
                            selected,
                            on_select,
                        }
                        div { class: "grid",
                            if position > 0 {
                                button { class: "btn prev", onclick: move |_| on_prev.call(()), "Prev" }
                            } else {
                                div {}
                            }
                            button { class: "btn next", onclick: move |_| on_next.call(()),
                                if is_last { "Finish" } else { "Next" }
                            }
                        }
                    }
                },
            }
        }
    }
}

#[component]
fn QuestionCard(
    question: Question,
    position: usize,
    count: usize,
    selected: Option<usize>,
    on_select: Callback<usize>,
) -> Element {
    let number = position + 1;
    let question_id = question.id();

    rsx! {
        div { class: "questions",
            p { class: "progress", "Question {number} of {count}" }
            h2 { class: "text-light", "{question.text()}" }
            ul {
                for (index, option_text) in question
                    .options()
                    .iter()
                    .enumerate()
                    .map(|(index, option)| (index, format!("{}. {option}", index + 1)))
                {
                    li { key: "{question_id}-{index}",
                        input {
                            r#type: "radio",
                            id: "q{index}-option",
                            name: "options",
                            value: "{index}",
                            checked: selected == Some(index),
                            onchange: move |_| on_select.call(index),
                        }
                        label { class: "text-primary", r#for: "q{index}-option",
                            "{option_text}"
                        }
                        div { class: if selected == Some(index) { "check checked" } else { "check" } }
                    }
                }
            }
        }
    }
}
