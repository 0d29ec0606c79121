use dioxus::document::eval;
use dioxus::prelude::*;
use dioxus_router::use_navigator;
use quiz_core::keys::QuizKey;
use quiz_core::store::{QuizAction, QuizStore};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{BoardRowVm, ResultSummaryVm, map_board_rows};

const BOARD_LIMIT: u32 = 10;

/// Whether the store no longer backs a result page (nobody signed in, or no quiz).
pub(crate) fn must_leave_result(store: &QuizStore) -> bool {
    store.username().is_none() || !store.is_loaded()
}

#[derive(Clone, Debug, PartialEq)]
struct BoardData {
    rows: Vec<BoardRowVm>,
}

#[component]
pub fn ResultView() -> Element {
    let ctx = use_context::<AppContext>();
    let mut store = use_context::<Signal<QuizStore>>();
    let navigator = use_navigator();
    let quiz = ctx.quiz();
    let policy = quiz.policy();

    use_effect(move || {
        if must_leave_result(&store.read()) {
            let _ = navigator.replace(Route::Main {});
        }
    });

    let summary = {
        let store = store.read();
        match (store.username(), store.result(&policy)) {
            (Some(name), Some(result)) => Some(ResultSummaryVm::new(
                name,
                store.question_count(),
                &result,
            )),
            _ => None,
        }
    };

    {
        let narrator = ctx.narrator();
        let text = summary.as_ref().map(ResultSummaryVm::narration);
        use_hook(move || {
            if let Some(text) = text {
                narrator.speak(&text);
            }
        });
    }
    {
        let narrator = ctx.narrator();
        use_drop(move || narrator.cancel());
    }

    let record = {
        let quiz = quiz.clone();
        use_hook(move || quiz.record_for(&store.peek()).ok())
    };
    let published = use_signal(|| false);
    let mut resource = use_resource(move || {
        let quiz = quiz.clone();
        let record = record.clone();
        let mut published = published;
        async move {
            if !*published.peek() {
                published.set(true);
                if let Some(record) = record.as_ref() {
                    // Publishing is best effort; the service logs failures.
                    let _ = quiz.publish(record).await;
                }
            }
            let items = quiz
                .recent_results(BOARD_LIMIT)
                .await
                .map_err(|_| ViewError::ResultsUnavailable)?;
            Ok::<_, ViewError>(BoardData {
                rows: map_board_rows(&items),
            })
        }
    });
    let board = view_state_from_resource(&resource);

    use_effect(move || {
        let _ = eval("document.getElementById(\"result-root\")?.focus();");
    });

    let on_restart = {
        let narrator = ctx.narrator();
        use_callback(move |()| {
            narrator.cancel();
            // The guard above sends the emptied store back to the welcome page.
            if let Err(err) = store.write().dispatch(QuizAction::Reset) {
                tracing::warn!(error = %err, "reset failed");
            }
        })
    };
    let on_key = move |evt: KeyboardEvent| {
        if QuizKey::from_key_name(&evt.data.key().to_string()) == QuizKey::Enter {
            evt.prevent_default();
            on_restart.call(());
        }
    };

    rsx! {
        div { class: "result-page", id: "result-root", tabindex: "0", onkeydown: on_key,
            if let Some(summary) = summary {
                div { class: "result flex-center",
                    div { class: "flex",
                        span { "Username" }
                        span { class: "bold", "{summary.username}" }
                    }
                    div { class: "flex",
                        span { "Total Quiz Points : " }
                        span { class: "bold", "{summary.total_points}" }
                    }
                    div { class: "flex",
                        span { "Total Questions : " }
                        span { class: "bold", "{summary.question_count}" }
                    }
                    div { class: "flex",
                        span { "Total Attempts : " }
                        span { class: "bold", "{summary.attempts}" }
                    }
                    div { class: "flex",
                        span { "Total Earned Points : " }
                        span { class: "bold", "{summary.earned_points}" }
                    }
                    div { class: "flex",
                        span { "Quiz Result" }
                        span { class: "bold verdict", "{summary.short_verdict()}" }
                    }
                }
            }

            div { class: "start",
                button { class: "btn", onclick: move |_| on_restart.call(()), "Restart" }
            }

            div { class: "board",
                match board {
                    ViewState::Idle | ViewState::Loading => rsx! {
                        p { "Loading results..." }
                    },
                    ViewState::Error(err) => rsx! {
                        p { "{err.message()}" }
                        button { class: "btn", onclick: move |_| resource.restart(), "Retry" }
                    },
                    ViewState::Ready(data) => rsx! {
                        ResultTable { rows: data.rows }
                    },
                }
            }
        }
    }
}

#[component]
fn ResultTable(rows: Vec<BoardRowVm>) -> Element {
    if rows.is_empty() {
        return rsx! {
            p { "No results published yet." }
        };
    }

    rsx! {
        table {
            thead { class: "table-header",
                tr { class: "table-row",
                    td { "Name" }
                    td { "Attempts" }
                    td { "Earn Points" }
                    td { "Result" }
                    td { "Completed" }
                }
            }
            tbody { class: "table-body",
                for (index, row) in rows.into_iter().enumerate() {
                    tr { key: "{index}", class: "table-row",
                        td { "{row.username}" }
                        td { "{row.attempts}" }
                        td { "{row.points}" }
                        td { "{row.verdict_label}" }
                        td { "{row.completed_at_str}" }
                    }
                }
            }
        }
    }
}
