use dioxus::prelude::*;
use dioxus_router::Router;
use quiz_core::store::QuizStore;

use crate::routes::Route;

#[component]
pub fn App() -> Element {
    // One quiz session per window, shared by every view.
    use_context_provider(|| Signal::new(QuizStore::new()));

    rsx! {
        document::Stylesheet { href: asset!("/assets/style.css") }

        document::Title { "Quiz Application" }

        div { class: "app-root",
            ErrorBoundary {
                handle_error: |errors: ErrorContext| rsx! {
                    div { class: "fatal",
                        h1 { "Something went wrong" }
                        pre { "{errors:?}" }
                    }
                },
                Router::<Route> {}
            }
        }
    }
}
