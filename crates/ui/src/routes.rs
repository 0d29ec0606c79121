use dioxus::prelude::*;
use dioxus_router::{Outlet, Routable};

use crate::views::{MainView, QuizView, ResultView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", MainView)] Main {},
        #[route("/quiz", QuizView)] Quiz {},
        #[route("/result", ResultView)] QuizResult {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "container",
            h1 { class: "title", "Quiz Application" }
            Outlet::<Route> {}
        }
    }
}
