mod main;
mod quiz;
mod result;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use main::MainView;
pub use quiz::QuizView;
pub use result::ResultView;
pub use state::{ViewError, ViewState, view_state_from_resource};
