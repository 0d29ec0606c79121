use quiz_core::model::{Question, QuestionId, QuestionSet, Username};
use quiz_core::store::{QuizAction, QuizStore};
use services::QuizConfig;

use super::result::must_leave_result;
use super::test_harness::{ViewKind, setup_view_harness, setup_view_harness_with_config};

fn question_set(len: usize) -> QuestionSet {
    let questions = (0..len)
        .map(|i| {
            Question::new(
                QuestionId::new(i as u64 + 1),
                format!("Question number {i}?"),
                vec!["alpha".into(), "beta".into(), "gamma".into()],
                0,
            )
            .unwrap()
        })
        .collect();
    QuestionSet::new(questions).unwrap()
}

fn signed_in(name: &str) -> QuizStore {
    let mut store = QuizStore::new();
    store
        .dispatch(QuizAction::SetUsername(Username::new(name).unwrap()))
        .unwrap();
    store
}

/// Ten questions, seven answered, five of them correctly.
fn finished_store(name: &str) -> QuizStore {
    let mut store = signed_in(name);
    store
        .dispatch(QuizAction::StartExam(question_set(10)))
        .unwrap();
    for position in 0..7 {
        let option = if position < 5 { 0 } else { 1 };
        store
            .dispatch(QuizAction::Select { position, option })
            .unwrap();
    }
    while !store.is_finished() {
        store.dispatch(QuizAction::MoveNext).unwrap();
    }
    store
}

#[tokio::test(flavor = "current_thread")]
async fn main_view_smoke_renders_instructions_and_welcome() {
    let mut harness = setup_view_harness(ViewKind::Main, QuizStore::new()).await;
    harness.rebuild();
    let html = harness.render();

    assert!(html.contains("You will be asked 10 questions"), "missing intro in {html}");
    assert!(html.contains("Start Quiz"), "missing start button in {html}");
    assert!(
        html.contains("Each question has several options."),
        "option count should not be fixed in {html}"
    );
    assert!(
        html.contains("Type your username and press Enter to confirm."),
        "missing typed-only hint in {html}"
    );
    let spoken = harness.synth.spoken();
    assert!(
        spoken
            .first()
            .is_some_and(|text| text.starts_with("Welcome to the Quiz Application.")),
        "welcome not spoken: {spoken:?}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_loads_first_question() {
    let mut harness = setup_view_harness(ViewKind::Quiz, signed_in("ada")).await;
    harness.rebuild();
    harness.drive_async().await;
    harness.drive_async().await;
    let html = harness.render();

    assert!(html.contains("Question 1 of 10"), "missing progress in {html}");
    assert!(html.contains("Next"), "missing next button in {html}");
    assert!(html.contains("1. "), "missing numbered options in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_shows_error_when_bank_is_short() {
    let config = QuizConfig {
        quiz_length: 12,
        ..QuizConfig::default()
    };
    let mut harness =
        setup_view_harness_with_config(ViewKind::Quiz, signed_in("ada"), config).await;
    harness.rebuild();
    harness.drive_async().await;
    harness.drive_async().await;
    let html = harness.render();

    assert!(
        html.contains("Could not load the questions."),
        "missing error in {html}"
    );
    assert!(html.contains("Retry"), "missing retry in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_keeps_preloaded_questions() {
    let mut store = signed_in("ada");
    store
        .dispatch(QuizAction::StartExam(question_set(10)))
        .unwrap();
    store.dispatch(QuizAction::MoveNext).unwrap();

    let mut harness = setup_view_harness(ViewKind::Quiz, store).await;
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();

    assert!(html.contains("Question 2 of 10"), "missing progress in {html}");
    assert!(html.contains("Question number 1?"), "missing question text in {html}");
    assert!(html.contains("Prev"), "missing prev button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn result_view_smoke_renders_score_and_publishes_once() {
    let mut harness = setup_view_harness(ViewKind::Result, finished_store("ada")).await;
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Total Earned Points"), "missing figures in {html}");
    assert!(html.contains("PASS"), "missing verdict in {html}");

    let spoken = harness.synth.spoken();
    assert_eq!(
        spoken.first().map(String::as_str),
        Some(
            "Quiz Results for ada: Total Quiz Points: 100, Total Questions: 10, \
             Total Attempts: 7, Total Earned Points: 50, Quiz Result: Passed."
        )
    );

    harness.drive_async().await;
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Earn Points"), "missing result table in {html}");

    let board = harness.quiz.recent_results(10).await.unwrap();
    assert_eq!(board.len(), 1);
    assert_eq!(board[0].username, "ada");
    assert_eq!(board[0].points, 50);
}

#[test]
fn restart_is_left_to_the_result_guard() {
    let mut store = finished_store("ada");
    assert!(!must_leave_result(&store));

    store.dispatch(QuizAction::Reset).unwrap();
    assert!(must_leave_result(&store));
    assert!(must_leave_result(&signed_in("ada")));
}
