use services::{AppServices, Clock, QuizConfig, QuizServiceError};
use quiz_core::model::Username;
use quiz_core::store::{QuizAction, QuizStore};

#[tokio::test]
async fn in_memory_services_run_a_full_quiz() {
    let services = AppServices::in_memory(Clock::default(), QuizConfig::default())
        .await
        .expect("services");
    let quiz = services.quiz();

    let questions = quiz.load_question_set().await.expect("questions");
    assert_eq!(questions.len(), 10);

    let mut store = QuizStore::new();
    store
        .dispatch(QuizAction::SetUsername(Username::new("grace").unwrap()))
        .unwrap();
    store.dispatch(QuizAction::StartExam(questions.clone())).unwrap();

    for question in questions.iter().take(7) {
        store
            .dispatch(QuizAction::SelectCurrent(question.answer()))
            .unwrap();
        store.dispatch(QuizAction::MoveNext).unwrap();
    }
    while !store.is_finished() {
        store.dispatch(QuizAction::MoveNext).unwrap();
    }

    let result = store.result(&quiz.policy()).expect("result");
    assert_eq!(result.attempts, 7);
    assert_eq!(result.earned_points, 70);
    assert_eq!(result.total_points, 100);
    assert!(result.passed);

    let record = quiz.record_for(&store).unwrap();
    quiz.publish(&record).await.unwrap();
    let board = quiz.recent_results(10).await.unwrap();
    assert_eq!(board[0].username, "grace");
}

#[tokio::test]
async fn longer_quiz_than_bank_is_rejected() {
    let config = QuizConfig {
        quiz_length: 12,
        ..QuizConfig::default()
    };
    let services = AppServices::in_memory(Clock::default(), config)
        .await
        .expect("services");
    let err = services.quiz().load_question_set().await.unwrap_err();
    assert!(matches!(
        err,
        QuizServiceError::WrongLength {
            expected: 12,
            actual: 10
        }
    ));
}

#[test]
fn blank_api_url_is_rejected() {
    assert!(AppServices::new_http("  ", Clock::default(), QuizConfig::default()).is_err());
}
