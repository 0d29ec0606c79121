use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{
    AnswerError, AnswerRecord, Question, QuestionSet, QuizResult, ResultRecord, ResultRecordError,
    Session, Username,
};
use crate::scoring::ScoringPolicy;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreError {
    #[error("questions are not loaded yet")]
    NotLoaded,
    #[error("no username has been confirmed")]
    NoUsername,
    #[error(transparent)]
    Answer(#[from] AnswerError),
    #[error(transparent)]
    Record(#[from] ResultRecordError),
}

//
// ─── ACTIONS ───────────────────────────────────────────────────────────────────
//

/// Typed mutations accepted by [`QuizStore::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizAction {
    SetUsername(Username),
    /// Load the question set and start at the first question with no answers.
    StartExam(QuestionSet),
    MoveNext,
    MovePrev,
    Select { position: usize, option: usize },
    /// Select an option for the question at the current position.
    SelectCurrent(usize),
    /// Forget everything: username, questions, answers and position.
    Reset,
}

//
// ─── STORE ─────────────────────────────────────────────────────────────────────
//

/// Single source of truth for one quiz session.
///
/// All mutations go through [`QuizStore::dispatch`]; reads go through the
/// selector methods. Results are never cached and are derived on each call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizStore {
    questions: Option<QuestionSet>,
    session: Session,
    answers: AnswerRecord,
}

impl QuizStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an action.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotLoaded` for navigation or selection before the
    /// questions are loaded, and `StoreError::Answer` for out-of-range
    /// selections. A failed action leaves the store unchanged.
    pub fn dispatch(&mut self, action: QuizAction) -> Result<(), StoreError> {
        match action {
            QuizAction::SetUsername(name) => {
                self.session.set_username(name);
            }
            QuizAction::StartExam(questions) => {
                self.session.begin(questions.len());
                self.answers.clear();
                self.questions = Some(questions);
            }
            QuizAction::MoveNext => {
                self.loaded()?;
                self.session.advance();
            }
            QuizAction::MovePrev => {
                self.loaded()?;
                self.session.retreat();
            }
            QuizAction::Select { position, option } => {
                let questions = self.questions.as_ref().ok_or(StoreError::NotLoaded)?;
                self.answers.record(questions, position, option)?;
            }
            QuizAction::SelectCurrent(option) => {
                let position = self.session.position();
                let questions = self.questions.as_ref().ok_or(StoreError::NotLoaded)?;
                self.answers.record(questions, position, option)?;
            }
            QuizAction::Reset => {
                *self = Self::default();
            }
        }
        Ok(())
    }

    fn loaded(&self) -> Result<&QuestionSet, StoreError> {
        self.questions.as_ref().ok_or(StoreError::NotLoaded)
    }

    #[must_use]
    pub fn questions(&self) -> Option<&QuestionSet> {
        self.questions.as_ref()
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.questions.is_some()
    }

    #[must_use]
    pub fn username(&self) -> Option<&Username> {
        self.session.username()
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.session.position()
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.as_ref().map_or(0, QuestionSet::len)
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.as_ref()?.get(self.session.position())
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        let count = self.question_count();
        count > 0 && self.session.position() + 1 == count
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.session.is_finished()
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerRecord {
        &self.answers
    }

    #[must_use]
    pub fn selected(&self, position: usize) -> Option<usize> {
        self.answers.get(position)
    }

    /// Score the current answers. `None` until the questions are loaded.
    #[must_use]
    pub fn result(&self, policy: &ScoringPolicy) -> Option<QuizResult> {
        self.questions
            .as_ref()
            .map(|questions| policy.score(questions, &self.answers))
    }

    /// Build the publishable record for the current state.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotLoaded` or `StoreError::NoUsername` when the
    /// quiz has not been set up.
    pub fn to_record(
        &self,
        policy: &ScoringPolicy,
        completed_at: DateTime<Utc>,
    ) -> Result<ResultRecord, StoreError> {
        let questions = self.loaded()?;
        let username = self.username().cloned().ok_or(StoreError::NoUsername)?;
        let result = policy.score(questions, &self.answers);
        Ok(ResultRecord::new(
            username,
            self.answers.to_dense(questions.len()),
            result.attempts,
            result.earned_points,
            result.verdict(),
            completed_at,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{QuestionId, Verdict};
    use crate::time::fixed_now;

    fn questions(len: usize) -> QuestionSet {
        let list = (0..len)
            .map(|i| {
                Question::new(
                    QuestionId::new(i as u64 + 1),
                    format!("Q{i}"),
                    vec!["a".into(), "b".into(), "c".into()],
                    0,
                )
                .unwrap()
            })
            .collect();
        QuestionSet::new(list).unwrap()
    }

    #[test]
    fn result_is_none_before_load() {
        let store = QuizStore::new();
        assert!(store.result(&ScoringPolicy::default()).is_none());
        assert_eq!(store.question_count(), 0);
    }

    #[test]
    fn selections_before_load_are_rejected() {
        let mut store = QuizStore::new();
        assert_eq!(
            store.dispatch(QuizAction::SelectCurrent(0)).unwrap_err(),
            StoreError::NotLoaded
        );
        assert_eq!(
            store.dispatch(QuizAction::MoveNext).unwrap_err(),
            StoreError::NotLoaded
        );
    }

    #[test]
    fn walks_through_questions_and_scores() {
        let mut store = QuizStore::new();
        store
            .dispatch(QuizAction::SetUsername(Username::new("ada").unwrap()))
            .unwrap();
        store.dispatch(QuizAction::StartExam(questions(3))).unwrap();

        store.dispatch(QuizAction::SelectCurrent(0)).unwrap();
        store.dispatch(QuizAction::MoveNext).unwrap();
        store.dispatch(QuizAction::SelectCurrent(1)).unwrap();
        store.dispatch(QuizAction::SelectCurrent(0)).unwrap();
        assert!(!store.is_last_question());
        store.dispatch(QuizAction::MoveNext).unwrap();
        assert!(store.is_last_question());
        store.dispatch(QuizAction::MoveNext).unwrap();
        assert!(store.is_finished());
        assert!(store.current_question().is_none());

        let policy = ScoringPolicy::default();
        let first = store.result(&policy).unwrap();
        let second = store.result(&policy).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.total_points, 30);
        assert_eq!(first.attempts, 2);
        assert_eq!(first.earned_points, 20);
        assert!(first.passed);

        let record = store.to_record(&policy, fixed_now()).unwrap();
        assert_eq!(record.answers(), &[Some(0), Some(0), None]);
        assert_eq!(record.verdict(), Verdict::Passed);
        assert_eq!(record.username().as_str(), "ada");
    }

    #[test]
    fn invalid_selection_leaves_store_unchanged() {
        let mut store = QuizStore::new();
        store.dispatch(QuizAction::StartExam(questions(2))).unwrap();
        let before = store.clone();
        let err = store
            .dispatch(QuizAction::Select {
                position: 5,
                option: 0,
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::Answer(_)));
        assert_eq!(store, before);
    }

    #[test]
    fn record_requires_username() {
        let mut store = QuizStore::new();
        store.dispatch(QuizAction::StartExam(questions(2))).unwrap();
        assert_eq!(
            store
                .to_record(&ScoringPolicy::default(), fixed_now())
                .unwrap_err(),
            StoreError::NoUsername
        );
    }

    #[test]
    fn reset_clears_everything() {
        let mut store = QuizStore::new();
        store
            .dispatch(QuizAction::SetUsername(Username::new("ada").unwrap()))
            .unwrap();
        store.dispatch(QuizAction::StartExam(questions(2))).unwrap();
        store.dispatch(QuizAction::SelectCurrent(1)).unwrap();
        store.dispatch(QuizAction::Reset).unwrap();
        assert_eq!(store, QuizStore::new());
    }
}
