//! Quiz state machine.
//!
//! A session moves `InProgress → Results`; the loading state is the
//! absence of a session (construction validates the fetched payload, and
//! an invalid payload is the error sink). Validation is fail-closed: one
//! malformed question invalidates the whole set rather than being
//! skipped, so a partially-broken AI payload never produces a quiz with
//! silently missing questions.

use notelace_core::{Error, QuizPayload, QuizQuestion, Result};
use tracing::debug;

/// Current phase of a quiz session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizState {
    /// Answering questions.
    InProgress,
    /// Finished; the score is fixed.
    Results { score: usize },
}

/// Result of a `next()` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Ignored: the current question has no recorded answer, or the
    /// session already finished.
    Ignored,
    /// Moved to the next question.
    Advanced,
    /// Last question answered; the session is now in `Results`.
    Completed { score: usize },
}

/// One quiz run over a fixed question set.
///
/// Sessions never persist: `complete()` consumes the session, and a new
/// quiz always starts from a fresh payload with index zero and empty
/// answers.
#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<QuizQuestion>,
    current_index: usize,
    answers: Vec<Option<String>>,
    state: QuizState,
}

impl QuizSession {
    /// Validate a fetched payload and start a session.
    ///
    /// The whole set is rejected when it is empty or when ANY question
    /// has an empty question text, an empty option list, or an empty
    /// correct answer. (Missing fields were already rejected as
    /// malformed at the transport boundary.)
    pub fn new(payload: QuizPayload) -> Result<Self> {
        if payload.questions.is_empty() {
            return Err(Error::MalformedResponse(
                "Quiz contains no questions".to_string(),
            ));
        }
        for (i, q) in payload.questions.iter().enumerate() {
            if q.question.trim().is_empty()
                || q.options.is_empty()
                || q.correct_answer.is_empty()
            {
                return Err(Error::MalformedResponse(format!(
                    "Quiz question {} is incomplete",
                    i + 1
                )));
            }
        }
        let count = payload.questions.len();
        debug!(questions = count, "Quiz session started");
        Ok(Self {
            answers: vec![None; count],
            questions: payload.questions,
            current_index: 0,
            state: QuizState::InProgress,
        })
    }

    /// Current phase.
    pub fn state(&self) -> &QuizState {
        &self.state
    }

    /// Total number of questions.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Never true: an empty payload cannot construct a session.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Zero-based index of the current question.
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The question being shown, while in progress.
    pub fn current_question(&self) -> Option<&QuizQuestion> {
        match self.state {
            QuizState::InProgress => self.questions.get(self.current_index),
            QuizState::Results { .. } => None,
        }
    }

    /// The recorded answer for a question, if any.
    pub fn answer(&self, index: usize) -> Option<&str> {
        self.answers.get(index).and_then(|a| a.as_deref())
    }

    /// Record an answer for the current question. Does not advance.
    /// Re-selecting overwrites. Returns false once the session finished.
    pub fn select_answer(&mut self, option: impl Into<String>) -> bool {
        if self.state != QuizState::InProgress {
            return false;
        }
        self.answers[self.current_index] = Some(option.into());
        true
    }

    /// Advance to the next question, or finish on the last one.
    ///
    /// A call with no recorded answer for the current question is
    /// ignored; the control should be disabled, but the engine refuses
    /// to advance on an empty answer regardless.
    pub fn next(&mut self) -> Advance {
        if self.state != QuizState::InProgress {
            return Advance::Ignored;
        }
        if self.answers[self.current_index].is_none() {
            return Advance::Ignored;
        }
        if self.current_index < self.questions.len() - 1 {
            self.current_index += 1;
            Advance::Advanced
        } else {
            let score = self.compute_score();
            debug!(score, total = self.questions.len(), "Quiz finished");
            self.state = QuizState::Results { score };
            Advance::Completed { score }
        }
    }

    /// The final score, once in `Results`.
    pub fn score(&self) -> Option<usize> {
        match self.state {
            QuizState::Results { score } => Some(score),
            QuizState::InProgress => None,
        }
    }

    /// Exit the quiz, destroying the session. Callable at any point.
    pub fn complete(self) {}

    /// Strict value equality against the correct answer; unanswered
    /// questions count as incorrect.
    fn compute_score(&self) -> usize {
        self.questions
            .iter()
            .zip(self.answers.iter())
            .filter(|(q, a)| a.as_deref() == Some(q.correct_answer.as_str()))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(text: &str, options: &[&str], correct: &str) -> QuizQuestion {
        QuizQuestion {
            question: text.to_string(),
            options: options.iter().map(|s| s.to_string()).collect(),
            correct_answer: correct.to_string(),
        }
    }

    fn payload(questions: Vec<QuizQuestion>) -> QuizPayload {
        QuizPayload { questions }
    }

    #[test]
    fn test_empty_set_is_rejected() {
        let err = QuizSession::new(payload(vec![])).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[test]
    fn test_one_malformed_question_invalidates_the_whole_set() {
        let questions = vec![
            question("2+2?", &["3", "4"], "4"),
            question("", &["a"], "a"),
        ];
        let err = QuizSession::new(payload(questions)).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[test]
    fn test_question_without_options_invalidates_the_set() {
        let questions = vec![question("2+2?", &[], "4")];
        assert!(QuizSession::new(payload(questions)).is_err());
    }

    #[test]
    fn test_fresh_session_starts_at_zero() {
        let session = QuizSession::new(payload(vec![question("2+2?", &["3", "4"], "4")])).unwrap();
        assert_eq!(session.current_index(), 0);
        assert_eq!(*session.state(), QuizState::InProgress);
        assert_eq!(session.answer(0), None);
    }

    #[test]
    fn test_single_question_scenario() {
        // Answer "4", next() -> Results with score 1.
        let mut session =
            QuizSession::new(payload(vec![question("2+2?", &["3", "4"], "4")])).unwrap();
        assert!(session.select_answer("4"));
        assert_eq!(session.next(), Advance::Completed { score: 1 });
        assert_eq!(session.score(), Some(1));
    }

    #[test]
    fn test_next_without_answer_is_ignored() {
        let mut session =
            QuizSession::new(payload(vec![question("2+2?", &["3", "4"], "4")])).unwrap();
        assert_eq!(session.next(), Advance::Ignored);
        assert_eq!(session.current_index(), 0);
        assert_eq!(*session.state(), QuizState::InProgress);
    }

    #[test]
    fn test_select_does_not_auto_advance() {
        let mut session = QuizSession::new(payload(vec![
            question("q1", &["a", "b"], "a"),
            question("q2", &["c", "d"], "c"),
        ]))
        .unwrap();
        session.select_answer("a");
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.next(), Advance::Advanced);
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn test_reselect_overwrites_answer() {
        let mut session =
            QuizSession::new(payload(vec![question("2+2?", &["3", "4"], "4")])).unwrap();
        session.select_answer("3");
        session.select_answer("4");
        assert_eq!(session.answer(0), Some("4"));
        assert_eq!(session.next(), Advance::Completed { score: 1 });
    }

    #[test]
    fn test_scoring_is_case_sensitive_no_trimming() {
        let mut session = QuizSession::new(payload(vec![
            question("q1", &["Paris", "paris"], "Paris"),
            question("q2", &["x", "y"], "x"),
        ]))
        .unwrap();
        session.select_answer("paris");
        session.next();
        session.select_answer("x ");
        assert_eq!(session.next(), Advance::Completed { score: 0 });
    }

    #[test]
    fn test_mixed_right_and_wrong() {
        let mut session = QuizSession::new(payload(vec![
            question("q1", &["a", "b"], "a"),
            question("q2", &["c", "d"], "c"),
            question("q3", &["e", "f"], "e"),
        ]))
        .unwrap();
        session.select_answer("a");
        session.next();
        session.select_answer("d");
        session.next();
        session.select_answer("e");
        assert_eq!(session.next(), Advance::Completed { score: 2 });
    }

    #[test]
    fn test_interaction_after_results_is_rejected() {
        let mut session =
            QuizSession::new(payload(vec![question("2+2?", &["3", "4"], "4")])).unwrap();
        session.select_answer("4");
        session.next();
        assert!(!session.select_answer("3"));
        assert_eq!(session.next(), Advance::Ignored);
        assert!(session.current_question().is_none());
        assert_eq!(session.score(), Some(1));
    }

    #[test]
    fn test_complete_destroys_session() {
        let session =
            QuizSession::new(payload(vec![question("2+2?", &["3", "4"], "4")])).unwrap();
        session.complete();
        // A new session starts fresh.
        let fresh =
            QuizSession::new(payload(vec![question("2+2?", &["3", "4"], "4")])).unwrap();
        assert_eq!(fresh.current_index(), 0);
        assert_eq!(fresh.answer(0), None);
    }
}
