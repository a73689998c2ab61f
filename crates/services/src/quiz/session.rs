use chrono::{DateTime, Utc};
use std::fmt;

use trainer_core::model::{
    AnswerChoice, AnswerDraft, Instrument, KeySignature, Question, Round, ScoreSummary,
    SlotResult, SlotResults,
};

use super::plan::QuizPlan;
use super::progress::QuizProgress;
use crate::error::QuizError;

//
// ─── ANSWER OUTCOME ───────────────────────────────────────────────────────────
//

/// Outcome of checking one submitted answer.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOutcome {
    pub question: Question,
    pub correct: bool,
    /// The signature the answer was checked against.
    pub expected: KeySignature,
    pub round: Round,
}

/// Result of asking for the review round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewStart {
    /// Review is active; the first missed question is current.
    Started,
    /// Nothing was missed, so there is nothing to review.
    NoReviewNeeded,
}

//
// ─── SESSION ──────────────────────────────────────────────────────────────────
//

/// In-memory state for one run of the quiz.
///
/// Steps through a shuffled pass over the four concert keys, recording one
/// result per question slot, then optionally through a review pass over the
/// missed questions. Starting a new session simply replaces the old value;
/// nothing external is held, so there is no cleanup.
pub struct QuizSession {
    instrument: Instrument,
    questions: Vec<Question>,
    review_list: Vec<Question>,
    missed: Vec<Question>,
    current: usize,
    round: Round,
    answer: AnswerDraft,
    results: SlotResults,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// Create a fresh session for the instrument over the planned order.
    ///
    /// `started_at` should come from the services layer clock to keep time
    /// deterministic.
    #[must_use]
    pub fn start(instrument: Instrument, plan: QuizPlan, started_at: DateTime<Utc>) -> Self {
        Self {
            instrument,
            questions: plan.into_questions(),
            review_list: Vec::new(),
            missed: Vec::new(),
            current: 0,
            round: Round::Initial,
            answer: AnswerDraft::new(),
            results: SlotResults::new(),
            started_at,
            completed_at: None,
        }
    }

    #[must_use]
    pub fn instrument(&self) -> Instrument {
        self.instrument
    }

    #[must_use]
    pub fn round(&self) -> Round {
        self.round
    }

    #[must_use]
    pub fn results(&self) -> &SlotResults {
        &self.results
    }

    #[must_use]
    pub fn answer(&self) -> &AnswerDraft {
        &self.answer
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// True once the initial round left missed questions behind.
    #[must_use]
    pub fn has_missed(&self) -> bool {
        !self.missed.is_empty()
    }

    /// Questions queued for the review round, in round-one encounter order.
    #[must_use]
    pub fn review_list(&self) -> &[Question] {
        &self.review_list
    }

    fn active_questions(&self) -> &[Question] {
        match self.round {
            Round::Initial => &self.questions,
            Round::Review => &self.review_list,
        }
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.active_questions().get(self.current)
    }

    /// True when every question of the active round has been answered.
    #[must_use]
    pub fn is_round_complete(&self) -> bool {
        self.current >= self.active_questions().len()
    }

    /// Apply one answer-button choice to the in-progress answer. Unscored.
    pub fn choose(&mut self, choice: AnswerChoice) {
        self.answer.choose(choice);
    }

    /// Discard the in-progress answer. Unscored.
    pub fn clear_answer(&mut self) {
        self.answer.clear();
    }

    /// Check the in-progress answer against the current question and advance.
    ///
    /// The expected signature is the transposition of the question's concert
    /// key for this session's instrument; comparison is order-sensitive
    /// sequence equality. In the initial round a miss queues the question for
    /// review; in review the same slot is re-marked and never re-queued.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::RoundComplete` if no question is pending.
    pub fn submit_answer(&mut self, answered_at: DateTime<Utc>) -> Result<AnswerOutcome, QuizError> {
        let Some(&question) = self.current_question() else {
            return Err(QuizError::RoundComplete);
        };

        let expected = self.instrument.transpose(question.concert).signature();
        let correct = self.answer.signature() == expected;

        let result = if correct {
            SlotResult::Correct
        } else {
            SlotResult::Incorrect
        };
        self.results.mark(question.slot, result);

        if self.round == Round::Initial && !correct {
            self.missed.push(question);
        }

        self.current += 1;
        self.answer.clear();
        if self.is_round_complete() {
            self.completed_at = Some(answered_at);
        }

        Ok(AnswerOutcome {
            question,
            correct,
            expected,
            round: self.round,
        })
    }

    /// Switch to the review round over the questions missed in round one.
    ///
    /// The review order is the round-one encounter order; it is not
    /// re-shuffled. With nothing missed the session is left untouched and
    /// `NoReviewNeeded` is returned.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InitialRoundIncomplete` before round one finishes
    /// and `QuizError::ReviewAlreadyStarted` on a second call.
    pub fn start_review(&mut self) -> Result<ReviewStart, QuizError> {
        if self.round == Round::Review {
            return Err(QuizError::ReviewAlreadyStarted);
        }
        if !self.is_round_complete() {
            return Err(QuizError::InitialRoundIncomplete);
        }
        if self.missed.is_empty() {
            return Ok(ReviewStart::NoReviewNeeded);
        }

        self.review_list = self.missed.clone();
        self.round = Round::Review;
        self.current = 0;
        self.answer.clear();
        self.completed_at = None;

        Ok(ReviewStart::Started)
    }

    /// Score over the slot results at this moment.
    #[must_use]
    pub fn score_summary(&self) -> ScoreSummary {
        ScoreSummary::from_results(&self.results)
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        let total = self.active_questions().len();
        QuizProgress {
            round: self.round,
            total,
            answered: self.current.min(total),
            remaining: total.saturating_sub(self.current),
            is_complete: self.is_round_complete(),
            slots: self.results.slots(),
        }
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("instrument", &self.instrument)
            .field("round", &self.round)
            .field("current", &self.current)
            .field("missed_len", &self.missed.len())
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use trainer_core::model::{Accidental, ConcertKey};
    use trainer_core::time::fixed_now;

    fn canonical_session(instrument: Instrument) -> QuizSession {
        QuizSession::start(instrument, QuizPlan::ordered(ConcertKey::ALL), fixed_now())
    }

    fn submit_expected(session: &mut QuizSession) -> AnswerOutcome {
        let question = *session.current_question().unwrap();
        let expected = session.instrument().transpose(question.concert).signature();
        match expected {
            KeySignature::AllNatural => session.choose(AnswerChoice::AllNatural),
            KeySignature::Marks(marks) => {
                for mark in marks {
                    session.choose(AnswerChoice::Accidental(mark));
                }
            }
        }
        session.submit_answer(fixed_now()).unwrap()
    }

    #[test]
    fn fresh_session_starts_at_the_first_question() {
        let session = canonical_session(Instrument::Bravo);

        assert_eq!(session.round(), Round::Initial);
        assert_eq!(session.current_question().unwrap().concert, ConcertKey::F);
        assert!(session.answer().is_empty());
        assert!(!session.is_round_complete());
        assert_eq!(session.score_summary().correct_count(), 0);
        assert_eq!(session.started_at(), fixed_now());
        assert_eq!(session.completed_at(), None);
    }

    #[test]
    fn correct_answer_marks_the_slot_and_advances() {
        // bravo reads concert F as G, one sharp.
        let mut session = canonical_session(Instrument::Bravo);
        session.choose(AnswerChoice::Accidental(Accidental::FSharp));

        let outcome = session.submit_answer(fixed_now()).unwrap();
        assert!(outcome.correct);
        assert_eq!(outcome.expected, KeySignature::sharps(1));
        assert_eq!(outcome.round, Round::Initial);

        let slot = outcome.question.slot;
        assert_eq!(session.results().get(slot), SlotResult::Correct);
        assert!(session.answer().is_empty());
        assert_eq!(session.current_question().unwrap().concert, ConcertKey::BFlat);
        assert!(!session.has_missed());
    }

    #[test]
    fn incomplete_answer_is_incorrect_and_queued_for_review() {
        // charlie keeps concert B♭, whose signature is B♭ E♭.
        let mut session = canonical_session(Instrument::Charlie);
        submit_expected(&mut session);

        session.choose(AnswerChoice::Accidental(Accidental::BFlat));
        let outcome = session.submit_answer(fixed_now()).unwrap();

        assert!(!outcome.correct);
        assert_eq!(
            outcome.expected,
            KeySignature::Marks(vec![Accidental::BFlat, Accidental::EFlat])
        );
        assert_eq!(session.results().get(outcome.question.slot), SlotResult::Incorrect);
        assert!(session.has_missed());
    }

    #[test]
    fn right_marks_in_the_wrong_order_are_incorrect() {
        let mut session = canonical_session(Instrument::Charlie);
        submit_expected(&mut session);

        session.choose(AnswerChoice::Accidental(Accidental::EFlat));
        session.choose(AnswerChoice::Accidental(Accidental::BFlat));
        let outcome = session.submit_answer(fixed_now()).unwrap();

        assert!(!outcome.correct);
    }

    #[test]
    fn all_natural_answers_the_c_major_question() {
        // bravo reads concert B♭ as C.
        let mut session = canonical_session(Instrument::Bravo);
        submit_expected(&mut session);

        session.choose(AnswerChoice::AllNatural);
        let outcome = session.submit_answer(fixed_now()).unwrap();

        assert!(outcome.correct);
        assert_eq!(outcome.expected, KeySignature::AllNatural);
    }

    #[test]
    fn empty_answer_is_not_all_natural() {
        let mut session = canonical_session(Instrument::Bravo);
        submit_expected(&mut session);

        // Concert B♭ expects All Natural; submitting nothing must not match.
        let outcome = session.submit_answer(fixed_now()).unwrap();
        assert!(!outcome.correct);
    }

    #[test]
    fn submit_after_the_round_errors() {
        let mut session = canonical_session(Instrument::Charlie);
        for _ in 0..4 {
            submit_expected(&mut session);
        }

        assert!(session.is_round_complete());
        assert_eq!(session.completed_at(), Some(fixed_now()));
        let err = session.submit_answer(fixed_now()).unwrap_err();
        assert!(matches!(err, QuizError::RoundComplete));
    }

    #[test]
    fn review_before_round_one_finishes_errors() {
        let mut session = canonical_session(Instrument::Charlie);
        submit_expected(&mut session);

        let err = session.start_review().unwrap_err();
        assert!(matches!(err, QuizError::InitialRoundIncomplete));
    }

    #[test]
    fn perfect_round_needs_no_review_and_keeps_results() {
        let mut session = canonical_session(Instrument::Charlie);
        for _ in 0..4 {
            submit_expected(&mut session);
        }
        let results_before = *session.results();

        assert_eq!(session.start_review().unwrap(), ReviewStart::NoReviewNeeded);
        assert_eq!(session.round(), Round::Initial);
        assert_eq!(*session.results(), results_before);
        assert_eq!(session.score_summary().percent(), 100);
    }

    #[test]
    fn review_covers_the_missed_questions_in_encounter_order() {
        let mut session = canonical_session(Instrument::Charlie);
        // Miss F and A♭ (slots 0 and 2), answer B♭ and E♭ correctly.
        session.submit_answer(fixed_now()).unwrap();
        submit_expected(&mut session);
        session.submit_answer(fixed_now()).unwrap();
        submit_expected(&mut session);

        let summary = session.score_summary();
        assert_eq!(summary.correct_count(), 2);
        assert_eq!(summary.percent(), 50);

        assert_eq!(session.start_review().unwrap(), ReviewStart::Started);
        assert_eq!(session.round(), Round::Review);
        assert_eq!(session.completed_at(), None);

        let review_keys: Vec<_> = session.review_list().iter().map(|q| q.concert).collect();
        assert_eq!(review_keys, vec![ConcertKey::F, ConcertKey::AFlat]);
        assert_eq!(session.current_question().unwrap().concert, ConcertKey::F);
    }

    #[test]
    fn corrected_review_answers_flip_their_slots() {
        let mut session = canonical_session(Instrument::Charlie);
        session.submit_answer(fixed_now()).unwrap();
        submit_expected(&mut session);
        session.submit_answer(fixed_now()).unwrap();
        submit_expected(&mut session);
        session.start_review().unwrap();

        let outcome = submit_expected(&mut session);
        assert!(outcome.correct);
        assert_eq!(outcome.round, Round::Review);
        assert_eq!(session.results().get(outcome.question.slot), SlotResult::Correct);

        submit_expected(&mut session);
        assert!(session.is_round_complete());
        assert_eq!(session.score_summary().correct_count(), 4);
        assert_eq!(session.score_summary().percent(), 100);
    }

    #[test]
    fn failed_review_answers_stay_incorrect_and_are_not_requeued() {
        let mut session = canonical_session(Instrument::Charlie);
        session.submit_answer(fixed_now()).unwrap();
        for _ in 0..3 {
            submit_expected(&mut session);
        }
        session.start_review().unwrap();
        assert_eq!(session.review_list().len(), 1);

        let outcome = session.submit_answer(fixed_now()).unwrap();
        assert!(!outcome.correct);
        assert_eq!(session.results().get(outcome.question.slot), SlotResult::Incorrect);
        assert!(session.is_round_complete());
        // The missed slot is visited exactly once in review.
        assert_eq!(session.review_list().len(), 1);
        assert_eq!(session.score_summary().correct_count(), 3);
    }

    #[test]
    fn starting_review_twice_errors() {
        let mut session = canonical_session(Instrument::Charlie);
        session.submit_answer(fixed_now()).unwrap();
        for _ in 0..3 {
            submit_expected(&mut session);
        }
        session.start_review().unwrap();

        let err = session.start_review().unwrap_err();
        assert!(matches!(err, QuizError::ReviewAlreadyStarted));
    }

    #[test]
    fn progress_tracks_the_active_round() {
        let mut session = canonical_session(Instrument::Charlie);
        session.submit_answer(fixed_now()).unwrap();

        let progress = session.progress();
        assert_eq!(progress.round, Round::Initial);
        assert_eq!(progress.total, 4);
        assert_eq!(progress.answered, 1);
        assert_eq!(progress.remaining, 3);
        assert!(!progress.is_complete);
        assert_eq!(progress.slots[0], SlotResult::Incorrect);

        for _ in 0..3 {
            submit_expected(&mut session);
        }
        session.start_review().unwrap();

        let review_progress = session.progress();
        assert_eq!(review_progress.round, Round::Review);
        assert_eq!(review_progress.total, 1);
        assert_eq!(review_progress.answered, 0);
        assert_eq!(review_progress.remaining, 1);
    }
}
