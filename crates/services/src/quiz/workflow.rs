use std::sync::Arc;

use rand::Rng;

use trainer_core::Clock;
use trainer_core::model::{AnswerChoice, Instrument, Round, ScoreSummary};

use super::plan::QuizPlan;
use super::session::{AnswerOutcome, QuizSession, ReviewStart};
use crate::error::QuizError;
use crate::presenter::Presenter;

/// Result of answering a single question through the loop service.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizAnswerResult {
    pub outcome: AnswerOutcome,
    pub is_round_complete: bool,
    /// Present only when the answer finished a round.
    pub summary: Option<ScoreSummary>,
}

/// Orchestrates quiz sessions and presenter notifications.
///
/// Every operation is synchronous and runs to completion on the calling
/// thread; the presenter is notified inline during the state transition.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    presenter: Arc<dyn Presenter>,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(clock: Clock, presenter: Arc<dyn Presenter>) -> Self {
        Self { clock, presenter }
    }

    /// Start a session with a freshly shuffled question order.
    ///
    /// Emits `question_ready` for the question at index 0. Any previous
    /// session the caller holds is simply dropped.
    #[must_use]
    pub fn start(&self, instrument: Instrument) -> QuizSession {
        self.start_with_plan(instrument, QuizPlan::draw())
    }

    /// Start a session shuffled by the given RNG, for reproducible orders.
    pub fn start_with_rng<R: Rng + ?Sized>(&self, instrument: Instrument, rng: &mut R) -> QuizSession {
        self.start_with_plan(instrument, QuizPlan::shuffled(rng))
    }

    /// Parse an instrument token and start a session for it.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Instrument` for a token outside the fixed set.
    pub fn start_from_token(&self, token: &str) -> Result<QuizSession, QuizError> {
        let instrument: Instrument = token.parse()?;
        Ok(self.start(instrument))
    }

    fn start_with_plan(&self, instrument: Instrument, plan: QuizPlan) -> QuizSession {
        let session = QuizSession::start(instrument, plan, self.clock.now());
        if let Some(question) = session.current_question() {
            self.presenter.question_ready(question);
        }
        session
    }

    /// Forward an answer-button choice to the session. No events; choosing is
    /// not a scored action.
    pub fn choose(&self, session: &mut QuizSession, choice: AnswerChoice) {
        session.choose(choice);
    }

    /// Discard the in-progress answer. No events.
    pub fn clear_answer(&self, session: &mut QuizSession) {
        session.clear_answer();
    }

    /// Check the in-progress answer and notify the presenter.
    ///
    /// Emits `answer_outcome`, then either `question_ready` for the next
    /// question or `round_complete` when the active round is exhausted.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::RoundComplete` if no question is pending.
    pub fn submit(&self, session: &mut QuizSession) -> Result<QuizAnswerResult, QuizError> {
        let outcome = session.submit_answer(self.clock.now())?;
        self.presenter.answer_outcome(&outcome);

        if let Some(next) = session.current_question() {
            self.presenter.question_ready(next);
            return Ok(QuizAnswerResult {
                outcome,
                is_round_complete: false,
                summary: None,
            });
        }

        let summary = session.score_summary();
        let has_review_pending = outcome.round == Round::Initial && session.has_missed();
        self.presenter
            .round_complete(outcome.round, summary, has_review_pending);

        Ok(QuizAnswerResult {
            outcome,
            is_round_complete: true,
            summary: Some(summary),
        })
    }

    /// Switch the session into its review round.
    ///
    /// Emits `question_ready` for review index 0 when a review actually
    /// starts; `NoReviewNeeded` emits nothing.
    ///
    /// # Errors
    ///
    /// Propagates the session's ordering errors.
    pub fn start_review(&self, session: &mut QuizSession) -> Result<ReviewStart, QuizError> {
        let started = session.start_review()?;
        if started == ReviewStart::Started {
            if let Some(question) = session.current_question() {
                self.presenter.question_ready(question);
            }
        }
        Ok(started)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use trainer_core::model::{Accidental, ConcertKey, Question};
    use trainer_core::time::fixed_clock;

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Ready(ConcertKey),
        Outcome { correct: bool, round: Round },
        RoundDone { round: Round, percent: u32, pending: bool },
    }

    #[derive(Default)]
    struct RecordingPresenter {
        events: RefCell<Vec<Event>>,
    }

    impl Presenter for RecordingPresenter {
        fn question_ready(&self, question: &Question) {
            self.events.borrow_mut().push(Event::Ready(question.concert));
        }

        fn answer_outcome(&self, outcome: &AnswerOutcome) {
            self.events.borrow_mut().push(Event::Outcome {
                correct: outcome.correct,
                round: outcome.round,
            });
        }

        fn round_complete(&self, round: Round, summary: ScoreSummary, has_review_pending: bool) {
            self.events.borrow_mut().push(Event::RoundDone {
                round,
                percent: summary.percent(),
                pending: has_review_pending,
            });
        }
    }

    fn service() -> (QuizLoopService, Arc<RecordingPresenter>) {
        let presenter = Arc::new(RecordingPresenter::default());
        let service = QuizLoopService::new(fixed_clock(), presenter.clone());
        (service, presenter)
    }

    fn start_canonical() -> QuizSession {
        // charlie keeps concert pitch, so expected signatures are the flat
        // signatures of the four concert keys themselves.
        let plan = QuizPlan::ordered(ConcertKey::ALL);
        QuizSession::start(Instrument::Charlie, plan, fixed_clock().now())
    }

    #[test]
    fn start_emits_the_first_question() {
        let (service, presenter) = service();
        let session = service.start_with_rng(Instrument::Bravo, &mut seeded_rng());

        let events = presenter.events.borrow();
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0],
            Event::Ready(session.current_question().unwrap().concert)
        );
    }

    #[test]
    fn start_from_token_rejects_unknown_instruments() {
        let (service, presenter) = service();

        let err = service.start_from_token("kazoo").unwrap_err();
        assert!(matches!(err, QuizError::Instrument(_)));
        assert!(presenter.events.borrow().is_empty());
    }

    #[test]
    fn submit_emits_outcome_then_next_question() {
        let (service, presenter) = service();
        let mut session = start_canonical();

        service.choose(&mut session, AnswerChoice::Accidental(Accidental::BFlat));
        let result = service.submit(&mut session).unwrap();

        assert!(result.outcome.correct);
        assert!(!result.is_round_complete);
        assert_eq!(result.summary, None);

        let events = presenter.events.borrow();
        assert_eq!(
            *events,
            vec![
                Event::Outcome {
                    correct: true,
                    round: Round::Initial
                },
                Event::Ready(ConcertKey::BFlat),
            ]
        );
    }

    #[test]
    fn finishing_round_one_reports_pending_review() {
        let (service, presenter) = service();
        let mut session = start_canonical();

        // Answer only the first question correctly.
        service.choose(&mut session, AnswerChoice::Accidental(Accidental::BFlat));
        service.submit(&mut session).unwrap();
        for _ in 0..3 {
            let result = service.submit(&mut session).unwrap();
            assert!(!result.outcome.correct);
        }

        let events = presenter.events.borrow();
        assert_eq!(
            events.last().unwrap(),
            &Event::RoundDone {
                round: Round::Initial,
                percent: 25,
                pending: true
            }
        );
    }

    #[test]
    fn perfect_round_reports_no_pending_review() {
        let (service, presenter) = service();
        let mut session = start_canonical();

        answer_all_correct(&service, &mut session);

        let events = presenter.events.borrow();
        assert_eq!(
            events.last().unwrap(),
            &Event::RoundDone {
                round: Round::Initial,
                percent: 100,
                pending: false
            }
        );
        drop(events);

        assert_eq!(
            service.start_review(&mut session).unwrap(),
            ReviewStart::NoReviewNeeded
        );
        // NoReviewNeeded emits nothing.
        assert!(matches!(
            presenter.events.borrow().last().unwrap(),
            Event::RoundDone { .. }
        ));
    }

    #[test]
    fn review_round_completes_with_its_own_event() {
        let (service, presenter) = service();
        let mut session = start_canonical();

        // Miss the first question, answer the rest.
        service.submit(&mut session).unwrap();
        for _ in 0..3 {
            answer_current_correct(&service, &mut session);
        }

        assert_eq!(service.start_review(&mut session).unwrap(), ReviewStart::Started);
        assert_eq!(
            presenter.events.borrow().last().unwrap(),
            &Event::Ready(ConcertKey::F)
        );

        answer_current_correct(&service, &mut session);
        let events = presenter.events.borrow();
        assert_eq!(
            events.last().unwrap(),
            &Event::RoundDone {
                round: Round::Review,
                percent: 100,
                pending: false
            }
        );
    }

    fn seeded_rng() -> rand::rngs::StdRng {
        use rand::SeedableRng;
        rand::rngs::StdRng::seed_from_u64(11)
    }

    fn answer_current_correct(service: &QuizLoopService, session: &mut QuizSession) {
        let question = *session.current_question().unwrap();
        let expected = session.instrument().transpose(question.concert).signature();
        match expected {
            trainer_core::model::KeySignature::AllNatural => {
                service.choose(session, AnswerChoice::AllNatural);
            }
            trainer_core::model::KeySignature::Marks(marks) => {
                for mark in marks {
                    service.choose(session, AnswerChoice::Accidental(mark));
                }
            }
        }
        service.submit(session).unwrap();
    }

    fn answer_all_correct(service: &QuizLoopService, session: &mut QuizSession) {
        while !session.is_round_complete() {
            answer_current_correct(service, session);
        }
    }
}
