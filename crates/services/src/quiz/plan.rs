use rand::Rng;
use rand::seq::SliceRandom;

use trainer_core::model::{ConcertKey, QUIZ_LENGTH, Question, SlotIndex};

/// Question order for the initial round.
///
/// Each question's slot is its position in the order, so slot `n` always means
/// "the n-th question the user saw in round one".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizPlan {
    questions: Vec<Question>,
}

impl QuizPlan {
    /// Build a plan from an unbiased shuffle of the four concert keys.
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut keys = ConcertKey::ALL;
        keys.shuffle(rng);
        Self::ordered(keys)
    }

    /// Build a plan with the thread-local RNG.
    #[must_use]
    pub fn draw() -> Self {
        Self::shuffled(&mut rand::rng())
    }

    /// Build a plan from an explicit key order, for deterministic flows.
    #[must_use]
    pub fn ordered(keys: [ConcertKey; QUIZ_LENGTH]) -> Self {
        let questions = keys
            .iter()
            .enumerate()
            .map(|(slot, &concert)| Question::new(concert, SlotIndex::new(slot)))
            .collect();
        Self { questions }
    }

    #[must_use]
    pub fn into_questions(self) -> Vec<Question> {
        self.questions
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }
}
