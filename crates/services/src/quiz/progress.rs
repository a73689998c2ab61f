use trainer_core::model::{QUIZ_LENGTH, Round, SlotResult};

/// Aggregated view of quiz progress, useful for rendering.
///
/// `slots` is the per-slot outcome strip in original question order — the
/// data-only replacement for the original's colored progress segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizProgress {
    pub round: Round,
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub is_complete: bool,
    pub slots: [SlotResult; QUIZ_LENGTH],
}
