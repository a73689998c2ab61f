use serde::{Deserialize, Serialize};

use crate::model::keys::QUIZ_LENGTH;
use crate::model::question::SlotIndex;

//
// ─── SLOT RESULTS ─────────────────────────────────────────────────────────────
//

/// Outcome recorded for one round-one question slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SlotResult {
    /// Not answered yet.
    #[default]
    Pending,
    Correct,
    Incorrect,
}

/// Per-slot results for the whole quiz, one entry per round-one question.
///
/// Every slot starts `Pending`, is marked exactly once during the initial
/// round, and may be re-marked by the review round — review updates existing
/// slots, it never adds new ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SlotResults([SlotResult; QUIZ_LENGTH]);

impl SlotResults {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the result for a slot, overwriting any earlier mark.
    pub fn mark(&mut self, slot: SlotIndex, result: SlotResult) {
        self.0[slot.value()] = result;
    }

    #[must_use]
    pub fn get(&self, slot: SlotIndex) -> SlotResult {
        self.0[slot.value()]
    }

    /// All slots in original question order.
    #[must_use]
    pub fn slots(&self) -> [SlotResult; QUIZ_LENGTH] {
        self.0
    }

    /// Number of slots currently marked correct.
    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.0
            .iter()
            .filter(|result| **result == SlotResult::Correct)
            .count() as u32
    }
}

//
// ─── SCORE SUMMARY ────────────────────────────────────────────────────────────
//

/// Score over the four question slots at the moment it was computed.
///
/// After the initial round this reflects round-one results only; after review
/// it includes the slots the review pass corrected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSummary {
    correct_count: u32,
    percent: u32,
}

impl ScoreSummary {
    /// Compute the summary from the current slot results.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_results(results: &SlotResults) -> Self {
        let correct_count = results.correct_count();
        let percent =
            (f64::from(correct_count) / QUIZ_LENGTH as f64 * 100.0).round() as u32;
        Self {
            correct_count,
            percent,
        }
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    #[must_use]
    pub fn percent(&self) -> u32 {
        self.percent
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
