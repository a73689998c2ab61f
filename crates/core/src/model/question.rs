use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::keys::ConcertKey;

/// Position of a question in the original round-one order.
///
/// Review questions carry the slot of the round-one question they retry, so a
/// corrected answer updates the right result entry.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotIndex(usize);

impl SlotIndex {
    /// Creates a new `SlotIndex`
    #[must_use]
    pub fn new(slot: usize) -> Self {
        Self(slot)
    }

    /// Returns the underlying index
    #[must_use]
    pub fn value(&self) -> usize {
        self.0
    }
}

impl fmt::Debug for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SlotIndex({})", self.0)
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One quiz question: a concert key and the slot it occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub concert: ConcertKey,
    pub slot: SlotIndex,
}

impl Question {
    #[must_use]
    pub fn new(concert: ConcertKey, slot: SlotIndex) -> Self {
        Self { concert, slot }
    }
}

/// Which pass of the quiz is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Round {
    /// First pass over all four concert keys.
    Initial,
    /// Second pass over the questions missed in the initial round.
    Review,
}
