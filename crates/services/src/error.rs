//! Shared error types for the services crate.

use thiserror::Error;

use trainer_core::model::InstrumentError;

/// Errors emitted by the quiz engine.
///
/// Apart from the instrument token, every variant is a contract violation by
/// the presenter (an operation invoked out of order), so callers are expected
/// to fail loudly rather than recover.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("no question is pending; the round is already complete")]
    RoundComplete,
    #[error("the initial round is not complete")]
    InitialRoundIncomplete,
    #[error("the review round has already started")]
    ReviewAlreadyStarted,
    #[error(transparent)]
    Instrument(#[from] InstrumentError),
}
