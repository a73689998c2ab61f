#![forbid(unsafe_code)]

pub mod error;
pub mod presenter;
pub mod quiz;

pub use trainer_core::Clock;

pub use error::QuizError;
pub use presenter::{NullPresenter, Presenter};

pub use quiz::{
    AnswerOutcome, QuizAnswerResult, QuizLoopService, QuizPlan, QuizProgress, QuizSession,
    ReviewStart,
};
