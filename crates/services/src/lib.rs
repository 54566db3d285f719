#![forbid(unsafe_code)]

pub mod error;
pub mod quiz_service;
pub mod session;

pub use quiz_core::Clock;

pub use error::{PromptError, QuizServiceError, SessionError};
pub use quiz_service::{DEFAULT_QUIZZES, QuizService};

pub use session::{
    EndReason, Prompter, QuizSession, SessionEvent, SessionOutcome, SessionProgress,
    SessionReporter, SessionState,
};
