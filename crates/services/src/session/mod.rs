mod machine;
mod play;
mod progress;

// Public API of the quiz session subsystem.
pub use crate::error::{PromptError, SessionError};
pub use machine::{EndReason, QuizSession, Selection, SessionOutcome, SessionState, Verdict};
pub use play::{Prompter, SessionEvent, SessionReporter};
pub use progress::SessionProgress;
