use thiserror::Error;

use quiz_core::model::{IdError, QuizId};
use services::{PromptError, QuizServiceError, SessionError};

/// Failures of a single console command.
///
/// Everything except `ConnectionLost` is reported to the user and followed
/// by a fresh prompt.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CommandError {
    #[error("missing id parameter")]
    MissingParameter,

    #[error("`{0}` is not a valid id")]
    NotANumber(String),

    #[error("no quiz with id {0}")]
    RecordNotFound(QuizId),

    #[error("invalid quiz: {0}")]
    ValidationFailure(String),

    #[error("storage failure: {0}")]
    Storage(String),

    #[error("connection lost: {0}")]
    ConnectionLost(#[source] PromptError),
}

impl CommandError {
    /// Whether the connection must be torn down instead of re-prompting.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, CommandError::ConnectionLost(_))
    }

    /// The client closed its end while a prompt was waiting.
    #[must_use]
    pub fn is_hangup(&self) -> bool {
        matches!(self, CommandError::ConnectionLost(PromptError::Closed))
    }
}

impl From<IdError> for CommandError {
    fn from(err: IdError) -> Self {
        match err {
            IdError::MissingParameter => CommandError::MissingParameter,
            IdError::NotANumber(raw) => CommandError::NotANumber(raw),
        }
    }
}

impl From<QuizServiceError> for CommandError {
    fn from(err: QuizServiceError) -> Self {
        match err {
            QuizServiceError::NotFound(id) => CommandError::RecordNotFound(id),
            QuizServiceError::Invalid(e) => CommandError::ValidationFailure(e.to_string()),
            QuizServiceError::Rejected(msg) => CommandError::ValidationFailure(msg),
            other => CommandError::Storage(other.to_string()),
        }
    }
}

impl From<SessionError> for CommandError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Aborted(e) => CommandError::ConnectionLost(e),
            SessionError::Quizzes(e) => e.into(),
            other => CommandError::Storage(other.to_string()),
        }
    }
}

impl From<PromptError> for CommandError {
    fn from(err: PromptError) -> Self {
        CommandError::ConnectionLost(err)
    }
}

impl From<std::io::Error> for CommandError {
    fn from(err: std::io::Error) -> Self {
        CommandError::ConnectionLost(PromptError::Io(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_errors_map_one_to_one() {
        assert!(matches!(
            CommandError::from(IdError::MissingParameter),
            CommandError::MissingParameter
        ));
        assert!(matches!(
            CommandError::from(IdError::NotANumber("abc".into())),
            CommandError::NotANumber(raw) if raw == "abc"
        ));
    }

    #[test]
    fn only_connection_loss_is_fatal() {
        assert!(CommandError::from(PromptError::Closed).is_fatal());
        assert!(!CommandError::RecordNotFound(QuizId::new(1)).is_fatal());
        assert!(!CommandError::ValidationFailure("x".into()).is_fatal());
    }

    #[test]
    fn eof_is_a_hangup_but_io_failure_is_not() {
        assert!(CommandError::from(PromptError::Closed).is_hangup());
        let reset = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        let err = CommandError::from(reset);
        assert!(err.is_fatal());
        assert!(!err.is_hangup());
        assert!(!CommandError::MissingParameter.is_hangup());
    }

    #[test]
    fn aborted_session_is_connection_loss() {
        let err = CommandError::from(SessionError::Aborted(PromptError::Closed));
        assert!(err.is_fatal());
    }
}
