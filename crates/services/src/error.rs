//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{QuizError, QuizId};
use storage::repository::StorageError;

/// Errors emitted by `QuizService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizServiceError {
    #[error("quiz {0} not found")]
    NotFound(QuizId),
    #[error(transparent)]
    Invalid(#[from] QuizError),
    #[error("rejected by store: {0}")]
    Rejected(String),
    #[error(transparent)]
    Storage(StorageError),
}

impl QuizServiceError {
    pub(crate) fn from_storage(id: Option<QuizId>, err: StorageError) -> Self {
        match (err, id) {
            (StorageError::NotFound, Some(id)) => Self::NotFound(id),
            (StorageError::Constraint(msg), _) => Self::Rejected(msg),
            (err, _) => Self::Storage(err),
        }
    }
}

/// Failure of the answer source while a question is pending.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PromptError {
    #[error("input closed")]
    Closed,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors emitted by quiz sessions.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("session aborted: {0}")]
    Aborted(#[source] PromptError),
    #[error(transparent)]
    Quizzes(#[from] QuizServiceError),
}
