use std::sync::Arc;

use quiz_core::model::{Quiz, QuizDraft, QuizId};
use rand::Rng;
use storage::repository::{NewQuizRecord, QuizRepository};
use tracing::{debug, info};

use crate::Clock;
use crate::error::QuizServiceError;
use crate::session::QuizSession;

/// Questions inserted into an empty table on first start.
pub const DEFAULT_QUIZZES: [(&str, &str); 4] = [
    ("Capital of Italy", "Rome"),
    ("Capital of France", "Paris"),
    ("Capital of Spain", "Madrid"),
    ("Capital of Portugal", "Lisbon"),
];

/// Orchestrates quiz validation and persistence.
#[derive(Clone)]
pub struct QuizService {
    clock: Clock,
    quizzes: Arc<dyn QuizRepository>,
}

impl QuizService {
    #[must_use]
    pub fn new(clock: Clock, quizzes: Arc<dyn QuizRepository>) -> Self {
        Self { clock, quizzes }
    }

    /// List every stored quiz, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Storage` if repository access fails.
    pub async fn list(&self) -> Result<Vec<Quiz>, QuizServiceError> {
        self.quizzes
            .list_quizzes()
            .await
            .map_err(|e| QuizServiceError::from_storage(None, e))
    }

    /// Fetch one quiz.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::NotFound` if no quiz has this id.
    pub async fn get(&self, id: QuizId) -> Result<Quiz, QuizServiceError> {
        self.quizzes
            .get_quiz(id)
            .await
            .map_err(|e| QuizServiceError::from_storage(Some(id), e))?
            .ok_or(QuizServiceError::NotFound(id))
    }

    /// Validate and persist a new quiz.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Invalid` for blank text.
    /// Returns `QuizServiceError::Rejected` if the store refuses the row.
    pub async fn create(&self, draft: QuizDraft) -> Result<Quiz, QuizServiceError> {
        let validated = draft.validate(self.clock.now())?;
        let quiz = self
            .quizzes
            .insert_quiz(NewQuizRecord::from_validated(&validated))
            .await
            .map_err(|e| QuizServiceError::from_storage(None, e))?;
        debug!(quiz_id = %quiz.id(), "quiz created");
        Ok(quiz)
    }

    /// Replace the question and answer of an existing quiz.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::NotFound` if the id is absent, or
    /// `QuizServiceError::Invalid` for blank text.
    pub async fn update(&self, id: QuizId, draft: QuizDraft) -> Result<Quiz, QuizServiceError> {
        let validated = draft.validate(self.clock.now())?;
        let quiz = self
            .quizzes
            .update_quiz(id, NewQuizRecord::from_validated(&validated))
            .await
            .map_err(|e| QuizServiceError::from_storage(Some(id), e))?;
        debug!(quiz_id = %id, "quiz updated");
        Ok(quiz)
    }

    /// Delete a quiz.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::NotFound` if nothing was deleted.
    pub async fn delete(&self, id: QuizId) -> Result<(), QuizServiceError> {
        let deleted = self
            .quizzes
            .delete_quiz(id)
            .await
            .map_err(|e| QuizServiceError::from_storage(Some(id), e))?;
        if !deleted {
            return Err(QuizServiceError::NotFound(id));
        }
        debug!(quiz_id = %id, "quiz deleted");
        Ok(())
    }

    /// Snapshot every quiz into a fresh randomized session.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Storage` if the quizzes cannot be loaded.
    pub async fn new_session<R: Rng>(&self, rng: R) -> Result<QuizSession<R>, QuizServiceError> {
        let quizzes = self.list().await?;
        Ok(QuizSession::new(quizzes, rng))
    }

    /// Insert [`DEFAULT_QUIZZES`] when the table is empty.
    ///
    /// Returns how many quizzes were inserted.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError` if counting or inserting fails.
    pub async fn ensure_default_quizzes(&self) -> Result<usize, QuizServiceError> {
        let count = self
            .quizzes
            .count_quizzes()
            .await
            .map_err(|e| QuizServiceError::from_storage(None, e))?;
        if count > 0 {
            return Ok(0);
        }

        for (question, answer) in DEFAULT_QUIZZES {
            self.create(QuizDraft::new(question, answer)).await?;
        }
        info!(inserted = DEFAULT_QUIZZES.len(), "seeded default quizzes");
        Ok(DEFAULT_QUIZZES.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_clock;
    use storage::repository::InMemoryRepository;

    fn service() -> QuizService {
        QuizService::new(fixed_clock(), Arc::new(InMemoryRepository::new()))
    }

    #[tokio::test]
    async fn get_missing_quiz_is_not_found() {
        let err = service().get(QuizId::new(7)).await.unwrap_err();
        assert!(matches!(err, QuizServiceError::NotFound(id) if id == QuizId::new(7)));
    }

    #[tokio::test]
    async fn create_rejects_blank_answer() {
        let svc = service();
        let err = svc.create(QuizDraft::new("Q", "  ")).await.unwrap_err();
        assert!(matches!(err, QuizServiceError::Invalid(_)));
        assert!(svc.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_missing_quiz_is_not_found() {
        let err = service()
            .update(QuizId::new(3), QuizDraft::new("Q", "A"))
            .await
            .unwrap_err();
        assert!(matches!(err, QuizServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_missing_quiz_is_not_found() {
        let err = service().delete(QuizId::new(3)).await.unwrap_err();
        assert!(matches!(err, QuizServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn defaults_are_seeded_only_once() {
        let svc = service();
        assert_eq!(svc.ensure_default_quizzes().await.unwrap(), 4);
        assert_eq!(svc.ensure_default_quizzes().await.unwrap(), 0);

        let all = svc.list().await.unwrap();
        assert_eq!(all.len(), 4);
        assert_eq!(all[1].answer().as_str(), "Paris");
    }

    #[tokio::test]
    async fn defaults_skip_non_empty_table() {
        let svc = service();
        svc.create(QuizDraft::new("2+2?", "4")).await.unwrap();
        assert_eq!(svc.ensure_default_quizzes().await.unwrap(), 0);
        assert_eq!(svc.list().await.unwrap().len(), 1);
    }
}
