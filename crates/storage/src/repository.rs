use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::model::{Quiz, QuizError, QuizId, ValidatedQuiz};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("constraint violation: {0}")]
    Constraint(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Insert/update payload for a quiz row.
///
/// `recorded_at` becomes `created_at` and `updated_at` on insert, and only
/// `updated_at` on update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuizRecord {
    pub question: String,
    pub answer: String,
    pub recorded_at: DateTime<Utc>,
}

impl NewQuizRecord {
    #[must_use]
    pub fn from_validated(quiz: &ValidatedQuiz) -> Self {
        Self {
            question: quiz.question.as_str().to_owned(),
            answer: quiz.answer.as_str().to_owned(),
            recorded_at: quiz.validated_at,
        }
    }
}

/// Repository contract for the quiz table.
#[async_trait]
pub trait QuizRepository: Send + Sync {
    /// All quizzes ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_quizzes(&self) -> Result<Vec<Quiz>, StorageError>;

    /// Fetch a quiz by ID, `None` if missing.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn get_quiz(&self, id: QuizId) -> Result<Option<Quiz>, StorageError>;

    /// Insert a new quiz and return it with its store-assigned id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Constraint` if the row violates table constraints.
    async fn insert_quiz(&self, record: NewQuizRecord) -> Result<Quiz, StorageError>;

    /// Replace question and answer of an existing quiz.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no quiz has this id.
    async fn update_quiz(&self, id: QuizId, record: NewQuizRecord)
    -> Result<Quiz, StorageError>;

    /// Delete a quiz. Returns `false` when nothing was deleted.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn delete_quiz(&self, id: QuizId) -> Result<bool, StorageError>;

    /// Number of stored quizzes.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn count_quizzes(&self) -> Result<u64, StorageError>;
}

fn constraint(e: QuizError) -> StorageError {
    StorageError::Constraint(e.to_string())
}

#[derive(Default)]
struct MemoryTable {
    next_id: i64,
    rows: BTreeMap<QuizId, Quiz>,
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    table: Arc<Mutex<MemoryTable>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuizRepository for InMemoryRepository {
    async fn list_quizzes(&self) -> Result<Vec<Quiz>, StorageError> {
        let guard = self
            .table
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.rows.values().cloned().collect())
    }

    async fn get_quiz(&self, id: QuizId) -> Result<Option<Quiz>, StorageError> {
        let guard = self
            .table
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.rows.get(&id).cloned())
    }

    async fn insert_quiz(&self, record: NewQuizRecord) -> Result<Quiz, StorageError> {
        let mut guard = self
            .table
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let id = QuizId::new(guard.next_id + 1);
        let quiz = Quiz::from_persisted(
            id,
            record.question,
            record.answer,
            record.recorded_at,
            record.recorded_at,
        )
        .map_err(constraint)?;
        guard.next_id = id.value();
        guard.rows.insert(id, quiz.clone());
        Ok(quiz)
    }

    async fn update_quiz(
        &self,
        id: QuizId,
        record: NewQuizRecord,
    ) -> Result<Quiz, StorageError> {
        let mut guard = self
            .table
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let existing = guard.rows.get(&id).ok_or(StorageError::NotFound)?;
        let quiz = Quiz::from_persisted(
            id,
            record.question,
            record.answer,
            existing.created_at(),
            record.recorded_at,
        )
        .map_err(constraint)?;
        guard.rows.insert(id, quiz.clone());
        Ok(quiz)
    }

    async fn delete_quiz(&self, id: QuizId) -> Result<bool, StorageError> {
        let mut guard = self
            .table
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.rows.remove(&id).is_some())
    }

    async fn count_quizzes(&self) -> Result<u64, StorageError> {
        let guard = self
            .table
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.rows.len() as u64)
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub quizzes: Arc<dyn QuizRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let quizzes: Arc<dyn QuizRepository> = Arc::new(InMemoryRepository::new());
        Self { quizzes }
    }
}
