use quiz_core::model::{Quiz, QuizId};

use super::{
    SqliteRepository,
    mapping::{db_err, map_quiz_row},
};
use crate::repository::{NewQuizRecord, QuizRepository, StorageError};

#[async_trait::async_trait]
impl QuizRepository for SqliteRepository {
    async fn list_quizzes(&self) -> Result<Vec<Quiz>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, question, answer, created_at, updated_at
            FROM quizzes
            ORDER BY id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let mut quizzes = Vec::with_capacity(rows.len());
        for row in rows {
            quizzes.push(map_quiz_row(&row)?);
        }
        Ok(quizzes)
    }

    async fn get_quiz(&self, id: QuizId) -> Result<Option<Quiz>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, question, answer, created_at, updated_at
            FROM quizzes
            WHERE id = ?1
            ",
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.as_ref().map(map_quiz_row).transpose()
    }

    async fn insert_quiz(&self, record: NewQuizRecord) -> Result<Quiz, StorageError> {
        let result = sqlx::query(
            r"
            INSERT INTO quizzes (question, answer, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?3)
            ",
        )
        .bind(record.question.as_str())
        .bind(record.answer.as_str())
        .bind(record.recorded_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        let id = QuizId::new(result.last_insert_rowid());
        Quiz::from_persisted(
            id,
            record.question,
            record.answer,
            record.recorded_at,
            record.recorded_at,
        )
        .map_err(|e| StorageError::Serialization(e.to_string()))
    }

    async fn update_quiz(
        &self,
        id: QuizId,
        record: NewQuizRecord,
    ) -> Result<Quiz, StorageError> {
        let result = sqlx::query(
            r"
            UPDATE quizzes
            SET question = ?1, answer = ?2, updated_at = ?3
            WHERE id = ?4
            ",
        )
        .bind(record.question.as_str())
        .bind(record.answer.as_str())
        .bind(record.recorded_at)
        .bind(id.value())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        self.get_quiz(id).await?.ok_or(StorageError::NotFound)
    }

    async fn delete_quiz(&self, id: QuizId) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM quizzes WHERE id = ?1")
            .bind(id.value())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_quizzes(&self) -> Result<u64, StorageError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quizzes")
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;
        u64::try_from(count)
            .map_err(|_| StorageError::Serialization(format!("invalid count: {count}")))
    }
}
