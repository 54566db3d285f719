use quiz_core::model::{Quiz, QuizId};
use sqlx::Row;

use crate::repository::StorageError;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

/// Map a sqlx failure, keeping CHECK / NOT NULL violations distinct.
pub(crate) fn db_err(e: sqlx::Error) -> StorageError {
    match &e {
        sqlx::Error::Database(db) if db.is_check_violation() => {
            StorageError::Constraint(db.message().to_owned())
        }
        sqlx::Error::Database(db) if db.code().as_deref() == Some("1299") => {
            // SQLITE_CONSTRAINT_NOTNULL
            StorageError::Constraint(db.message().to_owned())
        }
        _ => StorageError::Connection(e.to_string()),
    }
}

pub(crate) fn map_quiz_row(row: &sqlx::sqlite::SqliteRow) -> Result<Quiz, StorageError> {
    Quiz::from_persisted(
        QuizId::new(row.try_get::<i64, _>("id").map_err(ser)?),
        row.try_get::<String, _>("question").map_err(ser)?,
        row.try_get::<String, _>("answer").map_err(ser)?,
        row.try_get("created_at").map_err(ser)?,
        row.try_get("updated_at").map_err(ser)?,
    )
    .map_err(ser)
}
