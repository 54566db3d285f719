mod ids;
mod quiz;
pub mod text;

pub use ids::{IdError, QuizId, validate_id};
pub use quiz::{Quiz, QuizDraft, QuizError, ValidatedQuiz};
pub use text::{AnswerText, QuestionText, TextError};
