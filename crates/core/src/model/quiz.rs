use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::answer::answers_match;
use crate::model::ids::QuizId;
use crate::model::text::{AnswerText, QuestionText, TextError};

//
// ─── QUIZ TYPES ────────────────────────────────────────────────────────────────
//

/// Raw question/answer pair as typed by a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizDraft {
    pub question: String,
    pub answer: String,
}

impl QuizDraft {
    #[must_use]
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// # Errors
    ///
    /// Returns `QuizError::InvalidQuestion` or `QuizError::InvalidAnswer` when
    /// either side is blank.
    pub fn validate(self, now: DateTime<Utc>) -> Result<ValidatedQuiz, QuizError> {
        let question = QuestionText::parse(self.question).map_err(QuizError::InvalidQuestion)?;
        let answer = AnswerText::parse(self.answer).map_err(QuizError::InvalidAnswer)?;

        Ok(ValidatedQuiz {
            question,
            answer,
            validated_at: now,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedQuiz {
    pub question: QuestionText,
    pub answer: AnswerText,
    pub validated_at: DateTime<Utc>,
}

impl ValidatedQuiz {
    #[must_use]
    pub fn assign_id(self, id: QuizId) -> Quiz {
        Quiz {
            id,
            question: self.question,
            answer: self.answer,
            created_at: self.validated_at,
            updated_at: self.validated_at,
        }
    }
}

/// A stored question/answer pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quiz {
    id: QuizId,
    question: QuestionText,
    answer: AnswerText,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Quiz {
    /// Rehydrate a quiz from persisted columns.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` if the stored text is blank or the timestamps are inverted.
    pub fn from_persisted(
        id: QuizId,
        question: String,
        answer: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, QuizError> {
        if updated_at < created_at {
            return Err(QuizError::InvalidPersistedState(
                "updated_at is before created_at".into(),
            ));
        }
        Ok(Self {
            id,
            question: QuestionText::parse(question).map_err(QuizError::InvalidQuestion)?,
            answer: AnswerText::parse(answer).map_err(QuizError::InvalidAnswer)?,
            created_at,
            updated_at,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuizId {
        self.id
    }

    #[must_use]
    pub fn question(&self) -> &QuestionText {
        &self.question
    }

    #[must_use]
    pub fn answer(&self) -> &AnswerText {
        &self.answer
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Whether `reply` matches the stored answer after normalization.
    #[must_use]
    pub fn is_correct(&self, reply: &str) -> bool {
        answers_match(reply, self.answer.as_str())
    }
}

//
// ─── QUIZ ERRORS ───────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("invalid question: {0}")]
    InvalidQuestion(#[source] TextError),

    #[error("invalid answer: {0}")]
    InvalidAnswer(#[source] TextError),

    #[error("invalid persisted quiz: {0}")]
    InvalidPersistedState(String),
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
