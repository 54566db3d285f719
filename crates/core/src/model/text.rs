use std::fmt;
use std::marker::PhantomData;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TextError {
    #[error("text must not be empty")]
    Empty,
}

/// Non-empty text, tagged with the field it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Text<T>(String, PhantomData<T>);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Question;
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Answer;

pub type QuestionText = Text<Question>;
pub type AnswerText = Text<Answer>;

impl<T> Text<T> {
    /// # Errors
    ///
    /// Returns `TextError::Empty` if the text is blank after trimming.
    pub fn parse(s: impl Into<String>) -> Result<Self, TextError> {
        let s = s.into();
        if s.trim().is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(s, PhantomData))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl<T> fmt::Display for Text<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_is_rejected() {
        assert_eq!(QuestionText::parse("  \t").unwrap_err(), TextError::Empty);
        assert_eq!(AnswerText::parse("").unwrap_err(), TextError::Empty);
    }

    #[test]
    fn text_keeps_original_spacing() {
        let text = AnswerText::parse(" Rome ").unwrap();
        assert_eq!(text.as_str(), " Rome ");
        assert_eq!(text.to_string(), " Rome ");
    }
}
