use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Unique identifier for a Quiz, assigned by the store.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuizId(i64);

impl QuizId {
    /// Creates a new `QuizId`
    #[must_use]
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the underlying i64 value
    #[must_use]
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Debug for QuizId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuizId({})", self.0)
    }
}

impl fmt::Display for QuizId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─── Id validation ─────────────────────────────────────────────────────────────

/// Why a user-supplied id token was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdError {
    #[error("missing id parameter")]
    MissingParameter,

    #[error("`{0}` is not a valid id")]
    NotANumber(String),
}

impl FromStr for QuizId {
    type Err = IdError;

    /// Lenient parse: leading whitespace and an optional sign are accepted and
    /// anything after the leading run of digits is ignored (`"7.9"` is 7).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_leading_int(s)
            .map(QuizId::new)
            .ok_or_else(|| IdError::NotANumber(s.to_string()))
    }
}

/// Convert a raw command argument into a `QuizId`.
///
/// # Errors
///
/// Returns `IdError::MissingParameter` when `raw` is `None` and
/// `IdError::NotANumber` when it has no leading integer.
pub fn validate_id(raw: Option<&str>) -> Result<QuizId, IdError> {
    raw.ok_or(IdError::MissingParameter)?.parse()
}

fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    let digits = &rest[..digits_len];
    let value: i64 = digits.parse().ok()?;
    Some(if negative { -value } else { value })
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiz_id_display() {
        let id = QuizId::new(42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(format!("{id:?}"), "QuizId(42)");
    }

    #[test]
    fn validate_id_requires_a_parameter() {
        assert_eq!(validate_id(None), Err(IdError::MissingParameter));
    }

    #[test]
    fn validate_id_rejects_non_numbers() {
        assert_eq!(
            validate_id(Some("abc")),
            Err(IdError::NotANumber("abc".into()))
        );
        assert!(matches!(validate_id(Some("")), Err(IdError::NotANumber(_))));
        assert!(matches!(validate_id(Some("-")), Err(IdError::NotANumber(_))));
        assert!(matches!(validate_id(Some(".5")), Err(IdError::NotANumber(_))));
    }

    #[test]
    fn validate_id_parses_plain_integers() {
        assert_eq!(validate_id(Some("7")), Ok(QuizId::new(7)));
        assert_eq!(validate_id(Some("  12")), Ok(QuizId::new(12)));
        assert_eq!(validate_id(Some("+3")), Ok(QuizId::new(3)));
        assert_eq!(validate_id(Some("-3")), Ok(QuizId::new(-3)));
    }

    #[test]
    fn validate_id_ignores_trailing_suffix() {
        assert_eq!(validate_id(Some("7.9")), Ok(QuizId::new(7)));
        assert_eq!(validate_id(Some("12abc")), Ok(QuizId::new(12)));
    }

    #[test]
    fn validate_id_rejects_overflow() {
        assert!(matches!(
            validate_id(Some("99999999999999999999")),
            Err(IdError::NotANumber(_))
        ));
    }
}
