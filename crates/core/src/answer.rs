//! Answer normalization shared by `test` and `play`.

/// Trim surrounding whitespace and lower-case.
#[must_use]
pub fn normalize_answer(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Exact equality after both sides are normalized.
#[must_use]
pub fn answers_match(reply: &str, expected: &str) -> bool {
    normalize_answer(reply) == normalize_answer(expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surrounding_whitespace_and_case_are_ignored() {
        assert_eq!(normalize_answer("  Paris "), "paris");
        assert!(answers_match("  Paris ", "paris"));
        assert!(answers_match("ROME", "Rome\n"));
    }

    #[test]
    fn punctuation_is_significant() {
        assert!(!answers_match("Paris!", "paris"));
        assert!(!answers_match("Pa ris", "paris"));
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = normalize_answer("  LiSbOn\t");
        assert_eq!(normalize_answer(&once), once);
    }
}
