//! Identifier validation for the service boundary.
//!
//! Participant ids become storage keys and log lines, so they are checked
//! before any operation touches the store. Quest slugs follow the catalog's
//! lowercase-slug convention.

/// Identifier validation errors with helpful messages
#[derive(Debug, thiserror::Error)]
pub enum IdentifierError {
    #[error("identifier is too short (minimum {min} characters)")]
    TooShort { min: usize },

    #[error("identifier is too long (maximum {max} characters)")]
    TooLong { max: usize },

    #[error("identifier contains invalid characters: {chars}")]
    InvalidCharacters { chars: String },

    #[error("identifier contains path separators (/ or \\)")]
    PathTraversal,

    #[error("identifier may not start or end with a separator")]
    EdgeSeparator,
}

const PARTICIPANT_MIN: usize = 2;
const PARTICIPANT_MAX: usize = 64;
const SLUG_MIN: usize = 2;
const SLUG_MAX: usize = 48;

/// Validate a participant id: 2-64 ASCII alphanumerics plus `-`, `_`, `.`.
pub fn validate_participant_id(id: &str) -> Result<(), IdentifierError> {
    validate(id, PARTICIPANT_MIN, PARTICIPANT_MAX, |c| {
        c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')
    })
}

/// Validate a quest slug: 2-48 lowercase ASCII alphanumerics plus `-`.
pub fn validate_quest_slug(slug: &str) -> Result<(), IdentifierError> {
    validate(slug, SLUG_MIN, SLUG_MAX, |c| {
        c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'
    })
}

fn validate(
    id: &str,
    min: usize,
    max: usize,
    allowed: impl Fn(char) -> bool,
) -> Result<(), IdentifierError> {
    if id.contains('/') || id.contains('\\') {
        return Err(IdentifierError::PathTraversal);
    }
    if id.chars().count() < min {
        return Err(IdentifierError::TooShort { min });
    }
    if id.chars().count() > max {
        return Err(IdentifierError::TooLong { max });
    }
    let invalid: String = id.chars().filter(|&c| !allowed(c)).collect();
    if !invalid.is_empty() {
        return Err(IdentifierError::InvalidCharacters { chars: invalid });
    }
    let first = id.chars().next().unwrap_or(' ');
    let last = id.chars().next_back().unwrap_or(' ');
    if !first.is_ascii_alphanumeric() || !last.is_ascii_alphanumeric() {
        return Err(IdentifierError::EdgeSeparator);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_reasonable_participants() {
        for id in ["alice", "bob-42", "carol_w", "d.e", "SP2J6ZY4"] {
            validate_participant_id(id).unwrap_or_else(|e| panic!("{}: {}", id, e));
        }
    }

    #[test]
    fn rejects_bad_participants() {
        assert!(matches!(
            validate_participant_id("a"),
            Err(IdentifierError::TooShort { .. })
        ));
        assert!(matches!(
            validate_participant_id(&"x".repeat(65)),
            Err(IdentifierError::TooLong { .. })
        ));
        assert!(matches!(
            validate_participant_id("ali ce"),
            Err(IdentifierError::InvalidCharacters { .. })
        ));
        assert!(matches!(
            validate_participant_id("../etc"),
            Err(IdentifierError::PathTraversal)
        ));
        assert!(matches!(
            validate_participant_id("-alice"),
            Err(IdentifierError::EdgeSeparator)
        ));
    }

    #[test]
    fn slugs_are_lowercase_kebab() {
        validate_quest_slug("liquidity-kata").expect("valid slug");
        validate_quest_slug("defi-ninja").expect("valid slug");
        assert!(matches!(
            validate_quest_slug("Liquidity-Kata"),
            Err(IdentifierError::InvalidCharacters { .. })
        ));
        assert!(matches!(
            validate_quest_slug("yield_sprint"),
            Err(IdentifierError::InvalidCharacters { .. })
        ));
    }
}
