// Secret generation and validation for record-scoped bearer tokens

use rand::{distr::Alphanumeric, Rng};

/// Default secret length, long enough to resist online guessing.
pub const TOKEN_LENGTH: usize = 30;

/// Generate a lowercase alphanumeric secret of `length` characters.
///
/// `rand::rng()` is a CSPRNG; case is normalized down because the secrets
/// travel in query strings and survive copy/paste better that way.
pub fn generate_secret(length: usize) -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(length)
        .map(char::from)
        .collect::<String>()
        .to_lowercase()
}

/// Strict match of a supplied secret against a stored one.
///
/// Empty or absent values never match anything, including each other.
pub fn secrets_match(supplied: &str, stored: Option<&str>) -> bool {
    !supplied.is_empty() && stored == Some(supplied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_secrets_are_lowercase_and_sized() {
        let secret = generate_secret(TOKEN_LENGTH);
        assert_eq!(secret.len(), TOKEN_LENGTH);
        assert!(secret.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn generated_secrets_differ() {
        assert_ne!(generate_secret(TOKEN_LENGTH), generate_secret(TOKEN_LENGTH));
    }

    #[test]
    fn empty_supplied_never_matches() {
        assert!(!secrets_match("", None));
        assert!(!secrets_match("", Some("")));
        assert!(!secrets_match("", Some("abc123")));
    }

    #[test]
    fn absent_stored_never_matches() {
        assert!(!secrets_match("abc123", None));
    }

    #[test]
    fn exact_match_only() {
        assert!(secrets_match("abc123", Some("abc123")));
        assert!(!secrets_match("abc123", Some("abc124")));
        assert!(!secrets_match("ABC123", Some("abc123")));
    }
}
