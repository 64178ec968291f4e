//! URL-safe forms for titles and taxonomy names.
//!
//! A post is addressed by the URL-safe form of its title, and taxonomy names
//! are de-duplicated by the same form. Only ASCII letters, digits, hyphens,
//! underscores and spaces are accepted, up to 40 characters after trimming.

use once_cell::sync::Lazy;
use regex::Regex;

pub const MAX_NAME_LEN: usize = 40;

static URL_SAFE_INPUT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9\-_ ]{1,40}$").expect("valid url-safe pattern"));

/// Returns `true` when the trimmed input only uses the accepted alphabet.
pub fn is_url_safe(input: &str) -> bool {
    URL_SAFE_INPUT.is_match(input.trim())
}

/// Derive the URL-safe form: trimmed, lower-cased, spaces replaced by hyphens.
pub fn to_url_safe(input: &str) -> String {
    input
        .trim()
        .split(' ')
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_safe_form_is_trimmed_lowercased_and_hyphenated() {
        assert_eq!(to_url_safe("  Hello World "), "hello-world");
        assert_eq!(to_url_safe("GO"), "go");
        assert_eq!(to_url_safe("a  b"), "a--b");
    }

    #[test]
    fn accepts_the_documented_alphabet() {
        assert!(is_url_safe("Hello World"));
        assert!(is_url_safe("snake_case-and-kebab 42"));
        assert!(is_url_safe("  padded  "));
    }

    #[test]
    fn rejects_punctuation_and_overlong_input() {
        assert!(!is_url_safe("Hello!"));
        assert!(!is_url_safe("dots.are.out"));
        assert!(!is_url_safe("   "));
        assert!(!is_url_safe(&"x".repeat(MAX_NAME_LEN + 1)));
        assert!(is_url_safe(&"x".repeat(MAX_NAME_LEN)));
    }
}
