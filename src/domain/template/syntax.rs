//! Placeholder grammar shared by the normalizer, extractor and validators.

use lazy_static::lazy_static;
use regex::Regex;

/// Opening placeholder delimiter
pub const OPEN_DELIM: &str = "{{";

/// Closing placeholder delimiter
pub const CLOSE_DELIM: &str = "}}";

lazy_static! {
    /// Whitespace-tolerant placeholder used when rendering.
    pub(crate) static ref PLACEHOLDER: Regex =
        Regex::new(r"\{\{\s*([^\}\s]+)\s*\}\}").expect("placeholder pattern is valid");

    /// Strict placeholder used for variable extraction (no inner whitespace).
    pub(crate) static ref STRICT_PLACEHOLDER: Regex =
        Regex::new(r"\{\{([A-Za-z0-9_]+)\}\}").expect("strict placeholder pattern is valid");

    static ref IDENTIFIER: Regex =
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid");
}

/// Returns true when `token` is an ASCII identifier (letter or underscore,
/// then letters, digits or underscores).
pub fn is_identifier(token: &str) -> bool {
    IDENTIFIER.is_match(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_classification() {
        assert!(is_identifier("name"));
        assert!(is_identifier("_private"));
        assert!(is_identifier("order_id2"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("2fast"));
        assert!(!is_identifier("user-name"));
        assert!(!is_identifier("你好"));
        assert!(!is_identifier("café"));
    }

    #[test]
    fn test_placeholder_tolerates_inner_whitespace() {
        let caps = PLACEHOLDER.captures("{{  topic\t}}").unwrap();
        assert_eq!(&caps[1], "topic");
        assert!(PLACEHOLDER.captures("{{ }}").is_none());
    }

    #[test]
    fn test_strict_placeholder_rejects_whitespace() {
        assert!(STRICT_PLACEHOLDER.captures("{{ topic }}").is_none());
        assert_eq!(&STRICT_PLACEHOLDER.captures("{{topic}}").unwrap()[1], "topic");
    }
}
