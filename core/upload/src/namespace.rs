//! Namespace extraction from declared upload names.
//!
//! A file name may carry a `::token::` marker grouping the upload into a
//! per-entity subdirectory (e.g. `::user42::avatar.png`). Extraction is a
//! pure function of the name and is re-evaluated on every store call.

use once_cell::sync::Lazy;
use regex::Regex;

/// Pattern marking a namespace token: two colons, a run of word
/// characters, two colons. The class is ASCII; characters outside
/// `[A-Za-z0-9_]` never form a token.
static NAMESPACE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new("::([A-Za-z0-9_]*)::").expect("namespace pattern is valid"));

/// Extract the namespace token from a declared upload name.
///
/// The first `::token::` occurrence wins; an empty capture is treated as
/// no match. Returns `None` when the name carries no namespace, in which
/// case the file is stored flat at the upload root.
pub fn extract(name: &str) -> Option<&str> {
    let token = NAMESPACE_PATTERN.captures(name)?.get(1)?.as_str();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_extract_leading_token() {
        assert_eq!(extract("::user42::avatar.png"), Some("user42"));
    }

    #[test]
    fn test_extract_token_mid_name() {
        assert_eq!(extract("avatar::album_7::.png"), Some("album_7"));
    }

    #[test]
    fn test_plain_name_has_no_namespace() {
        assert_eq!(extract("photo.png"), None);
        assert_eq!(extract(""), None);
    }

    #[test]
    fn test_empty_token_is_no_match() {
        assert_eq!(extract("::::"), None);
        // The first match wins even when its capture is empty, so a later
        // non-empty token does not rescue the name.
        assert_eq!(extract("::::x::"), None);
    }

    #[test]
    fn test_first_token_wins() {
        assert_eq!(extract("::a::b::c::"), Some("a"));
    }

    #[test]
    fn test_non_word_characters_break_the_token() {
        assert_eq!(extract("::user-42::file.png"), None);
        assert_eq!(extract("::héllo::file.png"), None);
    }

    proptest! {
        #[test]
        fn extract_finds_any_word_token(token in "[A-Za-z0-9_]{1,24}", rest in "[a-z.]{0,12}") {
            let name = format!("::{}::{}", token, rest);
            prop_assert_eq!(extract(&name), Some(token.as_str()));
        }
    }
}
