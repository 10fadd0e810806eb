//! Small string helpers shared by queries, matching and equality

use ahash::AHashSet;

/// True if the string is empty or only whitespace
pub fn is_blank(text: &str) -> bool {
    text.chars().all(char::is_whitespace)
}

/// Whitespace-separated tokens of a multi-valued attribute such as `class`
pub fn split_tokens(value: &str) -> impl Iterator<Item = &str> {
    value.split_whitespace()
}

/// Tokens in first-occurrence order with repeats removed
pub fn unique_tokens(value: &str) -> Vec<&str> {
    let mut seen = AHashSet::new();
    split_tokens(value).filter(|t| seen.insert(*t)).collect()
}

/// Does a whitespace-separated list contain `token`?
pub fn has_token(value: &str, token: &str) -> bool {
    !token.is_empty() && split_tokens(value).any(|t| t == token)
}
