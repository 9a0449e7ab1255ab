//! # Text Utilities
//!
//! Small string helpers for user-facing messages.

/// Censors a string by covering every char after the fifth with a star.
/// Example: `abcdefghij` -> `abcde*****`
pub fn censor_string(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= 5 {
        return s.to_string();
    }
    let mut out: String = chars[..5].iter().collect();
    out.push_str(&"*".repeat(chars.len() - 5));
    out
}

/// Cuts a string if it exceeds `limit` chars, replacing the tail with dots.
/// Operates on chars, not bytes, so multi-byte input stays valid.
pub fn cut_string(s: &str, limit: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() > limit && limit > 3 {
        let mut out: String = chars[..limit - 3].iter().collect();
        out.push_str("...");
        return out;
    }
    s.to_string()
}
