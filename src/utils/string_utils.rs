//! UTF-8-safe string truncation and whitespace utilities
//!
//! Claims, page bodies and model prompts are routinely Vietnamese text where
//! most letters are multi-byte; byte slicing would panic mid-character.

/// Safely truncate a string to a maximum number of CHARACTERS (not bytes).
///
/// # Examples
/// ```
/// # use kodegen_tools_factcheck::utils::string_utils::safe_truncate_chars;
/// assert_eq!(safe_truncate_chars("Hello, World!", 5), "Hello");
/// assert_eq!(safe_truncate_chars("thiên tai", 5), "thiên");
/// assert_eq!(safe_truncate_chars("Hi", 100), "Hi");
/// ```
#[inline]
#[must_use]
pub fn safe_truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        None => s,
        Some((byte_idx, _)) => &s[..byte_idx],
    }
}

/// Truncate to `max_chars` and append `...` when something was cut.
#[must_use]
pub fn preview(s: &str, max_chars: usize) -> String {
    let cut = safe_truncate_chars(s, max_chars);
    if cut.len() == s.len() {
        cut.to_string()
    } else {
        format!("{cut}...")
    }
}

/// Number of Unicode scalar values in `s`.
///
/// All length thresholds in the pipeline are expressed in characters.
#[inline]
#[must_use]
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Collapse every run of whitespace (newlines included) into one space.
#[must_use]
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
