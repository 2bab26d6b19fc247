//! UTF-8 safe text helpers.

/// Returns the largest char boundary in `s` that is `<= index`.
pub fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut idx = index;
    while !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

/// Truncates `s` to at most `max_bytes` bytes, appending `...` when cut.
///
/// Never splits a multi-byte character.
pub fn truncate_with_ellipsis(s: &str, max_bytes: usize) -> String {
    if s.len() <= max_bytes {
        return s.to_string();
    }
    let end = floor_char_boundary(s, max_bytes);
    format!("{}...", s[..end].trim_end())
}

/// Collapses all whitespace runs (including newlines) to single spaces.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
