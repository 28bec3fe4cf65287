//! Text truncation helpers.
//!
//! Limits are counted in Unicode scalar values, not bytes: form entries are
//! mostly Japanese, and a byte limit would both cut characters in half and
//! keep a third as much text as intended.

/// Returns at most `max_chars` characters of `s`.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &s[..byte_idx],
        None => s,
    }
}

/// Single-line preview of a response body for diagnostics.
///
/// Control characters are dropped (newlines become spaces) and the result is
/// cut to `max_chars`.
pub fn preview(body: &str, max_chars: usize) -> String {
    let cleaned: String = body
        .chars()
        .map(|c| if c == '\n' || c == '\r' || c == '\t' { ' ' } else { c })
        .filter(|c| !c.is_control())
        .collect();
    truncate_chars(&cleaned, max_chars).to_string()
}
