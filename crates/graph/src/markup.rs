//! Case-insensitive tag location in raw markup.
//!
//! Offsets are byte offsets into the original string; ASCII lowercasing keeps
//! them aligned.

use std::ops::Range;

/// Byte offset of the last case-insensitive occurrence of `needle`
pub fn rfind_ci(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .to_ascii_lowercase()
        .rfind(&needle.to_ascii_lowercase())
}

/// Byte range of the first `<tag ...>` opening tag.
///
/// The name must end at `>`, `/` or whitespace, so `head` never matches
/// `<header>`.
pub fn find_open_tag(haystack: &str, tag: &str) -> Option<Range<usize>> {
    let lower = haystack.to_ascii_lowercase();
    let needle = format!("<{}", tag.to_ascii_lowercase());
    let mut from = 0;

    while let Some(found) = lower[from..].find(&needle) {
        let start = from + found;
        let after = start + needle.len();
        match lower.as_bytes().get(after) {
            Some(b'>' | b'/') => {}
            Some(b) if b.is_ascii_whitespace() => {}
            _ => {
                from = after;
                continue;
            }
        }
        let end = after + lower[after..].find('>')? + 1;
        return Some(start..end);
    }
    None
}

/// Insert `snippet` and a line break at byte offset `at`
pub fn insert_at(haystack: &str, at: usize, snippet: &str) -> String {
    let mut out = String::with_capacity(haystack.len() + snippet.len() + 1);
    out.push_str(&haystack[..at]);
    out.push_str(snippet);
    out.push('\n');
    out.push_str(&haystack[at..]);
    out
}
