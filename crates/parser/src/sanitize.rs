//! Cleanup of captured file bodies.
//!
//! Generators wrap file bodies in Markdown fences, pad them with blank lines,
//! and sometimes a broken header stream captures conversation as a file body.
//! [`sanitize`] removes the formatting; [`is_conversational`] flags bodies that
//! read like prose addressed to the user.
//!
//! The lead-in check is a heuristic over the first word only. It misfires on
//! prose files that legitimately start with a lead-in (a README opening with
//! "Here"), and it misses conversation that opens with any other word.

/// Strip fences, collapse blank-line runs, and trim.
///
/// Idempotent: `sanitize(&sanitize(x)) == sanitize(x)`.
#[must_use]
pub fn sanitize(content: &str) -> String {
    let normalized = content.replace("\r\n", "\n");
    let mut text = normalized.trim();

    loop {
        let mut next = text;
        if let Some(rest) = strip_leading_fence(next) {
            next = rest.trim();
        }
        if let Some(rest) = strip_trailing_fence(next) {
            next = rest.trim();
        }
        if next.len() == text.len() {
            break;
        }
        text = next;
    }

    collapse_blank_lines(text)
}

/// Whether a body opens with a conversational lead-in word
#[must_use]
pub fn is_conversational(content: &str, lead_ins: &[String]) -> bool {
    let Some(first) = content.split_whitespace().next() else {
        return false;
    };

    let word = first
        .replace('\u{2019}', "'")
        .trim_end_matches(|c: char| matches!(c, ',' | ':' | ';' | '!' | '.' | '?'))
        .to_lowercase();

    lead_ins.iter().any(|lead_in| *lead_in == word)
}

fn is_fence_line(line: &str) -> bool {
    let line = line.trim();
    line.starts_with("```") || line.starts_with("~~~")
}

fn is_closing_fence(line: &str) -> bool {
    let line = line.trim();
    line.len() >= 3 && (line.chars().all(|c| c == '`') || line.chars().all(|c| c == '~'))
}

fn strip_leading_fence(text: &str) -> Option<&str> {
    let (first, rest) = text.split_once('\n').unwrap_or((text, ""));
    is_fence_line(first).then_some(rest)
}

fn strip_trailing_fence(text: &str) -> Option<&str> {
    let (rest, last) = text.rsplit_once('\n').unwrap_or(("", text));
    is_closing_fence(last).then_some(rest)
}

fn collapse_blank_lines(text: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    let mut previous_blank = false;

    for line in text.split('\n') {
        let blank = line.trim().is_empty();
        if blank && previous_blank {
            continue;
        }
        out.push(if blank { "" } else { line });
        previous_blank = blank;
    }

    out.join("\n")
}
