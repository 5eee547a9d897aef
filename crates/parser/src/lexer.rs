use crate::types::normalize_path;

/// One token of generator output.
///
/// The grammar has exactly two tokens: a header line naming a file, and the
/// body text between headers. Consecutive body lines are merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// `--- path ---` on its own line; holds the normalized path
    Header(String),
    /// Raw text up to the next header or end of input, line endings included
    Body(&'a str),
}

/// Splits raw text into a header/body token stream
pub struct Lexer<'a> {
    input: &'a str,
    min_dashes: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str, min_dashes: usize) -> Self {
        Self { input, min_dashes }
    }

    /// Tokenize the whole input
    pub fn tokens(&self) -> Vec<Token<'a>> {
        let mut tokens = Vec::new();
        let mut body_start = 0;
        let mut offset = 0;

        for line in self.input.split_inclusive('\n') {
            let line_end = offset + line.len();
            if let Some(path) = parse_header_line(line, self.min_dashes) {
                if body_start < offset {
                    tokens.push(Token::Body(&self.input[body_start..offset]));
                }
                tokens.push(Token::Header(path));
                body_start = line_end;
            }
            offset = line_end;
        }

        if body_start < self.input.len() {
            tokens.push(Token::Body(&self.input[body_start..]));
        }

        tokens
    }
}

/// Recognize a header line and return its normalized path.
///
/// The path must be a single whitespace-free word between at least
/// `min_dashes` dashes on each side; wrapping backticks, `**` or quotes are
/// dropped.
pub fn parse_header_line(line: &str, min_dashes: usize) -> Option<String> {
    let trimmed = line.trim();
    let leading = trimmed.chars().take_while(|c| *c == '-').count();
    let trailing = trimmed.chars().rev().take_while(|c| *c == '-').count();
    if leading < min_dashes || trailing < min_dashes || leading + trailing >= trimmed.len() {
        return None;
    }

    let inner = trimmed[leading..trimmed.len() - trailing].trim();
    let inner = strip_wrapping(inner);
    if inner.is_empty() || inner.contains(char::is_whitespace) {
        return None;
    }

    let path = normalize_path(inner);
    (!path.is_empty()).then_some(path)
}

fn strip_wrapping(mut value: &str) -> &str {
    loop {
        let stripped = ["**", "`", "\"", "'"].iter().find_map(|mark| {
            value
                .strip_prefix(mark)
                .and_then(|rest| rest.strip_suffix(mark))
        });
        match stripped {
            Some(rest) => value = rest.trim(),
            None => return value,
        }
    }
}
