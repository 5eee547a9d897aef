use std::collections::HashMap;

use crate::config::{DuplicatePolicy, ParserConfig};
use crate::lexer::Token;
use crate::sanitize::{is_conversational, sanitize};
use crate::types::{ParseReport, Project, ProjectFile};

enum State {
    /// Before the first header; body text here is explanatory preamble
    Preamble,
    /// Collecting the body of the file named by the last header
    InFile { path: String, buffer: String },
}

/// State machine that turns a token stream into project files
pub struct Assembler<'c> {
    config: &'c ParserConfig,
    state: State,
    files: Vec<ProjectFile>,
    positions: HashMap<String, usize>,
    report: ParseReport,
}

impl<'c> Assembler<'c> {
    pub fn new(config: &'c ParserConfig) -> Self {
        Self {
            config,
            state: State::Preamble,
            files: Vec::new(),
            positions: HashMap::new(),
            report: ParseReport::default(),
        }
    }

    /// Consume one token
    pub fn feed(&mut self, token: Token<'_>) {
        match token {
            Token::Header(path) => {
                self.close_segment();
                self.report.headers += 1;
                self.state = State::InFile {
                    path,
                    buffer: String::new(),
                };
            }
            Token::Body(text) => match &mut self.state {
                State::Preamble => {
                    self.report.preamble_chars += text.chars().count();
                }
                State::InFile { buffer, .. } => buffer.push_str(text),
            },
        }
    }

    /// Close the last segment and build the project.
    ///
    /// `raw` is the complete input; it becomes the fallback file when no
    /// segment survived.
    pub fn finish(mut self, raw: &str) -> Project {
        self.close_segment();

        if self.files.is_empty() {
            let content = sanitize(raw);
            let path = if looks_like_markup(&content) {
                self.config.markup_fallback_path.clone()
            } else {
                self.config.fallback_path.clone()
            };
            log::debug!(
                "No usable file headers ({} seen); falling back to single file {path}",
                self.report.headers
            );
            self.report.fallback = true;
            self.report.preamble_chars = 0;
            self.files.push(ProjectFile::new(path, content));
        }

        Project {
            files: self.files,
            report: self.report,
        }
    }

    fn close_segment(&mut self) {
        let State::InFile { path, buffer } = std::mem::replace(&mut self.state, State::Preamble)
        else {
            return;
        };

        let content = sanitize(&buffer);
        if self.config.reject_conversational && is_conversational(&content, &self.config.lead_ins) {
            log::debug!("Rejected conversational body captured under header {path}");
            self.report.rejected.push(path);
            return;
        }

        match self.positions.get(&path) {
            Some(&idx) => {
                if !self.report.duplicates.contains(&path) {
                    self.report.duplicates.push(path.clone());
                }
                match self.config.duplicate_policy {
                    DuplicatePolicy::FirstWins => {
                        log::debug!("Duplicate header {path}: keeping first body");
                    }
                    DuplicatePolicy::LastWins => {
                        log::debug!("Duplicate header {path}: replacing with later body");
                        self.files[idx].content = content;
                    }
                }
            }
            None => {
                self.positions.insert(path.clone(), self.files.len());
                self.files.push(ProjectFile::new(path, content));
            }
        }
    }
}

/// Whether unheaded text reads as an HTML document or fragment
pub(crate) fn looks_like_markup(content: &str) -> bool {
    let head: String = content.chars().take(512).collect::<String>().to_lowercase();
    ["<!doctype", "<html", "<head", "<body", "<div", "<main", "<section"]
        .iter()
        .any(|marker| head.contains(marker))
}
