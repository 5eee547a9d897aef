use std::path::Path;

use crate::assembler::Assembler;
use crate::config::ParserConfig;
use crate::error::{ParserError, Result};
use crate::lexer::Lexer;
use crate::types::Project;

/// Main interface for reconstructing projects from generator output
#[derive(Debug, Clone)]
pub struct ProjectParser {
    config: ParserConfig,
}

impl Default for ProjectParser {
    fn default() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }
}

impl ProjectParser {
    /// Create a parser with a validated configuration
    pub fn new(config: ParserConfig) -> Result<Self> {
        config.validate().map_err(ParserError::invalid_config)?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Reconstruct a project from a text blob.
    ///
    /// Never fails: malformed or header-less input degrades to a single
    /// fallback file, recorded in the report.
    #[must_use]
    pub fn parse(&self, input: &str) -> Project {
        let mut assembler = Assembler::new(&self.config);
        for token in Lexer::new(input, self.config.min_header_dashes).tokens() {
            assembler.feed(token);
        }
        let project = assembler.finish(input);

        log::info!(
            "Parsed project: {} files from {} headers (rejected={}, duplicates={}, fallback={})",
            project.len(),
            project.report.headers,
            project.report.rejected.len(),
            project.report.duplicates.len(),
            project.report.fallback
        );

        project
    }

    /// Read a text blob from disk and parse it
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<Project> {
        let input = std::fs::read_to_string(path)?;
        Ok(self.parse(&input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProjectFile;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn invalid_config_is_rejected() {
        let config = ParserConfig {
            min_header_dashes: 0,
            ..Default::default()
        };
        assert!(matches!(
            ProjectParser::new(config),
            Err(ParserError::InvalidConfig(_))
        ));
    }

    #[test]
    fn parse_file_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "--- a.css ---\na{{}}\n").unwrap();

        let project = ProjectParser::default().parse_file(file.path()).unwrap();
        assert_eq!(project.files, vec![ProjectFile::new("a.css", "a{}")]);
    }

    #[test]
    fn parse_file_missing_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = ProjectParser::default().parse_file(dir.path().join("missing.txt"));
        assert!(matches!(result, Err(ParserError::IoError(_))));
    }
}
