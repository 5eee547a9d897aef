//! # Preview Parser
//!
//! Reconstructs a structured multi-file project from one block of free-form
//! generator output.
//!
//! ## Pipeline
//!
//! ```text
//! Raw text
//!     │
//!     ├──> Lexer: Header(path) | Body(text) tokens
//!     │
//!     ├──> Assembler (state machine)
//!     │    ├─> Discard preamble before the first header
//!     │    ├─> Sanitize bodies (fences, blank runs)
//!     │    ├─> Reject conversational bodies
//!     │    └─> Merge duplicate headers (first/last wins)
//!     │
//!     ├──> Project { files, report }
//!     │    ├─> FileNode tree
//!     │    └─> Classification (framework | flat | unknown)
//!     │
//!     └──> ProjectView = Project + EditOverlay
//! ```
//!
//! ## Example
//!
//! ```rust
//! use preview_parser::{ProjectKind, ProjectParser, ParserConfig};
//!
//! let parser = ProjectParser::new(ParserConfig::default()).unwrap();
//! let project = parser.parse(
//!     "Here is your page:\n--- index.html ---\n<p>Hi</p>\n--- styles.css ---\np{}",
//! );
//!
//! assert_eq!(project.paths().collect::<Vec<_>>(), ["index.html", "styles.css"]);
//! let classification = project.classify(&parser.config().classifier);
//! assert_eq!(classification.kind, ProjectKind::Flat);
//! ```

mod assembler;
mod classify;
mod config;
mod error;
mod file_kind;
mod lexer;
mod overlay;
mod parser;
mod sanitize;
mod tree;
mod types;

pub use classify::{classify, Classification, ProjectKind};
pub use config::{ClassifierConfig, DuplicatePolicy, ParserConfig};
pub use error::{ParserError, Result};
pub use file_kind::FileKind;
pub use lexer::{parse_header_line, Lexer, Token};
pub use overlay::{EditOverlay, ProjectView};
pub use parser::ProjectParser;
pub use sanitize::{is_conversational, sanitize};
pub use tree::{build_tree, find_node, flatten, FileNode, NodeKind};
pub use types::{normalize_path, ParseReport, Project, ProjectFile};

/// Parse with the default configuration
#[must_use]
pub fn parse(input: &str) -> Project {
    ProjectParser::default().parse(input)
}
