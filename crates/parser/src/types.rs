use serde::{Deserialize, Serialize};

use crate::classify::{classify, Classification};
use crate::config::ClassifierConfig;
use crate::file_kind::FileKind;
use crate::tree::{build_tree, FileNode};

/// One file of a reconstructed project
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProjectFile {
    /// Normalized slash-separated virtual path, unique within a project
    pub path: String,

    /// Raw text captured at parse time
    pub content: String,
}

impl ProjectFile {
    /// Create a new project file
    #[must_use]
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Last path segment
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Kind derived from the extension
    #[must_use]
    pub fn kind(&self) -> FileKind {
        FileKind::from_path(&self.path)
    }
}

/// What the parser had to recover from while reconstructing a project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseReport {
    /// Number of `--- path ---` headers seen
    pub headers: usize,

    /// Characters of explanatory text discarded before the first header
    pub preamble_chars: usize,

    /// Paths whose body was rejected as conversational text
    #[serde(default)]
    pub rejected: Vec<String>,

    /// Paths that appeared under more than one header
    #[serde(default)]
    pub duplicates: Vec<String>,

    /// Whether the whole input became a single fallback file
    pub fallback: bool,
}

/// A reconstructed multi-file project, in header order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub files: Vec<ProjectFile>,
    pub report: ParseReport,
}

impl Project {
    /// Number of files
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Look a file up by virtual path
    #[must_use]
    pub fn file(&self, path: &str) -> Option<&ProjectFile> {
        let path = normalize_path(path);
        self.files.iter().find(|file| file.path == path)
    }

    /// Whether a file exists at the virtual path
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.file(path).is_some()
    }

    /// All paths in project order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|file| file.path.as_str())
    }

    /// Hierarchical view of the files
    #[must_use]
    pub fn tree(&self) -> Vec<FileNode> {
        build_tree(&self.files)
    }

    /// Pick a rendering strategy for this file set
    #[must_use]
    pub fn classify(&self, config: &ClassifierConfig) -> Classification {
        classify(&self.files, config)
    }
}

/// Normalize a virtual path: forward slashes, no leading `./` or `/`,
/// no empty or `.` segments.
#[must_use]
pub fn normalize_path(raw: &str) -> String {
    raw.trim()
        .replace('\\', "/")
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}
