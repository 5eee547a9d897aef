use serde::{Deserialize, Serialize};
use std::path::Path;

/// Role a project file plays in a rendered preview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Markup,
    Stylesheet,
    Script,
    /// Framework component source (`.jsx`, `.vue`, ...)
    Component,
    Data,
    Text,
    Other,
}

impl FileKind {
    /// Detect kind from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "html" | "htm" | "xhtml" => FileKind::Markup,
            "css" => FileKind::Stylesheet,
            "js" | "mjs" | "cjs" | "ts" => FileKind::Script,
            "jsx" | "tsx" | "vue" | "svelte" | "astro" => FileKind::Component,
            "json" | "toml" | "yaml" | "yml" | "xml" | "csv" => FileKind::Data,
            "md" | "txt" | "markdown" => FileKind::Text,
            _ => FileKind::Other,
        }
    }

    /// Detect kind from a virtual path
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(FileKind::Other)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FileKind::Markup => "markup",
            FileKind::Stylesheet => "stylesheet",
            FileKind::Script => "script",
            FileKind::Component => "component",
            FileKind::Data => "data",
            FileKind::Text => "text",
            FileKind::Other => "other",
        }
    }

    /// MIME type used when the file is handed out for download
    pub fn mime_type(self) -> &'static str {
        match self {
            FileKind::Markup => "text/html",
            FileKind::Stylesheet => "text/css",
            FileKind::Script | FileKind::Component => "text/javascript",
            FileKind::Data => "application/json",
            FileKind::Text | FileKind::Other => "text/plain",
        }
    }
}
