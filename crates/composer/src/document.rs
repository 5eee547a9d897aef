use preview_graph::ReferenceKind;
use preview_parser::ProjectKind;
use serde::{Deserialize, Serialize};

/// Something worth reporting about a composition; never fatal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A reference left as-is because no project file matched
    UnresolvedReference {
        from: String,
        target: String,
        reference: ReferenceKind,
    },

    /// Inlining failed; the unavailable document was rendered instead
    InlineFailed { entry: String, reason: String },
}

/// A self-contained document ready for the isolated surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposedDocument {
    pub html: String,

    /// Shape the document was composed as
    pub kind: ProjectKind,

    /// Instance id embedded in every message the document posts
    pub instance_id: String,

    /// Value for the surface's `sandbox` attribute
    pub sandbox: String,

    pub edit_mode: bool,

    /// Markup entry for flat documents
    pub entry: Option<String>,

    pub diagnostics: Vec<Diagnostic>,
}

impl ComposedDocument {
    /// Whether project code runs inside the document
    pub fn is_live(&self) -> bool {
        self.kind == ProjectKind::Flat
    }
}

/// Hands out `doc-<n>` ids, one per composition
#[derive(Debug, Clone, Default)]
pub struct InstanceIds {
    next: u64,
}

impl InstanceIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> String {
        self.next += 1;
        format!("doc-{}", self.next)
    }
}
