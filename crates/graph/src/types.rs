use std::collections::HashMap;
use std::ops::Range;

use petgraph::graph::{DiGraph, NodeIndex};
use preview_parser::FileKind;
use serde::{Deserialize, Serialize};

/// One project file with its current (possibly edited) content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleNode {
    pub path: String,
    pub kind: FileKind,
    pub content: String,

    /// Whether the content comes from the edit overlay
    pub edited: bool,
}

/// How a markup file pulls in another file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    /// `<link rel="stylesheet" href="...">`
    Stylesheet,
    /// `<script src="..."></script>`
    Script,
}

impl ReferenceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ReferenceKind::Stylesheet => "stylesheet",
            ReferenceKind::Script => "script",
        }
    }
}

/// Edge in the module graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceEdge {
    pub kind: ReferenceKind,

    /// Target exactly as written in the markup
    pub target: String,
}

/// Where a reference points
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "path", rename_all = "snake_case")]
pub enum Resolution {
    /// A project file
    Resolved(String),
    /// Off-project URL (`https:`, `data:`, ...); left for the browser
    External,
    /// No matching project file
    Unresolved,
}

/// A reference tag found in a markup file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub kind: ReferenceKind,

    /// Markup file containing the tag
    pub from: String,

    /// Raw `href`/`src` value
    pub target: String,

    pub resolution: Resolution,

    /// Byte range of the whole tag in the markup content
    pub span: Range<usize>,

    /// `media` for stylesheets, `type` for scripts
    pub qualifier: Option<String>,
}

impl Reference {
    #[must_use]
    pub fn resolved_path(&self) -> Option<&str> {
        match &self.resolution {
            Resolution::Resolved(path) => Some(path),
            _ => None,
        }
    }
}

/// Virtual module graph computed once per recomposition.
///
/// Nodes are project files with current content, edges are resolved
/// references. The reference list also keeps external and unresolved tags.
pub struct ModuleGraph {
    /// Directed graph (referencing file -> referenced file)
    pub graph: DiGraph<ModuleNode, ReferenceEdge>,

    /// Path -> NodeIndex mapping for fast lookup
    pub path_index: HashMap<String, NodeIndex>,

    /// Every reference tag found, in document order per markup file
    pub references: Vec<Reference>,
}

impl ModuleGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            path_index: HashMap::new(),
            references: Vec::new(),
        }
    }

    /// Add node to graph
    pub fn add_node(&mut self, node: ModuleNode) -> NodeIndex {
        let path = node.path.clone();
        let idx = self.graph.add_node(node);
        self.path_index.insert(path, idx);
        idx
    }

    /// Add edge between nodes
    pub fn add_edge(&mut self, from: NodeIndex, to: NodeIndex, edge: ReferenceEdge) {
        self.graph.add_edge(from, to, edge);
    }

    /// Find node by path
    pub fn find_node(&self, path: &str) -> Option<NodeIndex> {
        self.path_index.get(path).copied()
    }

    /// Get node data
    pub fn get_node(&self, idx: NodeIndex) -> Option<&ModuleNode> {
        self.graph.node_weight(idx)
    }

    /// Current content of a module
    pub fn content(&self, path: &str) -> Option<&str> {
        self.find_node(path)
            .and_then(|idx| self.get_node(idx))
            .map(|node| node.content.as_str())
    }

    /// Get all nodes
    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &ModuleNode)> {
        self.graph
            .node_indices()
            .filter_map(move |idx| self.graph.node_weight(idx).map(|node| (idx, node)))
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

impl Default for ModuleGraph {
    fn default() -> Self {
        Self::new()
    }
}
