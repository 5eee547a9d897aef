//! # Preview Graph
//!
//! Cross-file reference resolution for generated projects, without a build
//! step.
//!
//! ## Architecture
//!
//! ```text
//! ProjectView (files + edit overlay)
//!     │
//!     ├──> Graph Builder
//!     │      ├─ One module per file, current content
//!     │      ├─ Scan markup for <link rel=stylesheet> / <script src>
//!     │      └─ Resolve targets (relative, root-relative, exact)
//!     │
//!     ├──> Module Graph (petgraph)
//!     │      ├─ Nodes: modules
//!     │      └─ Edges: stylesheet / script references
//!     │
//!     └──> Inliner
//!            ├─ Splice resolved bodies in place of reference tags
//!            ├─ Embed stylesheets/scripts no markup references
//!            └─ Leave external and unresolved tags untouched
//! ```
//!
//! The graph is rebuilt on every recomposition so inlined bodies always match
//! the current overlay.

mod builder;
mod error;
mod graph;
mod inliner;
mod markup;
mod types;

pub use builder::{resolve_target, scan_references, GraphBuilder};
pub use error::{GraphError, Result};
pub use inliner::{escape_closing_tag, InlinedMarkup, Inliner, UnresolvedReference, INLINE_SOURCE_ATTR};
pub use markup::{find_open_tag, insert_at, rfind_ci};
pub use types::{ModuleGraph, ModuleNode, Reference, ReferenceEdge, ReferenceKind, Resolution};
