//! # Preview Composer
//!
//! Builds the document shown in the isolated preview surface.
//!
//! ## Architecture
//!
//! ```text
//! Classification + ProjectView
//!     │
//!     ├── framework ──> static file listing + fixed-height reporter
//!     ├── unknown ────> static "preview unavailable" page
//!     └── flat ───────> module graph ──> inlined markup
//!                          │
//!                          └──> instrumentation
//!                                 ├─ head: envelope poster, timer registry, error reporter
//!                                 └─ body: height reporter, edit-mode walker + click interceptor
//! ```
//!
//! ## Example
//!
//! ```
//! use preview_composer::DocumentComposer;
//! use preview_parser::{parse, ClassifierConfig, EditOverlay, ProjectKind, ProjectView};
//!
//! let project = parse("--- index.html ---\n<h1>Hello</h1>");
//! let overlay = EditOverlay::new();
//! let classification = project.classify(&ClassifierConfig::default());
//!
//! let mut composer = DocumentComposer::default();
//! let doc = composer.compose(&ProjectView::new(&project, &overlay), &classification);
//! assert_eq!(doc.kind, ProjectKind::Flat);
//! assert_eq!(doc.sandbox, "allow-scripts");
//! ```

mod composer;
mod config;
mod document;
mod error;
mod html;
mod instrument;

pub use composer::DocumentComposer;
pub use config::{ComposerConfig, HeightBounds};
pub use document::{ComposedDocument, Diagnostic, InstanceIds};
pub use error::{ComposerError, Result};
pub use html::{escape_html, has_document_shell};
pub use instrument::{js_string, Instrumentation, ELEMENT_ID_ATTR, RUNTIME_ATTR};
