//! # Preview Host
//!
//! Host side of the live preview.
//!
//! ## Architecture
//!
//! ```text
//! PreviewSession
//!     ├─ source text ──(sha256)──> digest; unchanged digest keeps edits
//!     ├─ ProjectParser ──> Project + Classification
//!     ├─ EditOverlay (single writer: edit_file / revert_file)
//!     ├─ DocumentComposer ──> ComposedDocument (fresh instance id)
//!     └─ SandboxChannel (bound to the current instance)
//!            ├─ height ─────────> Surface (clamped)
//!            ├─ elementSelected ─> InlineEditor ──apply──> textUpdate envelope
//!            └─ error ──────────> ErrorBanner (fix request, dismiss)
//! ```
//!
//! ## Example
//!
//! ```
//! use preview_host::{ChannelEvent, PreviewConfig, PreviewSession};
//! use serde_json::json;
//!
//! let mut session = PreviewSession::new(PreviewConfig::default()).unwrap();
//! session.set_source("--- index.html ---\n<h1>Hello</h1>");
//! let instance = session.compose().instance_id.clone();
//!
//! let event = session.handle_message(&json!({
//!     "channel": "preview-sandbox",
//!     "version": 1,
//!     "instance": instance,
//!     "type": "height",
//!     "payload": {"height": 99999}
//! }));
//! assert!(matches!(event, ChannelEvent::HeightApplied { applied, .. } if applied == 4000.0));
//! ```

mod banner;
mod channel;
mod config;
mod editor;
mod error;
mod session;
mod surface;

pub use banner::ErrorBanner;
pub use channel::{ChannelEvent, IgnoreReason, SandboxChannel};
pub use config::{HostConfig, PreviewConfig};
pub use editor::{EditDraft, EditorAnchor, InlineEditor};
pub use error::{HostError, Result};
pub use session::{source_digest, DownloadArtifact, PreviewSession};
pub use surface::Surface;
