//! Wire protocol between the preview host and the sandboxed document.
//!
//! Every message travels in an [`Envelope`] carrying the `preview-sandbox`
//! channel marker, a version and the id of the document instance that sent
//! it. Anything else arriving on the window message bus is rejected by
//! [`Envelope::decode`] and ignored by the host.

mod envelope;
mod error;
mod message;

pub use envelope::{envelope_schema, Envelope, CHANNEL, PROTOCOL_VERSION};
pub use error::{ProtocolError, Result};
pub use message::{ElementSelection, HeightReport, RuntimeErrorReport, SandboxMessage, TextUpdate};
