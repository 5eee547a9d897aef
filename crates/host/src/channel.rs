use preview_composer::{ComposedDocument, HeightBounds};
use preview_protocol::{Envelope, ProtocolError, SandboxMessage};
use serde::Serialize;
use serde_json::Value;

use crate::banner::ErrorBanner;
use crate::config::HostConfig;
use crate::editor::{EditDraft, EditorAnchor, InlineEditor};
use crate::error::{HostError, Result};
use crate::surface::Surface;

/// Why a received message had no effect
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum IgnoreReason {
    /// No boundary marker, or another channel's marker
    NotOurs,
    UnsupportedVersion { version: u64 },
    Malformed { detail: String },
    /// No document is currently bound
    NotBound,
    /// Sent by a document that has since been replaced
    StaleInstance { instance: String },
    /// A host-to-document message arriving at the host
    WrongDirection { message_type: &'static str },
    /// Element selection while edit mode is off
    EditModeOff,
}

/// Effect of one received message
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ChannelEvent {
    Ignored(IgnoreReason),
    HeightApplied {
        reported: Option<f64>,
        applied: f64,
    },
    EditorOpened {
        element_id: String,
        anchor: EditorAnchor,
        draft: EditDraft,
    },
    ErrorRaised {
        banner: ErrorBanner,
    },
}

#[derive(Debug, Clone, PartialEq)]
struct Binding {
    instance: String,
    entry: Option<String>,
    edit_mode: bool,
}

/// Host end of the message channel to the sandboxed document.
///
/// Every browser message event goes through [`SandboxChannel::handle`].
/// Height and selection messages may interleave in any order.
#[derive(Debug, Clone)]
pub struct SandboxChannel {
    config: HostConfig,
    binding: Option<Binding>,
    surface: Surface,
    editor: InlineEditor,
    banner: Option<ErrorBanner>,
}

impl SandboxChannel {
    pub fn new(bounds: HeightBounds, config: HostConfig) -> Self {
        Self {
            surface: Surface::new(bounds, config.surface_width),
            config,
            binding: None,
            editor: InlineEditor::new(),
            banner: None,
        }
    }

    /// Attach to a freshly composed document.
    ///
    /// The previous instance is disposed: its late messages become stale, its
    /// selection is dropped and its error banner cleared.
    pub fn bind(&mut self, document: &ComposedDocument) {
        if let Some(previous) = self.dispose() {
            log::debug!("Rebinding channel {previous} -> {}", document.instance_id);
        }
        self.binding = Some(Binding {
            instance: document.instance_id.clone(),
            entry: document.entry.clone(),
            edit_mode: document.edit_mode,
        });
    }

    /// Detach from the current document; returns its instance id
    pub fn dispose(&mut self) -> Option<String> {
        self.editor.cancel();
        self.banner = None;
        self.binding.take().map(|binding| binding.instance)
    }

    pub fn instance(&self) -> Option<&str> {
        self.binding.as_ref().map(|b| b.instance.as_str())
    }

    /// Process one received message
    pub fn handle(&mut self, value: &Value) -> ChannelEvent {
        let envelope = match Envelope::decode(value) {
            Ok(envelope) => envelope,
            Err(e) => {
                log::debug!("Ignoring message: {e}");
                return ChannelEvent::Ignored(match e {
                    ProtocolError::NotAnEnvelope(_) | ProtocolError::ForeignChannel(_) => {
                        IgnoreReason::NotOurs
                    }
                    ProtocolError::UnsupportedVersion(version) => {
                        IgnoreReason::UnsupportedVersion { version }
                    }
                    ProtocolError::Malformed(detail) => IgnoreReason::Malformed { detail },
                });
            }
        };

        let Some(binding) = self.binding.as_ref() else {
            log::debug!("Ignoring {} message: no bound document", envelope.message.type_name());
            return ChannelEvent::Ignored(IgnoreReason::NotBound);
        };
        if envelope.instance != binding.instance {
            log::debug!(
                "Ignoring {} message from stale instance {} (current {})",
                envelope.message.type_name(),
                envelope.instance,
                binding.instance
            );
            return ChannelEvent::Ignored(IgnoreReason::StaleInstance {
                instance: envelope.instance,
            });
        }

        match envelope.message {
            SandboxMessage::Height(report) => {
                let applied = self.surface.apply_height(report.height.unwrap_or(f64::NAN));
                ChannelEvent::HeightApplied {
                    reported: report.height,
                    applied,
                }
            }
            SandboxMessage::ElementSelected(selection) => {
                if !binding.edit_mode {
                    return ChannelEvent::Ignored(IgnoreReason::EditModeOff);
                }
                let element_id = selection.element_id.clone();
                let draft = EditDraft::from(&selection);
                let anchor = self.editor.open(selection, &self.surface, &self.config);
                ChannelEvent::EditorOpened {
                    element_id,
                    anchor,
                    draft,
                }
            }
            SandboxMessage::Error(report) => {
                let banner = match self.banner.as_mut() {
                    Some(banner) if banner.message == report.message.trim() => {
                        banner.occurrences += 1;
                        banner.clone()
                    }
                    _ => {
                        log::info!("Preview runtime error: {}", report.message);
                        let banner = ErrorBanner::new(
                            &report.message,
                            &self.config.fix_label,
                            binding.entry.as_deref(),
                        );
                        self.banner = Some(banner.clone());
                        banner
                    }
                };
                ChannelEvent::ErrorRaised { banner }
            }
            SandboxMessage::TextUpdate(_) => ChannelEvent::Ignored(IgnoreReason::WrongDirection {
                message_type: "textUpdate",
            }),
        }
    }

    /// Apply the open edit; returns the envelope to post into the document
    pub fn apply_edit(&mut self) -> Result<Option<Envelope>> {
        let instance = self
            .binding
            .as_ref()
            .map(|b| b.instance.clone())
            .ok_or(HostError::NoSelection)?;
        self.editor.apply(&instance)
    }

    pub fn cancel_edit(&mut self) -> bool {
        self.editor.cancel()
    }

    pub fn editor(&self) -> &InlineEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut InlineEditor {
        &mut self.editor
    }

    pub fn banner(&self) -> Option<&ErrorBanner> {
        self.banner.as_ref()
    }

    /// Hide the error banner; returns whether one was shown
    pub fn dismiss_banner(&mut self) -> bool {
        self.banner.take().is_some()
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }
}
