use preview_protocol::{ElementSelection, Envelope, SandboxMessage, TextUpdate};
use serde::Serialize;

use crate::config::HostConfig;
use crate::error::{HostError, Result};
use crate::surface::Surface;

/// Editor popover position inside the surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EditorAnchor {
    pub left: f64,
    pub top: f64,
}

/// Values being edited, pre-populated from the selection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditDraft {
    pub text: String,
    pub color: String,
    pub font_size: String,
}

impl From<&ElementSelection> for EditDraft {
    fn from(selection: &ElementSelection) -> Self {
        Self {
            text: selection.text.clone(),
            color: selection.color.clone(),
            font_size: selection.font_size.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct OpenEdit {
    selection: ElementSelection,
    draft: EditDraft,
    anchor: EditorAnchor,
}

/// Inline editor for one selected element at a time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InlineEditor {
    open: Option<OpenEdit>,
}

impl InlineEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open for `selection`, replacing any previous one
    pub fn open(
        &mut self,
        selection: ElementSelection,
        surface: &Surface,
        config: &HostConfig,
    ) -> EditorAnchor {
        let anchor = EditorAnchor {
            left: clamp_to(selection.x, surface.width() - config.editor_width),
            top: clamp_to(
                selection.y + config.editor_offset,
                surface.height() - config.editor_height,
            ),
        };
        let draft = EditDraft::from(&selection);
        self.open = Some(OpenEdit {
            selection,
            draft,
            anchor,
        });
        anchor
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn selection(&self) -> Option<&ElementSelection> {
        self.open.as_ref().map(|open| &open.selection)
    }

    pub fn anchor(&self) -> Option<EditorAnchor> {
        self.open.as_ref().map(|open| open.anchor)
    }

    pub fn draft(&self) -> Option<&EditDraft> {
        self.open.as_ref().map(|open| &open.draft)
    }

    pub fn draft_mut(&mut self) -> Result<&mut EditDraft> {
        self.open
            .as_mut()
            .map(|open| &mut open.draft)
            .ok_or(HostError::NoSelection)
    }

    /// Close the editor and build the update for the live document.
    ///
    /// Only fields that differ from the selection are sent. `None` when
    /// nothing changed.
    pub fn apply(&mut self, instance: &str) -> Result<Option<Envelope>> {
        let open = self.open.take().ok_or(HostError::NoSelection)?;
        let OpenEdit {
            selection, draft, ..
        } = open;

        let mut update = TextUpdate::new(selection.element_id);
        if draft.text != selection.text {
            update = update.with_text(draft.text);
        }
        if draft.color != selection.color {
            update = update.with_color(draft.color);
        }
        if draft.font_size != selection.font_size {
            update = update.with_font_size(draft.font_size);
        }

        if update.is_empty() {
            log::debug!("Edit of {} applied with no changes", update.element_id);
            return Ok(None);
        }
        Ok(Some(Envelope::new(instance, SandboxMessage::TextUpdate(update))))
    }

    /// Discard the selection; returns whether one was open
    pub fn cancel(&mut self) -> bool {
        self.open.take().is_some()
    }
}

fn clamp_to(value: f64, max: f64) -> f64 {
    let max = if max.is_finite() { max.max(0.0) } else { 0.0 };
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use preview_composer::HeightBounds;

    fn selection(x: f64, y: f64) -> ElementSelection {
        ElementSelection {
            element_id: "pv-2".into(),
            text: "Hello".into(),
            color: "rgb(0, 0, 0)".into(),
            x,
            y,
            font_size: "16px".into(),
        }
    }

    fn surface() -> Surface {
        let mut surface = Surface::new(HeightBounds::default(), 800.0);
        surface.apply_height(600.0);
        surface
    }

    #[test]
    fn test_open_positions_near_click() {
        let mut editor = InlineEditor::new();
        let anchor = editor.open(selection(100.0, 50.0), &surface(), &HostConfig::default());
        assert_eq!(anchor, EditorAnchor { left: 100.0, top: 58.0 });
        assert_eq!(editor.draft().map(|d| d.text.as_str()), Some("Hello"));
    }

    #[test]
    fn test_open_clamps_to_surface() {
        let mut editor = InlineEditor::new();
        let config = HostConfig::default();
        let anchor = editor.open(selection(790.0, 590.0), &surface(), &config);
        assert_eq!(anchor, EditorAnchor { left: 520.0, top: 440.0 });

        let anchor = editor.open(selection(-30.0, f64::NAN), &surface(), &config);
        assert_eq!(anchor, EditorAnchor { left: 0.0, top: 0.0 });
    }

    #[test]
    fn test_apply_sends_changed_fields() {
        let mut editor = InlineEditor::new();
        editor.open(selection(0.0, 0.0), &surface(), &HostConfig::default());
        let draft = editor.draft_mut().unwrap();
        draft.text = "Welcome".into();
        draft.font_size = "24px".into();

        let envelope = editor.apply("doc-5").unwrap().unwrap();
        assert_eq!(envelope.instance, "doc-5");
        assert_eq!(
            envelope.message,
            SandboxMessage::TextUpdate(
                TextUpdate::new("pv-2").with_text("Welcome").with_font_size("24px")
            )
        );
        assert!(!editor.is_open());
    }

    #[test]
    fn test_apply_without_changes_or_selection() {
        let mut editor = InlineEditor::new();
        assert!(matches!(editor.apply("doc-1"), Err(HostError::NoSelection)));

        editor.open(selection(0.0, 0.0), &surface(), &HostConfig::default());
        assert_eq!(editor.apply("doc-1").unwrap(), None);
    }

    #[test]
    fn test_cancel() {
        let mut editor = InlineEditor::new();
        assert!(!editor.cancel());
        editor.open(selection(0.0, 0.0), &surface(), &HostConfig::default());
        assert!(editor.cancel());
        assert!(editor.selection().is_none());
        assert!(editor.draft_mut().is_err());
    }
}
