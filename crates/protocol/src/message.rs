use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One message crossing the host/sandbox boundary.
///
/// Serialized adjacently tagged: `{"type":"height","payload":{"height":640}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum SandboxMessage {
    /// Document layout height (sandbox -> host)
    Height(HeightReport),

    /// Element clicked in edit mode (sandbox -> host)
    ElementSelected(ElementSelection),

    /// Uncaught runtime error inside the document (sandbox -> host)
    Error(RuntimeErrorReport),

    /// In-place element mutation (host -> sandbox)
    TextUpdate(TextUpdate),
}

impl SandboxMessage {
    /// Wire name of the `type` tag
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Height(_) => "height",
            Self::ElementSelected(_) => "elementSelected",
            Self::Error(_) => "error",
            Self::TextUpdate(_) => "textUpdate",
        }
    }

    /// Whether the sandboxed document is the expected sender
    pub fn is_from_sandbox(&self) -> bool {
        !matches!(self, Self::TextUpdate(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HeightReport {
    /// Raw measured height in CSS pixels; `None` when the document sent `null`
    #[serde(default)]
    pub height: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ElementSelection {
    /// Stable `data-preview-id` assigned by the document's walker
    pub element_id: String,

    #[serde(default)]
    pub text: String,

    /// Computed CSS color, e.g. `rgb(0, 0, 0)`
    #[serde(default)]
    pub color: String,

    /// Click position relative to the document viewport
    #[serde(default)]
    pub x: f64,

    #[serde(default)]
    pub y: f64,

    /// Computed CSS font size, e.g. `16px`
    #[serde(default)]
    pub font_size: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RuntimeErrorReport {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TextUpdate {
    pub element_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_x: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_y: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_font_size: Option<String>,
}

impl TextUpdate {
    pub fn new(element_id: impl Into<String>) -> Self {
        Self {
            element_id: element_id.into(),
            new_text: None,
            new_color: None,
            new_x: None,
            new_y: None,
            new_font_size: None,
        }
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.new_text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.new_color = Some(color.into());
        self
    }

    #[must_use]
    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.new_x = Some(x);
        self.new_y = Some(y);
        self
    }

    #[must_use]
    pub fn with_font_size(mut self, font_size: impl Into<String>) -> Self {
        self.new_font_size = Some(font_size.into());
        self
    }

    /// True when the update would not change anything
    pub fn is_empty(&self) -> bool {
        self.new_text.is_none()
            && self.new_color.is_none()
            && self.new_x.is_none()
            && self.new_y.is_none()
            && self.new_font_size.is_none()
    }
}
