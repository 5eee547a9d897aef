use schemars::JsonSchema;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{ProtocolError, Result};
use crate::message::SandboxMessage;

/// Boundary marker carried by every envelope
pub const CHANNEL: &str = "preview-sandbox";

/// Current envelope version
pub const PROTOCOL_VERSION: u32 = 1;

/// Versioned wrapper around a [`SandboxMessage`].
///
/// ```json
/// {"channel":"preview-sandbox","version":1,"instance":"doc-3","type":"height","payload":{"height":640}}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct Envelope {
    pub channel: String,
    pub version: u32,

    /// Document instance that produced (or should receive) the message
    pub instance: String,

    #[serde(flatten)]
    pub message: SandboxMessage,
}

impl Envelope {
    pub fn new(instance: impl Into<String>, message: SandboxMessage) -> Self {
        Self {
            channel: CHANNEL.to_string(),
            version: PROTOCOL_VERSION,
            instance: instance.into(),
            message,
        }
    }

    /// Validate and decode a received value.
    ///
    /// Checks run from the outside in: object shape, channel marker, version,
    /// instance, then the tagged payload.
    pub fn decode(value: &Value) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or(ProtocolError::NotAnEnvelope("not an object"))?;

        let channel = match obj.get("channel") {
            None => return Err(ProtocolError::NotAnEnvelope("missing channel marker")),
            Some(Value::String(channel)) if channel == CHANNEL => channel.clone(),
            Some(other) => return Err(ProtocolError::ForeignChannel(describe(other))),
        };

        let version = obj
            .get("version")
            .and_then(Value::as_u64)
            .ok_or_else(|| ProtocolError::malformed("missing or non-integer version"))?;
        if version != u64::from(PROTOCOL_VERSION) {
            return Err(ProtocolError::UnsupportedVersion(version));
        }

        let instance = obj
            .get("instance")
            .and_then(Value::as_str)
            .filter(|instance| !instance.is_empty())
            .ok_or_else(|| ProtocolError::malformed("missing instance"))?
            .to_string();

        let mut tagged = Map::new();
        for key in ["type", "payload"] {
            let field = obj
                .get(key)
                .ok_or_else(|| ProtocolError::malformed(format!("missing {key}")))?;
            tagged.insert(key.to_string(), field.clone());
        }
        let message = serde_json::from_value(Value::Object(tagged))
            .map_err(|e| ProtocolError::malformed(e.to_string()))?;

        Ok(Self {
            channel,
            version: PROTOCOL_VERSION,
            instance,
            message,
        })
    }

    /// Decode from JSON text
    pub fn decode_str(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|_| ProtocolError::NotAnEnvelope("not JSON"))?;
        Self::decode(&value)
    }

    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(|e| ProtocolError::malformed(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| ProtocolError::malformed(e.to_string()))
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// JSON Schema of [`Envelope`]
pub fn envelope_schema() -> serde_json::Result<Value> {
    serde_json::to_value(schemars::schema_for!(Envelope))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{ElementSelection, HeightReport, RuntimeErrorReport, TextUpdate};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_decode_height() {
        let value = json!({
            "channel": "preview-sandbox",
            "version": 1,
            "instance": "doc-3",
            "type": "height",
            "payload": {"height": 640.5}
        });
        let envelope = Envelope::decode(&value).unwrap();
        assert_eq!(envelope.instance, "doc-3");
        assert_eq!(
            envelope.message,
            SandboxMessage::Height(HeightReport {
                height: Some(640.5)
            })
        );
    }

    #[test]
    fn test_null_height_decodes_as_none() {
        let value = json!({
            "channel": CHANNEL, "version": 1, "instance": "doc-1",
            "type": "height", "payload": {"height": null}
        });
        let Ok(Envelope {
            message: SandboxMessage::Height(report),
            ..
        }) = Envelope::decode(&value)
        else {
            panic!("expected height");
        };
        assert_eq!(report.height, None);
    }

    #[test]
    fn test_decode_element_selected() {
        let value = json!({
            "channel": CHANNEL, "version": 1, "instance": "doc-2",
            "type": "elementSelected",
            "payload": {
                "elementId": "pv-4", "text": "Hello", "color": "rgb(0, 0, 0)",
                "x": 12, "y": 40.5, "fontSize": "16px"
            }
        });
        let envelope = Envelope::decode(&value).unwrap();
        assert_eq!(
            envelope.message,
            SandboxMessage::ElementSelected(ElementSelection {
                element_id: "pv-4".into(),
                text: "Hello".into(),
                color: "rgb(0, 0, 0)".into(),
                x: 12.0,
                y: 40.5,
                font_size: "16px".into(),
            })
        );
    }

    #[test]
    fn test_rejections() {
        assert_eq!(
            Envelope::decode(&json!("hello")),
            Err(ProtocolError::NotAnEnvelope("not an object"))
        );
        assert_eq!(
            Envelope::decode(&json!({"height": 100})),
            Err(ProtocolError::NotAnEnvelope("missing channel marker"))
        );
        assert_eq!(
            Envelope::decode(&json!({"channel": "devtools", "version": 1})),
            Err(ProtocolError::ForeignChannel("devtools".into()))
        );
        assert_eq!(
            Envelope::decode(&json!({
                "channel": CHANNEL, "version": 2, "instance": "doc-1",
                "type": "height", "payload": {"height": 1}
            })),
            Err(ProtocolError::UnsupportedVersion(2))
        );
        assert!(matches!(
            Envelope::decode(&json!({
                "channel": CHANNEL, "version": 1, "instance": "doc-1",
                "type": "resize", "payload": {}
            })),
            Err(ProtocolError::Malformed(_))
        ));
        assert!(matches!(
            Envelope::decode(&json!({
                "channel": CHANNEL, "version": 1, "instance": "doc-1", "type": "error"
            })),
            Err(ProtocolError::Malformed(_))
        ));
        assert!(matches!(
            Envelope::decode_str("{not json"),
            Err(ProtocolError::NotAnEnvelope(_))
        ));
    }

    #[test]
    fn test_encode_text_update_omits_unset_fields() {
        let envelope = Envelope::new(
            "doc-7",
            SandboxMessage::TextUpdate(TextUpdate::new("pv-1").with_text("Hi")),
        );
        assert_eq!(
            envelope.to_value().unwrap(),
            json!({
                "channel": "preview-sandbox",
                "version": 1,
                "instance": "doc-7",
                "type": "textUpdate",
                "payload": {"elementId": "pv-1", "newText": "Hi"}
            })
        );
    }

    #[test]
    fn test_encoded_envelope_decodes() {
        let envelope = Envelope::new(
            "doc-1",
            SandboxMessage::Error(RuntimeErrorReport {
                message: "ReferenceError: x is not defined".into(),
            }),
        );
        let decoded = Envelope::decode_str(&envelope.to_json().unwrap()).unwrap();
        assert_eq!(decoded, envelope);
    }

    #[test]
    fn test_schema_names_fields() {
        let schema = envelope_schema().unwrap().to_string();
        for field in ["channel", "version", "instance", "payload", "elementSelected", "textUpdate"] {
            assert!(schema.contains(field), "schema missing {field}");
        }
    }
}
