use std::path::Path;

use preview_composer::ComposerConfig;
use preview_parser::ParserConfig;
use serde::{Deserialize, Serialize};

use crate::error::{HostError, Result};

/// Host-side layout settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HostConfig {
    /// Width of the preview surface in CSS pixels
    pub surface_width: f64,

    /// Inline editor popover size, used to keep it inside the surface
    pub editor_width: f64,
    pub editor_height: f64,

    /// Gap between the clicked point and the editor
    pub editor_offset: f64,

    /// Remediation label on the runtime error banner
    pub fix_label: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            surface_width: 1024.0,
            editor_width: 280.0,
            editor_height: 160.0,
            editor_offset: 8.0,
            fix_label: "Ask the assistant to fix this error".to_string(),
        }
    }
}

impl HostConfig {
    pub fn validate(&self) -> std::result::Result<(), String> {
        for (key, value) in [
            ("surface_width", self.surface_width),
            ("editor_width", self.editor_width),
            ("editor_height", self.editor_height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("{key} must be a positive number"));
            }
        }
        if !self.editor_offset.is_finite() || self.editor_offset < 0.0 {
            return Err("editor_offset must be >= 0".to_string());
        }
        if self.fix_label.trim().is_empty() {
            return Err("fix_label must not be empty".to_string());
        }
        Ok(())
    }
}

/// Complete preview configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreviewConfig {
    pub parser: ParserConfig,
    pub composer: ComposerConfig,
    pub host: HostConfig,
}

impl PreviewConfig {
    /// Validate every section
    pub fn validate(&self) -> std::result::Result<(), String> {
        self.parser.validate().map_err(|e| format!("parser: {e}"))?;
        self.composer.validate().map_err(|e| format!("composer: {e}"))?;
        self.host.validate().map_err(|e| format!("host: {e}"))?;
        Ok(())
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw).map_err(|e| HostError::ConfigFormat {
            path: "<toml>".into(),
            reason: e.to_string(),
        })?;
        config.validate().map_err(HostError::InvalidConfig)?;
        Ok(config)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw).map_err(|e| HostError::ConfigFormat {
            path: "<json>".into(),
            reason: e.to_string(),
        })?;
        config.validate().map_err(HostError::InvalidConfig)?;
        Ok(config)
    }

    /// Load from a `.json` file, or TOML for any other extension
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let parsed = if is_json {
            Self::from_json_str(&raw)
        } else {
            Self::from_toml_str(&raw)
        };
        parsed.map_err(|e| match e {
            HostError::ConfigFormat { reason, .. } => HostError::ConfigFormat {
                path: path.to_path_buf(),
                reason,
            },
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use preview_parser::DuplicatePolicy;

    #[test]
    fn test_default_config_is_valid() {
        assert!(PreviewConfig::default().validate().is_ok());
    }

    #[test]
    fn test_toml_sections() {
        let config = PreviewConfig::from_toml_str(
            r#"
[parser]
duplicate_policy = "first_wins"

[composer]
edit_mode = true

[composer.height]
min = 200.0
max = 2000.0
"#,
        )
        .unwrap();
        assert_eq!(config.parser.duplicate_policy, DuplicatePolicy::FirstWins);
        assert!(config.composer.edit_mode);
        assert_eq!(config.composer.height.min, 200.0);
        assert_eq!(config.host, HostConfig::default());
    }

    #[test]
    fn test_json_and_rejections() {
        let config = PreviewConfig::from_json_str(r#"{"host": {"surface_width": 800}}"#).unwrap();
        assert_eq!(config.host.surface_width, 800.0);

        assert!(matches!(
            PreviewConfig::from_json_str(r#"{"hots": {}}"#),
            Err(HostError::ConfigFormat { .. })
        ));
        assert!(matches!(
            PreviewConfig::from_toml_str("[composer]\nheight_interval_ms = 0\n"),
            Err(HostError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("preview.json");
        std::fs::write(&json, r#"{"composer": {"edit_mode": true}}"#).unwrap();
        assert!(PreviewConfig::load(&json).unwrap().composer.edit_mode);

        let toml_path = dir.path().join("preview.toml");
        std::fs::write(&toml_path, "[host]\nsurface_widht = 3\n").unwrap();
        match PreviewConfig::load(&toml_path) {
            Err(HostError::ConfigFormat { path, .. }) => assert_eq!(path, toml_path),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
