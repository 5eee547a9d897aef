use serde::{Deserialize, Serialize};

/// Bounds applied to every height the document reports
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeightBounds {
    pub min: f64,
    pub max: f64,
}

impl Default for HeightBounds {
    fn default() -> Self {
        Self {
            min: 120.0,
            max: 4000.0,
        }
    }
}

impl HeightBounds {
    /// Clamp a reported height into `[min, max]`.
    ///
    /// NaN, zero and negative values map to `min`; infinities and anything
    /// past `max` map to `max`.
    #[must_use]
    pub fn clamp(&self, raw: f64) -> f64 {
        if raw.is_nan() || raw <= 0.0 {
            return self.min;
        }
        raw.clamp(self.min, self.max)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err("height bounds must be finite".to_string());
        }
        if self.min <= 0.0 {
            return Err("height.min must be > 0".to_string());
        }
        if self.min > self.max {
            return Err(format!(
                "height.min ({}) must be <= height.max ({})",
                self.min, self.max
            ));
        }
        Ok(())
    }
}

/// Configuration for document composition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComposerConfig {
    /// Surface height bounds
    pub height: HeightBounds,

    /// Interval of the in-document height reporter (milliseconds)
    pub height_interval_ms: u64,

    /// Height reported by the framework placeholder document
    pub framework_height: f64,

    /// Tag editable elements and intercept clicks
    pub edit_mode: bool,

    /// `sandbox` attribute for the isolated surface
    pub sandbox: String,

    /// Title used when the markup is wrapped in a shell
    pub title: String,

    /// CSS selector of elements the edit-mode walker tags
    pub editable_selector: String,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            height: HeightBounds::default(),
            height_interval_ms: 500,
            framework_height: 480.0,
            edit_mode: false,
            sandbox: "allow-scripts".to_string(),
            title: "Preview".to_string(),
            editable_selector:
                "h1,h2,h3,h4,h5,h6,p,a,button,span,li,label,td,th,strong,em,small,blockquote"
                    .to_string(),
        }
    }
}

impl ComposerConfig {
    /// Default settings with edit mode on
    pub fn editing() -> Self {
        Self {
            edit_mode: true,
            ..Default::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        self.height.validate()?;

        if self.height_interval_ms == 0 {
            return Err("height_interval_ms must be > 0".to_string());
        }

        if self.height.clamp(self.framework_height) != self.framework_height {
            return Err(format!(
                "framework_height ({}) must lie within the height bounds",
                self.framework_height
            ));
        }

        let tokens: Vec<&str> = self.sandbox.split_whitespace().collect();
        if !tokens.contains(&"allow-scripts") {
            return Err("sandbox must grant allow-scripts".to_string());
        }
        if let Some(token) = tokens
            .iter()
            .find(|token| matches!(**token, "allow-top-navigation" | "allow-same-origin"))
        {
            return Err(format!("sandbox must not grant {token}"));
        }

        if self.editable_selector.trim().is_empty() {
            return Err("editable_selector must not be empty".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ComposerConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.edit_mode);
        assert_eq!(config.sandbox, "allow-scripts");
    }

    #[test]
    fn test_editing_preset() {
        let config = ComposerConfig::editing();
        assert!(config.validate().is_ok());
        assert!(config.edit_mode);
    }

    #[test]
    fn test_validation() {
        let mut config = ComposerConfig::default();
        config.height = HeightBounds { min: 500.0, max: 100.0 };
        assert!(config.validate().is_err());

        let mut config = ComposerConfig::default();
        config.height_interval_ms = 0;
        assert!(config.validate().is_err());

        let mut config = ComposerConfig::default();
        config.sandbox = "allow-scripts allow-same-origin".to_string();
        assert!(config.validate().is_err());

        let mut config = ComposerConfig::default();
        config.sandbox = "allow-forms".to_string();
        assert!(config.validate().is_err());

        let mut config = ComposerConfig::default();
        config.framework_height = 10_000.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_clamp() {
        let bounds = HeightBounds::default();
        assert_eq!(bounds.clamp(0.0), 120.0);
        assert_eq!(bounds.clamp(-50.0), 120.0);
        assert_eq!(bounds.clamp(f64::NAN), 120.0);
        assert_eq!(bounds.clamp(f64::INFINITY), 4000.0);
        assert_eq!(bounds.clamp(f64::NEG_INFINITY), 120.0);
        assert_eq!(bounds.clamp(1e12), 4000.0);
        assert_eq!(bounds.clamp(640.0), 640.0);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let err = serde_json::from_str::<ComposerConfig>(r#"{"edit_mod": true}"#);
        assert!(err.is_err());
        let partial: ComposerConfig = serde_json::from_str(r#"{"edit_mode": true}"#).unwrap();
        assert!(partial.edit_mode);
        assert_eq!(partial.height_interval_ms, 500);
    }
}
