use serde::{Deserialize, Serialize};

use crate::types::normalize_path;

/// Configuration for project reconstruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserConfig {
    /// What to do when the same path appears under more than one header
    pub duplicate_policy: DuplicatePolicy,

    /// Minimum number of dashes on each side of a `--- path ---` header
    pub min_header_dashes: usize,

    /// Path of the single fallback file when no header is found
    pub fallback_path: String,

    /// Fallback path used instead when the unheaded text looks like markup
    pub markup_fallback_path: String,

    /// Reject segments whose first word is a conversational lead-in
    pub reject_conversational: bool,

    /// Lead-in words that mark a segment as conversational (lowercase)
    pub lead_ins: Vec<String>,

    /// Project-type classification rules
    pub classifier: ClassifierConfig,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            duplicate_policy: DuplicatePolicy::LastWins,
            min_header_dashes: 3,
            fallback_path: "response.txt".to_string(),
            markup_fallback_path: "index.html".to_string(),
            reject_conversational: true,
            lead_ins: [
                "here", "here's", "sure", "certainly", "below", "okay", "ok", "great", "i've",
                "i'll", "let's", "now",
            ]
            .iter()
            .map(|word| (*word).to_string())
            .collect(),
            classifier: ClassifierConfig::default(),
        }
    }
}

impl ParserConfig {
    /// Keep every headed segment, even ones that read like conversation
    pub fn lenient() -> Self {
        Self {
            reject_conversational: false,
            ..Default::default()
        }
    }

    /// First header for a path wins; later repeats are ignored
    pub fn first_wins() -> Self {
        Self {
            duplicate_policy: DuplicatePolicy::FirstWins,
            ..Default::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.min_header_dashes == 0 {
            return Err("min_header_dashes must be > 0".to_string());
        }

        for (key, path) in [
            ("fallback_path", &self.fallback_path),
            ("markup_fallback_path", &self.markup_fallback_path),
        ] {
            if normalize_path(path) != *path || path.is_empty() {
                return Err(format!(
                    "{key} ({path:?}) must be a non-empty normalized virtual path"
                ));
            }
        }

        if let Some(word) = self
            .lead_ins
            .iter()
            .find(|word| {
                word.is_empty()
                    || word.contains(char::is_whitespace)
                    || word.to_lowercase() != word.as_str()
            })
        {
            return Err(format!(
                "lead_ins entry {word:?} must be a single lowercase word"
            ));
        }

        self.classifier.validate()
    }
}

/// Merge policy for repeated headers naming the same path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Keep the first body; later headers for the path are dropped
    FirstWins,

    /// Keep the last body, at the position of the first appearance
    #[default]
    LastWins,
}

/// Rules for picking a rendering strategy from a file set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassifierConfig {
    /// Directory prefixes that mark a framework project (`src/`, `app/`, ...)
    pub framework_prefixes: Vec<String>,

    /// Build-config names. An entry matches the exact file name, or the entry
    /// followed by a single extension (`vite.config` matches `vite.config.ts`).
    pub build_configs: Vec<String>,

    /// Component extensions that only a build step can render
    pub component_extensions: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        fn owned(items: &[&str]) -> Vec<String> {
            items.iter().map(|item| (*item).to_string()).collect()
        }

        Self {
            framework_prefixes: owned(&["src/", "app/", "pages/", "components/"]),
            build_configs: owned(&[
                "package.json",
                "tsconfig.json",
                "angular.json",
                "webpack.config",
                "vite.config",
                "next.config",
                "nuxt.config",
                "svelte.config",
                "astro.config",
            ]),
            component_extensions: owned(&["jsx", "tsx", "vue", "svelte"]),
        }
    }
}

impl ClassifierConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if let Some(prefix) = self
            .framework_prefixes
            .iter()
            .find(|prefix| !prefix.ends_with('/') || prefix.len() < 2)
        {
            return Err(format!(
                "framework prefix {prefix:?} must name a directory and end with '/'"
            ));
        }

        if self.build_configs.iter().any(String::is_empty) {
            return Err("build_configs entries must not be empty".to_string());
        }

        if let Some(ext) = self
            .component_extensions
            .iter()
            .find(|ext| ext.is_empty() || ext.starts_with('.'))
        {
            return Err(format!(
                "component extension {ext:?} must be given without the leading dot"
            ));
        }

        Ok(())
    }
}
