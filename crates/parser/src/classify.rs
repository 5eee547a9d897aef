use serde::{Deserialize, Serialize};

use crate::config::ClassifierConfig;
use crate::file_kind::FileKind;
use crate::types::ProjectFile;

/// Rendering strategy for a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectKind {
    /// Needs an external build step; rendered as a static placeholder
    Framework,
    /// Plain markup with stylesheets and scripts; inlined and run live
    Flat,
    /// Nothing renderable
    Unknown,
}

impl ProjectKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectKind::Framework => "framework",
            ProjectKind::Flat => "flat",
            ProjectKind::Unknown => "unknown",
        }
    }
}

/// Outcome of classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub kind: ProjectKind,

    /// Markup file the preview starts from (flat projects only)
    pub entry: Option<String>,

    /// The path that decided the classification, if any
    pub signal: Option<String>,
}

/// Classify a file set.
///
/// Rules, first match wins: a framework directory prefix, build-config file
/// or component extension makes a framework project; any markup file makes a
/// flat project; otherwise unknown.
#[must_use]
pub fn classify(files: &[ProjectFile], config: &ClassifierConfig) -> Classification {
    if let Some(file) = files.iter().find(|file| is_framework_file(file, config)) {
        log::debug!("Classified as framework project (signal: {})", file.path);
        return Classification {
            kind: ProjectKind::Framework,
            entry: None,
            signal: Some(file.path.clone()),
        };
    }

    match entry_markup(files) {
        Some(entry) => Classification {
            kind: ProjectKind::Flat,
            entry: Some(entry.path.clone()),
            signal: Some(entry.path.clone()),
        },
        None => Classification {
            kind: ProjectKind::Unknown,
            entry: None,
            signal: None,
        },
    }
}

fn is_framework_file(file: &ProjectFile, config: &ClassifierConfig) -> bool {
    if config
        .framework_prefixes
        .iter()
        .any(|prefix| file.path.starts_with(prefix.as_str()))
    {
        return true;
    }

    let name = file.file_name();
    if config
        .build_configs
        .iter()
        .any(|entry| matches_build_config(name, entry))
    {
        return true;
    }

    name.rsplit_once('.').is_some_and(|(_, ext)| {
        config
            .component_extensions
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(ext))
    })
}

fn matches_build_config(name: &str, entry: &str) -> bool {
    if name == entry {
        return true;
    }
    name.strip_prefix(entry)
        .and_then(|rest| rest.strip_prefix('.'))
        .is_some_and(|ext| !ext.is_empty() && !ext.contains('.'))
}

/// `index.html` closest to the root, else the first markup file
fn entry_markup(files: &[ProjectFile]) -> Option<&ProjectFile> {
    let markup = || files.iter().filter(|file| file.kind() == FileKind::Markup);

    markup()
        .filter(|file| file.file_name().eq_ignore_ascii_case("index.html"))
        .min_by_key(|file| file.path.matches('/').count())
        .or_else(|| markup().next())
}
