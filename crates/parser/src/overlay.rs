use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ParserError, Result};
use crate::types::{normalize_path, Project, ProjectFile};

/// Per-path edit layer over parsed content.
///
/// Edits shadow the original file; the original is never modified or removed,
/// so reverting an edit restores the parsed content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditOverlay {
    edits: BTreeMap<String, String>,
}

impl EditOverlay {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an edit, replacing any earlier edit of the same path
    pub fn set(&mut self, path: &str, content: impl Into<String>) -> Result<()> {
        let normalized = normalize_path(path);
        if normalized.is_empty() {
            return Err(ParserError::invalid_path(path));
        }
        self.edits.insert(normalized, content.into());
        Ok(())
    }

    /// Edited content for a path, if any
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&str> {
        self.edits.get(&normalize_path(path)).map(String::as_str)
    }

    /// Drop the edit for a path; returns whether one existed
    pub fn revert(&mut self, path: &str) -> bool {
        self.edits.remove(&normalize_path(path)).is_some()
    }

    pub fn clear(&mut self) {
        self.edits.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Edited paths in sorted order
    pub fn edited_paths(&self) -> impl Iterator<Item = &str> {
        self.edits.keys().map(String::as_str)
    }
}

/// Read-only join of a project and its edit overlay.
///
/// Only paths that exist in the project are visible; an overlay entry for an
/// unknown path is ignored.
#[derive(Debug, Clone, Copy)]
pub struct ProjectView<'a> {
    project: &'a Project,
    overlay: &'a EditOverlay,
}

impl<'a> ProjectView<'a> {
    #[must_use]
    pub fn new(project: &'a Project, overlay: &'a EditOverlay) -> Self {
        Self { project, overlay }
    }

    #[must_use]
    pub fn project(&self) -> &'a Project {
        self.project
    }

    /// Current content: the overlay first, then the parsed original
    #[must_use]
    pub fn content(&self, path: &str) -> Option<&'a str> {
        let file = self.project.file(path)?;
        Some(
            self.overlay
                .get(&file.path)
                .unwrap_or(file.content.as_str()),
        )
    }

    #[must_use]
    pub fn is_edited(&self, path: &str) -> bool {
        self.project.contains(path) && self.overlay.get(path).is_some()
    }

    /// Files with their current content, in project order
    #[must_use]
    pub fn current_files(&self) -> Vec<ProjectFile> {
        self.project
            .files
            .iter()
            .map(|file| {
                let content = self.overlay.get(&file.path).unwrap_or(file.content.as_str());
                ProjectFile::new(file.path.clone(), content)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ParseReport;
    use pretty_assertions::assert_eq;

    fn project() -> Project {
        Project {
            files: vec![
                ProjectFile::new("index.html", "<p>hi</p>"),
                ProjectFile::new("styles.css", "p{color:red}"),
            ],
            report: ParseReport::default(),
        }
    }

    #[test]
    fn overlay_shadows_original() {
        let project = project();
        let mut overlay = EditOverlay::new();
        overlay.set("./styles.css", "p{color:blue}").unwrap();

        let view = ProjectView::new(&project, &overlay);
        assert_eq!(view.content("styles.css"), Some("p{color:blue}"));
        assert_eq!(view.content("index.html"), Some("<p>hi</p>"));
        assert!(view.is_edited("styles.css"));
        assert_eq!(project.files[1].content, "p{color:red}");
    }

    #[test]
    fn revert_restores_original() {
        let project = project();
        let mut overlay = EditOverlay::new();
        overlay.set("styles.css", "x").unwrap();
        assert!(overlay.revert("styles.css"));
        assert!(!overlay.revert("styles.css"));

        let view = ProjectView::new(&project, &overlay);
        assert_eq!(view.content("styles.css"), Some("p{color:red}"));
    }

    #[test]
    fn unknown_paths_are_invisible() {
        let project = project();
        let mut overlay = EditOverlay::new();
        overlay.set("ghost.js", "boo()").unwrap();

        let view = ProjectView::new(&project, &overlay);
        assert_eq!(view.content("ghost.js"), None);
        assert!(!view.is_edited("ghost.js"));
        assert_eq!(view.current_files().len(), 2);
    }

    #[test]
    fn empty_path_is_rejected() {
        let mut overlay = EditOverlay::new();
        assert!(overlay.set("./", "x").is_err());
        assert!(overlay.is_empty());
    }
}
