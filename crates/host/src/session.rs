use preview_composer::{ComposedDocument, DocumentComposer};
use preview_parser::{
    build_tree, normalize_path, Classification, EditOverlay, FileKind, FileNode, Project,
    ProjectParser, ProjectView,
};
use preview_protocol::Envelope;
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::channel::{ChannelEvent, SandboxChannel};
use crate::config::PreviewConfig;
use crate::error::{HostError, Result};

/// SHA-256 of the source text, lowercase hex
#[must_use]
pub fn source_digest(source: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}

/// A single file prepared for saving
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadArtifact {
    /// Suggested file name (last path segment)
    pub file_name: String,

    /// Full virtual path
    pub path: String,

    pub mime: &'static str,

    #[serde(skip)]
    pub bytes: Vec<u8>,

    /// Whether the bytes come from an edit
    pub edited: bool,
}

/// One preview: source text, parsed project, edits and the live document
pub struct PreviewSession {
    config: PreviewConfig,
    parser: ProjectParser,
    composer: DocumentComposer,
    source: String,
    digest: Option<String>,
    project: Project,
    classification: Classification,
    overlay: EditOverlay,
    channel: SandboxChannel,
    document: Option<ComposedDocument>,
}

impl PreviewSession {
    pub fn new(config: PreviewConfig) -> Result<Self> {
        config.validate().map_err(HostError::InvalidConfig)?;

        let parser = ProjectParser::new(config.parser.clone())?;
        let composer = DocumentComposer::new(config.composer.clone())?;
        let channel = SandboxChannel::new(config.composer.height, config.host.clone());
        let project = Project::default();
        let classification = project.classify(&config.parser.classifier);

        Ok(Self {
            config,
            parser,
            composer,
            source: String::new(),
            digest: None,
            project,
            classification,
            overlay: EditOverlay::new(),
            channel,
            document: None,
        })
    }

    /// Replace the source text.
    ///
    /// Identical text (same digest) keeps the project and every edit. New text
    /// reparses and drops the edits. Returns whether the project was rebuilt.
    pub fn set_source(&mut self, source: &str) -> bool {
        let digest = source_digest(source);
        if self.digest.as_deref() == Some(digest.as_str()) {
            log::debug!(
                "Source unchanged ({}), keeping {} edits",
                &digest[..12],
                self.overlay.edited_paths().count()
            );
            return false;
        }

        self.project = self.parser.parse(source);
        self.classification = self.project.classify(&self.config.parser.classifier);
        if !self.overlay.is_empty() {
            log::info!("Source changed, discarding edits");
            self.overlay.clear();
        }
        self.source = source.to_string();
        self.digest = Some(digest);
        true
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn digest(&self) -> Option<&str> {
        self.digest.as_deref()
    }

    pub fn config(&self) -> &PreviewConfig {
        &self.config
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn classification(&self) -> &Classification {
        &self.classification
    }

    pub fn overlay(&self) -> &EditOverlay {
        &self.overlay
    }

    pub fn view(&self) -> ProjectView<'_> {
        ProjectView::new(&self.project, &self.overlay)
    }

    /// Tree of the project with current contents
    pub fn tree(&self) -> Vec<FileNode> {
        build_tree(&self.view().current_files())
    }

    /// Shadow a project file with edited content
    pub fn edit_file(&mut self, path: &str, content: impl Into<String>) -> Result<()> {
        let path = normalize_path(path);
        if !self.project.contains(&path) {
            return Err(HostError::unknown_file(path));
        }
        self.overlay.set(&path, content)?;
        Ok(())
    }

    /// Drop the edit of one file; returns whether there was one
    pub fn revert_file(&mut self, path: &str) -> bool {
        self.overlay.revert(&normalize_path(path))
    }

    pub fn revert_all(&mut self) {
        self.overlay.clear();
    }

    pub fn set_edit_mode(&mut self, edit_mode: bool) {
        self.composer.set_edit_mode(edit_mode);
    }

    /// Recompose in full and rebind the channel to the new document
    pub fn compose(&mut self) -> &ComposedDocument {
        let view = ProjectView::new(&self.project, &self.overlay);
        let document = self.composer.compose(&view, &self.classification);
        self.channel.bind(&document);
        self.document.insert(document)
    }

    pub fn document(&self) -> Option<&ComposedDocument> {
        self.document.as_ref()
    }

    /// Forward one browser message event to the channel
    pub fn handle_message(&mut self, value: &Value) -> ChannelEvent {
        self.channel.handle(value)
    }

    /// Apply the inline editor; the envelope must be posted to the document
    pub fn apply_edit(&mut self) -> Result<Option<Envelope>> {
        self.channel.apply_edit()
    }

    pub fn channel(&self) -> &SandboxChannel {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut SandboxChannel {
        &mut self.channel
    }

    /// Current content of a file (edit first, then original)
    pub fn content(&self, path: &str) -> Result<&str> {
        ProjectView::new(&self.project, &self.overlay)
            .content(path)
            .ok_or_else(|| HostError::unknown_file(path))
    }

    /// Text to place on the clipboard for a file
    pub fn clipboard_text(&self, path: &str) -> Result<String> {
        self.content(path).map(str::to_string)
    }

    pub fn download(&self, path: &str) -> Result<DownloadArtifact> {
        let file = self
            .project
            .file(path)
            .ok_or_else(|| HostError::unknown_file(path))?;
        let content = self.content(&file.path)?;

        Ok(DownloadArtifact {
            file_name: file.file_name().to_string(),
            path: file.path.clone(),
            mime: FileKind::from_path(&file.path).mime_type(),
            bytes: content.as_bytes().to_vec(),
            edited: self.view().is_edited(&file.path),
        })
    }

    /// Every file, in project order
    pub fn export_all(&self) -> Result<Vec<DownloadArtifact>> {
        self.project
            .paths()
            .map(|path| self.download(path))
            .collect()
    }
}
