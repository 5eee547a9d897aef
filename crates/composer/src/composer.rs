use preview_graph::{find_open_tag, insert_at, rfind_ci, GraphBuilder, Inliner};
use preview_parser::{Classification, ProjectKind, ProjectView};

use crate::config::ComposerConfig;
use crate::document::{ComposedDocument, Diagnostic, InstanceIds};
use crate::error::{ComposerError, Result};
use crate::html::{escape_html, has_document_shell};
use crate::instrument::Instrumentation;

const PLACEHOLDER_STYLES: &str = "html,body{margin:0;font-family:system-ui,sans-serif;color:#27272a;background:#fafafa;}\
main{padding:24px;max-width:720px;}\
h1{font-size:1.25rem;margin:0 0 8px;}\
p{margin:0 0 16px;line-height:1.5;color:#52525b;}\
ul{margin:0;padding-left:20px;font-family:ui-monospace,monospace;font-size:0.875rem;}\
li{margin:2px 0;}";

/// Turns a classified project into a sandboxed, instrumented document
pub struct DocumentComposer {
    config: ComposerConfig,
    instances: InstanceIds,
}

impl Default for DocumentComposer {
    fn default() -> Self {
        Self {
            config: ComposerConfig::default(),
            instances: InstanceIds::new(),
        }
    }
}

impl DocumentComposer {
    pub fn new(config: ComposerConfig) -> Result<Self> {
        config.validate().map_err(ComposerError::InvalidConfig)?;
        Ok(Self {
            config,
            instances: InstanceIds::new(),
        })
    }

    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    pub fn set_edit_mode(&mut self, edit_mode: bool) {
        self.config.edit_mode = edit_mode;
    }

    /// Compose a document for the current project state.
    ///
    /// Never fails: anything that cannot be rendered live degrades to a
    /// static document. Every call gets a fresh instance id.
    pub fn compose(
        &mut self,
        view: &ProjectView<'_>,
        classification: &Classification,
    ) -> ComposedDocument {
        let instance_id = self.instances.next_id();

        let (kind, html, diagnostics) = match (classification.kind, &classification.entry) {
            (ProjectKind::Flat, Some(entry)) => match self.compose_flat(view, entry, &instance_id) {
                Ok((html, diagnostics)) => (ProjectKind::Flat, html, diagnostics),
                Err(e) => {
                    log::warn!("Inlining {entry} failed, rendering placeholder: {e}");
                    let diagnostics = vec![Diagnostic::InlineFailed {
                        entry: entry.clone(),
                        reason: e.to_string(),
                    }];
                    (ProjectKind::Unknown, self.compose_unknown(), diagnostics)
                }
            },
            (ProjectKind::Framework, _) => (
                ProjectKind::Framework,
                self.compose_framework(view, classification.signal.as_deref(), &instance_id),
                Vec::new(),
            ),
            _ => (ProjectKind::Unknown, self.compose_unknown(), Vec::new()),
        };

        log::info!(
            "Composed {} document {instance_id} ({} bytes, {} diagnostics, edit mode {})",
            kind.as_str(),
            html.len(),
            diagnostics.len(),
            self.config.edit_mode
        );

        ComposedDocument {
            html,
            kind,
            instance_id,
            sandbox: self.config.sandbox.clone(),
            edit_mode: self.config.edit_mode && kind == ProjectKind::Flat,
            entry: classification.entry.clone().filter(|_| kind == ProjectKind::Flat),
            diagnostics,
        }
    }

    fn compose_flat(
        &self,
        view: &ProjectView<'_>,
        entry: &str,
        instance_id: &str,
    ) -> Result<(String, Vec<Diagnostic>)> {
        let graph = GraphBuilder::build(view);
        let inlined = Inliner::new(&graph).inline(entry)?;
        let has_shell = view.content(entry).is_some_and(has_document_shell);

        let diagnostics = inlined
            .unresolved
            .into_iter()
            .map(|r| Diagnostic::UnresolvedReference {
                from: r.from,
                target: r.target,
                reference: r.kind,
            })
            .collect();

        let instrumentation = Instrumentation::live(instance_id, &self.config);
        let html = if has_shell {
            splice_into_shell(&inlined.html, &instrumentation)
        } else {
            self.wrap_in_shell(&inlined.html, &instrumentation)
        };

        Ok((html, diagnostics))
    }

    fn compose_framework(
        &self,
        view: &ProjectView<'_>,
        signal: Option<&str>,
        instance_id: &str,
    ) -> String {
        let files: String = view
            .project()
            .paths()
            .map(|path| {
                let marker = if view.is_edited(path) { " (edited)" } else { "" };
                format!("<li>{}{marker}</li>\n", escape_html(path))
            })
            .collect();
        let reason = signal
            .map(|signal| {
                format!(
                    " (detected from <code>{}</code>)",
                    escape_html(signal)
                )
            })
            .unwrap_or_default();

        static_document(
            &self.config.title,
            &format!(
                "<main>\n<h1>Live preview is not available for this project</h1>\n\
<p>This project needs a build step{reason}. Download the files and run it locally.</p>\n\
<ul>\n{files}</ul>\n</main>"
            ),
            &Instrumentation::fixed_height(instance_id, self.config.framework_height),
        )
    }

    fn compose_unknown(&self) -> String {
        static_document(
            &self.config.title,
            "<main>\n<h1>Preview unavailable</h1>\n\
<p>No renderable page was found in this response.</p>\n</main>",
            "",
        )
    }

    fn wrap_in_shell(&self, markup: &str, instrumentation: &Instrumentation) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{}</title>
{}
</head>
<body>
{}
{}
</body>
</html>
"#,
            escape_html(&self.config.title),
            instrumentation.head,
            markup,
            instrumentation.body
        )
    }
}

/// Splice instrumentation into markup that has its own shell.
///
/// Head scripts go right after the first `<head>` tag so they run before any
/// project script, or before the first `<body>` tag when there is no head.
/// Body scripts go before the last `</body>`. Whatever finds no anchor is
/// appended.
fn splice_into_shell(markup: &str, instrumentation: &Instrumentation) -> String {
    let head_at = find_open_tag(markup, "head")
        .map(|tag| tag.end)
        .or_else(|| find_open_tag(markup, "body").map(|tag| tag.start));
    let (html, body) = match head_at {
        Some(at) => (
            insert_at(markup, at, &instrumentation.head),
            instrumentation.body.clone(),
        ),
        None => (
            markup.to_string(),
            format!("{}\n{}", instrumentation.head, instrumentation.body),
        ),
    };

    match rfind_ci(&html, "</body>") {
        Some(at) => insert_at(&html, at, &body),
        None => format!("{html}\n{body}\n"),
    }
}

fn static_document(title: &str, body: &str, script: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{}</title>
<style>{PLACEHOLDER_STYLES}</style>
</head>
<body>
{body}
{script}
</body>
</html>
"#,
        escape_html(title)
    )
}
