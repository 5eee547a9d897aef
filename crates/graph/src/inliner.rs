use std::sync::OnceLock;

use preview_parser::FileKind;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};
use crate::markup::{find_open_tag, insert_at, rfind_ci};
use crate::types::{ModuleGraph, ModuleNode, Reference, ReferenceKind, Resolution};

/// Attribute marking an element produced by inlining
pub const INLINE_SOURCE_ATTR: &str = "data-preview-source";

/// A reference the inliner left in place
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedReference {
    pub from: String,
    pub target: String,
    pub kind: ReferenceKind,
}

/// Markup with every resolvable reference spliced in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlinedMarkup {
    /// Entry markup path
    pub entry: String,

    pub html: String,

    /// Paths whose content was embedded: referenced modules in document
    /// order, then modules no markup references
    pub inlined: Vec<String>,

    /// References left untouched; the browser surfaces any load failure
    pub unresolved: Vec<UnresolvedReference>,
}

/// Rewrites external references of one markup module into embedded content
pub struct Inliner<'g> {
    graph: &'g ModuleGraph,
}

impl<'g> Inliner<'g> {
    pub fn new(graph: &'g ModuleGraph) -> Self {
        Self { graph }
    }

    /// Inline the references of `entry`.
    ///
    /// Unresolvable and external references are kept verbatim; only a missing
    /// or non-markup entry is an error. Stylesheets and scripts that no markup
    /// references are embedded as well: styles at the top of the document,
    /// scripts at the end of the body.
    pub fn inline(&self, entry: &str) -> Result<InlinedMarkup> {
        let node = self
            .graph
            .find_node(entry)
            .and_then(|idx| self.graph.get_node(idx))
            .ok_or_else(|| GraphError::NodeNotFound(entry.to_string()))?;
        if node.kind != FileKind::Markup {
            return Err(GraphError::NotMarkup(entry.to_string()));
        }

        let source = node.content.as_str();
        let mut html = String::with_capacity(source.len());
        let mut inlined = Vec::new();
        let mut unresolved = Vec::new();
        let mut cursor = 0;

        for reference in self.graph.references_from(entry) {
            match &reference.resolution {
                Resolution::Resolved(path) => {
                    let Some(body) = self.graph.content(path) else {
                        continue;
                    };
                    html.push_str(&source[cursor..reference.span.start]);
                    html.push_str(&render_inline(reference, path, body));
                    cursor = reference.span.end;
                    inlined.push(path.clone());
                }
                Resolution::Unresolved => {
                    log::debug!(
                        "Leaving unresolved {} reference {:?} in {entry}",
                        reference.kind.as_str(),
                        reference.target
                    );
                    unresolved.push(UnresolvedReference {
                        from: reference.from.clone(),
                        target: reference.target.clone(),
                        kind: reference.kind,
                    });
                }
                Resolution::External => {}
            }
        }
        html.push_str(&source[cursor..]);

        let styles: Vec<_> = self
            .unreferenced(ReferenceKind::Stylesheet)
            .into_iter()
            .map(|node| {
                inlined.push(node.path.clone());
                render_style(&node.path, None, &node.content)
            })
            .collect();
        let scripts: Vec<_> = self
            .unreferenced(ReferenceKind::Script)
            .into_iter()
            .filter_map(|node| {
                let script_type = match node.path.rsplit_once('.') {
                    Some((_, ext)) if ext.eq_ignore_ascii_case("js") => None,
                    Some((_, ext)) if ext.eq_ignore_ascii_case("mjs") => Some("module"),
                    _ => return None,
                };
                inlined.push(node.path.clone());
                Some(render_script(&node.path, script_type, &node.content))
            })
            .collect();

        if !styles.is_empty() {
            log::debug!("Embedding {} unreferenced stylesheets into {entry}", styles.len());
            let at = style_position(&html);
            html = insert_at(&html, at, &styles.join("\n"));
        }
        if !scripts.is_empty() {
            log::debug!("Embedding {} unreferenced scripts into {entry}", scripts.len());
            let at = rfind_ci(&html, "</body>")
                .or_else(|| rfind_ci(&html, "</html>"))
                .unwrap_or(html.len());
            html = insert_at(&html, at, &scripts.join("\n"));
        }

        Ok(InlinedMarkup {
            entry: entry.to_string(),
            html,
            inlined,
            unresolved,
        })
    }

    /// Modules of the matching file kind that no markup references as `kind`,
    /// in project order
    fn unreferenced(&self, kind: ReferenceKind) -> Vec<&ModuleNode> {
        let file_kind = match kind {
            ReferenceKind::Stylesheet => FileKind::Stylesheet,
            ReferenceKind::Script => FileKind::Script,
        };
        self.graph
            .nodes()
            .map(|(_, node)| node)
            .filter(|node| node.kind == file_kind && !self.graph.is_referenced_as(&node.path, kind))
            .collect()
    }
}

/// Where unreferenced styles go: inside `<head>`, else before `<body>`, else
/// after `<html>` or the doctype, else at the very start
fn style_position(html: &str) -> usize {
    find_open_tag(html, "head")
        .map(|tag| tag.end)
        .or_else(|| find_open_tag(html, "body").map(|tag| tag.start))
        .or_else(|| find_open_tag(html, "html").map(|tag| tag.end))
        .or_else(|| find_open_tag(html, "!doctype").map(|tag| tag.end))
        .unwrap_or(0)
}

fn render_inline(reference: &Reference, path: &str, body: &str) -> String {
    let qualifier = reference.qualifier.as_deref();
    match reference.kind {
        ReferenceKind::Stylesheet => render_style(path, qualifier, body),
        ReferenceKind::Script => render_script(path, qualifier, body),
    }
}

fn render_style(path: &str, media: Option<&str>, body: &str) -> String {
    let media = media
        .map(|media| format!(" media=\"{}\"", escape_attr(media)))
        .unwrap_or_default();
    format!(
        "<style {INLINE_SOURCE_ATTR}=\"{}\"{media}>\n{}\n</style>",
        escape_attr(path),
        escape_closing_tag(body, "style")
    )
}

fn render_script(path: &str, script_type: Option<&str>, body: &str) -> String {
    let script_type = script_type
        .map(|ty| format!(" type=\"{}\"", escape_attr(ty)))
        .unwrap_or_default();
    format!(
        "<script {INLINE_SOURCE_ATTR}=\"{}\"{script_type}>\n{}\n</script>",
        escape_attr(path),
        escape_closing_tag(body, "script")
    )
}

/// Break `</tag` sequences so an embedded body cannot close its element early
pub fn escape_closing_tag(body: &str, tag: &str) -> String {
    static SCRIPT: OnceLock<Regex> = OnceLock::new();
    static STYLE: OnceLock<Regex> = OnceLock::new();

    let regex = match tag {
        "script" => SCRIPT.get_or_init(|| Regex::new(r"(?i)</(script)").expect("valid regex")),
        _ => STYLE.get_or_init(|| Regex::new(r"(?i)</(style)").expect("valid regex")),
    };
    regex.replace_all(body, r"<\/$1").into_owned()
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GraphBuilder;
    use pretty_assertions::assert_eq;
    use preview_parser::{EditOverlay, ParseReport, Project, ProjectFile, ProjectView};

    fn project(files: &[(&str, &str)]) -> Project {
        Project {
            files: files
                .iter()
                .map(|(path, content)| ProjectFile::new(*path, *content))
                .collect(),
            report: ParseReport::default(),
        }
    }

    #[test]
    fn inlines_stylesheet_and_script() {
        let project = project(&[
            (
                "index.html",
                r#"<head><link rel="stylesheet" href="./styles.css"></head><body><script src="app.js"></script></body>"#,
            ),
            ("styles.css", "body{color:red}"),
            ("app.js", "console.log(1)"),
        ]);
        let overlay = EditOverlay::new();
        let graph = GraphBuilder::build(&ProjectView::new(&project, &overlay));

        let out = Inliner::new(&graph).inline("index.html").unwrap();
        assert_eq!(
            out.html,
            "<head><style data-preview-source=\"styles.css\">\nbody{color:red}\n</style></head>\
<body><script data-preview-source=\"app.js\">\nconsole.log(1)\n</script></body>"
        );
        assert_eq!(out.inlined, vec!["styles.css".to_string(), "app.js".to_string()]);
        assert!(out.unresolved.is_empty());
    }

    #[test]
    fn keeps_unresolved_and_external_tags() {
        let html = r#"<link rel="stylesheet" href="missing.css"><script src="https://cdn.x/lib.js"></script>"#;
        let project = project(&[("index.html", html)]);
        let overlay = EditOverlay::new();
        let graph = GraphBuilder::build(&ProjectView::new(&project, &overlay));

        let out = Inliner::new(&graph).inline("index.html").unwrap();
        assert_eq!(out.html, html);
        assert_eq!(
            out.unresolved,
            vec![UnresolvedReference {
                from: "index.html".into(),
                target: "missing.css".into(),
                kind: ReferenceKind::Stylesheet,
            }]
        );
    }

    #[test]
    fn embeds_stylesheet_the_markup_never_links() {
        let project = project(&[
            ("index.html", "<html><body>Hi</body></html>"),
            ("styles.css", "body{color:red}"),
        ]);
        let overlay = EditOverlay::new();
        let graph = GraphBuilder::build(&ProjectView::new(&project, &overlay));

        let out = Inliner::new(&graph).inline("index.html").unwrap();
        assert_eq!(
            out.html,
            "<html><style data-preview-source=\"styles.css\">\nbody{color:red}\n</style>\n<body>Hi</body></html>"
        );
        assert_eq!(out.inlined, vec!["styles.css".to_string()]);
    }

    #[test]
    fn embeds_unlinked_scripts_at_end_of_body() {
        let project = project(&[
            (
                "index.html",
                "<!DOCTYPE html><html><head><title>t</title></head><body><p>x</p></body></html>",
            ),
            ("main.js", "start()"),
            ("widget.mjs", "export {}"),
            ("types.ts", "let a: number = 1"),
            ("theme.css", "p{}"),
        ]);
        let overlay = EditOverlay::new();
        let graph = GraphBuilder::build(&ProjectView::new(&project, &overlay));

        let out = Inliner::new(&graph).inline("index.html").unwrap();
        assert_eq!(
            out.html,
            "<!DOCTYPE html><html><head><style data-preview-source=\"theme.css\">\np{}\n</style>\n\
<title>t</title></head><body><p>x</p><script data-preview-source=\"main.js\">\nstart()\n</script>\n\
<script data-preview-source=\"widget.mjs\" type=\"module\">\nexport {}\n</script>\n</body></html>"
        );
        assert_eq!(out.inlined, vec!["theme.css", "main.js", "widget.mjs"]);
        assert!(!out.html.contains("let a: number"));
    }

    #[test]
    fn linked_modules_are_not_embedded_twice() {
        let project = project(&[
            ("index.html", r#"<link rel="stylesheet" href="a.css"><p>x</p>"#),
            ("a.css", "a{}"),
            ("b.css", "b{}"),
        ]);
        let overlay = EditOverlay::new();
        let graph = GraphBuilder::build(&ProjectView::new(&project, &overlay));

        let out = Inliner::new(&graph).inline("index.html").unwrap();
        assert_eq!(out.html.matches("a{}").count(), 1);
        assert!(out.html.starts_with("<style data-preview-source=\"b.css\">\nb{}\n</style>\n"));
        assert_eq!(out.inlined, vec!["a.css", "b.css"]);
    }

    #[test]
    fn escapes_closing_tags_in_bodies() {
        assert_eq!(
            escape_closing_tag("s = '</SCRIPT>';", "script"),
            r"s = '<\/SCRIPT>';"
        );
        assert_eq!(escape_closing_tag("a{}</style>", "style"), r"a{}<\/style>");
        assert_eq!(escape_closing_tag("plain", "script"), "plain");
    }

    #[test]
    fn missing_or_non_markup_entry_is_error() {
        let project = project(&[("app.js", "x()")]);
        let overlay = EditOverlay::new();
        let graph = GraphBuilder::build(&ProjectView::new(&project, &overlay));
        let inliner = Inliner::new(&graph);

        assert!(matches!(inliner.inline("index.html"), Err(GraphError::NodeNotFound(_))));
        assert!(matches!(inliner.inline("app.js"), Err(GraphError::NotMarkup(_))));
    }
}
