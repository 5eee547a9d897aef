use std::collections::HashMap;
use std::sync::OnceLock;

use preview_parser::{normalize_path, FileKind, ProjectView};
use regex::Regex;

use crate::types::{ModuleGraph, ModuleNode, Reference, ReferenceEdge, ReferenceKind, Resolution};

fn link_tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<link\b([^>]*)>").expect("valid link regex"))
}

fn script_tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)<script\b([^>]*)>\s*</script\s*>").expect("valid script regex")
    })
}

fn attribute_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)([a-z][a-z0-9_:-]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
            .expect("valid attribute regex")
    })
}

/// Builds the module graph for the current project state
pub struct GraphBuilder;

impl GraphBuilder {
    /// Build the graph from project files merged with the edit overlay.
    ///
    /// Resolution always reads the current overlay value; nothing is cached
    /// between builds.
    pub fn build(view: &ProjectView<'_>) -> ModuleGraph {
        let mut graph = ModuleGraph::new();

        // Phase 1: one node per file, carrying current content
        for file in view.current_files() {
            let edited = view.is_edited(&file.path);
            graph.add_node(ModuleNode {
                kind: file.kind(),
                path: file.path,
                content: file.content,
                edited,
            });
        }

        // Phase 2: scan markup for references and add edges
        let markup: Vec<(String, String)> = graph
            .nodes()
            .filter(|(_, node)| node.kind == FileKind::Markup)
            .map(|(_, node)| (node.path.clone(), node.content.clone()))
            .collect();

        for (path, content) in markup {
            let references = scan_references(&path, &content, &graph.path_index);
            for reference in references {
                if let (Some(from), Some(to)) = (
                    graph.find_node(&path),
                    reference.resolved_path().and_then(|p| graph.find_node(p)),
                ) {
                    graph.add_edge(
                        from,
                        to,
                        ReferenceEdge {
                            kind: reference.kind,
                            target: reference.target.clone(),
                        },
                    );
                }
                graph.references.push(reference);
            }
        }

        log::info!(
            "Built module graph: {} modules, {} references ({} unresolved)",
            graph.node_count(),
            graph.references.len(),
            graph.unresolved().len()
        );

        graph
    }
}

/// Find stylesheet and script references in a markup document, in order
pub fn scan_references<T>(from: &str, content: &str, known: &HashMap<String, T>) -> Vec<Reference> {
    let mut references = Vec::new();

    for caps in link_tag_regex().captures_iter(content) {
        let (Some(tag), Some(attrs)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let attrs = parse_attributes(attrs.as_str());
        let is_stylesheet = attrs
            .get("rel")
            .is_some_and(|rel| rel.split_whitespace().any(|r| r.eq_ignore_ascii_case("stylesheet")));
        let Some(href) = attrs.get("href").filter(|_| is_stylesheet) else {
            continue;
        };
        references.push(Reference {
            kind: ReferenceKind::Stylesheet,
            from: from.to_string(),
            target: href.clone(),
            resolution: resolve_target(from, href, known),
            span: tag.range(),
            qualifier: attrs.get("media").cloned(),
        });
    }

    for caps in script_tag_regex().captures_iter(content) {
        let (Some(tag), Some(attrs)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let attrs = parse_attributes(attrs.as_str());
        let Some(src) = attrs.get("src") else {
            continue;
        };
        references.push(Reference {
            kind: ReferenceKind::Script,
            from: from.to_string(),
            target: src.clone(),
            resolution: resolve_target(from, src, known),
            span: tag.range(),
            qualifier: attrs.get("type").cloned(),
        });
    }

    references.sort_by_key(|r| r.span.start);
    references
}

/// Parse `name="value"` pairs; names are lowercased, first occurrence wins
fn parse_attributes(raw: &str) -> HashMap<String, String> {
    let mut attrs = HashMap::new();
    for caps in attribute_regex().captures_iter(raw) {
        let Some(name) = caps.get(1) else {
            continue;
        };
        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default();
        attrs.entry(name.as_str().to_lowercase()).or_insert(value);
    }
    attrs
}

/// Resolve a reference target against the known project paths.
///
/// External URLs are left alone. Query strings and fragments are dropped.
/// A root-relative target (`/x.css`) is looked up from the project root;
/// otherwise the target is tried relative to the referencing file's directory
/// and then as an exact project path.
pub fn resolve_target<T>(from: &str, target: &str, known: &HashMap<String, T>) -> Resolution {
    let target = target.trim();
    if target.is_empty() {
        return Resolution::Unresolved;
    }
    if is_external(target) {
        return Resolution::External;
    }

    let cleaned = target
        .split(['?', '#'])
        .next()
        .unwrap_or_default();

    let mut candidates = Vec::with_capacity(2);
    if !cleaned.starts_with('/') {
        if let Some((dir, _)) = from.rsplit_once('/') {
            candidates.push(join_relative(dir, cleaned));
        }
    }
    candidates.push(join_relative("", cleaned));

    candidates
        .into_iter()
        .find(|candidate| known.contains_key(candidate))
        .map_or(Resolution::Unresolved, Resolution::Resolved)
}

fn is_external(target: &str) -> bool {
    let lower = target.to_ascii_lowercase();
    lower.starts_with("//")
        || lower.contains("://")
        || ["data:", "blob:", "mailto:", "javascript:"]
            .iter()
            .any(|scheme| lower.starts_with(scheme))
}

/// Join `target` onto `base_dir`, folding `.` and `..` segments
fn join_relative(base_dir: &str, target: &str) -> String {
    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    normalize_path(&segments.join("/"))
}
