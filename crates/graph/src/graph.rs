use std::collections::HashSet;

use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::types::{ModuleGraph, ModuleNode, Reference, ReferenceEdge, ReferenceKind, Resolution};

impl ModuleGraph {
    /// Modules a file references directly (outgoing edges)
    pub fn dependencies(&self, path: &str) -> Vec<(&ModuleNode, &ReferenceEdge)> {
        self.neighbors(path, Direction::Outgoing)
    }

    /// Modules that reference a file directly (incoming edges)
    pub fn dependents(&self, path: &str) -> Vec<(&ModuleNode, &ReferenceEdge)> {
        self.neighbors(path, Direction::Incoming)
    }

    fn neighbors(&self, path: &str, direction: Direction) -> Vec<(&ModuleNode, &ReferenceEdge)> {
        let Some(idx) = self.find_node(path) else {
            return Vec::new();
        };

        let mut out: Vec<_> = self
            .graph
            .edges_directed(idx, direction)
            .filter_map(|edge| {
                let other = match direction {
                    Direction::Outgoing => edge.target(),
                    Direction::Incoming => edge.source(),
                };
                self.get_node(other).map(|node| (node, edge.weight()))
            })
            .collect();
        // petgraph walks adjacency lists newest first
        out.reverse();
        out
    }

    /// Every module reachable from `path`, excluding `path` itself
    pub fn reachable_from(&self, path: &str) -> Vec<&ModuleNode> {
        let Some(start) = self.find_node(path) else {
            return Vec::new();
        };

        let mut visited: HashSet<NodeIndex> = HashSet::new();
        let mut stack = vec![start];
        let mut result = Vec::new();

        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            if current != start {
                if let Some(node) = self.get_node(current) {
                    result.push(node);
                }
            }
            for edge in self.graph.edges(current) {
                if !visited.contains(&edge.target()) {
                    stack.push(edge.target());
                }
            }
        }

        result
    }

    /// References found in one markup file, in document order
    pub fn references_from<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a Reference> {
        self.references.iter().filter(move |r| r.from == path)
    }

    /// References with no matching project file
    pub fn unresolved(&self) -> Vec<&Reference> {
        self.references
            .iter()
            .filter(|r| r.resolution == Resolution::Unresolved)
            .collect()
    }

    /// Whether a path is referenced as the given kind anywhere
    pub fn is_referenced_as(&self, path: &str, kind: ReferenceKind) -> bool {
        self.references
            .iter()
            .any(|r| r.kind == kind && r.resolved_path() == Some(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use preview_parser::FileKind;

    fn module(path: &str) -> ModuleNode {
        ModuleNode {
            path: path.to_string(),
            kind: FileKind::from_path(path),
            content: String::new(),
            edited: false,
        }
    }

    fn edge(kind: ReferenceKind, target: &str) -> ReferenceEdge {
        ReferenceEdge {
            kind,
            target: target.to_string(),
        }
    }

    fn sample() -> ModuleGraph {
        let mut graph = ModuleGraph::new();
        let index = graph.add_node(module("index.html"));
        let about = graph.add_node(module("about.html"));
        let css = graph.add_node(module("site.css"));
        let js = graph.add_node(module("app.js"));
        graph.add_node(module("unused.js"));

        graph.add_edge(index, css, edge(ReferenceKind::Stylesheet, "site.css"));
        graph.add_edge(index, js, edge(ReferenceKind::Script, "./app.js"));
        graph.add_edge(about, css, edge(ReferenceKind::Stylesheet, "/site.css"));
        graph
    }

    #[test]
    fn test_dependencies_in_insertion_order() {
        let graph = sample();
        let deps: Vec<_> = graph
            .dependencies("index.html")
            .into_iter()
            .map(|(node, edge)| (node.path.as_str(), edge.kind))
            .collect();
        assert_eq!(
            deps,
            vec![
                ("site.css", ReferenceKind::Stylesheet),
                ("app.js", ReferenceKind::Script)
            ]
        );
    }

    #[test]
    fn test_dependents() {
        let graph = sample();
        let mut users: Vec<_> = graph
            .dependents("site.css")
            .into_iter()
            .map(|(node, _)| node.path.as_str())
            .collect();
        users.sort_unstable();
        assert_eq!(users, vec!["about.html", "index.html"]);
        assert!(graph.dependents("unused.js").is_empty());
        assert!(graph.dependents("missing.js").is_empty());
    }

    #[test]
    fn test_reachable_from() {
        let graph = sample();
        let mut reached: Vec<_> = graph
            .reachable_from("index.html")
            .into_iter()
            .map(|node| node.path.as_str())
            .collect();
        reached.sort_unstable();
        assert_eq!(reached, vec!["app.js", "site.css"]);
        assert!(graph.reachable_from("site.css").is_empty());
    }
}
